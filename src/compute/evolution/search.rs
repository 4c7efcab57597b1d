//! Generational search over grid genomes.
//!
//! Each generation the population is evaluated, the top half survives
//! unchanged, and the rest is refilled with children bred from two distinct
//! survivors (crossover, then mutation).

use std::cmp::Reverse;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use crate::compute::Grid;
use crate::schema::{
    CandidateSnapshot, EvolutionConfig, EvolutionConfigError, EvolutionError, EvolutionHistory,
    EvolutionPhase, EvolutionProgress, EvolutionResult, EvolutionStats, StopReason,
};

use super::fitness::FitnessEvaluator;
use super::genome::{GenomeRng, genome_distance};

/// A candidate individual in the population.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// Unique identifier.
    pub id: u64,
    /// The genome.
    pub genome: Grid,
    /// Cached fitness; `None` until evaluated.
    pub fitness: Option<u32>,
    /// Generation created.
    pub generation: usize,
    /// Parent IDs.
    pub parents: Vec<u64>,
}

impl Candidate {
    /// Convert to snapshot for serialization.
    pub fn to_snapshot(&self) -> CandidateSnapshot {
        CandidateSnapshot {
            id: self.id,
            fitness: self.fitness.unwrap_or(0),
            genome: self.genome.clone(),
            generation: self.generation,
            parents: self.parents.clone(),
        }
    }
}

/// Indices of `scores` ordered best first. Equal scores keep index order.
pub fn rank_by_fitness(scores: &[u32]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by_key(|&i| Reverse(scores[i]));
    order
}

/// The top `population.len() / 2` members, best first.
///
/// Panics if `scores` is not the same length as `population`.
pub fn select<T: Clone>(population: &[T], scores: &[u32]) -> Vec<T> {
    assert_eq!(
        population.len(),
        scores.len(),
        "one score per population member"
    );
    rank_by_fitness(scores)
        .into_iter()
        .take(population.len() / 2)
        .map(|i| population[i].clone())
        .collect()
}

/// Index of the highest score; the earliest one wins ties.
fn best_index(scores: &[u32]) -> usize {
    scores
        .iter()
        .enumerate()
        .fold(0, |best, (i, &s)| if s > scores[best] { i } else { best })
}

fn mean(scores: &[u32]) -> f32 {
    if scores.is_empty() {
        return 0.0;
    }
    scores.iter().map(|&s| s as f32).sum::<f32>() / scores.len() as f32
}

/// Evolution engine that runs the search.
pub struct EvolutionEngine {
    config: EvolutionConfig,
    seed: u64,
    rng: GenomeRng,
    evaluator: FitnessEvaluator,
    population: Vec<Candidate>,
    history: EvolutionHistory,
    generation: usize,
    best_fitness: u32,
    evaluations: u64,
    next_id: u64,
    cancelled: Arc<AtomicBool>,
}

impl EvolutionEngine {
    /// Create a new evolution engine. The configuration is validated here,
    /// before any population exists.
    pub fn new(config: EvolutionConfig) -> Result<Self, EvolutionConfigError> {
        config.validate()?;

        let seed = config.random_seed.unwrap_or_else(rand::random);
        let evaluator = FitnessEvaluator::new(&config.evaluation);

        Ok(Self {
            config,
            seed,
            rng: GenomeRng::new(seed),
            evaluator,
            population: Vec::new(),
            history: EvolutionHistory::default(),
            generation: 0,
            best_fitness: 0,
            evaluations: 0,
            next_id: 0,
            cancelled: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Seed driving this run; reuse it to reproduce the result.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    /// Current population.
    pub fn population(&self) -> &[Candidate] {
        &self.population
    }

    /// Get cancellation handle. Setting it stops the run before the next
    /// generation is bred. The run that stops clears the flag, so the engine
    /// can be run again.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Initialize the population with random genomes, restarting the random
    /// stream from the seed.
    pub fn initialize(&mut self) {
        let size = self.config.population.size;
        let (rows, cols) = (self.config.base_config.rows, self.config.base_config.cols);

        self.population.clear();
        self.history = EvolutionHistory::default();
        self.generation = 0;
        self.best_fitness = 0;
        self.evaluations = 0;
        self.next_id = 0;
        self.rng = GenomeRng::new(self.seed);

        for genome in self.rng.random_population(size, rows, cols) {
            let id = self.next_id();
            self.population.push(Candidate {
                id,
                genome,
                fitness: None,
                generation: 0,
                parents: Vec::new(),
            });
        }
    }

    /// Evaluate every candidate without a cached fitness; return all scores
    /// in population order.
    fn evaluate_population(&mut self) -> Vec<u32> {
        let evaluator = &self.evaluator;
        let mut computed = 0u64;

        let scores = self
            .population
            .iter_mut()
            .map(|candidate| {
                *candidate.fitness.get_or_insert_with(|| {
                    computed += 1;
                    evaluator.evaluate(&candidate.genome)
                })
            })
            .collect();

        self.evaluations += computed;
        scores
    }

    /// Mean pairwise genome distance.
    fn compute_diversity(&self) -> f32 {
        if self.population.len() < 2 {
            return 0.0;
        }

        let mut total_distance = 0usize;
        let mut count = 0usize;

        for i in 0..self.population.len() {
            for j in (i + 1)..self.population.len() {
                // All genomes share the configured shape.
                if let Ok(d) =
                    genome_distance(&self.population[i].genome, &self.population[j].genome)
                {
                    total_distance += d;
                    count += 1;
                }
            }
        }

        if count > 0 {
            total_distance as f32 / count as f32
        } else {
            0.0
        }
    }

    fn progress(&self, scores: &[u32], phase: EvolutionPhase) -> EvolutionProgress {
        let best = best_index(scores);
        EvolutionProgress {
            generation: self.generation,
            total_generations: self.config.population.max_generations,
            generation_best: scores[best],
            avg_fitness: mean(scores),
            best_fitness: self.best_fitness,
            best_candidate: self.population[best].to_snapshot(),
            phase,
        }
    }

    /// Record statistics for the evaluated generation.
    fn record_generation(&mut self, scores: &[u32]) {
        let gen_best = scores[best_index(scores)];
        let avg = mean(scores);
        let diversity = self.compute_diversity();

        self.best_fitness = self.best_fitness.max(gen_best);
        self.history.best_fitness.push(gen_best);
        self.history.avg_fitness.push(avg);
        self.history.diversity.push(diversity);

        log::debug!(
            "Generation {}: best={} avg={:.2} diversity={:.1}",
            self.generation,
            gen_best,
            avg,
            diversity
        );
    }

    /// Replace the population with the survivors of `scores` plus their
    /// offspring.
    fn breed(&mut self, scores: &[u32]) -> Result<(), EvolutionError> {
        let size = self.config.population.size;
        let survivors = select(&self.population, scores);

        let mut next_gen = Vec::with_capacity(size);
        next_gen.extend(survivors.iter().cloned());

        while next_gen.len() < size {
            let (i, j) = self.rng.sample_parents(survivors.len())?;
            let (parent1, parent2) = (&survivors[i], &survivors[j]);

            let mut child = self
                .rng
                .crossover(self.config.crossover, &parent1.genome, &parent2.genome)?;
            self.rng.mutate(self.config.mutation, &mut child);

            let id = self.next_id();
            next_gen.push(Candidate {
                id,
                genome: child,
                fitness: None,
                generation: self.generation + 1,
                parents: vec![parent1.id, parent2.id],
            });
        }

        self.population = next_gen;
        self.generation += 1;
        Ok(())
    }

    /// Run evolution, reporting progress once per generation and once more
    /// for the final population.
    pub fn run_with_callback<F>(&mut self, mut callback: F) -> Result<EvolutionResult, EvolutionError>
    where
        F: FnMut(&EvolutionProgress),
    {
        self.config.validate()?;
        let start_time = Instant::now();
        let max_generations = self.config.population.max_generations;

        log::info!(
            "Starting evolution: population={} generations={} grid={}x{} seed={}",
            self.config.population.size,
            max_generations,
            self.config.base_config.rows,
            self.config.base_config.cols,
            self.seed
        );

        self.initialize();

        let stop_reason = loop {
            if self.cancelled.swap(false, Ordering::Relaxed) {
                log::info!("Evolution cancelled after {} generations", self.generation);
                break StopReason::Cancelled;
            }
            if self.generation >= max_generations {
                break StopReason::MaxGenerations;
            }

            let scores = self.evaluate_population();
            self.record_generation(&scores);

            let phase = if self.generation == 0 {
                EvolutionPhase::Initializing
            } else {
                EvolutionPhase::Evolving
            };
            callback(&self.progress(&scores, phase));

            self.breed(&scores)?;
        };

        // A request that arrived after the last check must not leak into the
        // next run.
        self.cancelled.store(false, Ordering::Relaxed);

        // Children of the last generation have not been scored yet.
        let scores = self.evaluate_population();
        self.best_fitness = self.best_fitness.max(scores[best_index(&scores)]);
        let phase = match stop_reason {
            StopReason::MaxGenerations => EvolutionPhase::Complete,
            StopReason::Cancelled => EvolutionPhase::Stopped,
        };
        callback(&self.progress(&scores, phase));

        let best = self.population[best_index(&scores)].to_snapshot();
        let elapsed = start_time.elapsed().as_secs_f64();

        log::info!(
            "Evolution finished after {} generations ({:?}): best fitness {} in {:.2}s",
            self.generation,
            stop_reason,
            best.fitness,
            elapsed
        );

        Ok(EvolutionResult {
            stats: EvolutionStats {
                generations: self.generation,
                total_evaluations: self.evaluations,
                best_fitness: best.fitness,
                final_avg_fitness: mean(&scores),
                elapsed_seconds: elapsed,
                stop_reason,
            },
            best,
            history: self.history.clone(),
        })
    }

    /// Run evolution (blocking).
    pub fn run(&mut self) -> Result<EvolutionResult, EvolutionError> {
        self.run_with_callback(|_| {})
    }
}

/// Evolve a `rows` x `cols` starting pattern with default operators.
pub fn run(
    generations: usize,
    population_size: usize,
    rows: usize,
    cols: usize,
    random_seed: Option<u64>,
) -> Result<EvolutionResult, EvolutionError> {
    let mut config = EvolutionConfig::default();
    config.population.size = population_size;
    config.population.max_generations = generations;
    config.base_config.rows = rows;
    config.base_config.cols = cols;
    config.random_seed = random_seed;

    EvolutionEngine::new(config)?.run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::evolution::fitness::fitness;
    use crate::schema::{CrossoverStrategy, MutationStrategy, SimulationConfig};

    fn small_config(size: usize, generations: usize, seed: u64) -> EvolutionConfig {
        EvolutionConfig {
            base_config: SimulationConfig { rows: 10, cols: 10 },
            population: crate::schema::PopulationConfig {
                size,
                max_generations: generations,
            },
            random_seed: Some(seed),
            ..Default::default()
        }
    }

    #[test]
    fn test_select_keeps_top_half_with_stable_ties() {
        let population = ["a", "b", "c", "d", "e"];
        let scores = [3, 5, 3, 5, 1];
        assert_eq!(select(&population, &scores), vec!["b", "d"]);
        assert_eq!(rank_by_fitness(&scores), vec![1, 3, 0, 2, 4]);
    }

    #[test]
    fn test_select_odd_size_rounds_down() {
        let population: Vec<usize> = (0..9).collect();
        let scores = [1, 1, 1, 1, 1, 1, 1, 1, 1];
        assert_eq!(select(&population, &scores), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_best_index_prefers_earliest() {
        assert_eq!(best_index(&[2, 7, 7, 1]), 1);
        assert_eq!(best_index(&[0, 0, 0]), 0);
    }

    #[test]
    fn test_engine_rejects_small_population() {
        let err = EvolutionEngine::new(small_config(3, 5, 1)).err();
        assert_eq!(
            err,
            Some(EvolutionConfigError::InsufficientPopulation { size: 3 })
        );
        assert!(matches!(
            run(5, 2, 10, 10, Some(1)),
            Err(EvolutionError::Config(
                EvolutionConfigError::InsufficientPopulation { size: 2 }
            ))
        ));
    }

    #[test]
    fn test_initialize_population() {
        let mut engine = EvolutionEngine::new(small_config(8, 5, 42)).unwrap();
        engine.initialize();

        assert_eq!(engine.population().len(), 8);
        for candidate in engine.population() {
            assert_eq!(candidate.genome.dims(), (10, 10));
            assert_eq!(candidate.fitness, None);
        }
    }

    #[test]
    fn test_survivors_persist_unchanged() {
        let mut engine = EvolutionEngine::new(small_config(8, 5, 3)).unwrap();
        engine.initialize();

        let scores = engine.evaluate_population();
        let expected: Vec<Grid> = select(engine.population(), &scores)
            .into_iter()
            .map(|c| c.genome)
            .collect();

        engine.breed(&scores).unwrap();
        let population = engine.population();
        assert_eq!(population.len(), 8);
        for (candidate, genome) in population.iter().zip(&expected) {
            assert_eq!(&candidate.genome, genome);
            assert!(candidate.fitness.is_some());
        }
        for child in &population[4..] {
            assert_eq!(child.fitness, None);
            assert_eq!(child.generation, 1);
            assert_eq!(child.parents.len(), 2);
            assert_ne!(child.parents[0], child.parents[1]);
        }
    }

    #[test]
    fn test_run_is_deterministic_for_seed() {
        let first = run(5, 8, 10, 10, Some(1234)).unwrap();
        let second = run(5, 8, 10, 10, Some(1234)).unwrap();

        assert_eq!(first.best.genome, second.best.genome);
        assert_eq!(first.best.fitness, second.best.fitness);
        assert_eq!(first.history, second.history);
        assert_eq!(first.stats.generations, 5);
        assert_eq!(first.stats.stop_reason, StopReason::MaxGenerations);
    }

    #[test]
    fn test_best_fitness_matches_reevaluation() {
        let result = run(4, 10, 12, 12, Some(99)).unwrap();
        assert_eq!(result.best.fitness, fitness(&result.best.genome, 10));
        assert_eq!(result.stats.best_fitness, result.best.fitness);
    }

    #[test]
    fn test_zero_generations_returns_best_initial() {
        let result = run(0, 8, 10, 10, Some(77)).unwrap();

        let initial = GenomeRng::new(77).random_population(8, 10, 10);
        let scores: Vec<u32> = initial.iter().map(|g| fitness(g, 10)).collect();
        let best = best_index(&scores);

        assert_eq!(result.best.genome, initial[best]);
        assert_eq!(result.best.fitness, scores[best]);
        assert_eq!(result.best.generation, 0);
        assert!(result.history.is_empty());
        assert_eq!(result.stats.generations, 0);
        assert_eq!(result.stats.total_evaluations, 8);
    }

    #[test]
    fn test_progress_reported_per_generation() {
        let mut engine = EvolutionEngine::new(small_config(6, 4, 5)).unwrap();
        let mut seen = Vec::new();
        let result = engine
            .run_with_callback(|p| seen.push((p.generation, p.generation_best, p.phase)))
            .unwrap();

        assert_eq!(seen.len(), 5);
        assert_eq!(seen[0].2, EvolutionPhase::Initializing);
        assert_eq!(seen[1].2, EvolutionPhase::Evolving);
        assert_eq!(seen[4], (4, result.best.fitness, EvolutionPhase::Complete));

        let points: Vec<(usize, u32)> = seen[..4].iter().map(|&(g, b, _)| (g, b)).collect();
        assert_eq!(points, result.history.points());
    }

    #[test]
    fn test_survivor_fitness_is_cached() {
        let mut engine = EvolutionEngine::new(small_config(8, 3, 8)).unwrap();
        let result = engine.run().unwrap();
        // 8 initial evaluations, then only the 4 new children per generation.
        assert_eq!(result.stats.total_evaluations, 8 + 3 * 4);
    }

    #[test]
    fn test_cancellation() {
        let mut engine = EvolutionEngine::new(small_config(8, 100, 21)).unwrap();
        let cancel = engine.cancel_handle();

        // Cancel immediately
        cancel.store(true, Ordering::Relaxed);

        let result = engine.run().unwrap();
        assert_eq!(result.stats.stop_reason, StopReason::Cancelled);
        assert_eq!(result.stats.generations, 0);
        assert_eq!(result.best.fitness, fitness(&result.best.genome, 10));
    }

    #[test]
    fn test_rerun_reproduces_result() {
        let mut engine = EvolutionEngine::new(small_config(8, 5, 1234)).unwrap();
        let first = engine.run().unwrap();
        let second = engine.run().unwrap();

        assert_eq!(first.best.genome, second.best.genome);
        assert_eq!(first.best.fitness, second.best.fitness);
        assert_eq!(first.best.id, second.best.id);
        assert_eq!(first.history, second.history);
    }

    #[test]
    fn test_cancel_applies_to_one_run() {
        let mut engine = EvolutionEngine::new(small_config(8, 4, 21)).unwrap();
        let cancel = engine.cancel_handle();

        cancel.store(true, Ordering::Relaxed);
        let cancelled = engine.run().unwrap();
        assert_eq!(cancelled.stats.stop_reason, StopReason::Cancelled);
        assert!(!cancel.load(Ordering::Relaxed));

        let resumed = engine.run().unwrap();
        assert_eq!(resumed.stats.stop_reason, StopReason::MaxGenerations);
        assert_eq!(resumed.stats.generations, 4);
    }

    #[test]
    fn test_cancellation_from_callback() {
        let mut engine = EvolutionEngine::new(small_config(8, 100, 21)).unwrap();
        let cancel = engine.cancel_handle();

        let result = engine
            .run_with_callback(|p| {
                if p.generation == 2 {
                    cancel.store(true, Ordering::Relaxed);
                }
            })
            .unwrap();
        assert_eq!(result.stats.stop_reason, StopReason::Cancelled);
        assert_eq!(result.stats.generations, 3);
        assert_eq!(result.history.len(), 3);
        assert_eq!(result.history.diversity.len(), 3);
        assert!(result.history.diversity[0] > 0.0);
    }

    #[test]
    fn test_alternate_operators() {
        let mut config = small_config(6, 3, 17);
        config.crossover = CrossoverStrategy::HalfSplit;
        config.mutation = MutationStrategy::SingleFlip;

        let mut engine = EvolutionEngine::new(config).unwrap();
        let result = engine.run().unwrap();
        assert_eq!(result.stats.generations, 3);
        assert_eq!(result.best.genome.dims(), (10, 10));
    }
}
