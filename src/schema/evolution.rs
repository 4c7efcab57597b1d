//! Evolution configuration types for the starting-pattern search.
//!
//! The search evolves whole grids: every genome is a [`Grid`] with the
//! dimensions of `base_config`, scored by how many cells are alive after a
//! fixed number of generations.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::compute::{Grid, GridError};

use super::{ConfigError, SimulationConfig};

/// Smallest population that still leaves two survivors to breed from.
pub const MIN_POPULATION_SIZE: usize = 4;

/// Top-level configuration for the evolutionary search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionConfig {
    /// Grid dimensions of every genome.
    #[serde(default)]
    pub base_config: SimulationConfig,
    /// Population and generation settings.
    #[serde(default)]
    pub population: PopulationConfig,
    /// Fitness evaluation settings.
    #[serde(default)]
    pub evaluation: EvaluationConfig,
    /// How two parents are combined into a child.
    #[serde(default)]
    pub crossover: CrossoverStrategy,
    /// How a child is perturbed after crossover.
    #[serde(default)]
    pub mutation: MutationStrategy,
    /// Random seed for reproducibility.
    #[serde(default)]
    pub random_seed: Option<u64>,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            base_config: SimulationConfig::default(),
            population: PopulationConfig::default(),
            evaluation: EvaluationConfig::default(),
            crossover: CrossoverStrategy::default(),
            mutation: MutationStrategy::default(),
            random_seed: None,
        }
    }
}

/// Population and generation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationConfig {
    /// Number of individuals in population.
    #[serde(default = "default_population_size")]
    pub size: usize,
    /// Number of generations to evolve.
    #[serde(default = "default_max_generations")]
    pub max_generations: usize,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            size: default_population_size(),
            max_generations: default_max_generations(),
        }
    }
}

fn default_population_size() -> usize {
    20
}
fn default_max_generations() -> usize {
    10
}

/// Fitness evaluation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationConfig {
    /// Generations simulated before alive cells are counted.
    #[serde(default = "default_horizon")]
    pub horizon: u32,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            horizon: default_horizon(),
        }
    }
}

fn default_horizon() -> u32 {
    10
}

/// Crossover strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CrossoverStrategy {
    /// Each cell comes from a parent picked uniformly at random.
    #[default]
    CellwiseRandom,
    /// Rows `[0, rows / 2)` from the first parent, the rest from the second.
    HalfSplit,
}

/// Mutation strategy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MutationStrategy {
    /// Flip every cell independently with probability `rate`.
    PerCell {
        #[serde(default = "default_mutation_rate")]
        rate: f64,
    },
    /// Flip exactly one uniformly chosen cell.
    SingleFlip,
}

impl Default for MutationStrategy {
    fn default() -> Self {
        Self::PerCell {
            rate: default_mutation_rate(),
        }
    }
}

fn default_mutation_rate() -> f64 {
    0.01
}

// ============================================================================
// Progress and Result Types
// ============================================================================

/// Progress update, emitted once per evaluated generation and once for the
/// final population.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionProgress {
    /// Generation just evaluated (0-based).
    pub generation: usize,
    /// Total generations planned.
    pub total_generations: usize,
    /// Best fitness in this generation's population.
    pub generation_best: u32,
    /// Average fitness of this generation's population.
    pub avg_fitness: f32,
    /// Best fitness seen so far in the run.
    pub best_fitness: u32,
    /// Best candidate of this generation.
    pub best_candidate: CandidateSnapshot,
    /// Current phase of the algorithm.
    pub phase: EvolutionPhase,
}

/// Snapshot of a candidate for display or serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateSnapshot {
    /// Unique identifier within the run.
    pub id: u64,
    /// Alive cells after the evaluation horizon.
    pub fitness: u32,
    /// Starting grid.
    pub genome: Grid,
    /// Generation this candidate was created.
    pub generation: usize,
    /// Parent IDs (empty for the initial population).
    pub parents: Vec<u64>,
}

/// Per-generation fitness history, for plotting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EvolutionHistory {
    /// Best fitness per generation.
    pub best_fitness: Vec<u32>,
    /// Average fitness per generation.
    pub avg_fitness: Vec<f32>,
    /// Mean pairwise Hamming distance between genomes, per generation.
    pub diversity: Vec<f32>,
}

impl EvolutionHistory {
    /// `(generation, best_fitness)` pairs.
    pub fn points(&self) -> Vec<(usize, u32)> {
        self.best_fitness.iter().copied().enumerate().collect()
    }

    pub fn len(&self) -> usize {
        self.best_fitness.len()
    }

    pub fn is_empty(&self) -> bool {
        self.best_fitness.is_empty()
    }
}

/// Current phase of evolution.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum EvolutionPhase {
    /// Initial population created, not yet bred.
    #[default]
    Initializing,
    /// Evolving generations.
    Evolving,
    /// Stopped at the generation limit.
    Complete,
    /// Cancelled before the generation limit.
    Stopped,
}

/// Final result of an evolution run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionResult {
    /// Best candidate of the final population.
    pub best: CandidateSnapshot,
    /// Statistics from the run.
    pub stats: EvolutionStats,
    /// Full history for analysis.
    pub history: EvolutionHistory,
}

/// Statistics from an evolution run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionStats {
    /// Generations bred.
    pub generations: usize,
    /// Fitness evaluations actually computed (cache hits excluded).
    pub total_evaluations: u64,
    /// Fitness of the returned best candidate.
    pub best_fitness: u32,
    /// Average fitness of the final population.
    pub final_avg_fitness: f32,
    /// Time taken (in seconds).
    pub elapsed_seconds: f64,
    /// Reason for stopping.
    pub stop_reason: StopReason,
}

/// Reason evolution stopped.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum StopReason {
    /// Reached the configured generation count.
    MaxGenerations,
    /// Cancelled through the engine's cancel handle.
    Cancelled,
}

// ============================================================================
// Validation
// ============================================================================

/// Evolution configuration validation errors.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum EvolutionConfigError {
    #[error(
        "Population size {size} leaves fewer than 2 survivors to breed from (minimum {})",
        MIN_POPULATION_SIZE
    )]
    InsufficientPopulation { size: usize },
    #[error("Mutation rate {0} must be within [0, 1]")]
    InvalidMutationRate(f64),
    #[error("Evaluation horizon must be positive")]
    InvalidHorizon,
    #[error("Base config validation failed: {0}")]
    BaseConfigError(#[from] ConfigError),
}

/// Errors surfaced by a search run.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum EvolutionError {
    #[error(transparent)]
    Config(#[from] EvolutionConfigError),
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Errors while loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(#[from] EvolutionConfigError),
}

impl EvolutionConfig {
    /// Validate evolution configuration.
    pub fn validate(&self) -> Result<(), EvolutionConfigError> {
        self.base_config.validate()?;

        if self.population.size < MIN_POPULATION_SIZE {
            return Err(EvolutionConfigError::InsufficientPopulation {
                size: self.population.size,
            });
        }

        if self.evaluation.horizon == 0 {
            return Err(EvolutionConfigError::InvalidHorizon);
        }

        if let MutationStrategy::PerCell { rate } = self.mutation
            && !(0.0..=1.0).contains(&rate)
        {
            return Err(EvolutionConfigError::InvalidMutationRate(rate));
        }

        Ok(())
    }

    /// Load and validate a JSON configuration file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let text = fs::read_to_string(path)?;
        let config: EvolutionConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = EvolutionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.population.size, 20);
        assert_eq!(config.evaluation.horizon, 10);
        assert_eq!(config.crossover, CrossoverStrategy::CellwiseRandom);
        assert_eq!(config.mutation, MutationStrategy::PerCell { rate: 0.01 });
    }

    #[test]
    fn test_population_below_four_rejected() {
        for size in 0..MIN_POPULATION_SIZE {
            let mut config = EvolutionConfig::default();
            config.population.size = size;
            assert_eq!(
                config.validate(),
                Err(EvolutionConfigError::InsufficientPopulation { size })
            );
        }

        let mut config = EvolutionConfig::default();
        config.population.size = MIN_POPULATION_SIZE;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_rate_and_horizon() {
        let mut config = EvolutionConfig::default();
        config.mutation = MutationStrategy::PerCell { rate: 1.5 };
        assert_eq!(
            config.validate(),
            Err(EvolutionConfigError::InvalidMutationRate(1.5))
        );

        let mut config = EvolutionConfig::default();
        config.evaluation.horizon = 0;
        assert_eq!(config.validate(), Err(EvolutionConfigError::InvalidHorizon));

        let mut config = EvolutionConfig::default();
        config.base_config.cols = 0;
        assert!(matches!(
            config.validate(),
            Err(EvolutionConfigError::BaseConfigError(_))
        ));
    }

    #[test]
    fn test_strategies_deserialize_from_tags() {
        let json = r#"{
            "crossover": {"type": "HalfSplit"},
            "mutation": {"type": "SingleFlip"},
            "random_seed": 7
        }"#;
        let config: EvolutionConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.crossover, CrossoverStrategy::HalfSplit);
        assert_eq!(config.mutation, MutationStrategy::SingleFlip);
        assert_eq!(config.random_seed, Some(7));
        assert_eq!(config.base_config, SimulationConfig::default());

        let config: EvolutionConfig =
            serde_json::from_str(r#"{"mutation": {"type": "PerCell"}}"#).unwrap();
        assert_eq!(config.mutation, MutationStrategy::PerCell { rate: 0.01 });
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"base_config": {{"rows": 10, "cols": 10}}, "population": {{"size": 8, "max_generations": 5}}}}"#
        )
        .unwrap();

        let config = EvolutionConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.base_config.rows, 10);
        assert_eq!(config.population.size, 8);
        assert_eq!(config.population.max_generations, 5);
    }

    #[test]
    fn test_from_json_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(
            EvolutionConfig::from_json_file(&missing),
            Err(ConfigLoadError::Io(_))
        ));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"population": {{"size": 2}}}}"#).unwrap();
        assert!(matches!(
            EvolutionConfig::from_json_file(file.path()),
            Err(ConfigLoadError::Invalid(
                EvolutionConfigError::InsufficientPopulation { size: 2 }
            ))
        ));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            EvolutionConfig::from_json_file(file.path()),
            Err(ConfigLoadError::Json(_))
        ));
    }

    #[test]
    fn test_history_points() {
        let history = EvolutionHistory {
            best_fitness: vec![12, 15, 15],
            avg_fitness: vec![4.0, 6.5, 7.0],
            diversity: vec![50.0, 31.5, 20.25],
        };
        assert_eq!(history.points(), vec![(0, 12), (1, 15), (2, 15)]);
        assert_eq!(history.len(), 3);
    }
}
