//! Quick evolution performance test

use life_evolve::{
    compute::evolution::EvolutionEngine,
    schema::{EvaluationConfig, EvolutionConfig, MutationStrategy, PopulationConfig, SimulationConfig},
};
use std::time::Instant;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Evolution Performance Test ===\n");

    // Test different grid sizes
    for grid_size in [20, 40, 80] {
        println!("Grid size: {}x{}", grid_size, grid_size);

        let config = EvolutionConfig {
            population: PopulationConfig {
                size: 20,
                max_generations: 10,
            },
            evaluation: EvaluationConfig { horizon: 10 },
            base_config: SimulationConfig {
                rows: grid_size,
                cols: grid_size,
            },
            mutation: MutationStrategy::PerCell { rate: 0.01 },
            random_seed: Some(42),
            ..Default::default()
        };

        let start = Instant::now();
        let mut engine = EvolutionEngine::new(config)?;
        let result = engine.run()?;
        let elapsed = start.elapsed();

        let total_evals = result.stats.total_evaluations;
        let evals_per_sec = total_evals as f64 / elapsed.as_secs_f64();

        println!("  Generations:    {}", result.stats.generations);
        println!("  Evaluations:    {}", total_evals);
        println!("  Elapsed:        {:.2}s", elapsed.as_secs_f64());
        println!("  Evals/sec:      {:.1}", evals_per_sec);
        println!("  Best fitness:   {}", result.stats.best_fitness);
        println!();
    }

    println!("=== Horizon Test (fixed 40x40 grid) ===\n");

    for horizon in [10, 50, 200] {
        let config = EvolutionConfig {
            evaluation: EvaluationConfig { horizon },
            base_config: SimulationConfig { rows: 40, cols: 40 },
            random_seed: Some(42),
            ..Default::default()
        };

        let start = Instant::now();
        let result = EvolutionEngine::new(config)?.run()?;
        let elapsed = start.elapsed();

        println!(
            "Horizon {}: best {} alive, {} evals in {:.2}s",
            horizon,
            result.stats.best_fitness,
            result.stats.total_evaluations,
            elapsed.as_secs_f64()
        );
    }

    Ok(())
}
