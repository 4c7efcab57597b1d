//! Evolutionary search for Game of Life starting patterns.
//!
//! # Overview
//!
//! - **Fitness** (`fitness`): alive cells after a fixed number of steps
//! - **Genome Operations** (`genome`): random generation, crossover, and mutation
//! - **Search** (`search`): generational loop with truncation selection
//!
//! # Example
//!
//! ```rust,no_run
//! use life_evolve::compute::evolution::EvolutionEngine;
//! use life_evolve::schema::EvolutionConfig;
//!
//! let mut config = EvolutionConfig::default();
//! config.random_seed = Some(42);
//!
//! let mut engine = EvolutionEngine::new(config)?;
//! let result = engine.run_with_callback(|progress| {
//!     println!("Generation {}: best = {}", progress.generation, progress.generation_best);
//! })?;
//!
//! println!("Best pattern fitness: {}", result.best.fitness);
//! println!("{}", result.best.genome);
//! # Ok::<(), life_evolve::schema::EvolutionError>(())
//! ```

mod fitness;
mod genome;
mod search;

pub use fitness::{FitnessEvaluator, fitness};
pub use genome::{GenomeRng, genome_distance};
pub use search::{Candidate, EvolutionEngine, rank_by_fitness, run, select};
