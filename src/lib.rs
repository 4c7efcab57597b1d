//! Life Evolve - Conway's Game of Life with an evolutionary pattern search.
//!
//! This crate provides a bounded Game of Life grid, a catalog of classic
//! patterns, and a genetic search that breeds starting grids which stay
//! active for longer.
//!
//! # Architecture
//!
//! The crate is split into two main modules:
//!
//! - `schema`: Configuration types, the pattern catalog and search results
//! - `compute`: Grid stepping, the simulation driver and evolutionary search
//!
//! # Example
//!
//! ```rust,no_run
//! use life_evolve::{
//!     schema::SimulationConfig,
//!     compute::Simulation,
//! };
//!
//! let mut sim = Simulation::new(SimulationConfig { rows: 40, cols: 40 });
//! sim.stamp("Glider", (1, 1))?;
//! sim.run(100);
//!
//! println!("Alive after 100 steps: {}", sim.stats().alive_cells);
//! println!("{}", sim.grid());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod compute;
pub mod schema;

// Re-export commonly used types
pub use compute::{Grid, GridError, Simulation, SimulationStats};
pub use schema::{EvolutionConfig, PatternName, SimulationConfig};
