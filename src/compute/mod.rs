//! Compute module - Grid stepping, simulation driver and pattern search.

mod grid;
mod simulation;

pub mod evolution;

pub use grid::*;
pub use simulation::*;
