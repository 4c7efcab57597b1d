//! Live simulation driver.
//!
//! Owns the on-screen grid. Candidates under fitness evaluation never share
//! storage with it; a search result only reaches the live grid through
//! [`Simulation::load`].

use serde::{Deserialize, Serialize};

use crate::schema::{PatternError, PatternName, SimulationConfig};

use super::{Grid, GridError};

/// The live Game of Life simulation.
pub struct Simulation {
    config: SimulationConfig,
    grid: Grid,
    /// Next-generation buffer, swapped with `grid` each step.
    scratch: Grid,
    generation: u64,
}

impl Simulation {
    /// Create an all-dead simulation.
    pub fn new(config: SimulationConfig) -> Self {
        let grid = Grid::from_config(&config);
        let scratch = grid.clone();
        Self {
            config,
            grid,
            scratch,
            generation: 0,
        }
    }

    /// Current grid, for rendering.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Generations advanced since creation, the last `clear` or `load`.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Advance one generation.
    pub fn step(&mut self) {
        self.grid.step_into(&mut self.scratch);
        std::mem::swap(&mut self.grid, &mut self.scratch);
        self.generation += 1;
    }

    /// Advance `steps` generations.
    pub fn run(&mut self, steps: u64) {
        for _ in 0..steps {
            self.step();
        }
    }

    /// Flip one cell. Panics when `(row, col)` is out of bounds.
    pub fn toggle(&mut self, row: usize, col: usize) {
        self.grid.toggle(row, col);
    }

    /// Kill every cell and reset the generation counter.
    pub fn clear(&mut self) {
        self.grid.clear();
        self.generation = 0;
    }

    /// Stamp a catalog pattern at `origin`, keeping existing cells.
    ///
    /// Returns the number of pattern cells that landed inside the grid.
    pub fn stamp(&mut self, name: &str, origin: (usize, usize)) -> Result<usize, PatternError> {
        let pattern: PatternName = name.parse()?;
        let placed = self.grid.stamp(pattern.cells(), origin);
        log::debug!(
            "Stamped {} at {:?}: {}/{} cells in bounds",
            pattern,
            origin,
            placed,
            pattern.cells().len()
        );
        Ok(placed)
    }

    /// Replace the live grid with a copy of `grid`, e.g. a search result.
    ///
    /// Fails without modifying anything when the shapes differ.
    pub fn load(&mut self, grid: &Grid) -> Result<(), GridError> {
        self.grid.copy_from(grid)?;
        self.generation = 0;
        log::debug!("Loaded grid with {} alive cells", grid.alive_count());
        Ok(())
    }

    /// Snapshot statistics.
    pub fn stats(&self) -> SimulationStats {
        SimulationStats {
            generation: self.generation,
            alive_cells: self.grid.alive_count(),
            rows: self.grid.rows(),
            cols: self.grid.cols(),
        }
    }
}

/// Simulation statistics for monitoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationStats {
    pub generation: u64,
    pub alive_cells: usize,
    pub rows: usize,
    pub cols: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> SimulationConfig {
        SimulationConfig { rows: 8, cols: 8 }
    }

    #[test]
    fn test_blinker_oscillates() {
        let mut sim = Simulation::new(small_config());
        sim.stamp("Blinker", (2, 2)).unwrap();
        let initial = sim.grid().clone();

        sim.step();
        assert_eq!(sim.stats().alive_cells, 3);
        assert_ne!(sim.grid(), &initial);

        sim.step();
        assert_eq!(sim.grid(), &initial);
        assert_eq!(sim.generation(), 2);
    }

    #[test]
    fn test_stamp_unknown_pattern_leaves_grid() {
        let mut sim = Simulation::new(small_config());
        sim.toggle(0, 0);
        let err = sim.stamp("Spaceship", (0, 0)).unwrap_err();
        assert_eq!(err, PatternError::UnknownPattern("Spaceship".into()));
        assert_eq!(sim.stats().alive_cells, 1);
    }

    #[test]
    fn test_stamp_is_additive() {
        let mut sim = Simulation::new(small_config());
        sim.toggle(7, 7);
        assert_eq!(sim.stamp("glider", (0, 0)), Ok(5));
        assert_eq!(sim.stats().alive_cells, 6);
    }

    #[test]
    fn test_clear_resets() {
        let mut sim = Simulation::new(small_config());
        sim.stamp("Beacon", (1, 1)).unwrap();
        sim.run(3);
        sim.clear();
        assert_eq!(
            sim.stats(),
            SimulationStats {
                generation: 0,
                alive_cells: 0,
                rows: 8,
                cols: 8
            }
        );
    }

    #[test]
    fn test_load_checks_shape_first() {
        let mut sim = Simulation::new(small_config());
        sim.toggle(3, 3);
        sim.step();

        let wrong = Grid::new(4, 4);
        assert!(matches!(
            sim.load(&wrong),
            Err(GridError::DimensionMismatch { .. })
        ));
        assert_eq!(sim.generation(), 1);

        let mut best = Grid::new(8, 8);
        best.set(1, 1, true);
        sim.load(&best).unwrap();
        assert_eq!(sim.grid(), &best);
        assert_eq!(sim.generation(), 0);
    }

    #[test]
    fn test_load_copies_not_aliases() {
        let mut sim = Simulation::new(small_config());
        let mut candidate = Grid::new(8, 8);
        sim.load(&candidate).unwrap();
        candidate.set(0, 0, true);
        assert_eq!(sim.stats().alive_cells, 0);
    }
}
