//! Configuration types for the Game of Life grid.

use serde::{Deserialize, Serialize};

fn default_rows() -> usize {
    20
}

fn default_cols() -> usize {
    20
}

/// Grid configuration shared by the live simulation and the search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of grid rows.
    #[serde(default = "default_rows")]
    pub rows: usize,
    /// Number of grid columns.
    #[serde(default = "default_cols")]
    pub cols: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            rows: default_rows(),
            cols: default_cols(),
        }
    }
}

impl SimulationConfig {
    /// Total number of cells (rows * cols).
    #[inline]
    pub fn grid_size(&self) -> usize {
        self.rows * self.cols
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(ConfigError::InvalidDimensions {
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Grid dimensions must be non-zero (got {rows}x{cols})")]
    InvalidDimensions { rows: usize, cols: usize },
}
