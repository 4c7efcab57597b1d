//! Binary cell grid and the Game of Life step rule.
//!
//! Cells are stored as a flat row-major `Vec<bool>`, indexed as
//! `row * cols + col`. The boundary is open: cells outside the grid are
//! permanently dead and never counted as neighbors.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::schema::{Offset, SimulationConfig};

/// Rectangular grid of alive/dead cells.
///
/// Serializes as a nested array of `0`/`1` rows.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<u8>>", into = "Vec<Vec<u8>>")]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<bool>,
}

impl Grid {
    /// Create an all-dead grid.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![false; rows * cols],
        }
    }

    /// Create an all-dead grid with the configured dimensions.
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(config.rows, config.cols)
    }

    /// Build a grid from a flat row-major cell vector.
    pub fn from_cells(rows: usize, cols: usize, cells: Vec<bool>) -> Result<Self, GridError> {
        if cells.len() != rows * cols {
            return Err(GridError::CellCount {
                expected: rows * cols,
                actual: cells.len(),
            });
        }
        Ok(Self { rows, cols, cells })
    }

    /// Build a grid from nested `0`/`1` rows.
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self, GridError> {
        let cols = rows.first().map_or(0, |r| r.as_ref().len());
        let mut cells = Vec::with_capacity(rows.len() * cols);

        for (row, values) in rows.iter().enumerate() {
            let values = values.as_ref();
            if values.len() != cols {
                return Err(GridError::RaggedRows {
                    row,
                    expected: cols,
                    actual: values.len(),
                });
            }
            for (col, &value) in values.iter().enumerate() {
                match value {
                    0 => cells.push(false),
                    1 => cells.push(true),
                    _ => return Err(GridError::InvalidCell { row, col, value }),
                }
            }
        }

        Ok(Self {
            rows: rows.len(),
            cols,
            cells,
        })
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    #[inline]
    pub fn dims(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    #[inline]
    fn idx(&self, row: usize, col: usize) -> usize {
        assert!(
            row < self.rows && col < self.cols,
            "cell ({row}, {col}) outside {}x{} grid",
            self.rows,
            self.cols
        );
        row * self.cols + col
    }

    /// Whether `(row, col)` lies inside the grid.
    #[inline]
    pub fn in_bounds(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols
    }

    /// Cell state at `(row, col)`. Panics when out of bounds.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> bool {
        self.cells[self.idx(row, col)]
    }

    /// Set the cell at `(row, col)`. Panics when out of bounds.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, alive: bool) {
        let idx = self.idx(row, col);
        self.cells[idx] = alive;
    }

    /// Flip the cell at `(row, col)`. Panics when out of bounds.
    pub fn toggle(&mut self, row: usize, col: usize) {
        let idx = self.idx(row, col);
        self.cells[idx] = !self.cells[idx];
    }

    /// Row-major cell slice.
    #[inline]
    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    #[inline]
    pub(crate) fn cells_mut(&mut self) -> &mut [bool] {
        &mut self.cells
    }

    /// Number of alive cells.
    pub fn alive_count(&self) -> usize {
        self.cells.iter().filter(|&&alive| alive).count()
    }

    /// Kill every cell.
    pub fn clear(&mut self) {
        self.cells.fill(false);
    }

    /// Iterate over rows as slices.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[bool]> {
        // chunks(0) panics, and a 0-column grid has no cells to yield anyway.
        self.cells.chunks(self.cols.max(1))
    }

    /// Export as nested `0`/`1` rows.
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        let mut out: Vec<Vec<u8>> = self
            .iter_rows()
            .map(|row| row.iter().map(|&alive| u8::from(alive)).collect())
            .collect();
        // A 0-column grid still has `rows` (empty) rows.
        out.resize(self.rows, Vec::new());
        out
    }

    /// Fail unless `other` has the same dimensions.
    pub fn check_same_shape(&self, other: &Grid) -> Result<(), GridError> {
        if self.dims() != other.dims() {
            return Err(GridError::DimensionMismatch {
                expected: self.dims(),
                actual: other.dims(),
            });
        }
        Ok(())
    }

    /// Replace every cell with the contents of `other`.
    ///
    /// Nothing is written when the shapes differ.
    pub fn copy_from(&mut self, other: &Grid) -> Result<(), GridError> {
        self.check_same_shape(other)?;
        self.cells.copy_from_slice(&other.cells);
        Ok(())
    }

    /// Count alive cells among the up-to-8 neighbors of `(row, col)`.
    ///
    /// Neighbors outside the grid contribute zero.
    pub fn neighbor_count(&self, row: usize, col: usize) -> u8 {
        let mut count = 0u8;
        let row_end = (row + 2).min(self.rows);
        let col_end = (col + 2).min(self.cols);

        for r in row.saturating_sub(1)..row_end {
            for c in col.saturating_sub(1)..col_end {
                if (r, c) != (row, col) && self.cells[r * self.cols + c] {
                    count += 1;
                }
            }
        }

        count
    }

    /// Compute the next generation into a fresh grid.
    pub fn step(&self) -> Grid {
        let mut next = Grid::new(self.rows, self.cols);
        self.step_into(&mut next);
        next
    }

    /// Compute the next generation into `next`, reusing its allocation.
    ///
    /// `next` is reshaped to match `self` if needed.
    pub fn step_into(&self, next: &mut Grid) {
        next.rows = self.rows;
        next.cols = self.cols;
        next.cells.resize(self.cells.len(), false);

        for row in 0..self.rows {
            for col in 0..self.cols {
                let idx = row * self.cols + col;
                let neighbors = self.neighbor_count(row, col);
                // B3/S23
                next.cells[idx] =
                    matches!((self.cells[idx], neighbors), (true, 2 | 3) | (false, 3));
            }
        }
    }

    /// Set every `origin + offset` cell alive.
    ///
    /// Cells falling outside the grid are skipped. Existing alive cells are
    /// left untouched. Returns the number of offsets that landed in bounds.
    pub fn stamp(&mut self, pattern: &[Offset], origin: (usize, usize)) -> usize {
        let mut placed = 0;
        for &(dr, dc) in pattern {
            let (Some(row), Some(col)) = (origin.0.checked_add(dr), origin.1.checked_add(dc))
            else {
                continue;
            };
            if self.in_bounds(row, col) {
                self.cells[row * self.cols + col] = true;
                placed += 1;
            }
        }
        placed
    }
}

impl TryFrom<Vec<Vec<u8>>> for Grid {
    type Error = GridError;

    fn try_from(rows: Vec<Vec<u8>>) -> Result<Self, Self::Error> {
        Grid::from_rows(&rows)
    }
}

impl From<Grid> for Vec<Vec<u8>> {
    fn from(grid: Grid) -> Self {
        grid.to_rows()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.iter_rows() {
            let line: String = row.iter().map(|&a| if a { '#' } else { '.' }).collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// Grid construction and shape errors.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GridError {
    #[error(
        "Grid dimension mismatch: expected {}x{}, got {}x{}",
        expected.0, expected.1, actual.0, actual.1
    )]
    DimensionMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },
    #[error("Row {row} has {actual} cells, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("Cell ({row}, {col}) has value {value}, expected 0 or 1")]
    InvalidCell { row: usize, col: usize, value: u8 },
    #[error("Expected {expected} cells, got {actual}")]
    CellCount { expected: usize, actual: usize },
}
