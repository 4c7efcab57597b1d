//! Genome manipulation utilities for evolutionary search.
//!
//! Provides random generation, crossover, and mutation of grid genomes.
//! All randomness goes through [`GenomeRng`], so a run is reproducible from
//! its seed as long as the calls happen in the same order.

use rand::prelude::*;
use rand::seq::index;

use crate::compute::{Grid, GridError};
use crate::schema::{CrossoverStrategy, EvolutionConfigError, MutationStrategy};

/// Random number generator wrapper for genome operations.
pub struct GenomeRng {
    rng: StdRng,
}

impl GenomeRng {
    /// Create from seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Grid whose cells are each alive with probability 0.5.
    pub fn random_genome(&mut self, rows: usize, cols: usize) -> Grid {
        let mut genome = Grid::new(rows, cols);
        for cell in genome.cells_mut() {
            *cell = self.rng.gen_bool(0.5);
        }
        genome
    }

    /// `population_size` independent random genomes.
    pub fn random_population(
        &mut self,
        population_size: usize,
        rows: usize,
        cols: usize,
    ) -> Vec<Grid> {
        (0..population_size)
            .map(|_| self.random_genome(rows, cols))
            .collect()
    }

    /// Combine two parents into a new child.
    pub fn crossover(
        &mut self,
        strategy: CrossoverStrategy,
        parent1: &Grid,
        parent2: &Grid,
    ) -> Result<Grid, GridError> {
        parent1.check_same_shape(parent2)?;

        let child = match strategy {
            CrossoverStrategy::CellwiseRandom => {
                let cells = parent1
                    .cells()
                    .iter()
                    .zip(parent2.cells())
                    .map(|(&a, &b)| if self.rng.gen_bool(0.5) { a } else { b })
                    .collect();
                Grid::from_cells(parent1.rows(), parent1.cols(), cells)?
            }
            CrossoverStrategy::HalfSplit => {
                let split = (parent1.rows() / 2) * parent1.cols();
                let cells = parent1.cells()[..split]
                    .iter()
                    .chain(&parent2.cells()[split..])
                    .copied()
                    .collect();
                Grid::from_cells(parent1.rows(), parent1.cols(), cells)?
            }
        };

        Ok(child)
    }

    /// Mutate a genome in place.
    pub fn mutate(&mut self, strategy: MutationStrategy, genome: &mut Grid) {
        match strategy {
            MutationStrategy::PerCell { rate } => {
                // Rates outside [0, 1] are clamped; NaN disables mutation.
                let rate = if rate.is_nan() { 0.0 } else { rate.clamp(0.0, 1.0) };
                for cell in genome.cells_mut() {
                    if self.rng.gen_bool(rate) {
                        *cell = !*cell;
                    }
                }
            }
            MutationStrategy::SingleFlip => {
                let cells = genome.cells_mut();
                if !cells.is_empty() {
                    let idx = self.rng.gen_range(0..cells.len());
                    cells[idx] = !cells[idx];
                }
            }
        }
    }

    /// Pick two distinct indices into a pool of `pool_size` parents.
    pub fn sample_parents(
        &mut self,
        pool_size: usize,
    ) -> Result<(usize, usize), EvolutionConfigError> {
        if pool_size < 2 {
            return Err(EvolutionConfigError::InsufficientPopulation { size: pool_size });
        }
        let picked = index::sample(&mut self.rng, pool_size, 2);
        Ok((picked.index(0), picked.index(1)))
    }
}

/// Number of cells that differ between two genomes of the same shape.
pub fn genome_distance(g1: &Grid, g2: &Grid) -> Result<usize, GridError> {
    g1.check_same_shape(g2)?;
    Ok(g1
        .cells()
        .iter()
        .zip(g2.cells())
        .filter(|(a, b)| a != b)
        .count())
}
