//! Fitness evaluation for evolutionary pattern search.
//!
//! A genome's fitness is the number of alive cells after stepping a private
//! copy of it `horizon` generations forward. It is a crude activity proxy;
//! still lifes and oscillators score as well as anything else that stays
//! alive.

use crate::compute::Grid;
use crate::schema::EvaluationConfig;

/// Evaluates candidate grids.
#[derive(Debug, Clone)]
pub struct FitnessEvaluator {
    horizon: u32,
}

impl FitnessEvaluator {
    /// Create a new fitness evaluator.
    pub fn new(eval_config: &EvaluationConfig) -> Self {
        Self {
            horizon: eval_config.horizon,
        }
    }

    pub fn horizon(&self) -> u32 {
        self.horizon
    }

    /// Alive cells after `horizon` steps. `genome` is never modified.
    pub fn evaluate(&self, genome: &Grid) -> u32 {
        let mut current = genome.clone();
        let mut next = Grid::new(genome.rows(), genome.cols());
        self.evaluate_with(&mut current, &mut next)
    }

    /// Step `current` forward in place, using `next` as the second buffer.
    fn evaluate_with(&self, current: &mut Grid, next: &mut Grid) -> u32 {
        for _ in 0..self.horizon {
            current.step_into(next);
            std::mem::swap(current, next);
        }
        current.alive_count() as u32
    }
}

/// Alive cells in `candidate` after `horizon` steps.
pub fn fitness(candidate: &Grid, horizon: u32) -> u32 {
    FitnessEvaluator { horizon }.evaluate(candidate)
}
