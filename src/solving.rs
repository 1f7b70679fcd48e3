//! Relaxation solver configuration and diagnostics.

use serde::{Deserialize, Serialize};

use crate::error::{PlateError, Result};

/// Configuration for the Jacobi relaxation that drives the plate to steady state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SolverOptions {
    /// Supremum norm tolerance: iteration stops once a pass changes no cell by more than this.
    pub tolerance: f64,
    /// Optional safety cap on the number of passes. `None` iterates until convergence.
    pub max_iterations: Option<usize>,
    /// Split each pass into column stripes evaluated on the rayon thread pool.
    pub parallel: bool,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            tolerance: 1e-3,
            max_iterations: None,
            parallel: false,
        }
    }
}

impl SolverOptions {
    /// Creates options with the given tolerance and all other defaults.
    pub fn with_tolerance(tolerance: f64) -> Self {
        Self {
            tolerance,
            ..Self::default()
        }
    }

    /// Bounds the number of passes; the solve fails with
    /// [`IterationLimitReached`](PlateError::IterationLimitReached) if the cap is hit first.
    pub fn max_iterations(mut self, limit: usize) -> Self {
        self.max_iterations = Some(limit);
        self
    }

    /// Enables or disables the data-parallel pass.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Checks the preconditions the engine relies on for termination.
    pub fn validate(&self) -> Result<()> {
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(PlateError::InvalidTolerance {
                tolerance: self.tolerance,
            });
        }
        if self.max_iterations == Some(0) {
            return Err(PlateError::InvalidIterationLimit);
        }
        Ok(())
    }
}

/// Observable state after a committed pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PassProgress {
    /// Number of passes completed so far (1 after the first pass).
    pub iteration: usize,
    /// Largest absolute change of any interior cell during this pass.
    pub max_change: f64,
}

/// Diagnostics returned alongside the converged grid.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RelaxationSummary {
    /// Number of passes performed.
    pub iterations: usize,
    /// Maximum absolute change observed in the final pass.
    pub max_change: f64,
}
