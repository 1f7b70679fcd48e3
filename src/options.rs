//! Plate geometry and boundary configuration, aggregated with the solver options.

use serde::{Deserialize, Serialize};

use crate::error::{PlateError, Result};
use crate::solving::SolverOptions;

/// Fixed temperature held on each edge of the plate.
///
/// Row 0 is north, row `M-1` south, column 0 west and column `N-1` east.
/// West and east only cover rows `1..M-1`; the four corners belong to the
/// north and south edges.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundaryConditions {
    pub north: f64,
    pub south: f64,
    pub west: f64,
    pub east: f64,
}

impl BoundaryConditions {
    /// Classic heated plate: north edge at `cold`, the other three at `hot`.
    pub fn heated_plate(hot: f64, cold: f64) -> Self {
        Self {
            north: cold,
            south: hot,
            west: hot,
            east: hot,
        }
    }

    /// Every edge held at the same temperature.
    pub fn uniform(value: f64) -> Self {
        Self {
            north: value,
            south: value,
            west: value,
            east: value,
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (edge, value) in [
            ("north", self.north),
            ("south", self.south),
            ("west", self.west),
            ("east", self.east),
        ] {
            if !value.is_finite() {
                return Err(PlateError::NonFiniteBoundary { edge, value });
            }
        }
        Ok(())
    }
}

impl Default for BoundaryConditions {
    fn default() -> Self {
        Self::heated_plate(100.0, 0.0)
    }
}

/// Aggregated configuration used when solving a [`HeatedPlate`](crate::HeatedPlate).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlateOptions {
    /// Number of grid rows (`M`).
    pub rows: usize,
    /// Number of grid columns (`N`).
    pub cols: usize,
    /// Edge temperatures.
    pub boundary: BoundaryConditions,
    /// Configuration for the relaxation loop.
    pub solver: SolverOptions,
}

impl Default for PlateOptions {
    fn default() -> Self {
        Self {
            rows: 1000,
            cols: 1000,
            boundary: BoundaryConditions::default(),
            solver: SolverOptions::default(),
        }
    }
}

impl PlateOptions {
    /// Override the grid shape while preserving other defaults.
    pub fn with_dimensions(mut self, rows: usize, cols: usize) -> Self {
        self.rows = rows;
        self.cols = cols;
        self
    }

    /// Override the edge temperatures.
    pub fn with_boundary(mut self, boundary: BoundaryConditions) -> Self {
        self.boundary = boundary;
        self
    }

    /// Override the solver settings.
    pub fn with_solver(mut self, solver: SolverOptions) -> Self {
        self.solver = solver;
        self
    }

    /// Set the convergence tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.solver.tolerance = tolerance;
        self
    }

    /// Validates shape, boundary and solver settings in that order.
    pub fn validate(&self) -> Result<()> {
        if self.rows < 3 || self.cols < 3 {
            return Err(PlateError::InvalidDimensions {
                rows: self.rows,
                cols: self.cols,
            });
        }
        self.boundary.validate()?;
        self.solver.validate()
    }
}
