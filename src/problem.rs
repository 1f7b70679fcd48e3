//! High-level entry point: initialize a plate, relax it, hand back the field.

use crate::error::Result;
use crate::grid::TemperatureGrid;
use crate::observer::{NoopObserver, PassObserver};
use crate::options::PlateOptions;
use crate::relaxation::SolverState;
use crate::solving::RelaxationSummary;

/// A validated heated-plate problem ready to be solved.
#[derive(Clone, Debug)]
pub struct HeatedPlate {
    options: PlateOptions,
}

impl HeatedPlate {
    /// Validates dimensions, boundary temperatures and solver options.
    pub fn new(options: PlateOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    pub fn options(&self) -> &PlateOptions {
        &self.options
    }

    /// Grid with boundary applied and interior seeded at the boundary mean.
    pub fn initial_grid(&self) -> Result<TemperatureGrid> {
        let options = &self.options;
        TemperatureGrid::initialized(options.rows, options.cols, &options.boundary)
    }

    /// Solves to the configured tolerance.
    pub fn solve(&self) -> Result<PlateSolution> {
        self.solve_with_observer(&mut NoopObserver)
    }

    /// Solves to the configured tolerance, reporting each pass to `observer`.
    pub fn solve_with_observer<O>(&self, observer: &mut O) -> Result<PlateSolution>
    where
        O: PassObserver + ?Sized,
    {
        let grid = self.initial_grid()?;
        let initial_mean = grid.boundary_mean();
        log::info!(
            "solving {}x{} plate to tolerance {}",
            grid.rows(),
            grid.cols(),
            self.options.solver.tolerance
        );

        let mut state = SolverState::new(grid, self.options.solver.clone())?;
        let summary = state.run(observer)?;
        Ok(PlateSolution {
            grid: state.into_grid(),
            summary,
            initial_mean,
        })
    }
}

/// Result of a [`HeatedPlate`] solve.
#[derive(Clone, Debug)]
pub struct PlateSolution {
    /// Converged temperature field.
    pub grid: TemperatureGrid,
    /// Iteration count and final max change.
    pub summary: RelaxationSummary,
    /// Boundary mean used to seed the interior.
    pub initial_mean: f64,
}
