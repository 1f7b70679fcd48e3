//! Jacobi relaxation of the discrete steady-state heat equation.
//!
//! Every interior cell is replaced by the average of its four axis neighbours
//! taken from the previous pass. Reads come from a frozen snapshot and writes
//! go to a disjoint buffer, so cell order within a pass never affects the
//! result and the pass can be split across threads.

use nalgebra::DMatrix;
use rayon::prelude::*;

use crate::error::{PlateError, Result};
use crate::grid::TemperatureGrid;
use crate::observer::{NoopObserver, PassObserver};
use crate::solving::{PassProgress, RelaxationSummary, SolverOptions};

/// Performs one pass from `previous` into `next` and returns the largest
/// absolute change of any interior cell.
///
/// Boundary cells of `next` are left untouched. Fails with
/// [`NumericalError`](PlateError::NumericalError) if any change is not finite.
pub fn relax_pass(previous: &DMatrix<f64>, next: &mut DMatrix<f64>) -> Result<f64> {
    let (rows, cols) = check_shapes(previous, next)?;
    let source = previous.as_slice();
    let interior = &mut next.as_mut_slice()[rows..(cols - 1) * rows];

    let max_change = interior
        .chunks_mut(rows)
        .enumerate()
        .map(|(offset, column)| relax_column(source, rows, offset + 1, column))
        .try_fold(0.0, |max_change, column: Result<f64>| -> Result<f64> {
            Ok(max_change.max(column?))
        })?;
    Ok(max_change)
}

/// Same as [`relax_pass`], with columns distributed over the rayon pool.
///
/// Partial maxima are reduced with `max`, so the result is bit-identical to
/// the sequential pass.
pub fn relax_pass_parallel(previous: &DMatrix<f64>, next: &mut DMatrix<f64>) -> Result<f64> {
    let (rows, cols) = check_shapes(previous, next)?;
    let source = previous.as_slice();
    let interior = &mut next.as_mut_slice()[rows..(cols - 1) * rows];

    let max_change = interior
        .par_chunks_mut(rows)
        .enumerate()
        .map(|(offset, column)| relax_column(source, rows, offset + 1, column))
        .try_reduce(|| 0.0, |a, b| Ok(f64::max(a, b)))?;
    Ok(max_change)
}

fn check_shapes(previous: &DMatrix<f64>, next: &DMatrix<f64>) -> Result<(usize, usize)> {
    let (rows, cols) = previous.shape();
    if rows < 3 || cols < 3 {
        return Err(PlateError::InvalidDimensions { rows, cols });
    }
    if next.nrows() != rows {
        return Err(PlateError::dimension_mismatch(
            "next rows",
            rows,
            next.nrows(),
        ));
    }
    if next.ncols() != cols {
        return Err(PlateError::dimension_mismatch(
            "next cols",
            cols,
            next.ncols(),
        ));
    }
    Ok((rows, cols))
}

/// Updates the interior rows of column `col`. Storage is column-major, so a
/// column is a contiguous run of `rows` values.
fn relax_column(source: &[f64], rows: usize, col: usize, out: &mut [f64]) -> Result<f64> {
    let west = &source[(col - 1) * rows..col * rows];
    let centre = &source[col * rows..(col + 1) * rows];
    let east = &source[(col + 1) * rows..(col + 2) * rows];

    let mut max_change = 0.0_f64;
    for row in 1..rows - 1 {
        let value = (centre[row - 1] + centre[row + 1] + west[row] + east[row]) / 4.0;
        let change = (value - centre[row]).abs();
        // `f64::max` would silently drop a NaN change.
        if !change.is_finite() {
            return Err(PlateError::NumericalError {
                context: "relaxation pass",
            });
        }
        max_change = max_change.max(change);
        out[row] = value;
    }
    Ok(max_change)
}

/// Grid and bookkeeping owned by the engine for the duration of a solve.
#[derive(Clone, Debug)]
pub struct SolverState {
    current: TemperatureGrid,
    scratch: DMatrix<f64>,
    iterations: usize,
    max_change: f64,
    options: SolverOptions,
}

impl SolverState {
    /// Takes ownership of an initialized grid. Fails before any pass runs if
    /// the options cannot guarantee a well-formed solve or the grid holds a
    /// NaN or infinite value.
    pub fn new(grid: TemperatureGrid, options: SolverOptions) -> Result<Self> {
        options.validate()?;
        if !grid.values().iter().all(|value| value.is_finite()) {
            return Err(PlateError::NumericalError {
                context: "initial grid",
            });
        }
        // Both buffers carry the boundary; passes only write the interior.
        let scratch = grid.values().clone();
        Ok(Self {
            current: grid,
            scratch,
            iterations: 0,
            max_change: 0.0,
            options,
        })
    }

    /// Passes completed so far.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Max change of the most recent pass (0 before the first pass).
    pub fn max_change(&self) -> f64 {
        self.max_change
    }

    pub fn options(&self) -> &SolverOptions {
        &self.options
    }

    /// Values as of the last committed pass.
    pub fn current(&self) -> &TemperatureGrid {
        &self.current
    }

    pub fn is_converged(&self) -> bool {
        self.iterations > 0 && self.max_change <= self.options.tolerance
    }

    /// Runs one pass and commits it.
    pub fn step(&mut self) -> Result<PassProgress> {
        let previous = self.current.values();
        let max_change = if self.options.parallel {
            relax_pass_parallel(previous, &mut self.scratch)?
        } else {
            relax_pass(previous, &mut self.scratch)?
        };
        std::mem::swap(self.current.values_mut(), &mut self.scratch);
        self.iterations += 1;
        self.max_change = max_change;
        log::debug!("pass {}: max change {max_change}", self.iterations);
        Ok(PassProgress {
            iteration: self.iterations,
            max_change,
        })
    }

    /// Iterates until `max_change <= tolerance`, reporting each pass to `observer`.
    ///
    /// Without `max_iterations` this does not return for tolerances the
    /// arithmetic cannot reach.
    pub fn run<O>(&mut self, observer: &mut O) -> Result<RelaxationSummary>
    where
        O: PassObserver + ?Sized,
    {
        loop {
            let progress = self.step()?;
            let flow = observer.on_pass(&progress);
            if self.is_converged() {
                log::info!(
                    "converged after {} iterations, max change {}",
                    progress.iteration,
                    progress.max_change
                );
                return Ok(self.summary());
            }
            if flow.is_break() {
                return Err(PlateError::Cancelled {
                    iterations: progress.iteration,
                    max_change: progress.max_change,
                });
            }
            if let Some(limit) = self.options.max_iterations {
                if progress.iteration >= limit {
                    log::warn!(
                        "stopping at iteration cap {limit}, max change {}",
                        progress.max_change
                    );
                    return Err(PlateError::IterationLimitReached {
                        iterations: progress.iteration,
                        max_change: progress.max_change,
                    });
                }
            }
        }
    }

    pub fn summary(&self) -> RelaxationSummary {
        RelaxationSummary {
            iterations: self.iterations,
            max_change: self.max_change,
        }
    }

    /// Hands the grid back to the caller.
    pub fn into_grid(self) -> TemperatureGrid {
        self.current
    }
}

/// Relaxes `grid` to steady state with a no-op observer.
pub fn relax(
    grid: TemperatureGrid,
    options: &SolverOptions,
) -> Result<(TemperatureGrid, RelaxationSummary)> {
    relax_with_observer(grid, options, &mut NoopObserver)
}

/// Relaxes `grid` to steady state, calling `observer` after every pass.
pub fn relax_with_observer<O: PassObserver + ?Sized>(
    grid: TemperatureGrid,
    options: &SolverOptions,
    observer: &mut O,
) -> Result<(TemperatureGrid, RelaxationSummary)> {
    let mut state = SolverState::new(grid, options.clone())?;
    let summary = state.run(observer)?;
    Ok((state.into_grid(), summary))
}

#[cfg(test)]
mod tests {
    use std::ops::ControlFlow;

    use super::*;
    use crate::options::BoundaryConditions;
    use approx::assert_relative_eq;

    fn plate(rows: usize, cols: usize) -> TemperatureGrid {
        TemperatureGrid::initialized(rows, cols, &BoundaryConditions::default()).unwrap()
    }

    #[test]
    fn single_pass_averages_neighbours() {
        let previous = DMatrix::from_row_slice(
            3,
            3,
            &[0.0, 4.0, 0.0, 8.0, 50.0, 12.0, 0.0, 16.0, 0.0],
        );
        let mut next = previous.clone();
        let change = relax_pass(&previous, &mut next).unwrap();
        assert_relative_eq!(next[(1, 1)], 10.0);
        assert_relative_eq!(change, 40.0);
        // Boundary untouched.
        assert_eq!(next[(0, 1)], 4.0);
        assert_eq!(next[(2, 1)], 16.0);
    }

    #[test]
    fn pass_reads_only_the_previous_snapshot() {
        let grid = plate(6, 6);
        let previous = grid.values().clone();
        let mut next = previous.clone();
        relax_pass(&previous, &mut next).unwrap();

        for row in 1..5 {
            for col in 1..5 {
                let expected = (previous[(row - 1, col)]
                    + previous[(row + 1, col)]
                    + previous[(row, col - 1)]
                    + previous[(row, col + 1)])
                    / 4.0;
                assert_eq!(next[(row, col)], expected);
            }
        }
    }

    #[test]
    fn parallel_pass_is_bit_identical() {
        let previous = plate(17, 23).into_matrix();
        let mut sequential = previous.clone();
        let mut parallel = previous.clone();
        let a = relax_pass(&previous, &mut sequential).unwrap();
        let b = relax_pass_parallel(&previous, &mut parallel).unwrap();
        assert_eq!(a.to_bits(), b.to_bits());
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn mismatched_buffers_are_rejected() {
        let previous = DMatrix::zeros(4, 4);
        let mut next = DMatrix::zeros(4, 5);
        assert!(matches!(
            relax_pass(&previous, &mut next),
            Err(PlateError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn converges_below_tolerance() {
        for tolerance in [1.0, 0.1, 0.01] {
            let options = SolverOptions::with_tolerance(tolerance);
            let (_, summary) = relax(plate(5, 5), &options).unwrap();
            assert!(summary.iterations >= 1);
            assert!(summary.max_change >= 0.0);
            assert!(summary.max_change <= tolerance);
        }
    }

    #[test]
    fn iteration_cap_is_reported() {
        let options = SolverOptions::with_tolerance(1e-12).max_iterations(3);
        let result = relax(plate(20, 20), &options);
        assert!(matches!(
            result,
            Err(PlateError::IterationLimitReached { iterations: 3, .. })
        ));
    }

    #[test]
    fn observer_sees_every_pass_and_can_cancel() {
        let mut seen = Vec::new();
        let mut observer = |p: &PassProgress| {
            seen.push(p.iteration);
            if p.iteration == 4 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        };
        let options = SolverOptions::with_tolerance(1e-9);
        let result = relax_with_observer(plate(30, 30), &options, &mut observer);
        assert!(matches!(result, Err(PlateError::Cancelled { iterations: 4, .. })));
        assert_eq!(seen, vec![1, 2, 3, 4]);
    }

    #[test]
    fn non_finite_cell_is_rejected_before_any_pass() {
        for bad in [f64::NAN, f64::INFINITY] {
            let mut grid = plate(6, 6);
            grid.set(2, 2, bad);
            let result = relax(grid, &SolverOptions::with_tolerance(1e-3));
            assert!(matches!(
                result,
                Err(PlateError::NumericalError {
                    context: "initial grid"
                })
            ));
        }
    }

    #[test]
    fn overflowing_pass_is_an_error() {
        let mut previous = DMatrix::from_element(4, 4, 1e308);
        previous[(1, 1)] = 0.0;
        for parallel in [false, true] {
            let mut next = previous.clone();
            let result = if parallel {
                relax_pass_parallel(&previous, &mut next)
            } else {
                relax_pass(&previous, &mut next)
            };
            assert!(matches!(
                result,
                Err(PlateError::NumericalError {
                    context: "relaxation pass"
                })
            ));
        }
    }

    #[test]
    fn change_equal_to_tolerance_stops_the_solve() {
        let previous = plate(4, 4).into_matrix();
        let mut next = previous.clone();
        let change = relax_pass(&previous, &mut next).unwrap();
        assert!(change > 0.0);

        let options = SolverOptions::with_tolerance(change);
        let (grid, summary) = relax(plate(4, 4), &options).unwrap();
        assert_eq!(summary.iterations, 1);
        assert_eq!(summary.max_change, change);
        assert_eq!(grid.into_matrix(), next);
    }

    #[test]
    fn break_on_the_converging_pass_still_succeeds() {
        let mut observer = |_: &PassProgress| ControlFlow::Break(());
        let options = SolverOptions::with_tolerance(50.0);
        let (_, summary) = relax_with_observer(plate(4, 4), &options, &mut observer).unwrap();
        assert_eq!(summary.iterations, 1);
        assert!(summary.max_change <= 50.0);
    }

    #[test]
    fn invalid_tolerance_fails_before_any_pass() {
        let mut passes = 0;
        let mut observer = |_: &PassProgress| {
            passes += 1;
            ControlFlow::Continue(())
        };
        let options = SolverOptions::with_tolerance(0.0);
        let result = relax_with_observer(plate(5, 5), &options, &mut observer);
        assert!(matches!(result, Err(PlateError::InvalidTolerance { .. })));
        assert_eq!(passes, 0);
    }
}
