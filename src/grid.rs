//! Temperature grid container and the boundary/interior initializer.

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::error::{PlateError, Result};
use crate::options::BoundaryConditions;

/// An `M x N` field of temperatures indexed `(row, col)`.
///
/// Row 0 is the north edge and column 0 the west edge. Every cell on the
/// outer ring is a boundary cell; the rest are interior cells.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TemperatureGrid {
    values: DMatrix<f64>,
}

impl TemperatureGrid {
    /// Creates a zero-filled grid after checking that it has an interior.
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        check_dimensions(rows, cols)?;
        Ok(Self {
            values: DMatrix::zeros(rows, cols),
        })
    }

    /// Wraps an existing matrix. The values are taken as-is.
    pub fn from_matrix(values: DMatrix<f64>) -> Result<Self> {
        check_dimensions(values.nrows(), values.ncols())?;
        Ok(Self { values })
    }

    /// Builds a grid with fixed edges and the interior seeded at the boundary mean.
    pub fn initialized(rows: usize, cols: usize, boundary: &BoundaryConditions) -> Result<Self> {
        let mut grid = Self::new(rows, cols)?;
        grid.initialize(boundary);
        Ok(grid)
    }

    /// Number of rows (`M`).
    pub fn rows(&self) -> usize {
        self.values.nrows()
    }

    /// Number of columns (`N`).
    pub fn cols(&self) -> usize {
        self.values.ncols()
    }

    /// Temperature at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[(row, col)]
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.values[(row, col)] = value;
    }

    /// Read-only view of the underlying matrix.
    pub fn values(&self) -> &DMatrix<f64> {
        &self.values
    }

    pub(crate) fn values_mut(&mut self) -> &mut DMatrix<f64> {
        &mut self.values
    }

    pub fn into_matrix(self) -> DMatrix<f64> {
        self.values
    }

    /// Iterates over the values of one row, west to east.
    pub fn row_values(&self, row: usize) -> impl Iterator<Item = f64> + '_ {
        (0..self.cols()).map(move |col| self.values[(row, col)])
    }

    /// Whether `(row, col)` lies on the outer ring.
    pub fn is_boundary(&self, row: usize, col: usize) -> bool {
        row == 0 || col == 0 || row + 1 == self.rows() || col + 1 == self.cols()
    }

    /// Number of boundary cells, `2M + 2N - 4`.
    pub fn boundary_cell_count(&self) -> usize {
        2 * self.rows() + 2 * self.cols() - 4
    }

    /// Coordinates of every boundary cell, each corner listed once.
    pub fn boundary_cells(&self) -> impl Iterator<Item = (usize, usize)> {
        let (m, n) = (self.rows(), self.cols());
        let north = (0..n).map(|col| (0, col));
        let south = (0..n).map(move |col| (m - 1, col));
        let west = (1..m - 1).map(|row| (row, 0));
        let east = (1..m - 1).map(move |row| (row, n - 1));
        north.chain(south).chain(west).chain(east)
    }

    /// Writes the edge temperatures.
    ///
    /// West and east cover rows `1..M-1` only, then south and north are
    /// written across every column, so north/south own the corners.
    pub fn apply_boundary(&mut self, boundary: &BoundaryConditions) {
        let (m, n) = (self.rows(), self.cols());
        for row in 1..m - 1 {
            self.values[(row, 0)] = boundary.west;
            self.values[(row, n - 1)] = boundary.east;
        }
        for col in 0..n {
            self.values[(m - 1, col)] = boundary.south;
        }
        for col in 0..n {
            self.values[(0, col)] = boundary.north;
        }
    }

    /// Arithmetic mean over the `2M + 2N - 4` boundary cells.
    pub fn boundary_mean(&self) -> f64 {
        let total: f64 = self
            .boundary_cells()
            .map(|(row, col)| self.values[(row, col)])
            .sum();
        total / self.boundary_cell_count() as f64
    }

    /// Assigns `value` to every interior cell.
    pub fn fill_interior(&mut self, value: f64) {
        let (m, n) = (self.rows(), self.cols());
        self.values.view_mut((1, 1), (m - 2, n - 2)).fill(value);
    }

    /// Sets the boundary and seeds the interior with the boundary mean, which is returned.
    pub fn initialize(&mut self, boundary: &BoundaryConditions) -> f64 {
        self.apply_boundary(boundary);
        let mean = self.boundary_mean();
        self.fill_interior(mean);
        log::debug!(
            "initialized {}x{} grid, interior seeded at {mean}",
            self.rows(),
            self.cols()
        );
        mean
    }
}

fn check_dimensions(rows: usize, cols: usize) -> Result<()> {
    if rows < 3 || cols < 3 {
        return Err(PlateError::InvalidDimensions { rows, cols });
    }
    Ok(())
}
