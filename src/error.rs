use thiserror::Error;

/// Unified error type for `heated_plate` operations.
#[derive(Debug, Error)]
pub enum PlateError {
    /// Raised when the grid is too small to have an interior.
    #[error("grid must be at least 3x3 to have interior cells, found {rows}x{cols}")]
    InvalidDimensions {
        /// Requested number of rows (`M`).
        rows: usize,
        /// Requested number of columns (`N`).
        cols: usize,
    },

    /// Raised when the convergence tolerance is not a positive finite number.
    #[error("tolerance must be finite and strictly positive, found {tolerance}")]
    InvalidTolerance { tolerance: f64 },

    /// Raised when an edge temperature is NaN or infinite.
    #[error("{edge} boundary temperature must be finite, found {value}")]
    NonFiniteBoundary { edge: &'static str, value: f64 },

    /// Raised when an explicit iteration cap of zero is requested.
    #[error("iteration limit must allow at least one pass")]
    InvalidIterationLimit,

    /// Raised when the optional iteration cap is hit before the tolerance is met.
    #[error(
        "relaxation did not converge within {iterations} iterations; last max change {max_change}"
    )]
    IterationLimitReached {
        /// Number of passes performed before stopping.
        iterations: usize,
        /// Maximum absolute change in the last pass.
        max_change: f64,
    },

    /// Raised when a pass observer requests cancellation.
    #[error("relaxation cancelled after {iterations} iterations; last max change {max_change}")]
    Cancelled { iterations: usize, max_change: f64 },

    /// Raised when a grid value is, or becomes, NaN or infinite.
    #[error("encountered a non-finite temperature during {context}")]
    NumericalError { context: &'static str },

    /// Raised when two grids (or a grid and a buffer) disagree on shape.
    #[error("dimension mismatch in {context}: expected {expected} but found {found}")]
    DimensionMismatch {
        context: &'static str,
        expected: usize,
        found: usize,
    },

    /// Raised when a serialized grid cannot be parsed.
    #[error("malformed grid file at line {line}: {reason}")]
    MalformedOutput { line: usize, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl PlateError {
    /// Helper to format a [`DimensionMismatch`](PlateError::DimensionMismatch) error.
    pub fn dimension_mismatch(context: &'static str, expected: usize, found: usize) -> Self {
        Self::DimensionMismatch {
            context,
            expected,
            found,
        }
    }

    /// Helper for parse failures in the grid reader.
    pub fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedOutput {
            line,
            reason: reason.into(),
        }
    }
}

/// Type alias for results returned by this crate.
pub type Result<T> = std::result::Result<T, PlateError>;
