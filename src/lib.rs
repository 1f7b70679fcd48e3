//! Steady-state temperature of a heated rectangular plate.
//!
//! The plate is covered by an `M x N` grid. Edge temperatures are held fixed
//! and every interior value is repeatedly replaced by the average of its four
//! neighbours from the previous pass (Jacobi relaxation) until no cell changes
//! by more than a caller-supplied tolerance. The crate provides
//!
//! - configuration of geometry, edge temperatures and the solver (`options`, `solving`),
//! - the grid container and its mean-seeded initializer (`grid` module),
//! - the relaxation engine with an optional rayon-parallel pass (`relaxation` module),
//! - a per-pass progress hook (`observer` module), and
//! - the plain-text grid file format (`output` module).
//!
//! # Quick start
//!
//! ```no_run
//! use heated_plate::{HeatedPlate, PlateOptions, PowerOfTwoReporter};
//!
//! let options = PlateOptions::default()
//!     .with_dimensions(100, 100)
//!     .with_tolerance(1e-3);
//! let plate = HeatedPlate::new(options).expect("valid configuration");
//!
//! let mut reporter = PowerOfTwoReporter::new(std::io::stdout());
//! let solution = plate.solve_with_observer(&mut reporter).expect("converged");
//! heated_plate::output::save_grid(&solution.grid, "plate.txt").expect("written");
//! ```
//!
//! There is no iteration cap unless one is configured: a tolerance the
//! arithmetic cannot reach keeps the engine running.

pub mod error;
pub mod grid;
pub mod observer;
pub mod options;
pub mod output;
pub mod problem;
pub mod relaxation;
pub mod solving;

pub use error::{PlateError, Result};
pub use grid::TemperatureGrid;
pub use observer::{NoopObserver, PassObserver, PowerOfTwoReporter};
pub use options::{BoundaryConditions, PlateOptions};
pub use problem::{HeatedPlate, PlateSolution};
pub use solving::{PassProgress, RelaxationSummary, SolverOptions};
