//! Load whitespace-separated spectral tables (a reference axis such as
//! wavelength followed by dependent columns) into [`MatrixObject`]s, with
//! optional range filtering, row reversal and cubic-spline second
//! derivatives.

pub mod config;
pub mod data;
pub mod diagnostics;
pub mod error;
pub mod resolve;
pub mod spline;

pub use config::LoaderConfig;
pub use data::filter::RangeFilter;
pub use data::loader::{load_file, load_reader, LoadOptions, MatrixLoader};
pub use data::model::{Axis, MatrixExport, MatrixObject};
pub use diagnostics::{DiagnosticSink, LoadEvent, LogSink, RecordingSink};
pub use error::{ErrorKind, MatrixError, Result, SplineError};
pub use resolve::{DirectResolver, PathResolver, RootedResolver};
pub use spline::{Deriv2Solver, NaturalSpline};
