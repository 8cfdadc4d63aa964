use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = MatrixError> = std::result::Result<T, E>;

// ---------------------------------------------------------------------------
// MatrixError – everything a load, allocation or copy can report
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum MatrixError {
    #[error("cannot open {}: {source}", path.display())]
    SourceNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// No usable rows or columns, or fewer than the caller asked for.
    #[error("{origin}: no usable data")]
    FileEmpty { origin: String },

    /// The table is well formed but no reference value falls in the range.
    #[error("{origin}: no row in range [{low}, {high}]")]
    RangeEmpty { origin: String, low: f64, high: f64 },

    #[error("{origin}: bad row length at line {line}")]
    BadRowLength { origin: String, line: usize },

    #[error("cannot allocate a {rows} x {cols} matrix")]
    Allocation { rows: usize, cols: usize },

    #[error("source matrix is empty")]
    InvalidSource,

    #[error("{origin}: read failed: {source}")]
    Io {
        origin: String,
        #[source]
        source: io::Error,
    },

    #[error("second derivatives: {0}")]
    Spline(#[from] SplineError),

    #[error("config {}: {message}", path.display())]
    Config { path: PathBuf, message: String },
}

/// Payload-free tag of a [`MatrixError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    SourceNotFound,
    FileEmpty,
    RangeEmpty,
    BadRowLength,
    Allocation,
    InvalidSource,
    Io,
    Spline,
    Config,
}

impl MatrixError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MatrixError::SourceNotFound { .. } => ErrorKind::SourceNotFound,
            MatrixError::FileEmpty { .. } => ErrorKind::FileEmpty,
            MatrixError::RangeEmpty { .. } => ErrorKind::RangeEmpty,
            MatrixError::BadRowLength { .. } => ErrorKind::BadRowLength,
            MatrixError::Allocation { .. } => ErrorKind::Allocation,
            MatrixError::InvalidSource => ErrorKind::InvalidSource,
            MatrixError::Io { .. } => ErrorKind::Io,
            MatrixError::Spline(_) => ErrorKind::Spline,
            MatrixError::Config { .. } => ErrorKind::Config,
        }
    }
}

// ---------------------------------------------------------------------------
// SplineError – reported by a second-derivative solver
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SplineError {
    #[error("abscissa has {x} points, ordinate {y}, output {out}")]
    LengthMismatch { x: usize, y: usize, out: usize },

    /// `x[index]` is not strictly greater than `x[index - 1]`.
    #[error("abscissa not strictly increasing at index {index}")]
    NotIncreasing { index: usize },
}
