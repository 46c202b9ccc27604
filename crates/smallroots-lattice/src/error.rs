//! Error type for lattice reduction.

use thiserror::Error;

/// Failures of the reduction backends.
#[derive(Debug, Error)]
pub enum LatticeError {
    /// The basis rows are linearly dependent.
    #[error("basis rows are linearly dependent (row {row})")]
    DependentRows {
        /// Index of the first row found to be dependent on earlier ones.
        row: usize,
    },
    /// The external reducer produced output that is not a matrix of the
    /// expected shape.
    #[error("malformed reducer output: {0}")]
    MalformedOutput(String),
    /// The external reducer exited unsuccessfully.
    #[error("reducer exited with {status}: {stderr}")]
    ReducerFailed {
        /// Exit status as reported by the OS.
        status: String,
        /// Captured standard error.
        stderr: String,
    },
    /// Spawning or talking to the external reducer failed.
    #[error("reducer I/O: {0}")]
    Io(#[from] std::io::Error),
}
