//! Error type shared by the solver crates.

use smallroots_lattice::LatticeError;
use smallroots_poly::PolyError;
use thiserror::Error;

/// Errors raised while building or solving a problem.
///
/// Only [`Error::Failure`] is retryable: it means "this strategy found
/// nothing, try the next candidate". Every other variant is fatal and
/// propagates to the caller.
#[derive(Debug, Error)]
pub enum Error {
    /// A solving strategy did not produce a result.
    #[error("solve failure: {0}")]
    Failure(String),

    /// The problem or one of its parts is malformed.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Two objects that must share a polynomial ring do not.
    #[error("polynomial rings do not match")]
    RingMismatch,

    /// A bound needed for a computation was not supplied.
    #[error("missing bound: {0}")]
    MissingBound(String),

    /// The modulus cannot be used by the requested construction.
    #[error("unsupported modulus: {0}")]
    UnsupportedModulus(String),

    /// Lattice reduction failed.
    #[error(transparent)]
    Lattice(#[from] LatticeError),

    /// An expression could not be parsed or placed in a ring.
    #[error(transparent)]
    Parse(#[from] PolyError),

    /// Every strategy was exhausted without finding a root.
    #[error("no small roots found")]
    NoRootsFound,
}

impl Error {
    /// Convenience constructor for [`Error::Failure`].
    pub fn failure(reason: impl Into<String>) -> Self {
        Self::Failure(reason.into())
    }

    /// Convenience constructor for [`Error::InvalidInput`].
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidInput(reason.into())
    }

    /// True for errors that mean "try the next candidate".
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Failure(_))
    }
}

/// Result alias used throughout the solver.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_failure_is_retryable() {
        assert!(Error::failure("no short vector").is_retryable());
        assert!(!Error::RingMismatch.is_retryable());
        assert!(!Error::NoRootsFound.is_retryable());
        let parse: Error = PolyError::UnknownVariable("z".into()).into();
        assert!(!parse.is_retryable());
        assert_eq!(parse.to_string(), "unknown variable `z`");
    }
}
