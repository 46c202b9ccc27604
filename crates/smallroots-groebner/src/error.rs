//! Errors from variety computation.

use smallroots_integers::Rational;
use smallroots_poly::Polynomial;
use thiserror::Error;

/// Why the points of an ideal could not be listed.
#[derive(Debug, Clone, Error)]
pub enum VarietyError {
    /// The ideal has infinitely many complex points.
    ///
    /// The lex Gröbner basis is returned so callers can still extract
    /// whatever linear information it carries.
    #[error("positive-dimensional ideal")]
    PositiveDimensional {
        /// Reduced lex basis of the ideal.
        basis: Vec<Polynomial<Rational>>,
    },
}
