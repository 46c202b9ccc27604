//! Errors raised while building rings and polynomials.

use thiserror::Error;

/// Error type for ring construction and expression parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolyError {
    /// Two ring generators share a name.
    #[error("duplicate variable `{0}` in polynomial ring")]
    DuplicateVariable(String),

    /// An expression mentions a name the target ring does not have.
    #[error("unknown variable `{0}`")]
    UnknownVariable(String),

    /// The text is not a polynomial expression.
    #[error("cannot parse `{input}`: {reason}")]
    Syntax {
        /// The offending input.
        input: String,
        /// What went wrong.
        reason: String,
    },

    /// Only `A == B` equations are polynomial relations.
    #[error("unsupported relational operator in `{0}`, only `==` is allowed")]
    UnsupportedRelation(String),
}
