//! # smallroots-poly
//!
//! Multivariate polynomial arithmetic over ℤ and ℚ for the smallroots
//! workspace.
//!
//! This crate provides:
//! - Named [`Variable`]s and explicit [`PolyRing`] values (ordered
//!   variable list plus [`TermOrder`]) compared structurally
//! - Sparse multivariate [`Polynomial`]s with exponent-vector monomials
//! - Ring changes through evaluation homomorphisms ([`Polynomial::substitute`])
//! - Integer roots of univariate integer polynomials
//! - A text parser for polynomial expressions and equations
//!
//! ## Term orders
//!
//! Weighted degree orders take integer weights, so that the order stays
//! exact and compatible with multiplication even when the weights come
//! from logarithms of bounds.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod monomial;
pub mod ordering;
pub mod parse;
pub mod polynomial;
pub mod ring;
pub mod univariate;
pub mod variable;

#[cfg(test)]
mod proptests;

pub use error::PolyError;
pub use monomial::Monomial;
pub use ordering::TermOrder;
pub use parse::{parse_polynomial_in, parse_polynomials};
pub use polynomial::Polynomial;
pub use ring::PolyRing;
pub use univariate::integer_roots;
pub use variable::Variable;
