//! Gröbner bases and ideals for the smallroots workspace.
//!
//! This crate provides:
//! - Strong Gröbner bases over ℤ ([`integer::groebner_basis`]) with
//!   S- and G-polynomials and Euclidean reduction
//! - Reduced Gröbner bases over ℚ ([`rational_groebner_basis`])
//! - Integer ideals with sum, product and normal forms ([`Ideal`])
//! - Integer points of zero-dimensional ideals ([`integer_points`])

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod criteria;
pub mod error;
pub mod ideal;
pub mod integer;
pub mod rational;
pub mod variety;

#[cfg(test)]
mod proptests;

pub use error::VarietyError;
pub use ideal::Ideal;
pub use rational::rational_groebner_basis;
pub use variety::integer_points;
