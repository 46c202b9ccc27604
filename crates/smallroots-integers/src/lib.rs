//! # smallroots-integers
//!
//! Exact integer and rational arithmetic for the smallroots workspace.
//!
//! This crate wraps `dashu` to provide:
//! - Arbitrary precision integers (`Integer`) with the division flavours
//!   lattice and Gröbner code needs (floor, symmetric, exact)
//! - Arbitrary precision rationals (`Rational`) for scale factors and
//!   Gröbner bases over ℚ
//! - The `Ring`/`Field` coefficient traits used by the polynomial crates
//!
//! Bit sizes of the numbers involved are routinely in the thousands
//! (moduli powers times a `2^1000` penalty), so nothing here ever
//! converts through machine floats except [`Integer::log2`] and
//! [`Integer::to_f64_scaled`], which are explicitly approximate.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod integer;
pub mod rational;
pub mod ring;

#[cfg(test)]
mod proptests;

pub use integer::Integer;
pub use rational::Rational;
pub use ring::{Field, Ring};
