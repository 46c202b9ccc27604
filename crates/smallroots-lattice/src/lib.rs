//! # smallroots-lattice
//!
//! Lattice reduction and enumeration for the smallroots solver.
//!
//! This crate provides:
//! - Dense integer matrices with an integral Hermite form
//! - Exact all-integer LLL reduction
//! - The external `flatter` reducer, behind the [`LatticeReducer`] trait
//!   with an automatic in-process fallback
//! - Floating Gram-Schmidt data and Schnorr-Euchner closest-vector
//!   enumeration driven by a caller callback
//!
//! ## Exactness
//!
//! Reduction is exact. Enumeration runs in `f64` and only proposes
//! candidates; callers verify them with exact arithmetic.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod enumeration;
pub mod error;
pub mod flatter;
pub mod gso;
pub mod lll;
pub mod matrix;
pub mod reducer;

#[cfg(test)]
mod proptests;

pub use enumeration::{enumerate, Control, EnumStats, EnumerationConfig};
pub use error::LatticeError;
pub use flatter::Flatter;
pub use gso::GramSchmidt;
pub use lll::{lll_reduce, LllConfig, LllResult};
pub use matrix::DenseMatrix;
pub use reducer::{AutoReducer, InProcess, LatticeReducer, ReducerKind};
