//! # smallroots-model
//!
//! The data model of the smallroots solver.
//!
//! - [`Relation`] and [`RelationSet`]: integer polynomials that vanish at
//!   the root, exactly or modulo a known or symbolic [`Modulus`]
//! - [`BoundSet`]: exclusive bounds on the unknowns, with worst-case
//!   bounds for polynomials and moduli derived from them
//! - [`RelationIdeal`]: an ideal whose elements share one modulus
//! - [`Lattice`]: a primal or dual Coppersmith lattice with column scales
//! - [`PartialSolution`] and [`Problem`]
//!
//! All of these are plain values. Solvers build new problems rather than
//! modify existing ones.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod bounds;
pub mod error;
pub mod lattice;
pub mod modulus;
pub mod problem;
pub mod relation;
pub mod relation_ideal;
pub mod relation_set;
pub mod solution;

#[cfg(test)]
mod proptests;

pub use bounds::{Bound, BoundSet, Bounded};
pub use error::{Error, Result};
pub use lattice::{Lattice, Scale};
pub use modulus::Modulus;
pub use problem::Problem;
pub use relation::Relation;
pub use relation_ideal::RelationIdeal;
pub use relation_set::RelationSet;
pub use solution::{PartialSolution, PartialSolutionSet, Solution, SolutionSet};
