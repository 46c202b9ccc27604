//! # smallroots
//!
//! Bounded integer roots of polynomial systems with the automated
//! multivariate Coppersmith method.
//!
//! Given relations that hold over the integers or modulo known or unknown
//! moduli, and bounds on the unknowns, smallroots searches for every root
//! inside the bounds.
//!
//! ## Features
//!
//! - **Linear systems**: short vectors of a primal lattice, with
//!   enumeration when the shortest vector is ambiguous
//! - **Exact systems**: integer points of the variety through Gröbner bases
//! - **Coppersmith's method**: optimal shift relations, primal and dual
//!   lattices, and Howgrave-Graham recovery of integer relations
//! - **Unknown moduli**: recovered from the partial solution when a
//!   multiple is known
//! - **Lattice reduction**: `flatter` when installed, exact LLL otherwise
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use smallroots::prelude::*;
//!
//! let relations = vec![
//!     RelationInput::Expression("x + y - 10".into()),
//!     RelationInput::Expression("x - y - 2".into()),
//! ];
//! let options = FindOptions {
//!     modulus: ModulusOptions::known(Integer::new(97)),
//!     ..FindOptions::default()
//! };
//! let roots = find_small_roots(relations, BoundsInput::Uniform(Integer::new(50)), &options)?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod wrapper;

#[cfg(test)]
mod tests;

pub use smallroots_groebner as groebner;
pub use smallroots_integers as integers;
pub use smallroots_lattice as lattice;
pub use smallroots_model as model;
pub use smallroots_poly as poly;
pub use smallroots_solve as solve;

pub use wrapper::{
    find_small_roots, parse_bounds, parse_modulus, parse_moduli, parse_relations, BoundSpec,
    BoundsInput, FindOptions, ModulusInfo, ModulusOptions, ModulusValue, PerRelation,
    PolynomialInput, RelationInput,
};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::wrapper::{
        find_small_roots, BoundSpec, BoundsInput, FindOptions, ModulusOptions, ModulusValue,
        PerRelation, PolynomialInput, RelationInput,
    };
    pub use smallroots_integers::Integer;
    pub use smallroots_lattice::ReducerKind;
    pub use smallroots_model::{
        Bound, BoundSet, Error, Modulus, PartialSolution, Problem, Relation, RelationSet, Result,
        Solution, SolutionSet,
    };
    pub use smallroots_poly::{parse_polynomials, Polynomial, Variable};
    pub use smallroots_solve::{AutomatedPartialSolver, AutomatedSolver, Solver, SolverConfig};
}
