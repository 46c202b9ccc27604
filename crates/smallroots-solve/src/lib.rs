//! # smallroots-solve
//!
//! Strategies and solvers for small roots of multivariate polynomial
//! systems, exactly or modulo known and unknown moduli.
//!
//! The pipeline of the Coppersmith solver:
//! - [`converter`]: recenter the unknowns, reorder monomials by bound
//!   size, optionally linearize nonlinear terms
//! - [`ideal`]: the ideals `J(k)` of polynomials vanishing modulo
//!   `∏ q_i^{k_i}` at the root, in increasing modulus size
//! - [`shift`]: suitable batches of shift relations from each ideal,
//!   optionally pruned with a maximum closure
//! - [`builder`] and [`reduction`]: primal or dual lattices and their
//!   scaled reduction
//! - [`recovery`]: integer relations or roots from the reduced basis
//!
//! [`solver::AutomatedSolver`] ties this together with a linear solver
//! and a Gröbner basis solver and completes partial solutions.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod builder;
pub mod combinations;
pub mod config;
pub mod converter;
pub mod ideal;
pub mod reduction;
pub mod recovery;
pub mod shift;
pub mod solver;

#[cfg(test)]
mod proptests;

pub use builder::{DualBuilder, LatticeBuilder, PrimalBuilder};
pub use config::SolverConfig;
pub use converter::{ChainConverter, Conversion, ProblemConverter};
pub use ideal::RelationIdealGenerator;
pub use reduction::LatticeReduction;
pub use shift::{GraphShifts, OptimalShifts};
pub use solver::{
    AutomatedPartialSolver, AutomatedSolver, CoppersmithSolver, GroebnerSolver, LinearSolver, Solver,
};
