//! Shift relation selection.
//!
//! A batch of shift relations shares one modulus and is suitable: every
//! monomial occurring in the batch leads exactly one of its relations.
//! Such a batch spans a triangular lattice whose determinant is the
//! product of the leading terms.

mod graph;
mod optimal;

pub use graph::{maximum_closure, GraphShifts};
pub use optimal::OptimalShifts;

use smallroots_integers::Integer;
use smallroots_model::{BoundSet, Result};
use smallroots_poly::Polynomial;

/// `log2` of the bound on the leading term of `f`, coefficient included.
pub(crate) fn leading_term_bits(f: &Polynomial<Integer>, bounds: &BoundSet) -> Result<f64> {
    let Some((m, c)) = f.leading_term() else {
        return Ok(f64::NEG_INFINITY);
    };
    let b = c.abs() * bounds.monomial_bound(m, f.ring().variables())?;
    Ok(b.log2())
}
