//! Switching to a term order weighted by the bounds.

use smallroots_model::{BoundSet, Problem, Result};
use smallroots_poly::{PolyRing, TermOrder};

use super::{Conversion, ProblemConverter, RelationConverter, Rename};

/// Reorders monomials so that `x_i` weighs `log2(X_i)` where `X_i` bounds
/// `|x_i|`.
///
/// Under this order the leading monomial of a polynomial is the one with
/// the largest bound, which is what shift selection wants. Univariate
/// problems are left alone.
#[derive(Clone, Copy, Debug, Default)]
pub struct BoundedMonomialOrder;

impl ProblemConverter for BoundedMonomialOrder {
    fn run(&self, problem: &Problem) -> Result<Conversion> {
        let ring = problem.relations.ring().clone();
        let new_ring = if ring.num_vars() == 1 {
            ring.clone()
        } else {
            let bounds = ring
                .variables()
                .iter()
                .map(|v| problem.bounds.abs_bound(v))
                .collect::<Result<Vec<_>>>()?;
            PolyRing::new(ring.variables().to_vec(), TermOrder::weighted_by_bounds(&bounds))?
        };
        let rename = Rename::new(ring, new_ring)?;
        let relations = rename.convert_relations_to_new(&problem.relations)?;
        // same generator names, so the bounds carry over as they are
        let bounds: BoundSet = problem.bounds.clone();
        Ok(Conversion {
            problem: Problem::new(relations, bounds),
            relations: Box::new(rename.clone()),
            solutions: Box::new(rename),
        })
    }
}
