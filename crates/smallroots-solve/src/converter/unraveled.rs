//! Unraveled linearization.
//!
//! For `f(x, y) = x*y + A*x + 1 (mod N)` and the term `x*y + 1`, a fresh
//! unknown `u` with the exact relation `u - x*y - 1 = 0` is added. The
//! ideal generated by both then contains the linear `u + A*x`, which is
//! what makes the substitution worthwhile.

use std::sync::Arc;

use smallroots_integers::Integer;
use smallroots_model::{Bound, Error, PartialSolution, Problem, Relation, RelationSet, Result};
use smallroots_poly::monomial::weighted_degree;
use smallroots_poly::{PolyRing, Polynomial, TermOrder, Variable};
use tracing::info;

use super::{ensure_ring, Conversion, ProblemConverter, RelationConverter, SolutionConverter};

/// Adds an unknown `u_i` and the relation `u_i = g_i(x)` per term `g_i`.
#[derive(Clone, Debug)]
pub struct UnraveledLinearization {
    terms: Vec<Polynomial<Integer>>,
}

impl UnraveledLinearization {
    /// Linearizes the given terms, which must live in the problem's ring.
    #[must_use]
    pub fn new(terms: Vec<Polynomial<Integer>>) -> Self {
        Self { terms }
    }

    fn new_ring(&self, problem: &Problem) -> Result<Arc<PolyRing>> {
        let ring = problem.relations.ring();
        let order = match ring.order() {
            weighted @ TermOrder::WeightedDegLex(_) => weighted.clone(),
            _ => {
                let bounds = ring
                    .variables()
                    .iter()
                    .map(|v| problem.bounds.abs_bound(v))
                    .collect::<Result<Vec<_>>>()?;
                TermOrder::weighted_by_bounds(&bounds)
            }
        };
        let TermOrder::WeightedDegLex(weights) = order else {
            return Err(Error::invalid("expected a weighted term order"));
        };

        let mut variables = ring.variables().to_vec();
        let mut all_weights = weights.clone();
        for (i, g) in self.terms.iter().enumerate() {
            let u = Variable::new(format!("u_{}", i + 1));
            if ring.contains(&u) {
                return Err(Error::invalid(format!("variable {u} already exists")));
            }
            variables.push(u);
            let w = g
                .monomials()
                .map(|m| weighted_degree(m, &weights))
                .max()
                .unwrap_or(0);
            all_weights.push(u64::try_from(w).unwrap_or(u64::MAX).max(1));
        }
        Ok(PolyRing::new(variables, TermOrder::WeightedDegLex(all_weights))?)
    }
}

/// Embedding of the old ring into the extended one.
#[derive(Clone, Debug)]
struct Unravel {
    old: Arc<PolyRing>,
    new: Arc<PolyRing>,
    terms: Vec<Polynomial<Integer>>,
}

impl RelationConverter for Unravel {
    fn convert_polynomial_to_new(&self, f: &Polynomial<Integer>) -> Result<Polynomial<Integer>> {
        ensure_ring(f, &self.old)?;
        let images: Vec<Polynomial<Integer>> = (0..self.old.num_vars())
            .map(|i| Polynomial::var(self.new.clone(), i))
            .collect();
        Ok(f.substitute(&self.new, &images))
    }

    /// Each `u_i` is replaced by the term it stands for.
    fn convert_polynomial_to_old(&self, f: &Polynomial<Integer>) -> Result<Polynomial<Integer>> {
        ensure_ring(f, &self.new)?;
        let images: Vec<Polynomial<Integer>> = (0..self.old.num_vars())
            .map(|i| Polynomial::var(self.old.clone(), i))
            .chain(self.terms.iter().cloned())
            .collect();
        Ok(f.substitute(&self.old, &images))
    }
}

impl SolutionConverter for Unravel {
    fn convert_solution_to_new(&self, solution: &PartialSolution) -> PartialSolution {
        let mut out = solution.clone();
        if let Some(point) = solution.values_for(self.old.variables()) {
            let n = self.old.num_vars();
            for (i, g) in self.terms.iter().enumerate() {
                out.insert(self.new.variables()[n + i].clone(), g.evaluate(&point));
            }
        }
        out
    }

    fn convert_solution_to_old(&self, solution: &PartialSolution) -> PartialSolution {
        let n = self.old.num_vars();
        let linearized = &self.new.variables()[n..];
        solution
            .iter()
            .filter(|(v, _)| !linearized.contains(v))
            .map(|(v, x)| (v.clone(), x.clone()))
            .collect()
    }
}

impl ProblemConverter for UnraveledLinearization {
    fn run(&self, problem: &Problem) -> Result<Conversion> {
        let old = problem.relations.ring().clone();
        for g in &self.terms {
            ensure_ring(g, &old)?;
        }
        let new = self.new_ring(problem)?;
        let unravel = Unravel {
            old: old.clone(),
            new: new.clone(),
            terms: self.terms.clone(),
        };

        let mut relations = unravel.convert_relations_to_new(&problem.relations)?.into_relations();
        let mut bounds = problem.bounds.clone();
        for (i, g) in self.terms.iter().enumerate() {
            let u = &new.variables()[old.num_vars() + i];
            let image = unravel.convert_polynomial_to_new(g)?;
            let ui = Polynomial::var(new.clone(), old.num_vars() + i);
            relations.push(Relation::integer(ui - image));
            let bound = Bound::new(
                problem.bounds.lower_bound(g)?,
                problem.bounds.upper_bound(g)?,
            );
            info!(target: "smallroots::UnraveledLinearization", "{u} = {g}");
            bounds.insert(u.clone(), bound);
        }

        Ok(Conversion {
            problem: Problem::new(RelationSet::new(relations)?, bounds),
            relations: Box::new(unravel.clone()),
            solutions: Box::new(unravel),
        })
    }
}
