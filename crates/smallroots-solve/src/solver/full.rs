//! Full solutions from partial ones.
//!
//! Each partial solution first fixes the symbolic moduli it determines:
//! a modular relation whose unknowns are all assigned evaluates to a
//! multiple of its modulus, and the gcd of those multiples is taken as
//! the modulus. The assigned values are then substituted into the
//! problem and the remaining unknowns are solved for recursively.

use num_traits::Zero;
use smallroots_integers::Integer;
use smallroots_model::{
    BoundSet, Error, Modulus, PartialSolution, Problem, Relation, RelationSet, Result, Solution,
    SolutionSet,
};
use smallroots_poly::{PolyRing, Polynomial, Variable};
use tracing::{debug, info};

use super::{AutomatedPartialSolver, Solver};
use crate::config::SolverConfig;

/// Finds complete solutions: every unknown and every symbolic modulus.
pub struct AutomatedSolver {
    problem: Problem,
    config: SolverConfig,
    expected: Option<SolutionSet>,
}

impl AutomatedSolver {
    /// Creates the solver.
    #[must_use]
    pub fn new(problem: Problem, config: SolverConfig) -> Self {
        Self {
            problem,
            config,
            expected: None,
        }
    }

    /// Extends `soln` with the symbolic moduli it determines.
    ///
    /// A modulus no fully assigned relation speaks about stays unknown.
    fn unknown_moduli(&self, soln: &PartialSolution) -> Result<PartialSolution> {
        let relations = &self.problem.relations;
        let variables = relations.variables();
        let mut evaluations: Vec<(Integer, &Modulus)> = Vec::new();
        for rel in relations {
            let Some(modulus) = rel.modulus.as_ref().filter(|m| m.is_symbolic()) else {
                continue;
            };
            let point: Option<Vec<Integer>> = variables
                .iter()
                .enumerate()
                .map(|(i, v)| match soln.get(v) {
                    Some(x) => Some(x.clone()),
                    None if rel.polynomial.degree_in(i) == 0 => Some(Integer::zero()),
                    None => None,
                })
                .collect();
            if let Some(point) = point {
                evaluations.push((rel.polynomial.evaluate(&point), modulus));
            }
        }

        let mut soln = soln.clone();
        for p in relations.unknown_moduli() {
            if soln.contains(p) {
                continue;
            }
            let relevant: Vec<&(Integer, &Modulus)> =
                evaluations.iter().filter(|(_, m)| m.exponent(p) > 0).collect();
            let Some(&&(_, first)) = relevant.first() else {
                continue;
            };
            let modulus_gcd = relevant.iter().fold(first.clone(), |acc, (_, m)| acc.gcd(m));
            if modulus_gcd != Modulus::symbol(p.clone()) {
                return Err(Error::UnsupportedModulus(format!(
                    "cannot isolate {p} from the moduli it appears in"
                )));
            }
            let value = relevant.iter().fold(Integer::zero(), |acc, (e, _)| acc.gcd(e));
            if value.is_zero() {
                debug!(target: "smallroots::AutomatedSolver", "relations vanish exactly, {p} stays unknown");
                continue;
            }
            soln.insert(p.clone(), value);
        }
        Ok(soln)
    }

    /// Complete solutions extending `soln`.
    fn remaining_unknowns(&self, soln: &PartialSolution) -> Result<SolutionSet> {
        let relations = &self.problem.relations;
        let ring = relations.ring();
        let remaining: Vec<Variable> = ring
            .variables()
            .iter()
            .filter(|v| !soln.contains(v))
            .cloned()
            .collect();
        if remaining.is_empty() {
            let solutions = vec![soln.clone()];
            return if self.problem.check(&solutions)? {
                Ok(solutions)
            } else {
                Ok(SolutionSet::new())
            };
        }
        if remaining.len() == ring.num_vars() {
            debug!(target: "smallroots::AutomatedSolver", "partial solution assigns no unknown, dropping it");
            return Ok(SolutionSet::new());
        }

        let new_ring = PolyRing::new(remaining, ring.order().clone())?;
        let mut next = 0;
        let images: Vec<Polynomial<Integer>> = ring
            .variables()
            .iter()
            .map(|v| match soln.get(v) {
                Some(x) => Polynomial::constant(new_ring.clone(), x.clone()),
                None => {
                    next += 1;
                    Polynomial::var(new_ring.clone(), next - 1)
                }
            })
            .collect();
        let substituted: Vec<Relation> = relations
            .iter()
            .map(|rel| {
                Relation::new(
                    rel.polynomial.substitute(&new_ring, &images),
                    rel.modulus.as_ref().map(|m| m.substitute(soln)),
                )
            })
            .filter(|rel| !rel.polynomial.is_zero())
            .collect();
        if substituted.is_empty() {
            debug!(target: "smallroots::AutomatedSolver", "no relation constrains the remaining unknowns");
            return Ok(SolutionSet::new());
        }
        let bounds: BoundSet = self
            .problem
            .bounds
            .iter()
            .filter(|(v, _)| !soln.contains(v))
            .map(|(v, b)| (v.clone(), b.clone()))
            .collect();

        // the sub-problem keeps the names, so solutions need no renaming
        let config = SolverConfig {
            unraveled_linearization: Vec::new(),
            ..self.config.clone()
        };
        let mut solver = Self::new(Problem::new(RelationSet::new(substituted)?, bounds), config);
        if let Some(expected) = &self.expected {
            let rest = expected
                .iter()
                .map(|e| {
                    e.iter()
                        .filter(|(v, _)| !soln.contains(v))
                        .map(|(v, x)| (v.clone(), x.clone()))
                        .collect()
                })
                .collect();
            solver.set_expected(rest);
        }
        match solver.solve() {
            Ok(solutions) => Ok(solutions.into_iter().map(|s| s.merged(soln)).collect()),
            Err(e) if e.is_retryable() => {
                debug!(target: "smallroots::AutomatedSolver", "could not extend {soln}: {e}");
                Ok(SolutionSet::new())
            }
            Err(e) => Err(e),
        }
    }
}

impl Solver for AutomatedSolver {
    type Output = SolutionSet;

    fn problem(&self) -> &Problem {
        &self.problem
    }

    fn expected_slot(&mut self) -> &mut Option<SolutionSet> {
        &mut self.expected
    }

    fn solve(&mut self) -> Result<SolutionSet> {
        let mut partial = AutomatedPartialSolver::new(self.problem.clone(), self.config.clone());
        if let Some(expected) = &self.expected {
            partial.set_expected(expected.clone());
        }
        let mut solutions: Vec<Solution> = Vec::new();
        for soln in partial.solve()? {
            let soln = self.unknown_moduli(&soln)?;
            info!(target: "smallroots::AutomatedSolver", "found partial solution {soln}");
            for full in self.remaining_unknowns(&soln)? {
                if !solutions.contains(&full) {
                    solutions.push(full);
                }
            }
        }
        Ok(solutions)
    }
}
