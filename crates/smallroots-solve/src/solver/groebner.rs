//! Roots of the integer relations through their variety.

use num_traits::Zero;
use rustc_hash::FxHashMap;
use smallroots_groebner::{integer_points, VarietyError};
use smallroots_integers::{Integer, Rational};
use smallroots_model::{Error, PartialSolution, PartialSolutionSet, Problem, Result, SolutionSet};
use smallroots_poly::{integer_roots, Monomial, Polynomial};
use tracing::{debug, info};

use super::Solver;

/// Relations that hold over the integers share the root over the
/// rationals; their integer points are candidate roots.
pub struct GroebnerSolver {
    problem: Problem,
    expected: Option<SolutionSet>,
    exhaustive: bool,
}

impl GroebnerSolver {
    /// Creates the solver.
    #[must_use]
    pub fn new(problem: Problem) -> Self {
        Self {
            problem,
            expected: None,
            exhaustive: false,
        }
    }

    /// Every integer point of the integer relations, or the values a
    /// positive-dimensional variety forces. Sets `exhaustive` when the
    /// points found are all there are.
    fn partial_roots(&mut self) -> Result<PartialSolutionSet> {
        let polys: Vec<Polynomial<Integer>> = self
            .problem
            .relations
            .iter()
            .filter(|r| r.is_integer())
            .map(|r| r.polynomial.clone())
            .collect();
        let Some(first) = polys.first() else {
            return Err(Error::failure("no integer relations"));
        };
        debug!(target: "smallroots::GroebnerSolver", "solving {} integer relation(s)", polys.len());
        let ring = first.ring().clone();
        let variables = ring.variables();

        if ring.num_vars() == 1 {
            self.exhaustive = !first.is_zero();
            let coeffs = first.univariate_coeffs(0).unwrap_or_default();
            return Ok(integer_roots(&coeffs)
                .into_iter()
                .filter(|r| polys.iter().all(|f| f.evaluate(std::slice::from_ref(r)).is_zero()))
                .map(|r| [(variables[0].clone(), r)].into_iter().collect())
                .collect());
        }

        // pin unused generators so the variety stays finite
        let unused: Vec<usize> = (0..ring.num_vars())
            .filter(|&i| polys.iter().all(|f| f.degree_in(i) == 0))
            .collect();
        let mut rational: Vec<Polynomial<Rational>> = polys.iter().map(Polynomial::to_rational).collect();
        rational.extend(unused.iter().map(|&i| Polynomial::var(ring.clone(), i)));

        let points = integer_points(&rational);
        self.exhaustive = points.is_ok();
        match points {
            Ok(points) if points.is_empty() => Err(Error::failure("variety is empty")),
            Ok(points) => Ok(points
                .into_iter()
                .map(|point| {
                    point
                        .into_iter()
                        .enumerate()
                        .filter(|(i, _)| !unused.contains(i))
                        .map(|(i, x)| (variables[i].clone(), x))
                        .collect()
                })
                .collect()),
            Err(VarietyError::PositiveDimensional { basis }) => {
                let values = linear_values(&basis, &unused);
                if values.is_empty() {
                    return Err(Error::failure("positive-dimensional ideal"));
                }
                Ok(vec![values
                    .into_iter()
                    .map(|(i, x)| (variables[i].clone(), x))
                    .collect::<PartialSolution>()])
            }
        }
    }
}

/// Values forced by basis elements that become `a * x_i + b` after
/// substituting the values found so far, rounded down to integers.
fn linear_values(basis: &[Polynomial<Rational>], unused: &[usize]) -> Vec<(usize, Integer)> {
    let mut values: FxHashMap<usize, Rational> = FxHashMap::default();
    let mut improved = true;
    while improved {
        improved = false;
        for g in basis {
            let g = g.partial_evaluate(&values);
            let indices = g.variable_indices();
            let [i] = indices[..] else {
                continue;
            };
            if g.degree_in(i) != 1 || g.total_degree() != 1 || unused.contains(&i) {
                continue;
            }
            let n = g.ring().num_vars();
            let a = g.coeff(&Monomial::var(i, n));
            let b = g.constant_coeff();
            let Some(inv) = a.inv() else {
                continue;
            };
            let x = (-b * inv).floor();
            values.insert(i, Rational::from(x));
            improved = true;
        }
    }
    let mut values: Vec<(usize, Integer)> = values
        .into_iter()
        .filter_map(|(i, x)| x.to_integer().map(|x| (i, x)))
        .collect();
    values.sort_by_key(|(i, _)| *i);
    values
}

impl Solver for GroebnerSolver {
    type Output = PartialSolutionSet;

    fn problem(&self) -> &Problem {
        &self.problem
    }

    fn expected_slot(&mut self) -> &mut Option<SolutionSet> {
        &mut self.expected
    }

    fn solve(&mut self) -> Result<PartialSolutionSet> {
        self.exhaustive = false;
        let roots = self.partial_roots()?;
        info!(
            target: "smallroots::GroebnerSolver",
            "found {} possible (partial) root(s)", roots.len()
        );
        let roots: PartialSolutionSet = roots
            .into_iter()
            .filter(|r| self.problem.bounds.check(r))
            .collect();
        if roots.is_empty() {
            return Err(Error::failure("no bounded integer points"));
        }
        Ok(roots)
    }

    fn is_conclusive(&self) -> bool {
        self.exhaustive
    }
}
