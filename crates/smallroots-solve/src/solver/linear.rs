//! Small roots of linear relations.
//!
//! The linear relations span a primal lattice in which every bounded root
//! is a vector of infinity norm at most one. A single such vector is read
//! directly; several are searched by enumeration around the vector that
//! is one on the constant column.

use num_traits::{One, Zero};
use smallroots_integers::{Integer, Rational};
use smallroots_lattice::{enumerate, Control, DenseMatrix, EnumerationConfig, GramSchmidt};
use smallroots_model::{
    BoundSet, Error, Lattice, PartialSolution, PartialSolutionSet, Problem, Relation, RelationSet,
    Result, SolutionSet,
};
use smallroots_poly::{Monomial, Variable};
use tracing::{debug, info};

use super::Solver;
use crate::builder::{LatticeBuilder, PrimalBuilder};
use crate::config::SolverConfig;
use crate::converter::{ProblemConverter, Recenter, SolutionConverter};

/// Solver for the relations of total degree at most one.
pub struct LinearSolver {
    problem: Problem,
    config: SolverConfig,
    expected: Option<SolutionSet>,
}

impl LinearSolver {
    /// Creates the solver.
    #[must_use]
    pub fn new(problem: Problem, config: SolverConfig) -> Self {
        Self {
            problem,
            config,
            expected: None,
        }
    }

    /// Linear relations with integer or known modulus, coefficients
    /// reduced modulo the modulus.
    fn linear_relations(relations: &RelationSet) -> Result<RelationSet> {
        let mut linear = Vec::new();
        for rel in relations {
            if rel.polynomial.total_degree() > 1 {
                continue;
            }
            let rel = match &rel.modulus {
                None => rel.clone(),
                Some(m) => match m.as_integer() {
                    Some(n) if !n.is_zero() => {
                        Relation::modular(rel.polynomial.reduce_mod(n), n.clone())
                    }
                    Some(_) => Relation::integer(rel.polynomial.clone()),
                    None => continue,
                },
            };
            if !rel.polynomial.is_zero() {
                linear.push(rel);
            }
        }
        if linear.is_empty() {
            return Err(Error::failure("no linear relations"));
        }
        RelationSet::new(linear)
    }

    /// Bounded roots carried by the short vectors of a reduced primal
    /// lattice.
    fn short_vector_roots(&self, lattice: &Lattice, bounds: &BoundSet) -> Result<PartialSolutionSet> {
        let short: Vec<usize> = (0..lattice.rank())
            .filter(|&i| lattice.inf_norm(i).is_some_and(|n| n <= Rational::one()))
            .collect();
        if short.is_empty() {
            return Err(Error::failure("no sufficiently short vectors"));
        }
        let n = lattice.monomials.len();
        let reader = RootReader {
            monomials: &lattice.monomials,
            variables: lattice.ring.variables(),
            one: lattice.monomials.iter().position(Monomial::is_one),
            bounds,
        };

        if let [i] = short.as_slice() {
            return Ok(reader.read(&lattice.vector(*i)[..n]).into_iter().collect());
        }

        let shortest = lattice.inf_norm(short[0]).unwrap_or_else(Rational::zero);
        if shortest.log2() < self.config.linear_min_shortest.log2() {
            return Err(Error::failure("too many candidate solutions"));
        }

        let denominator = short
            .iter()
            .filter_map(|&i| lattice.denominator(i))
            .fold(Integer::one(), |acc, d| acc.lcm(&d));
        let scale = Rational::from(&denominator);
        let scaled = short
            .iter()
            .map(|&i| {
                let v = lattice.scaled_vector(i)?;
                v[..n].iter().map(|x| (x * &scale).to_integer()).collect()
            })
            .collect::<Option<Vec<Vec<Integer>>>>()
            .ok_or_else(|| Error::failure("short vectors do not share a denominator"))?;
        let unscaled = DenseMatrix::from_rows(short.iter().map(|&i| lattice.vector(i)[..n].to_vec()).collect());

        let gso = GramSchmidt::new(&DenseMatrix::from_rows(scaled));
        let mut target = vec![Integer::zero(); n];
        if let Some(c) = reader.one {
            target[c] = denominator.clone();
        }
        let center = gso.from_canonical(&target);
        let radius_sq = gso.normalize_squared(&(&denominator * &denominator * Integer::from(n)));

        debug!(target: "smallroots::LinearSolver", "trying lattice enumeration of linear relations");
        let cap = self.config.linear_candidate_cap;
        let mut found: PartialSolutionSet = Vec::new();
        let stats = enumerate(&gso, &center, radius_sq, &EnumerationConfig::default(), |coeffs| {
            let x: Vec<Integer> = coeffs.iter().map(|&c| Integer::new(c)).collect();
            if let Some(soln) = reader.read(&unscaled.combine_rows(&x)) {
                if !found.contains(&soln) {
                    found.push(soln);
                }
            }
            if found.len() > cap {
                Control::Stop
            } else {
                Control::Continue
            }
        });
        if stats.stopped {
            return Err(Error::failure("too many candidate solutions"));
        }
        if stats.truncated {
            debug!(target: "smallroots::LinearSolver", "enumeration hit its node limit");
        }
        Ok(found)
    }
}

/// Reads evaluation vectors over degree-one monomials.
struct RootReader<'a> {
    monomials: &'a [Monomial],
    variables: &'a [Variable],
    one: Option<usize>,
    bounds: &'a BoundSet,
}

impl RootReader<'_> {
    /// The root whose monomial values are `entries`, normalized so the
    /// constant entry is one.
    fn read(&self, entries: &[Integer]) -> Option<PartialSolution> {
        let negate = match self.one {
            Some(c) if entries[c].is_one() => false,
            Some(c) if (-&entries[c]).is_one() => true,
            Some(_) => return None,
            None => false,
        };
        let soln: PartialSolution = self
            .monomials
            .iter()
            .zip(entries)
            .filter_map(|(m, x)| {
                let (i, _) = m.as_pure_power()?;
                let x = if negate { -x } else { x.clone() };
                Some((self.variables[i].clone(), x))
            })
            .collect();
        self.bounds.check(&soln).then_some(soln)
    }
}

impl Solver for LinearSolver {
    type Output = PartialSolutionSet;

    fn problem(&self) -> &Problem {
        &self.problem
    }

    fn expected_slot(&mut self) -> &mut Option<SolutionSet> {
        &mut self.expected
    }

    fn solve(&mut self) -> Result<PartialSolutionSet> {
        let conv = Recenter.run(&self.problem)?;
        let bounds = &conv.problem.bounds;
        let relations = Self::linear_relations(&conv.problem.relations)?;
        let lattice = PrimalBuilder.build(&relations, bounds)?;
        let reduced = self.config.reduction().run(&lattice)?;
        let roots = self.short_vector_roots(&reduced, bounds)?;
        info!(
            target: "smallroots::LinearSolver",
            "found {} possible (partial) root(s)", roots.len()
        );
        let roots: PartialSolutionSet = roots.into_iter().filter(|r| bounds.check(r)).collect();
        if roots.is_empty() {
            return Err(Error::failure("no bounded roots of the linear relations"));
        }
        Ok(conv.solutions.convert_solutions_to_old(&roots))
    }
}
