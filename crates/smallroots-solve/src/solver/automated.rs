//! Trying the partial solvers in turn.

use smallroots_model::{Error, PartialSolutionSet, Problem, Result, SolutionSet};
use tracing::{debug, info};

use super::{CoppersmithSolver, GroebnerSolver, LinearSolver, Solver};
use crate::config::SolverConfig;

/// Runs [`LinearSolver`], [`GroebnerSolver`] and [`CoppersmithSolver`]
/// in that order and returns the first success.
///
/// A conclusive failure of one solver ends the run.
pub struct AutomatedPartialSolver {
    problem: Problem,
    config: SolverConfig,
    depth: usize,
    expected: Option<SolutionSet>,
    conclusive: bool,
}

impl AutomatedPartialSolver {
    /// Creates the solver.
    #[must_use]
    pub fn new(problem: Problem, config: SolverConfig) -> Self {
        Self::nested(problem, config, 0)
    }

    /// A solver re-entered from root recovery, `depth` levels down.
    pub(crate) fn nested(problem: Problem, config: SolverConfig, depth: usize) -> Self {
        Self {
            problem,
            config,
            depth,
            expected: None,
            conclusive: false,
        }
    }
}

impl Solver for AutomatedPartialSolver {
    type Output = PartialSolutionSet;

    fn problem(&self) -> &Problem {
        &self.problem
    }

    fn expected_slot(&mut self) -> &mut Option<SolutionSet> {
        &mut self.expected
    }

    fn solve(&mut self) -> Result<PartialSolutionSet> {
        self.conclusive = false;
        if self.depth > self.config.max_recursion_depth {
            return Err(Error::failure("recursion depth exceeded"));
        }
        let mut solvers: Vec<Box<dyn Solver<Output = PartialSolutionSet>>> = vec![
            Box::new(LinearSolver::new(self.problem.clone(), self.config.clone())),
            Box::new(GroebnerSolver::new(self.problem.clone())),
            Box::new(CoppersmithSolver::nested(
                self.problem.clone(),
                self.config.clone(),
                self.depth,
            )),
        ];
        for solver in &mut solvers {
            if let Some(expected) = &self.expected {
                solver.set_expected(expected.clone());
            }
            match solver.solve() {
                Ok(solutions) => return Ok(solutions),
                Err(e) if e.is_retryable() && solver.is_conclusive() => {
                    info!(target: "smallroots::AutomatedPartialSolver", "no bounded root: {e}");
                    self.conclusive = true;
                    return Err(e);
                }
                Err(e) if e.is_retryable() => {
                    debug!(target: "smallroots::AutomatedPartialSolver", "{e}");
                }
                Err(e) => return Err(e),
            }
        }
        Err(Error::failure("all partial solvers failed"))
    }

    fn is_conclusive(&self) -> bool {
        self.conclusive
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallroots_integers::Integer;
    use smallroots_lattice::ReducerKind;
    use smallroots_model::{Bound, Relation, RelationSet};
    use smallroots_poly::{parse_polynomials, Variable};

    fn config() -> SolverConfig {
        SolverConfig {
            reducer: ReducerKind::InProcess,
            ..SolverConfig::default()
        }
    }

    #[test]
    fn test_falls_through_to_groebner() {
        let (_, polys) = parse_polynomials(&["x^2 - 49", "x^3 - 343"]).unwrap();
        let relations = RelationSet::new(vec![
            Relation::integer(polys[0].clone()),
            Relation::modular(polys[1].clone(), Integer::new(1009)),
        ])
        .unwrap();
        let bounds = [(Variable::new("x"), Bound::new(Integer::new(0), Integer::new(10)))]
            .into_iter()
            .collect();
        let roots = AutomatedPartialSolver::new(Problem::new(relations, bounds), config())
            .solve()
            .unwrap();
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].get(&Variable::new("x")), Some(&Integer::new(7)));
    }

    #[test]
    fn test_depth_limit() {
        let (_, polys) = parse_polynomials(&["x - 1"]).unwrap();
        let relations = RelationSet::new(vec![Relation::integer(polys[0].clone())]).unwrap();
        let problem = Problem::new(relations, smallroots_model::BoundSet::new());
        let config = config();
        let depth = config.max_recursion_depth + 1;
        let mut solver = AutomatedPartialSolver::nested(problem, config, depth);
        assert!(matches!(solver.solve(), Err(Error::Failure(_))));
        assert!(!solver.is_conclusive());
    }

    #[test]
    fn test_integer_relation_without_bounded_root_ends_search() {
        let (_, polys) = parse_polynomials(&["x^2 + 3*x + 7"]).unwrap();
        let f = polys[0].clone();
        let relations = RelationSet::new(vec![
            Relation::integer(f.clone()),
            Relation::modular(f, Integer::new(1_000_003)),
        ])
        .unwrap();
        let bounds = [(Variable::new("x"), Bound::new(Integer::new(0), Integer::new(10)))]
            .into_iter()
            .collect();
        let mut solver = AutomatedPartialSolver::new(Problem::new(relations, bounds), config());
        assert!(matches!(solver.solve(), Err(Error::Failure(_))));
        assert!(solver.is_conclusive());
    }
}
