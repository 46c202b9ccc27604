//! The automated Coppersmith method.
//!
//! Shift relations are generated batch by batch. Each batch is turned
//! into a lattice, reduced, and handed to root recovery; the first batch
//! that yields roots wins. Recovery from a dual lattice produces integer
//! relations and re-enters [`AutomatedPartialSolver`] with them.

use smallroots_model::{
    Error, Lattice, Modulus, PartialSolutionSet, Problem, RelationSet, Result, SolutionSet,
};
use tracing::{debug, info, warn};

use super::{AutomatedPartialSolver, Solver};
use crate::builder::{DualBuilder, LatticeBuilder, PrimalBuilder};
use crate::config::SolverConfig;
use crate::converter::{ChainConverter, ProblemConverter, SolutionConverter};
use crate::recovery;
use crate::shift::{GraphShifts, OptimalShifts};

/// Partial roots from Coppersmith lattices of shift relations.
pub struct CoppersmithSolver {
    problem: Problem,
    config: SolverConfig,
    depth: usize,
    expected: Option<SolutionSet>,
    conclusive: bool,
}

impl CoppersmithSolver {
    /// Creates the solver.
    #[must_use]
    pub fn new(problem: Problem, config: SolverConfig) -> Self {
        Self::nested(problem, config, 0)
    }

    pub(crate) fn nested(problem: Problem, config: SolverConfig, depth: usize) -> Self {
        Self {
            problem,
            config,
            depth,
            expected: None,
            conclusive: false,
        }
    }

    /// Whether a multiple of the modulus is known, and whether any modulus
    /// is symbolic.
    fn configuration(&self) -> (bool, bool) {
        let relations = &self.problem.relations;
        let multiple_known = relations.iter().any(|r| {
            r.modulus
                .as_ref()
                .is_some_and(|m| r.polynomial.is_constant() || !m.is_symbolic())
        });
        let symbolic = relations
            .iter()
            .any(|r| r.modulus.as_ref().is_some_and(Modulus::is_symbolic));
        (multiple_known, symbolic)
    }

    fn use_graph_optimization(&self, multiple_known: bool) -> Result<bool> {
        match self.config.use_graph_optimization {
            Some(true) if !multiple_known => Err(Error::invalid(
                "graph optimization requires a known multiple of the modulus",
            )),
            Some(graph) => Ok(graph),
            None if !multiple_known => Ok(false),
            // linearization terms hint at sparse, structured relations
            None if !self.config.unraveled_linearization.is_empty() => Ok(true),
            None => {
                let threshold = &self.config.small_coefficient_threshold;
                let small = self.problem.relations.iter().any(|r| {
                    r.polynomial
                        .coefficients()
                        .filter(|c| c.abs() < *threshold)
                        .count()
                        > 1
                });
                if small {
                    info!(
                        target: "smallroots::CoppersmithSolver",
                        "small coefficients detected, disabling graph optimization"
                    );
                    info!(
                        target: "smallroots::CoppersmithSolver",
                        "graph optimization can be forced on with use_graph_optimization"
                    );
                }
                Ok(!small)
            }
        }
    }

    /// Roots from a reduced lattice of shift relations of `problem`.
    fn recover(
        &mut self,
        reduced: &Lattice,
        problem: &Problem,
        expected: Option<&SolutionSet>,
    ) -> Result<PartialSolutionSet> {
        if reduced.is_primal {
            return recovery::primal_root(reduced);
        }
        let found = recovery::integer_relations(reduced, &problem.bounds, self.config.use_l1_norm)?;
        let mut relations = problem.relations.relations().to_vec();
        relations.extend(found);
        let augmented = Problem::new(RelationSet::new(relations)?, problem.bounds.clone());

        // linearization terms belong to the outer problem's ring
        let config = SolverConfig {
            unraveled_linearization: Vec::new(),
            ..self.config.clone()
        };
        let mut solver = AutomatedPartialSolver::nested(augmented, config, self.depth + 1);
        if let Some(expected) = expected {
            solver.set_expected(expected.clone());
        }
        let result = solver.solve();
        // only the L1 criterion makes the recovered relations hold at
        // every bounded root
        self.conclusive = result.is_err() && solver.is_conclusive() && self.config.use_l1_norm;
        result
    }
}

impl Solver for CoppersmithSolver {
    type Output = PartialSolutionSet;

    fn problem(&self) -> &Problem {
        &self.problem
    }

    fn expected_slot(&mut self) -> &mut Option<SolutionSet> {
        &mut self.expected
    }

    fn solve(&mut self) -> Result<PartialSolutionSet> {
        self.conclusive = false;
        let relations = &self.problem.relations;
        let modular = relations.iter().filter(|r| r.modulus.is_some()).count();
        info!(
            target: "smallroots::CoppersmithSolver",
            "attempting the automated multivariate Coppersmith method with {} variable(s)",
            relations.variables().len()
        );
        info!(
            target: "smallroots::CoppersmithSolver",
            "problem has {modular} modular relation(s) and {} integer relation(s)",
            relations.len() - modular
        );
        if modular == 0 {
            return Err(Error::failure("no modular relations"));
        }

        let (multiple_known, symbolic) = self.configuration();
        let primal = self
            .config
            .use_primal_strategy
            .unwrap_or(!(multiple_known || symbolic));
        let graph = self.use_graph_optimization(multiple_known)?;
        debug!(target: "smallroots::CoppersmithSolver", primal, graph, "strategy selected");

        let conv = ChainConverter::new(true, self.config.unraveled_linearization.clone())
            .run(&self.problem)?;
        let expected = self
            .expected
            .as_ref()
            .map(|e| conv.solutions.convert_solutions_to_new(e));
        let problem = &conv.problem;

        let shifts = OptimalShifts::new(&problem.relations, &problem.bounds, &self.config)?;
        let batches: Box<dyn Iterator<Item = Result<RelationSet>>> = if graph {
            Box::new(GraphShifts::new(shifts, &problem.bounds))
        } else {
            Box::new(shifts)
        };
        let builder: &dyn LatticeBuilder = if primal { &PrimalBuilder } else { &DualBuilder };
        let reduction = self.config.reduction();

        for batch in batches {
            let batch = batch?;
            debug!(
                target: "smallroots::CoppersmithSolver",
                "generated {} shift relation(s)", batch.len()
            );
            for soln in expected.iter().flatten() {
                if matches!(batch.check(soln), Ok(true)) {
                    debug!(target: "smallroots::CoppersmithSolver", "expected value satisfies shift relations");
                } else {
                    warn!(target: "smallroots::CoppersmithSolver", "expected value does not satisfy shift relations");
                }
            }

            let attempt = builder
                .build(&batch, &problem.bounds)
                .and_then(|lattice| reduction.run(&lattice))
                .and_then(|reduced| self.recover(&reduced, problem, expected.as_ref()));
            match attempt {
                Ok(solutions) => return Ok(conv.solutions.convert_solutions_to_old(&solutions)),
                Err(e) if e.is_retryable() && self.conclusive => {
                    info!(
                        target: "smallroots::CoppersmithSolver",
                        "recovered integer relations have no bounded root"
                    );
                    return Err(e);
                }
                Err(e) if e.is_retryable() => {
                    debug!(
                        target: "smallroots::CoppersmithSolver",
                        "Coppersmith method failed with these shift relations: {e}"
                    );
                }
                Err(e) => return Err(e),
            }
        }
        Err(Error::failure("every batch of shift relations failed"))
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
    use smallroots_model::{Bound, Relation};
    use smallroots_poly::{parse_polynomials, Variable};

    fn config() -> SolverConfig {
        SolverConfig {
            reducer: ReducerKind::InProcess,
            ..SolverConfig::default()
        }
    }

    fn init_logging() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    }

    fn problem(expr: &str, modulus: impl Into<Modulus>, bound: i64) -> Problem {
        let (_, polys) = parse_polynomials(&[expr]).unwrap();
        let relations = RelationSet::new(vec![Relation::modular(polys[0].clone(), modulus)]).unwrap();
        let bounds = [
            (Variable::new("x"), Bound::symmetric(&Integer::new(bound))),
            (Variable::new("p"), Bound::new(Integer::new(1000), Integer::new(2000))),
        ]
        .into_iter()
        .collect();
        Problem::new(relations, bounds)
    }

    #[test]
    fn test_univariate_dual() {
        init_logging();
        // x = 1234 is a root modulo 1000003 * 1000033
        let p = problem(
            "x^2 + 98765*x + 999912601333",
            Integer::new(1_000_036_000_099),
            2000,
        );
        let roots = CoppersmithSolver::new(p, config()).solve().unwrap();
        assert!(roots
            .iter()
            .any(|r| r.get(&Variable::new("x")) == Some(&Integer::new(1234))));
    }

    #[test]
    fn test_forced_primal_strategy() {
        let p = problem("x - 5", Integer::new(101), 8);
        let config = SolverConfig {
            use_primal_strategy: Some(true),
            ..config()
        };
        let roots = CoppersmithSolver::new(p, config).solve().unwrap();
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].get(&Variable::new("x")), Some(&Integer::new(5)));
    }

    #[test]
    fn test_strategy_selection() {
        let known = CoppersmithSolver::new(problem("x^2 + 3*x + 5", Integer::new(101), 8), config());
        assert_eq!(known.configuration(), (true, false));
        // three coefficients below the threshold
        assert!(!known.use_graph_optimization(true).unwrap());

        let large = CoppersmithSolver::new(
            problem("x^2 + 12345*x + 67890", Integer::new(1_000_003), 8),
            config(),
        );
        assert!(large.use_graph_optimization(true).unwrap());

        let symbolic = CoppersmithSolver::new(problem("x - 5", Variable::new("p"), 8), config());
        assert_eq!(symbolic.configuration(), (false, true));
        assert!(!symbolic.use_graph_optimization(false).unwrap());
    }

    #[test]
    fn test_graph_optimization_needs_known_multiple() {
        let config = SolverConfig {
            use_graph_optimization: Some(true),
            ..config()
        };
        let mut solver = CoppersmithSolver::new(problem("x - 5", Variable::new("p"), 8), config);
        assert!(matches!(solver.solve(), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_no_bounded_root_is_conclusive() {
        init_logging();
        // x^2 + 3x + 7 takes no value in [-5, 5] divisible by 1000003
        let p = problem("x^2 + 3*x + 7", Integer::new(1_000_003), 5);
        let mut solver = CoppersmithSolver::new(p, config());
        assert!(matches!(solver.solve(), Err(Error::Failure(_))));
        assert!(solver.is_conclusive());
    }

    #[test]
    fn test_integer_relations_only_fail() {
        let (_, polys) = parse_polynomials(&["x - 5"]).unwrap();
        let relations = RelationSet::new(vec![Relation::integer(polys[0].clone())]).unwrap();
        let p = Problem::new(relations, smallroots_model::BoundSet::new());
        assert!(matches!(
            CoppersmithSolver::new(p, config()).solve(),
            Err(Error::Failure(_))
        ));
    }
}
