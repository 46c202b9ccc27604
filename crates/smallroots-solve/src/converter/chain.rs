//! Composition of converters.

use smallroots_integers::Integer;
use smallroots_model::{PartialSolution, Problem, Result};
use smallroots_poly::Polynomial;

use super::{
    BoundedMonomialOrder, Conversion, ProblemConverter, Recenter, RelationConverter,
    SolutionConverter, UnraveledLinearization,
};

/// Relation converters applied in order, and undone in reverse.
#[derive(Default)]
pub struct ChainRelations(pub Vec<Box<dyn RelationConverter>>);

impl RelationConverter for ChainRelations {
    fn convert_polynomial_to_new(&self, f: &Polynomial<Integer>) -> Result<Polynomial<Integer>> {
        self.0
            .iter()
            .try_fold(f.clone(), |g, c| c.convert_polynomial_to_new(&g))
    }

    fn convert_polynomial_to_old(&self, f: &Polynomial<Integer>) -> Result<Polynomial<Integer>> {
        self.0
            .iter()
            .rev()
            .try_fold(f.clone(), |g, c| c.convert_polynomial_to_old(&g))
    }
}

/// Solution converters applied in order, and undone in reverse.
#[derive(Default)]
pub struct ChainSolutions(pub Vec<Box<dyn SolutionConverter>>);

impl SolutionConverter for ChainSolutions {
    fn convert_solution_to_new(&self, solution: &PartialSolution) -> PartialSolution {
        self.0
            .iter()
            .fold(solution.clone(), |s, c| c.convert_solution_to_new(&s))
    }

    fn convert_solution_to_old(&self, solution: &PartialSolution) -> PartialSolution {
        self.0
            .iter()
            .rev()
            .fold(solution.clone(), |s, c| c.convert_solution_to_old(&s))
    }
}

/// Recentering (optional), then the bounded monomial order, then
/// unraveled linearization when terms are given.
///
/// Linearization terms are written in the variables of the input problem;
/// they are carried through the earlier steps before use.
#[derive(Clone, Debug)]
pub struct ChainConverter {
    recenter: bool,
    unraveled: Vec<Polynomial<Integer>>,
}

impl ChainConverter {
    /// Creates the chain.
    #[must_use]
    pub fn new(recenter: bool, unraveled: Vec<Polynomial<Integer>>) -> Self {
        Self {
            recenter,
            unraveled,
        }
    }
}

impl Default for ChainConverter {
    fn default() -> Self {
        Self::new(true, Vec::new())
    }
}

impl ProblemConverter for ChainConverter {
    fn run(&self, problem: &Problem) -> Result<Conversion> {
        let mut steps: Vec<Box<dyn ProblemConverter>> = Vec::new();
        if self.recenter {
            steps.push(Box::new(Recenter));
        }
        steps.push(Box::new(BoundedMonomialOrder));

        let mut relations = ChainRelations::default();
        let mut solutions = ChainSolutions::default();
        let mut current = problem.clone();
        for step in &steps {
            let conv = step.run(&current)?;
            current = conv.problem;
            relations.0.push(conv.relations);
            solutions.0.push(conv.solutions);
        }

        if !self.unraveled.is_empty() {
            let terms = self
                .unraveled
                .iter()
                .map(|g| relations.convert_polynomial_to_new(g))
                .collect::<Result<Vec<_>>>()?;
            let conv = UnraveledLinearization::new(terms).run(&current)?;
            current = conv.problem;
            relations.0.push(conv.relations);
            solutions.0.push(conv.solutions);
        }

        Ok(Conversion {
            problem: current,
            relations: Box::new(relations),
            solutions: Box::new(solutions),
        })
    }
}
