//! Problem converters.
//!
//! A converter rewrites a [`Problem`] into an equivalent one over a new
//! ring and returns the pair of maps needed to move relations and
//! solutions between the two variable spaces:
//!
//! - [`Recenter`] shifts every unknown so that its bounds are symmetric
//! - [`BoundedMonomialOrder`] switches to a term order weighted by the
//!   bit sizes of the bounds
//! - [`UnraveledLinearization`] introduces fresh unknowns for nonlinear
//!   terms
//! - [`ChainConverter`] composes the above

mod chain;
mod monomial_order;
mod recenter;
mod unraveled;

use std::sync::Arc;

use smallroots_integers::Integer;
use smallroots_model::{
    Error, PartialSolution, PartialSolutionSet, Problem, Relation, RelationSet, Result,
};
use smallroots_poly::{PolyRing, Polynomial};

pub use chain::{ChainConverter, ChainRelations, ChainSolutions};
pub use monomial_order::BoundedMonomialOrder;
pub use recenter::Recenter;
pub use unraveled::UnraveledLinearization;

/// Maps relations between the old and the new variables.
pub trait RelationConverter {
    /// Rewrites a polynomial of the old ring in the new ring.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RingMismatch`] if `f` is not in the old ring.
    fn convert_polynomial_to_new(&self, f: &Polynomial<Integer>) -> Result<Polynomial<Integer>>;

    /// Rewrites a polynomial of the new ring in the old ring.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RingMismatch`] if `f` is not in the new ring.
    fn convert_polynomial_to_old(&self, f: &Polynomial<Integer>) -> Result<Polynomial<Integer>>;

    /// Converts the polynomial of a relation; the modulus is kept.
    ///
    /// # Errors
    ///
    /// See [`RelationConverter::convert_polynomial_to_new`].
    fn convert_relation_to_new(&self, relation: &Relation) -> Result<Relation> {
        Ok(Relation::new(
            self.convert_polynomial_to_new(&relation.polynomial)?,
            relation.modulus.clone(),
        ))
    }

    /// Converts the polynomial of a relation back; the modulus is kept.
    ///
    /// # Errors
    ///
    /// See [`RelationConverter::convert_polynomial_to_old`].
    fn convert_relation_to_old(&self, relation: &Relation) -> Result<Relation> {
        Ok(Relation::new(
            self.convert_polynomial_to_old(&relation.polynomial)?,
            relation.modulus.clone(),
        ))
    }

    /// Converts every relation of a set.
    ///
    /// # Errors
    ///
    /// See [`RelationConverter::convert_polynomial_to_new`].
    fn convert_relations_to_new(&self, relations: &RelationSet) -> Result<RelationSet> {
        let converted = relations
            .iter()
            .map(|r| self.convert_relation_to_new(r))
            .collect::<Result<Vec<_>>>()?;
        RelationSet::new(converted)
    }

    /// Converts every relation of a set back.
    ///
    /// # Errors
    ///
    /// See [`RelationConverter::convert_polynomial_to_old`].
    fn convert_relations_to_old(&self, relations: &RelationSet) -> Result<RelationSet> {
        let converted = relations
            .iter()
            .map(|r| self.convert_relation_to_old(r))
            .collect::<Result<Vec<_>>>()?;
        RelationSet::new(converted)
    }
}

/// Maps solutions between the old and the new variables.
///
/// Entries for variables outside the converted ring, unknown moduli in
/// particular, pass through unchanged.
pub trait SolutionConverter {
    /// Expresses a solution of the old problem in the new variables.
    fn convert_solution_to_new(&self, solution: &PartialSolution) -> PartialSolution;

    /// Expresses a solution of the new problem in the old variables.
    fn convert_solution_to_old(&self, solution: &PartialSolution) -> PartialSolution;

    /// Converts every solution of a set.
    fn convert_solutions_to_new(&self, solutions: &[PartialSolution]) -> PartialSolutionSet {
        solutions
            .iter()
            .map(|s| self.convert_solution_to_new(s))
            .collect()
    }

    /// Converts every solution of a set back.
    fn convert_solutions_to_old(&self, solutions: &[PartialSolution]) -> PartialSolutionSet {
        solutions
            .iter()
            .map(|s| self.convert_solution_to_old(s))
            .collect()
    }
}

/// A converted problem and the maps back to the original.
pub struct Conversion {
    /// The rewritten problem.
    pub problem: Problem,
    /// Relation maps between the two problems.
    pub relations: Box<dyn RelationConverter>,
    /// Solution maps between the two problems.
    pub solutions: Box<dyn SolutionConverter>,
}

/// Rewrites a problem into an equivalent one.
pub trait ProblemConverter {
    /// Converts `problem`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingBound`] when a needed bound is absent and
    /// propagates ring construction errors.
    fn run(&self, problem: &Problem) -> Result<Conversion>;
}

pub(crate) fn ensure_ring(f: &Polynomial<Integer>, ring: &Arc<PolyRing>) -> Result<()> {
    if f.ring() == ring {
        Ok(())
    } else {
        Err(Error::RingMismatch)
    }
}

/// Positional renaming between two rings with the same generator count.
#[derive(Clone, Debug)]
pub struct Rename {
    old: Arc<PolyRing>,
    new: Arc<PolyRing>,
}

impl Rename {
    /// Generator `i` of `old` becomes generator `i` of `new`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the generator counts differ.
    pub fn new(old: Arc<PolyRing>, new: Arc<PolyRing>) -> Result<Self> {
        if old.num_vars() != new.num_vars() {
            return Err(Error::invalid("renaming needs rings of equal size"));
        }
        Ok(Self { old, new })
    }

    fn rename(solution: &PartialSolution, from: &PolyRing, to: &PolyRing) -> PartialSolution {
        solution
            .iter()
            .map(|(v, x)| {
                let v = from
                    .index_of(v)
                    .map_or_else(|| v.clone(), |i| to.variables()[i].clone());
                (v, x.clone())
            })
            .collect()
    }
}

impl RelationConverter for Rename {
    fn convert_polynomial_to_new(&self, f: &Polynomial<Integer>) -> Result<Polynomial<Integer>> {
        ensure_ring(f, &self.old)?;
        Ok(f.reinterpret(self.new.clone()))
    }

    fn convert_polynomial_to_old(&self, f: &Polynomial<Integer>) -> Result<Polynomial<Integer>> {
        ensure_ring(f, &self.new)?;
        Ok(f.reinterpret(self.old.clone()))
    }
}

impl SolutionConverter for Rename {
    fn convert_solution_to_new(&self, solution: &PartialSolution) -> PartialSolution {
        Self::rename(solution, &self.old, &self.new)
    }

    fn convert_solution_to_old(&self, solution: &PartialSolution) -> PartialSolution {
        Self::rename(solution, &self.new, &self.old)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallroots_poly::{parse_polynomials, TermOrder, Variable};

    #[test]
    fn test_rename_round_trip() {
        let (old, polys) = parse_polynomials(&["x^2 + 3*y"]).unwrap();
        let new = PolyRing::from_names(&["a", "b"], TermOrder::Lex).unwrap();
        let rename = Rename::new(old, new.clone()).unwrap();
        let g = rename.convert_polynomial_to_new(&polys[0]).unwrap();
        assert_eq!(g.to_string(), "a^2 + 3*b");
        assert_eq!(rename.convert_polynomial_to_old(&g).unwrap(), polys[0]);
        assert!(matches!(
            rename.convert_polynomial_to_new(&g),
            Err(Error::RingMismatch)
        ));

        let sol: PartialSolution = [
            (Variable::new("x"), Integer::new(1)),
            (Variable::new("p"), Integer::new(7)),
        ]
        .into_iter()
        .collect();
        let renamed = rename.convert_solution_to_new(&sol);
        assert_eq!(renamed.to_string(), "{a: 1, p: 7}");
        assert_eq!(rename.convert_solution_to_old(&renamed), sol);
    }

    #[test]
    fn test_rename_sets() {
        let (old, polys) = parse_polynomials(&["x - 1", "y + 2"]).unwrap();
        let new = PolyRing::from_names(&["a", "b"], TermOrder::Lex).unwrap();
        let rename = Rename::new(old, new).unwrap();
        let relations = RelationSet::new(
            polys
                .into_iter()
                .map(|f| Relation::modular(f, Integer::new(11)))
                .collect(),
        )
        .unwrap();
        let moved = rename.convert_relations_to_new(&relations).unwrap();
        assert_eq!(moved[1].polynomial.to_string(), "b + 2");
        assert_eq!(rename.convert_relations_to_old(&moved).unwrap(), relations);

        let sol: PartialSolution = [(Variable::new("y"), Integer::new(-2))].into_iter().collect();
        let back = rename.convert_solutions_to_old(&rename.convert_solutions_to_new(&[sol.clone()]));
        assert_eq!(back, vec![sol]);
    }
}
