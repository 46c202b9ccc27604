//! Multivariate Coppersmith problems.

use std::fmt;

use smallroots_poly::Variable;
use tracing::warn;

use crate::bounds::BoundSet;
use crate::error::Result;
use crate::relation_set::RelationSet;
use crate::solution::Solution;

/// Relations together with bounds on the root being sought.
///
/// Problems are values: converters and solvers build new problems and
/// never modify one in place.
#[derive(Clone, Debug)]
pub struct Problem {
    /// Input relations.
    pub relations: RelationSet,
    /// Bounds on the desired solutions.
    pub bounds: BoundSet,
}

impl Problem {
    /// Creates a problem.
    #[must_use]
    pub fn new(relations: RelationSet, bounds: BoundSet) -> Self {
        Self { relations, bounds }
    }

    /// Generators of the relations' ring.
    #[must_use]
    pub fn variables(&self) -> &[Variable] {
        self.relations.variables()
    }

    /// Symbols appearing in the moduli.
    #[must_use]
    pub fn unknown_moduli(&self) -> &[Variable] {
        self.relations.unknown_moduli()
    }

    /// True if every solution assigns every unknown, lies inside the bounds
    /// and satisfies every relation.
    ///
    /// A solution missing a value is logged and makes the check fail.
    ///
    /// # Errors
    ///
    /// Propagates errors from evaluating the relations.
    pub fn check(&self, solutions: &[Solution]) -> Result<bool> {
        for soln in solutions {
            if let Some(v) = self.variables().iter().find(|v| !soln.contains(v)) {
                warn!(target: "smallroots::Problem", "value of {v} missing from solution {soln}");
                return Ok(false);
            }
            if let Some(p) = self.unknown_moduli().iter().find(|p| !soln.contains(p)) {
                warn!(target: "smallroots::Problem", "value of modulus {p} missing from {soln}");
                return Ok(false);
            }
        }
        for soln in solutions {
            if !self.bounds.check(soln) || !self.relations.check(soln)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let vars = self.variables();
        write!(f, "Multivariate Coppersmith problem in ")?;
        if let [v] = vars {
            write!(f, "1 variable {v}")?;
        } else {
            let names: Vec<&str> = vars.iter().map(Variable::name).collect();
            write!(f, "{} variables [{}]", vars.len(), names.join(", "))?;
        }
        match self.relations.len() {
            1 => write!(f, " with 1 relation"),
            n => write!(f, " with {n} relations"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::Bound;
    use crate::relation::Relation;
    use crate::solution::PartialSolution;
    use smallroots_integers::Integer;
    use smallroots_poly::parse_polynomials;

    fn problem() -> Problem {
        let (_, polys) = parse_polynomials(&["x + y - 10", "x - y - 2"]).unwrap();
        let relations = RelationSet::new(
            polys
                .into_iter()
                .map(|f| Relation::modular(f, Integer::new(97)))
                .collect(),
        )
        .unwrap();
        let bounds = ["x", "y"]
            .into_iter()
            .map(|v| (Variable::new(v), Bound::symmetric(&Integer::new(50))))
            .collect();
        Problem::new(relations, bounds)
    }

    fn solution(x: i64, y: i64) -> PartialSolution {
        [
            (Variable::new("x"), Integer::new(x)),
            (Variable::new("y"), Integer::new(y)),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_check() {
        let p = problem();
        assert!(p.check(&[solution(6, 4)]).unwrap());
        // congruent but outside the bounds
        assert!(!p.check(&[solution(6 + 97, 4)]).unwrap());
        assert!(!p.check(&[solution(5, 4)]).unwrap());
        let partial: PartialSolution = [(Variable::new("x"), Integer::new(6))].into_iter().collect();
        assert!(!p.check(&[partial]).unwrap());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            problem().to_string(),
            "Multivariate Coppersmith problem in 2 variables [x, y] with 2 relations"
        );
    }
}
