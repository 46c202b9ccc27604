//! Shifting unknowns so that their bounds are symmetric about zero.

use std::sync::Arc;

use num_traits::Zero;
use smallroots_integers::Integer;
use smallroots_model::{Bound, BoundSet, PartialSolution, Problem, Result};
use smallroots_poly::{PolyRing, Polynomial, TermOrder, Variable};
use tracing::{debug, info};

use super::{ensure_ring, Conversion, ProblemConverter, RelationConverter, SolutionConverter};

/// Replaces `x` by `x_c = x - center` with `center = ⌊(lower + upper) / 2⌋`.
///
/// Unknowns already centered at zero keep their name.
#[derive(Clone, Copy, Debug, Default)]
pub struct Recenter;

/// The substitution `x = x_c + center`, both ways.
#[derive(Clone, Debug)]
struct Shift {
    old: Arc<PolyRing>,
    new: Arc<PolyRing>,
    centers: Vec<Integer>,
}

impl Shift {
    // images of the generators of `from` under `x_i -> y_i + sign * c_i`
    fn images(
        from: &PolyRing,
        to: &Arc<PolyRing>,
        centers: &[Integer],
        negate: bool,
    ) -> Vec<Polynomial<Integer>> {
        (0..from.num_vars())
            .map(|i| {
                let c = if negate { -&centers[i] } else { centers[i].clone() };
                Polynomial::var(to.clone(), i) + Polynomial::constant(to.clone(), c)
            })
            .collect()
    }
}

impl RelationConverter for Shift {
    fn convert_polynomial_to_new(&self, f: &Polynomial<Integer>) -> Result<Polynomial<Integer>> {
        ensure_ring(f, &self.old)?;
        let images = Self::images(&self.old, &self.new, &self.centers, false);
        Ok(f.substitute(&self.new, &images))
    }

    fn convert_polynomial_to_old(&self, f: &Polynomial<Integer>) -> Result<Polynomial<Integer>> {
        ensure_ring(f, &self.new)?;
        let images = Self::images(&self.new, &self.old, &self.centers, true);
        Ok(f.substitute(&self.old, &images))
    }
}

impl SolutionConverter for Shift {
    fn convert_solution_to_new(&self, solution: &PartialSolution) -> PartialSolution {
        solution
            .iter()
            .map(|(v, x)| match self.old.index_of(v) {
                Some(i) => (self.new.variables()[i].clone(), x - &self.centers[i]),
                None => (v.clone(), x.clone()),
            })
            .collect()
    }

    fn convert_solution_to_old(&self, solution: &PartialSolution) -> PartialSolution {
        solution
            .iter()
            .map(|(v, x)| match self.new.index_of(v) {
                Some(i) => (self.old.variables()[i].clone(), x + &self.centers[i]),
                None => (v.clone(), x.clone()),
            })
            .collect()
    }
}

fn shift_bound(bound: &Bound, center: &Integer) -> Bound {
    Bound {
        lower: bound.lower.as_ref().map(|lo| lo - center),
        upper: bound.upper.as_ref().map(|hi| hi - center),
    }
}

impl ProblemConverter for Recenter {
    fn run(&self, problem: &Problem) -> Result<Conversion> {
        let ring = problem.relations.ring().clone();
        let bounds = &problem.bounds;

        let mut centers = Vec::with_capacity(ring.num_vars());
        let mut names = Vec::with_capacity(ring.num_vars());
        for v in ring.variables() {
            let lo = bounds.lower_bound(v)?;
            let hi = bounds.upper_bound(v)?;
            let center = (lo + hi).div_floor(&Integer::new(2));
            names.push(if center.is_zero() {
                v.clone()
            } else {
                Variable::new(format!("{}_c", v.name()))
            });
            centers.push(center);
        }
        let new_ring = PolyRing::new(names, TermOrder::default())?;

        let mut new_bounds = BoundSet::new();
        for (v, b) in bounds.iter() {
            match ring.index_of(v) {
                Some(i) => {
                    let shifted = shift_bound(b, &centers[i]);
                    let new_v = new_ring.variables()[i].clone();
                    if !centers[i].is_zero() {
                        info!(
                            target: "smallroots::Recenter",
                            "recentering {v} from {:?} to {:?}", b, shifted
                        );
                        debug!(target: "smallroots::Recenter", "{new_v} = {v} - {}", centers[i]);
                    }
                    new_bounds.insert(new_v, shifted);
                }
                None => {
                    new_bounds.insert(v.clone(), b.clone());
                }
            }
        }

        let shift = Shift {
            old: ring,
            new: new_ring,
            centers,
        };
        let relations = shift.convert_relations_to_new(&problem.relations)?;
        Ok(Conversion {
            problem: Problem::new(relations, new_bounds),
            relations: Box::new(shift.clone()),
            solutions: Box::new(shift),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallroots_model::{Relation, RelationSet};
    use smallroots_poly::parse_polynomials;

    fn problem() -> Problem {
        let (_, polys) = parse_polynomials(&["x*y - 6", "x + y - 5"]).unwrap();
        let relations = RelationSet::new(
            polys.into_iter().map(|f| Relation::modular(f, Integer::new(101))).collect(),
        )
        .unwrap();
        let bounds = [
            (Variable::new("x"), Bound::new(Integer::new(0), Integer::new(10))),
            (Variable::new("y"), Bound::new(Integer::new(-4), Integer::new(4))),
            (Variable::new("p"), Bound::new(Integer::new(1), Integer::new(9))),
        ]
        .into_iter()
        .collect();
        Problem::new(relations, bounds)
    }

    #[test]
    fn test_recenter_problem() {
        let conv = Recenter.run(&problem()).unwrap();
        let names: Vec<&str> = conv.problem.variables().iter().map(Variable::name).collect();
        assert_eq!(names, vec!["x_c", "y"]);
        assert_eq!(conv.problem.relations[1].polynomial.to_string(), "x_c + y");
        let b = conv.problem.bounds.get(&Variable::new("x_c")).unwrap();
        assert_eq!(b, &Bound::new(Integer::new(-5), Integer::new(5)));
        // bounds of unknown moduli are carried along
        assert!(conv.problem.bounds.contains(&Variable::new("p")));
    }

    #[test]
    fn test_solution_and_relation_round_trip() {
        let p = problem();
        let conv = Recenter.run(&p).unwrap();
        let sol: PartialSolution = [
            (Variable::new("x"), Integer::new(3)),
            (Variable::new("y"), Integer::new(2)),
        ]
        .into_iter()
        .collect();
        let new = conv.solutions.convert_solution_to_new(&sol);
        assert_eq!(new.get(&Variable::new("x_c")), Some(&Integer::new(-2)));
        assert!(conv.problem.relations.check(&new).unwrap());
        assert_eq!(conv.solutions.convert_solution_to_old(&new), sol);

        let back = conv.relations.convert_relations_to_old(&conv.problem.relations).unwrap();
        assert_eq!(back, p.relations);
    }
}
