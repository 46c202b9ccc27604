//! Property-based tests for converters, combinations and ideals.

#[cfg(test)]
mod tests {
    use num_traits::{One, Zero};
    use proptest::prelude::*;
    use smallroots_integers::Integer;
    use smallroots_model::{Bound, BoundSet, PartialSolution, Problem, Relation, RelationSet};
    use smallroots_poly::{parse_polynomials, Variable};

    use crate::combinations::WeightedCombinations;
    use crate::converter::{ProblemConverter, Recenter};
    use crate::ideal::{coprime_factors, RelationIdealGenerator};

    fn assign(x: i64) -> PartialSolution {
        [(Variable::new("x"), Integer::new(x))].into_iter().collect()
    }

    fn problem(expr: &str, modulus: i64, lo: i64, hi: i64) -> Problem {
        let (_, polys) = parse_polynomials(&[expr]).unwrap();
        let relations =
            RelationSet::new(vec![Relation::modular(polys[0].clone(), Integer::new(modulus))])
                .unwrap();
        let bounds: BoundSet = [(Variable::new("x"), Bound::new(Integer::new(lo), Integer::new(hi)))]
            .into_iter()
            .collect();
        Problem::new(relations, bounds)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn recenter_preserves_roots(lo in -1000i64..1000, width in 2i64..500, offset in 1i64..500) {
            let hi = lo + width;
            let x = lo + 1 + offset % (width - 1);
            let p = problem(&format!("(x - ({x})) * (x + 3)"), 1_000_003, lo, hi);
            let conv = Recenter.run(&p).unwrap();
            let moved = conv.solutions.convert_solution_to_new(&assign(x));
            prop_assert_eq!(conv.solutions.convert_solution_to_old(&moved), assign(x));
            // the root stays a root and stays inside the new bounds
            prop_assert!(conv.problem.relations.check(&moved).unwrap());
            prop_assert!(conv.problem.bounds.check(&moved));
        }

        #[test]
        fn combinations_are_sorted(weights in prop::collection::vec(0.0f64..8.0, 1..4)) {
            let scores: Vec<f64> = WeightedCombinations::new(&weights)
                .take(40)
                .map(|(_, w)| w)
                .collect();
            prop_assert!(scores.windows(2).all(|w| w[0] <= w[1] + 1e-9));
        }

        #[test]
        fn coprime_factors_cover_inputs(values in prop::collection::vec(1i64..5000, 1..5)) {
            let ints: Vec<Integer> = values.iter().map(|&v| Integer::new(v)).collect();
            let factors = coprime_factors(&ints);
            for (i, a) in factors.iter().enumerate() {
                prop_assert!(*a > Integer::one());
                for b in &factors[i + 1..] {
                    prop_assert!(a.gcd(b).is_one());
                }
            }
            // every input splits completely over the factors
            for v in ints {
                let mut rest = v;
                for f in &factors {
                    while rest.is_divisible_by(f) && !rest.is_zero() {
                        rest = rest.div_exact(f).unwrap();
                    }
                }
                prop_assert!(rest.is_one());
            }
        }

        #[test]
        fn ideal_moduli_grow(a in 1i64..100, b in 1i64..100) {
            let p = problem(&format!("x^2 + {a}*x + {b}"), 101 * 103, -20, 20);
            let mut generator = RelationIdealGenerator::new(&p.relations, &p.bounds).unwrap();
            let mut previous = Integer::zero();
            for _ in 0..6 {
                let (ideal, _) = generator.next().unwrap().unwrap();
                let modulus = ideal.modulus.as_ref().and_then(|m| m.as_integer().cloned()).unwrap();
                prop_assert!(modulus >= previous);
                previous = modulus;
            }
        }
    }
}
