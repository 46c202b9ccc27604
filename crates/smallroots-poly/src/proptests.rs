//! Property-based tests for polynomial arithmetic.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use proptest::prelude::*;
    use smallroots_integers::Integer;

    use crate::monomial::Monomial;
    use crate::ordering::TermOrder;
    use crate::polynomial::Polynomial;
    use crate::ring::PolyRing;
    use crate::univariate::{evaluate, integer_roots};

    fn ring() -> Arc<PolyRing> {
        PolyRing::from_names(&["x", "y"], TermOrder::Grevlex).unwrap()
    }

    // Strategy for generating small polynomials in two variables
    fn small_poly() -> impl Strategy<Value = Polynomial<Integer>> {
        proptest::collection::vec((0u32..4, 0u32..4, -50i64..50), 0..6).prop_map(|terms| {
            Polynomial::from_terms(
                ring(),
                terms
                    .into_iter()
                    .map(|(a, b, c)| (Monomial::from_exponents(&[a, b]), Integer::new(c)))
                    .collect(),
            )
        })
    }

    fn point() -> impl Strategy<Value = Vec<Integer>> {
        proptest::collection::vec((-20i64..20).prop_map(Integer::new), 2)
    }

    proptest! {
        // Polynomial ring axioms

        #[test]
        fn add_commutative(a in small_poly(), b in small_poly()) {
            prop_assert_eq!(&a + &b, &b + &a);
        }

        #[test]
        fn mul_commutative(a in small_poly(), b in small_poly()) {
            prop_assert_eq!(&a * &b, &b * &a);
        }

        #[test]
        fn distributive(a in small_poly(), b in small_poly(), c in small_poly()) {
            prop_assert_eq!(&a * &(&b + &c), &(&a * &b) + &(&a * &c));
        }

        #[test]
        fn sub_self_is_zero(a in small_poly()) {
            prop_assert!((&a - &a).is_zero());
        }

        // Evaluation is a ring homomorphism

        #[test]
        fn evaluation_respects_mul(a in small_poly(), b in small_poly(), p in point()) {
            prop_assert_eq!((&a * &b).evaluate(&p), a.evaluate(&p) * b.evaluate(&p));
        }

        #[test]
        fn change_of_order_preserves_value(a in small_poly(), p in point()) {
            let b = a.with_order(TermOrder::Lex);
            prop_assert_eq!(b.evaluate(&p), a.evaluate(&p));
        }

        #[test]
        fn reduce_mod_is_congruent(a in small_poly(), p in point(), n in 2i64..1000) {
            let n = Integer::new(n);
            let diff = a.evaluate(&p) - a.reduce_mod(&n).evaluate(&p);
            prop_assert!(diff.is_divisible_by(&n));
        }

        // Root finding

        #[test]
        fn finds_planted_roots(
            roots in proptest::collection::vec(-1000i64..1000, 1..4),
            lead in 1i64..5,
        ) {
            let mut f = vec![Integer::new(lead)];
            for r in &roots {
                // multiply by (x - r)
                let mut next = vec![Integer::new(0); f.len() + 1];
                for (i, c) in f.iter().enumerate() {
                    next[i + 1] = &next[i + 1] + c;
                    next[i] = &next[i] - &(c * &Integer::new(*r));
                }
                f = next;
            }
            let found = integer_roots(&f);
            for r in &roots {
                prop_assert!(found.contains(&Integer::new(*r)));
            }
            for r in &found {
                prop_assert_eq!(evaluate(&f, r), Integer::new(0));
            }
        }
    }
}
