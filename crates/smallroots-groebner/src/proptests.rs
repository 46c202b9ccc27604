//! Property-based tests for the integer Gröbner basis.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use proptest::prelude::*;
    use smallroots_integers::Integer;
    use smallroots_poly::{Monomial, PolyRing, Polynomial, TermOrder};

    use crate::ideal::Ideal;
    use crate::integer::{groebner_basis, reduce};

    fn ring() -> Arc<PolyRing> {
        PolyRing::from_names(&["x", "y"], TermOrder::Grevlex).unwrap()
    }

    // small polynomials of degree at most 2
    fn small_poly() -> impl Strategy<Value = Polynomial<Integer>> {
        proptest::collection::vec((0u32..3, 0u32..2, -12i64..12), 1..4).prop_map(|terms| {
            Polynomial::from_terms(
                ring(),
                terms
                    .into_iter()
                    .map(|(a, b, c)| (Monomial::from_exponents(&[a, b]), Integer::new(c)))
                    .collect(),
            )
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        #[test]
        fn generators_reduce_to_zero(
            gens in proptest::collection::vec(small_poly(), 1..3),
            modulus in 2i64..30,
        ) {
            let mut gens = gens;
            gens.push(Polynomial::constant(ring(), Integer::new(modulus)));
            let gb = groebner_basis(&gens);
            for g in &gens {
                prop_assert!(reduce(g, &gb).is_zero());
            }
            for g in &gb {
                prop_assert!(g.leading_coeff().unwrap().is_positive());
            }
        }

        #[test]
        fn normal_form_is_congruent(
            gens in proptest::collection::vec(small_poly(), 1..3),
            f in small_poly(),
            modulus in 2i64..30,
        ) {
            let mut gens = gens;
            gens.push(Polynomial::constant(ring(), Integer::new(modulus)));
            let ideal = Ideal::new(ring(), gens);
            let r = ideal.reduce(&f);
            prop_assert!(ideal.contains(&(&f - &r)));
            // normal forms are fixed points
            prop_assert_eq!(ideal.reduce(&r), r);
        }
    }
}
