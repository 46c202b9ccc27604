//! Property-based tests for bounds and relation ideals.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use smallroots_integers::Integer;
    use smallroots_poly::{parse_polynomials, Variable};

    use crate::bounds::{Bound, BoundSet};
    use crate::modulus::Modulus;
    use crate::relation::Relation;
    use crate::relation_ideal::RelationIdeal;
    use crate::solution::PartialSolution;

    fn assign(x: i64) -> PartialSolution {
        [(Variable::new("x"), Integer::new(x))].into_iter().collect()
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn bounds_are_exclusive(lo in -1000i64..1000, width in 2i64..1000) {
            let hi = lo + width;
            let bounds: BoundSet =
                [(Variable::new("x"), Bound::new(Integer::new(lo), Integer::new(hi)))]
                    .into_iter()
                    .collect();
            prop_assert!(!bounds.check(&assign(lo)));
            prop_assert!(!bounds.check(&assign(hi)));
            prop_assert!(bounds.check(&assign(lo + 1)));
            prop_assert!(bounds.check(&assign(hi - 1)));
        }

        #[test]
        fn satisfied_relations_check(root in -500i64..500, c in -20i64..20, n in 2i64..500) {
            // (x - root) * (x + c) vanishes at the root modulo anything
            let (_, polys) = parse_polynomials(&[format!("(x - ({root})) * (x + ({c}))")]).unwrap();
            let rel = Relation::modular(polys[0].clone(), Integer::new(n));
            prop_assert!(rel.check(&assign(root)).unwrap());
            prop_assert!(Relation::integer(polys[0].clone()).check(&assign(root)).unwrap());
        }

        #[test]
        fn ideal_moduli_sum_and_product(a in 1i64..5000, b in 1i64..5000) {
            let (ring, polys) = parse_polynomials(&["x - 1"]).unwrap();
            let ideal = |m: Option<i64>| {
                RelationIdeal::new(polys.clone(), ring.clone(), m.map(|m| Modulus::known(Integer::new(m))))
                    .unwrap()
            };
            let (ja, jb, jn) = (ideal(Some(a)), ideal(Some(b)), ideal(None));
            let lcm = Modulus::known(Integer::new(a).lcm(&Integer::new(b)));
            let product = Modulus::known(Integer::new(a) * Integer::new(b));
            prop_assert_eq!((&ja + &jb).modulus, Some(lcm.clone()));
            prop_assert_eq!((&jb + &ja).modulus, Some(lcm));
            prop_assert_eq!((&ja * &jb).modulus, Some(product.clone()));
            prop_assert_eq!((&jb * &ja).modulus, Some(product));
            prop_assert_eq!((&ja + &jn).modulus, ja.modulus.clone());
            prop_assert_eq!((&jn * &ja).modulus, ja.modulus.clone());
        }
    }
}
