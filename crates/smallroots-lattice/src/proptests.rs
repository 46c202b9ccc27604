//! Property-based tests for reduction and enumeration.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use smallroots_integers::{Integer, Rational};

    use crate::enumeration::{enumerate, Control, EnumerationConfig};
    use crate::gso::GramSchmidt;
    use crate::lll::{lll_reduce, norm_squared, LllConfig};
    use crate::matrix::DenseMatrix;

    // unimodular-ish random bases: diagonal dominant so rows stay independent
    fn basis(n: usize) -> impl Strategy<Value = DenseMatrix<Integer>> {
        proptest::collection::vec(-50i64..50, n * n).prop_map(move |entries| {
            let rows = (0..n)
                .map(|i| {
                    (0..n)
                        .map(|j| {
                            let v = entries[i * n + j];
                            Integer::new(if i == j { 1000 + v.abs() } else { v * 37 })
                        })
                        .collect()
                })
                .collect();
            DenseMatrix::from_rows(rows)
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn lll_preserves_the_lattice(b in basis(4)) {
            let reduced = lll_reduce(&b, &LllConfig::default()).unwrap().basis;
            prop_assert_eq!(reduced.hermite_form(), b.hermite_form());
        }

        #[test]
        fn lll_first_vector_is_not_longer(b in basis(4)) {
            let reduced = lll_reduce(&b, &LllConfig::default()).unwrap().basis;
            let shortest_input = b.rows().map(norm_squared).min().unwrap();
            // Lovász with δ = 0.99 bounds ‖b_0‖² by (1/(δ - 1/4))^(n-1) λ_1²
            prop_assert!(norm_squared(reduced.row(0)) <= shortest_input * Integer::new(3));
        }

        #[test]
        fn lll_is_size_reduced(b in basis(3), num in 30i64..99) {
            let config = LllConfig { delta: Rational::from_i64(num, 100) };
            let reduced = lll_reduce(&b, &config).unwrap().basis;
            let gso = GramSchmidt::new(&reduced);
            for i in 0..gso.len() {
                for j in 0..i {
                    prop_assert!(gso.mu(i, j).abs() <= 0.5 + 1e-9);
                }
            }
        }

        #[test]
        fn enumeration_matches_brute_force(
            rows in proptest::collection::vec(proptest::collection::vec(-4i64..5, 2), 2),
            radius in 1i64..40,
        ) {
            let b = DenseMatrix::from_rows(
                rows.iter().map(|r| r.iter().map(|&v| Integer::new(v)).collect()).collect(),
            );
            prop_assume!(lll_reduce(&b, &LllConfig::default()).is_ok());
            let gso = GramSchmidt::new(&b);
            let mut found = Vec::new();
            enumerate(&gso, &[0.0, 0.0], gso.normalize_squared(&Integer::new(radius)), &EnumerationConfig::default(), |x| {
                found.push(x.to_vec());
                Control::Continue
            });
            found.sort();
            let mut expected = Vec::new();
            for x0 in -60i64..=60 {
                for x1 in -60i64..=60 {
                    let v = b.combine_rows(&[Integer::new(x0), Integer::new(x1)]);
                    if norm_squared(&v) <= Integer::new(radius) {
                        expected.push(vec![x0, x1]);
                    }
                }
            }
            expected.sort();
            prop_assert_eq!(found, expected);
        }
    }
}
