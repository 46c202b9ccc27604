//! Property-based tests for the division and gcd helpers.

#[cfg(test)]
mod tests {
    use num_traits::{One, Zero};
    use proptest::prelude::*;

    use crate::{Integer, Rational};

    fn small_int() -> impl Strategy<Value = i64> {
        -100_000i64..100_000i64
    }

    fn non_zero_int() -> impl Strategy<Value = i64> {
        prop_oneof![(-1000i64..=-1i64), (1i64..=1000i64)]
    }

    proptest! {
        #[test]
        fn floor_division_identity(a in small_int(), b in non_zero_int()) {
            let (a, b) = (Integer::new(a), Integer::new(b));
            let q = a.div_floor(&b);
            let r = &a - &(&q * &b);
            prop_assert_eq!(&q * &b + r.clone(), a);
            // remainder has the sign of the divisor
            prop_assert!(r.is_zero() || r.is_negative() == b.is_negative());
            prop_assert!(r.abs() < b.abs());
        }

        #[test]
        fn symmetric_remainder_range(a in small_int(), b in non_zero_int()) {
            let (a, b) = (Integer::new(a), Integer::new(b));
            let r = a.sym_rem(&b);
            let twice = &r + &r;
            prop_assert!(twice > -b.abs());
            prop_assert!(twice <= b.abs());
            prop_assert!((&a - &r).is_divisible_by(&b));
        }

        #[test]
        fn modulo_is_non_negative(a in small_int(), b in non_zero_int()) {
            let (a, b) = (Integer::new(a), Integer::new(b));
            let r = a.modulo(&b);
            prop_assert!(!r.is_negative());
            prop_assert!(r < b.abs());
        }

        #[test]
        fn bezout_identity(a in small_int(), b in small_int()) {
            let (a, b) = (Integer::new(a), Integer::new(b));
            let (g, u, v) = a.extended_gcd(&b);
            prop_assert_eq!(&a * &u + &b * &v, g.clone());
            prop_assert_eq!(g, a.gcd(&b));
        }

        #[test]
        fn gcd_times_lcm(a in non_zero_int(), b in non_zero_int()) {
            let (a, b) = (Integer::new(a), Integer::new(b));
            prop_assert_eq!(a.gcd(&b) * a.lcm(&b), (&a * &b).abs());
        }

        #[test]
        fn isqrt_brackets(n in 0i64..10_000_000i64) {
            let n = Integer::new(n);
            let s = n.isqrt().unwrap();
            prop_assert!(&s * &s <= n);
            let t = &s + &Integer::one();
            prop_assert!(&t * &t > n);
        }

        #[test]
        fn hex_round_trip(a in any::<i64>()) {
            let a = Integer::new(a);
            prop_assert_eq!(Integer::parse_token(&a.to_hex_string()).unwrap(), a);
        }

        #[test]
        fn rational_floor_bounds(a in small_int(), b in non_zero_int()) {
            let r = Rational::from_i64(a, b);
            let f = Rational::from_integer(r.floor());
            prop_assert!(f <= r);
            prop_assert!(r < f + Rational::one());
        }
    }
}
