//! Arbitrary precision integers.
//!
//! This module provides a wrapper around `dashu::IBig` with the
//! number-theoretic helpers used throughout the solver: floor and
//! symmetric division, extended gcd, modular inverses, integer square
//! roots and the `0x`-prefixed text form spoken by external reducers.

use dashu::base::{BitTest, Gcd, Signed as DashuSigned, UnsignedAbs};
use dashu::integer::{IBig, UBig};
use num_traits::{One, Zero};
use std::fmt;
use std::iter::{Product, Sum};
use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Rem, Sub, SubAssign};
use std::str::FromStr;

/// Error returned when a string cannot be parsed as an [`Integer`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseIntegerError {
    token: String,
}

impl fmt::Display for ParseIntegerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid integer literal `{}`", self.token)
    }
}

impl std::error::Error for ParseIntegerError {}

/// An arbitrary precision integer.
///
/// This type wraps `dashu::IBig`. Ordering, hashing and equality are
/// those of the underlying value.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Integer(IBig);

impl Integer {
    /// Creates a new integer from an i64.
    #[must_use]
    pub fn new(value: i64) -> Self {
        Self(IBig::from(value))
    }

    /// Returns `2^bits`.
    #[must_use]
    pub fn pow2(bits: usize) -> Self {
        Self(IBig::ONE << bits)
    }

    /// Creates an integer from a string of digits in the given base.
    ///
    /// A single leading `-` or `+` is accepted.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid integer.
    pub fn from_str_radix(s: &str, radix: u32) -> Result<Self, ParseIntegerError> {
        let err = || ParseIntegerError {
            token: s.to_string(),
        };
        let (negative, digits) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };
        if digits.is_empty() {
            return Err(err());
        }
        let magnitude = IBig::from_str_radix(digits, radix).map_err(|_| err())?;
        Ok(Self(if negative { -magnitude } else { magnitude }))
    }

    /// Parses a decimal or `0x`-prefixed hexadecimal token.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is not a valid integer.
    pub fn parse_token(token: &str) -> Result<Self, ParseIntegerError> {
        let (sign, rest) = match token.as_bytes().first() {
            Some(b'-') => ("-", &token[1..]),
            Some(b'+') => ("", &token[1..]),
            _ => ("", token),
        };
        if let Some(hex) = rest
            .strip_prefix("0x")
            .or_else(|| rest.strip_prefix("0X"))
        {
            Self::from_str_radix(&format!("{sign}{hex}"), 16).map_err(|_| ParseIntegerError {
                token: token.to_string(),
            })
        } else {
            Self::from_str_radix(token, 10)
        }
    }

    /// Formats the integer as `0x..` (or `-0x..`) hexadecimal.
    #[must_use]
    pub fn to_hex_string(&self) -> String {
        let magnitude = self.magnitude();
        if self.is_negative() {
            format!("-0x{magnitude:x}")
        } else {
            format!("0x{magnitude:x}")
        }
    }

    /// Returns the absolute value.
    #[must_use]
    pub fn abs(&self) -> Self {
        Self(IBig::from(self.magnitude()))
    }

    fn magnitude(&self) -> UBig {
        self.0.clone().unsigned_abs()
    }

    /// Returns the sign: -1, 0, or 1.
    #[must_use]
    pub fn signum(&self) -> i8 {
        if self.0.is_zero() {
            0
        } else if DashuSigned::is_positive(&self.0) {
            1
        } else {
            -1
        }
    }

    /// Returns true if this integer is negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        DashuSigned::is_negative(&self.0)
    }

    /// Returns true if this integer is strictly positive.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.signum() > 0
    }

    /// Returns the number of bits of the absolute value (0 for zero).
    #[must_use]
    pub fn bit_len(&self) -> usize {
        self.magnitude().bit_len()
    }

    /// Computes the non-negative greatest common divisor.
    #[must_use]
    pub fn gcd(&self, other: &Self) -> Self {
        Self(IBig::from(self.0.clone().gcd(other.0.clone())))
    }

    /// Computes the non-negative least common multiple.
    #[must_use]
    pub fn lcm(&self, other: &Self) -> Self {
        if self.is_zero() || other.is_zero() {
            return Self::zero();
        }
        let g = self.gcd(other);
        Self(&self.0 / &g.0 * &other.0).abs()
    }

    /// Extended Euclidean algorithm.
    ///
    /// Returns `(g, u, v)` with `g = gcd(self, other) >= 0` and
    /// `g = self*u + other*v`.
    #[must_use]
    pub fn extended_gcd(&self, other: &Self) -> (Self, Self, Self) {
        let (mut old_r, mut r) = (self.clone(), other.clone());
        let (mut old_s, mut s) = (Self::one(), Self::zero());
        let (mut old_t, mut t) = (Self::zero(), Self::one());
        while !r.is_zero() {
            let q = old_r.div_floor(&r);
            (old_r, r) = (r.clone(), old_r - &q * &r);
            (old_s, s) = (s.clone(), old_s - &q * &s);
            (old_t, t) = (t.clone(), old_t - &q * &t);
        }
        if old_r.is_negative() {
            (-old_r, -old_s, -old_t)
        } else {
            (old_r, old_s, old_t)
        }
    }

    /// Computes the inverse of `self` modulo `modulus`, in `[0, |modulus|)`.
    ///
    /// Returns `None` when `gcd(self, modulus) != 1`.
    #[must_use]
    pub fn mod_inverse(&self, modulus: &Self) -> Option<Self> {
        let (g, u, _) = self.extended_gcd(modulus);
        if g.is_one() {
            Some(u.modulo(modulus))
        } else {
            None
        }
    }

    /// Floor division, rounding the quotient towards negative infinity.
    ///
    /// # Panics
    ///
    /// Panics if `other` is zero.
    #[must_use]
    pub fn div_floor(&self, other: &Self) -> Self {
        let q = Self(&self.0 / &other.0);
        let r = self - &(&q * other);
        if !r.is_zero() && r.is_negative() != other.is_negative() {
            q - Self::one()
        } else {
            q
        }
    }

    /// Ceiling division.
    ///
    /// # Panics
    ///
    /// Panics if `other` is zero.
    #[must_use]
    pub fn div_ceil(&self, other: &Self) -> Self {
        -(-self).div_floor(other)
    }

    /// Remainder in `[0, |m|)`.
    ///
    /// # Panics
    ///
    /// Panics if `m` is zero.
    #[must_use]
    pub fn modulo(&self, m: &Self) -> Self {
        let m = m.abs();
        self - &(&self.div_floor(&m) * &m)
    }

    /// Rounded division: the quotient `q` for which `self - q*other`
    /// lies in `(-|other|/2, |other|/2]`.
    ///
    /// # Panics
    ///
    /// Panics if `other` is zero.
    #[must_use]
    pub fn div_round(&self, other: &Self) -> Self {
        let b = other.abs();
        let two_b = &b + &b;
        let numer = &b - &(self + self);
        let q = -numer.div_floor(&two_b);
        if other.is_negative() {
            -q
        } else {
            q
        }
    }

    /// Symmetric remainder in `(-|other|/2, |other|/2]`.
    ///
    /// # Panics
    ///
    /// Panics if `other` is zero.
    #[must_use]
    pub fn sym_rem(&self, other: &Self) -> Self {
        self - &(&self.div_round(other) * other)
    }

    /// Returns `self / other` when the division is exact.
    #[must_use]
    pub fn div_exact(&self, other: &Self) -> Option<Self> {
        if other.is_zero() {
            return None;
        }
        let q = Self(&self.0 / &other.0);
        if &(&q * other) == self {
            Some(q)
        } else {
            None
        }
    }

    /// Returns true if `other` divides `self`. Zero divides only zero.
    #[must_use]
    pub fn is_divisible_by(&self, other: &Self) -> bool {
        if other.is_zero() {
            return self.is_zero();
        }
        (&self.0 % &other.0).is_zero()
    }

    /// Computes self^exp for non-negative exp.
    #[must_use]
    pub fn pow(&self, exp: u32) -> Self {
        Self(self.0.pow(exp as usize))
    }

    /// Integer square root `floor(sqrt(self))`; `None` for negative input.
    #[must_use]
    pub fn isqrt(&self) -> Option<Self> {
        if self.is_negative() {
            return None;
        }
        if self < &Self::new(2) {
            return Some(self.clone());
        }
        let mut x = Self::pow2(self.bit_len().div_ceil(2));
        loop {
            let y = (&x + &(self.clone() / &x)).div_floor(&Self::new(2));
            if y >= x {
                return Some(x);
            }
            x = y;
        }
    }

    /// Approximate `log2(|self|)`; negative infinity for zero.
    #[must_use]
    pub fn log2(&self) -> f64 {
        if self.is_zero() {
            return f64::NEG_INFINITY;
        }
        let bits = self.bit_len();
        if bits <= 64 {
            return (top_bits(&self.magnitude(), 0) as f64).log2();
        }
        let shift = bits - 64;
        (top_bits(&self.magnitude(), shift) as f64).log2() + shift as f64
    }

    /// Approximates `self / 2^shift` as an `f64`.
    #[must_use]
    #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
    pub fn to_f64_scaled(&self, shift: usize) -> f64 {
        let bits = self.bit_len();
        let drop = bits.saturating_sub(64);
        let mantissa = top_bits(&self.magnitude(), drop) as f64;
        let exponent = drop as i64 - shift as i64;
        let value = mantissa * 2f64.powi(exponent.clamp(-2000, 2000) as i32);
        if self.is_negative() {
            -value
        } else {
            value
        }
    }

    /// Returns the inner `dashu::IBig`.
    #[must_use]
    pub fn into_inner(self) -> IBig {
        self.0
    }

    /// Returns a reference to the inner `dashu::IBig`.
    #[must_use]
    pub fn as_inner(&self) -> &IBig {
        &self.0
    }

    /// Attempts to convert to an i64.
    #[must_use]
    pub fn to_i64(&self) -> Option<i64> {
        self.0.clone().try_into().ok()
    }

    /// Attempts to convert to a usize.
    #[must_use]
    pub fn to_usize(&self) -> Option<usize> {
        self.0.clone().try_into().ok()
    }
}

#[allow(clippy::cast_possible_truncation)]
fn top_bits(magnitude: &UBig, shift: usize) -> u64 {
    u64::try_from(magnitude.clone() >> shift).unwrap_or(u64::MAX)
}

impl Zero for Integer {
    fn zero() -> Self {
        Self(IBig::ZERO)
    }

    fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl One for Integer {
    fn one() -> Self {
        Self(IBig::ONE)
    }

    fn is_one(&self) -> bool {
        self.0 == IBig::ONE
    }
}

impl fmt::Debug for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Integer({})", self.0)
    }
}

impl fmt::Display for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Integer {
    type Err = ParseIntegerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_token(s.trim())
    }
}

macro_rules! forward_binop {
    ($trait:ident, $method:ident, $op:tt) => {
        impl $trait for Integer {
            type Output = Self;

            fn $method(self, rhs: Self) -> Self::Output {
                Self(self.0 $op rhs.0)
            }
        }

        impl $trait<&Integer> for Integer {
            type Output = Self;

            fn $method(self, rhs: &Integer) -> Self::Output {
                Self(self.0 $op &rhs.0)
            }
        }

        impl $trait for &Integer {
            type Output = Integer;

            fn $method(self, rhs: Self) -> Self::Output {
                Integer(&self.0 $op &rhs.0)
            }
        }
    };
}

forward_binop!(Add, add, +);
forward_binop!(Sub, sub, -);
forward_binop!(Mul, mul, *);
forward_binop!(Div, div, /);
forward_binop!(Rem, rem, %);

impl AddAssign<&Integer> for Integer {
    fn add_assign(&mut self, rhs: &Integer) {
        self.0 += &rhs.0;
    }
}

impl SubAssign<&Integer> for Integer {
    fn sub_assign(&mut self, rhs: &Integer) {
        self.0 -= &rhs.0;
    }
}

impl MulAssign<&Integer> for Integer {
    fn mul_assign(&mut self, rhs: &Integer) {
        self.0 *= &rhs.0;
    }
}

impl Neg for Integer {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Neg for &Integer {
    type Output = Integer;

    fn neg(self) -> Self::Output {
        Integer(-&self.0)
    }
}

impl Sum for Integer {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, x| acc + x)
    }
}

impl<'a> Sum<&'a Integer> for Integer {
    fn sum<I: Iterator<Item = &'a Integer>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, x| acc + x)
    }
}

impl Product for Integer {
    fn product<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::one(), |acc, x| acc * x)
    }
}

impl From<i64> for Integer {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

impl From<i32> for Integer {
    fn from(value: i32) -> Self {
        Self::new(i64::from(value))
    }
}

impl From<u64> for Integer {
    fn from(value: u64) -> Self {
        Self(IBig::from(value))
    }
}

impl From<u32> for Integer {
    fn from(value: u32) -> Self {
        Self(IBig::from(value))
    }
}

impl From<usize> for Integer {
    fn from(value: usize) -> Self {
        Self(IBig::from(value))
    }
}

impl From<IBig> for Integer {
    fn from(value: IBig) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(n: i64) -> Integer {
        Integer::new(n)
    }

    #[test]
    fn test_sign_of_zero() {
        let zero = int(0);
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());
        assert_eq!(zero.signum(), 0);
        assert!(int(3).is_positive());
        assert!(!int(-3).is_positive());
    }

    #[test]
    fn test_floor_division() {
        assert_eq!(int(7).div_floor(&int(2)), int(3));
        assert_eq!(int(-7).div_floor(&int(2)), int(-4));
        assert_eq!(int(7).div_floor(&int(-2)), int(-4));
        assert_eq!(int(-7).div_floor(&int(-2)), int(3));
        assert_eq!(int(-7).modulo(&int(3)), int(2));
        assert_eq!(int(7).div_ceil(&int(2)), int(4));
    }

    #[test]
    fn test_symmetric_remainder() {
        assert_eq!(int(7).sym_rem(&int(4)), int(-1));
        assert_eq!(int(6).sym_rem(&int(4)), int(2));
        assert_eq!(int(-6).sym_rem(&int(4)), int(2));
        assert_eq!(int(5).sym_rem(&int(-4)), int(1));
        assert_eq!(int(3).sym_rem(&int(6)), int(3));
        assert_eq!(int(-3).sym_rem(&int(6)), int(3));
    }

    #[test]
    fn test_extended_gcd_and_inverse() {
        let (g, u, v) = int(240).extended_gcd(&int(46));
        assert_eq!(g, int(2));
        assert_eq!(int(240) * u + int(46) * v, int(2));
        assert_eq!(int(3).mod_inverse(&int(7)), Some(int(5)));
        assert_eq!(int(6).mod_inverse(&int(9)), None);
    }

    #[test]
    fn test_isqrt_and_log2() {
        assert_eq!(int(99).isqrt(), Some(int(9)));
        assert_eq!(int(100).isqrt(), Some(int(10)));
        assert_eq!(int(-1).isqrt(), None);
        let big = Integer::pow2(300);
        assert!((big.log2() - 300.0).abs() < 1e-9);
        assert!((int(1024).log2() - 10.0).abs() < 1e-12);
        assert!((Integer::pow2(200).to_f64_scaled(199) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_hex_round_trip() {
        let n = int(-3233);
        assert_eq!(n.to_hex_string(), "-0xca1");
        assert_eq!(Integer::parse_token("-0xca1"), Ok(n));
        assert_eq!(Integer::parse_token("42"), Ok(int(42)));
        assert!(Integer::parse_token("0xzz").is_err());
        assert!(Integer::parse_token("-").is_err());
    }

    #[test]
    fn test_large_numbers() {
        let a: Integer = "123456789012345678901234567890".parse().unwrap();
        let b: Integer = "987654321098765432109876543210".parse().unwrap();
        assert_eq!((a + b).to_string(), "1111111110111111111011111111100");
    }
}
