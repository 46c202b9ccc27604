//! Exponent-vector monomials.
//!
//! A monomial is stored as one exponent per ring generator, in the
//! generator order of its ring. Up to eight generators live inline.

use smallvec::SmallVec;
use std::cmp::Ordering;

/// A monomial `x_0^e_0 * ... * x_{n-1}^e_{n-1}`.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Default)]
pub struct Monomial(SmallVec<[u32; 8]>);

impl Monomial {
    /// The monomial 1 in `num_vars` variables.
    #[must_use]
    pub fn one(num_vars: usize) -> Self {
        Self(SmallVec::from_elem(0, num_vars))
    }

    /// The monomial `x_i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= num_vars`.
    #[must_use]
    pub fn var(i: usize, num_vars: usize) -> Self {
        assert!(i < num_vars, "variable index out of range");
        let mut m = Self::one(num_vars);
        m.0[i] = 1;
        m
    }

    /// Creates a monomial from its exponents.
    #[must_use]
    pub fn from_exponents(exps: &[u32]) -> Self {
        Self(SmallVec::from_slice(exps))
    }

    /// Number of generators this monomial is expressed over.
    #[must_use]
    pub fn num_vars(&self) -> usize {
        self.0.len()
    }

    /// Exponent of variable `i`.
    #[must_use]
    pub fn exponent(&self, i: usize) -> u32 {
        self.0[i]
    }

    /// All exponents.
    #[must_use]
    pub fn exponents(&self) -> &[u32] {
        &self.0
    }

    /// True for the monomial 1.
    #[must_use]
    pub fn is_one(&self) -> bool {
        self.0.iter().all(|&e| e == 0)
    }

    /// Sum of all exponents.
    #[must_use]
    pub fn total_degree(&self) -> u32 {
        self.0.iter().sum()
    }

    /// Product of two monomials.
    #[must_use]
    pub fn mul(&self, other: &Self) -> Self {
        Self(self.0.iter().zip(&other.0).map(|(a, b)| a + b).collect())
    }

    /// `self^k`.
    #[must_use]
    pub fn pow(&self, k: u32) -> Self {
        Self(self.0.iter().map(|e| e * k).collect())
    }

    /// `self / other` if `other` divides `self`.
    #[must_use]
    pub fn div(&self, other: &Self) -> Option<Self> {
        if other.divides(self) {
            Some(Self(self.0.iter().zip(&other.0).map(|(a, b)| a - b).collect()))
        } else {
            None
        }
    }

    /// True if `self` divides `other`.
    #[must_use]
    pub fn divides(&self, other: &Self) -> bool {
        self.0.iter().zip(&other.0).all(|(a, b)| a <= b)
    }

    /// Least common multiple.
    #[must_use]
    pub fn lcm(&self, other: &Self) -> Self {
        Self(self.0.iter().zip(&other.0).map(|(a, b)| *a.max(b)).collect())
    }

    /// Greatest common divisor.
    #[must_use]
    pub fn gcd(&self, other: &Self) -> Self {
        Self(self.0.iter().zip(&other.0).map(|(a, b)| *a.min(b)).collect())
    }

    /// True if the two monomials share no variable.
    #[must_use]
    pub fn is_coprime(&self, other: &Self) -> bool {
        self.0.iter().zip(&other.0).all(|(a, b)| *a == 0 || *b == 0)
    }

    /// Indices of the variables that occur.
    pub fn support(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().enumerate().filter(|(_, &e)| e > 0).map(|(i, _)| i)
    }

    /// If this is a pure power `x_i^e` with `e > 0`, returns `(i, e)`.
    #[must_use]
    pub fn as_pure_power(&self) -> Option<(usize, u32)> {
        let mut support = self.support();
        let i = support.next()?;
        if support.next().is_some() {
            return None;
        }
        Some((i, self.0[i]))
    }
}

/// Lexicographic comparison on exponent vectors.
#[must_use]
pub fn cmp_lex(a: &Monomial, b: &Monomial) -> Ordering {
    a.0.iter().cmp(b.0.iter())
}

/// Graded reverse lexicographic comparison.
#[must_use]
pub fn cmp_grevlex(a: &Monomial, b: &Monomial) -> Ordering {
    match a.total_degree().cmp(&b.total_degree()) {
        Ordering::Equal => {
            // the smaller last exponent wins
            for (ea, eb) in a.0.iter().rev().zip(b.0.iter().rev()) {
                match ea.cmp(eb) {
                    Ordering::Equal => continue,
                    other => return other.reverse(),
                }
            }
            Ordering::Equal
        }
        other => other,
    }
}

/// Weighted degree, ties broken lexicographically.
#[must_use]
pub fn cmp_weighted(a: &Monomial, b: &Monomial, weights: &[u64]) -> Ordering {
    weighted_degree(a, weights)
        .cmp(&weighted_degree(b, weights))
        .then_with(|| cmp_lex(a, b))
}

/// `Σ w_i e_i`.
#[must_use]
pub fn weighted_degree(m: &Monomial, weights: &[u64]) -> u128 {
    m.0.iter()
        .zip(weights)
        .map(|(&e, &w)| u128::from(e) * u128::from(w))
        .sum()
}
