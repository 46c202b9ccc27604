//! Coefficient traits.
//!
//! Polynomials in this workspace have coefficients in ℤ or ℚ. These two
//! traits capture exactly what the polynomial and Gröbner code needs
//! from them.

use num_traits::{One, Zero};
use std::fmt::{Debug, Display};
use std::ops::{Add, Mul, Neg, Sub};

use crate::{Integer, Rational};

/// A commutative ring with identity that integers embed into.
///
/// # Laws
///
/// - Addition is associative and commutative with identity `zero()`
/// - Multiplication is associative and commutative with identity `one()`
/// - Multiplication distributes over addition
pub trait Ring:
    Clone
    + Eq
    + Debug
    + Display
    + Zero
    + One
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Neg<Output = Self>
{
    /// The image of an integer in this ring.
    fn from_integer(n: &Integer) -> Self;
}

/// A ring in which every non-zero element is invertible.
pub trait Field: Ring {
    /// Computes the multiplicative inverse, `None` for zero.
    fn inv(&self) -> Option<Self>;
}

impl Ring for Integer {
    fn from_integer(n: &Integer) -> Self {
        n.clone()
    }
}

impl Ring for Rational {
    fn from_integer(n: &Integer) -> Self {
        Rational::from(n)
    }
}

impl Field for Rational {
    fn inv(&self) -> Option<Self> {
        Rational::inv(self)
    }
}
