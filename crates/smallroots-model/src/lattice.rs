//! Coppersmith lattices.
//!
//! A lattice keeps its basis unscaled together with one scale factor per
//! column. A column scaled by [`Scale::Infinite`] must be zero in every
//! vector that is considered short; reduction enforces that by weighting
//! the column with an ever larger finite value.

use std::fmt;
use std::sync::Arc;

use num_traits::{One, Zero};
use smallroots_integers::{Integer, Rational};
use smallroots_lattice::DenseMatrix;
use smallroots_poly::{Monomial, PolyRing, Polynomial};

use crate::error::{Error, Result};
use crate::modulus::Modulus;
use crate::relation::Relation;

/// Per-column scale factor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Scale {
    /// Multiply the column by this value.
    Finite(Rational),
    /// Any nonzero entry makes the vector infinitely long.
    Infinite,
}

impl Scale {
    /// True for [`Scale::Infinite`].
    #[must_use]
    pub fn is_infinite(&self) -> bool {
        matches!(self, Self::Infinite)
    }
}

impl From<Integer> for Scale {
    fn from(s: Integer) -> Self {
        Self::Finite(Rational::from(s))
    }
}

impl From<Rational> for Scale {
    fn from(s: Rational) -> Self {
        Self::Finite(s)
    }
}

/// A basis over a list of monomial columns.
///
/// In a dual lattice (`is_primal == false`) each row holds the
/// coefficients of a polynomial over `monomials`. In a primal lattice
/// rows encode candidate roots and `monomials` names only the leading
/// columns; the remaining columns belong to relations.
#[derive(Clone)]
pub struct Lattice {
    /// The unscaled basis, one vector per row.
    pub basis: DenseMatrix<Integer>,
    /// Monomials labelling the columns.
    pub monomials: Vec<Monomial>,
    /// The ring the monomials live in.
    pub ring: Arc<PolyRing>,
    /// Modulus shared by every relation of a dual lattice.
    pub modulus: Option<Modulus>,
    /// Column scale factors; `None` means all ones.
    pub scale_factors: Option<Vec<Scale>>,
    /// Whether rows are roots (primal) or relations (dual).
    pub is_primal: bool,
}

impl Lattice {
    /// Number of basis vectors.
    #[must_use]
    pub fn rank(&self) -> usize {
        self.basis.num_rows()
    }

    /// Length of each basis vector.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.basis.num_cols()
    }

    /// The unscaled basis vector in row `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of range.
    #[must_use]
    pub fn vector(&self, i: usize) -> &[Integer] {
        self.basis.row(i)
    }

    /// The same lattice over another basis, e.g. after reduction.
    #[must_use]
    pub fn with_basis(&self, basis: DenseMatrix<Integer>) -> Self {
        Self {
            basis,
            ..self.clone()
        }
    }

    /// The scaled basis vector in row `i`, or `None` if it is nonzero in an
    /// infinitely scaled column.
    #[must_use]
    pub fn scaled_vector(&self, i: usize) -> Option<Vec<Rational>> {
        let v = self.vector(i);
        let Some(scales) = &self.scale_factors else {
            return Some(v.iter().map(Rational::from).collect());
        };
        v.iter()
            .zip(scales)
            .map(|(x, s)| match s {
                Scale::Finite(s) => Some(Rational::from(x) * s),
                Scale::Infinite if x.is_zero() => Some(Rational::zero()),
                Scale::Infinite => None,
            })
            .collect()
    }

    /// The relation encoded by row `i` of a dual lattice.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for a primal lattice.
    pub fn relation(&self, i: usize) -> Result<Relation> {
        if self.is_primal {
            return Err(Error::invalid("only dual lattice rows are relations"));
        }
        let terms = self
            .monomials
            .iter()
            .cloned()
            .zip(self.vector(i).iter().cloned())
            .collect();
        Ok(Relation::new(
            Polynomial::from_terms(self.ring.clone(), terms),
            self.modulus.clone(),
        ))
    }

    /// Scaled L1 norm of row `i`.
    #[must_use]
    pub fn l1_norm(&self, i: usize) -> Option<Rational> {
        let v = self.scaled_vector(i)?;
        Some(v.iter().fold(Rational::zero(), |acc, x| acc + x.abs()))
    }

    /// Scaled squared L2 norm of row `i`.
    #[must_use]
    pub fn l2_norm_squared(&self, i: usize) -> Option<Rational> {
        let v = self.scaled_vector(i)?;
        Some(v.iter().fold(Rational::zero(), |acc, x| acc + x * x))
    }

    /// Scaled infinity norm of row `i`.
    #[must_use]
    pub fn inf_norm(&self, i: usize) -> Option<Rational> {
        let v = self.scaled_vector(i)?;
        Some(v.iter().map(Rational::abs).max().unwrap_or_else(Rational::zero))
    }

    /// Least common denominator of the scaled row `i`.
    #[must_use]
    pub fn denominator(&self, i: usize) -> Option<Integer> {
        let v = self.scaled_vector(i)?;
        Some(
            v.iter()
                .fold(Integer::one(), |acc, x| acc.lcm(&x.denominator())),
        )
    }
}

impl fmt::Debug for Lattice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_primal { "Primal" } else { "Dual" };
        write!(
            f,
            "{kind} lattice of rank {} and dimension {}",
            self.rank(),
            self.dimension()
        )
    }
}
