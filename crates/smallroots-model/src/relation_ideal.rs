//! Ideals of relations sharing one modulus constraint.

use std::fmt;
use std::ops::{Add, Mul};
use std::sync::Arc;

use smallroots_groebner::Ideal;
use smallroots_integers::Integer;
use smallroots_poly::{PolyRing, Polynomial};

use crate::error::{Error, Result};
use crate::modulus::{combine, Modulus};
use crate::relation::Relation;

/// An ideal of `ℤ[x]` all of whose elements vanish at the bounded root
/// modulo `modulus` (or exactly, when the modulus is absent).
#[derive(Clone)]
pub struct RelationIdeal {
    /// The polynomial ideal.
    pub ideal: Ideal,
    /// The shared modulus.
    pub modulus: Option<Modulus>,
}

impl RelationIdeal {
    /// The ideal generated by `polynomials`, all constrained by `modulus`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RingMismatch`] if a polynomial is outside `ring`.
    pub fn new(
        polynomials: Vec<Polynomial<Integer>>,
        ring: Arc<PolyRing>,
        modulus: Option<Modulus>,
    ) -> Result<Self> {
        if polynomials.iter().any(|f| **f.ring() != *ring) {
            return Err(Error::RingMismatch);
        }
        Ok(Self {
            ideal: Ideal::new(ring, polynomials),
            modulus,
        })
    }

    /// The ideal generated by the polynomials of `relations`, which must all
    /// share `modulus`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RingMismatch`] if the relations live in other rings
    /// and [`Error::InvalidInput`] if a relation has a different modulus.
    pub fn from_relations(
        relations: &[Relation],
        ring: Arc<PolyRing>,
        modulus: Option<Modulus>,
    ) -> Result<Self> {
        if let Some(r) = relations.iter().find(|r| r.modulus != modulus) {
            return Err(Error::invalid(format!(
                "relation {r} does not share the ideal's modulus"
            )));
        }
        Self::new(
            relations.iter().map(|r| r.polynomial.clone()).collect(),
            ring,
            modulus,
        )
    }

    /// The zero ideal with the given modulus.
    #[must_use]
    pub fn zero(ring: Arc<PolyRing>, modulus: Option<Modulus>) -> Self {
        Self {
            ideal: Ideal::zero(ring),
            modulus,
        }
    }

    /// The ambient ring.
    #[must_use]
    pub fn ring(&self) -> &Arc<PolyRing> {
        self.ideal.ring()
    }

    /// Strong Gröbner basis; empty for the zero ideal.
    #[must_use]
    pub fn groebner_basis(&self) -> &[Polynomial<Integer>] {
        self.ideal.groebner_basis()
    }

    /// Normal form of `f`.
    #[must_use]
    pub fn reduce(&self, f: &Polynomial<Integer>) -> Polynomial<Integer> {
        self.ideal.reduce(f)
    }

    /// `J1 + J2`; the modulus is the lcm of the two.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RingMismatch`] if the rings differ.
    pub fn try_add(&self, other: &Self) -> Result<Self> {
        if self.ring() != other.ring() {
            return Err(Error::RingMismatch);
        }
        Ok(Self {
            ideal: &self.ideal + &other.ideal,
            modulus: combine(self.modulus.as_ref(), other.modulus.as_ref(), Modulus::lcm),
        })
    }

    /// `J1 * J2`; the modulus is the product of the two.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RingMismatch`] if the rings differ.
    pub fn try_mul(&self, other: &Self) -> Result<Self> {
        if self.ring() != other.ring() {
            return Err(Error::RingMismatch);
        }
        Ok(Self {
            ideal: &self.ideal * &other.ideal,
            modulus: combine(self.modulus.as_ref(), other.modulus.as_ref(), |a, b| a * b),
        })
    }
}

impl Add for &RelationIdeal {
    type Output = RelationIdeal;

    /// # Panics
    ///
    /// Panics if the rings differ.
    fn add(self, rhs: Self) -> RelationIdeal {
        assert!(self.ring() == rhs.ring(), "relation ideals over different rings");
        RelationIdeal {
            ideal: &self.ideal + &rhs.ideal,
            modulus: combine(self.modulus.as_ref(), rhs.modulus.as_ref(), Modulus::lcm),
        }
    }
}

impl Mul for &RelationIdeal {
    type Output = RelationIdeal;

    /// # Panics
    ///
    /// Panics if the rings differ.
    fn mul(self, rhs: Self) -> RelationIdeal {
        assert!(self.ring() == rhs.ring(), "relation ideals over different rings");
        RelationIdeal {
            ideal: &self.ideal * &rhs.ideal,
            modulus: combine(self.modulus.as_ref(), rhs.modulus.as_ref(), |a, b| a * b),
        }
    }
}

impl fmt::Debug for RelationIdeal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.modulus {
            Some(m) => write!(f, "RelationIdeal({:?} modulo {m})", self.ideal),
            None => write!(f, "RelationIdeal({:?})", self.ideal),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallroots_poly::{parse_polynomials, Variable};

    #[test]
    fn test_moduli_combine() {
        let (ring, polys) = parse_polynomials(&["x - 3", "x + 1"]).unwrap();
        let a = RelationIdeal::new(
            vec![polys[0].clone()],
            ring.clone(),
            Some(Modulus::known(Integer::new(12))),
        )
        .unwrap();
        let b = RelationIdeal::new(
            vec![polys[1].clone()],
            ring.clone(),
            Some(Modulus::known(Integer::new(18))),
        )
        .unwrap();
        assert_eq!((&a + &b).modulus, Some(Modulus::known(Integer::new(36))));
        assert_eq!((&a * &b).modulus, Some(Modulus::known(Integer::new(216))));
        assert_eq!((&a * &b).ideal.generators().len(), 1);

        let exact = RelationIdeal::zero(ring, None);
        assert_eq!((&exact + &a).modulus, a.modulus);
        assert_eq!((&a * &exact).modulus, a.modulus);
    }

    #[test]
    fn test_groebner_basis_of_modular_ideal() {
        let (ring, polys) = parse_polynomials(&["x^2 - 4", "6"]).unwrap();
        let p = Modulus::symbol(Variable::new("p"));
        let j = RelationIdeal::new(polys, ring.clone(), Some(p)).unwrap();
        let gb = j.groebner_basis();
        assert!(!gb.is_empty());
        // x^2 + 2 is congruent to 0 modulo the ideal (x^2 - 4 + 6)
        let (_, f) = parse_polynomials(&["x^2 + 2"]).unwrap();
        assert!(j.reduce(&f[0].reinterpret(ring)).is_zero());
    }

    #[test]
    fn test_ring_mismatch() {
        let (r1, _) = parse_polynomials(&["x"]).unwrap();
        let (_, p2) = parse_polynomials(&["y"]).unwrap();
        assert!(matches!(
            RelationIdeal::new(p2, r1, None),
            Err(Error::RingMismatch)
        ));
    }
}
