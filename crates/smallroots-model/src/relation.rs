//! Polynomial relations.

use std::fmt;
use std::sync::Arc;

use num_traits::Zero;
use smallroots_integers::Integer;
use smallroots_poly::{PolyRing, Polynomial, Variable};

use crate::error::{Error, Result};
use crate::modulus::{combine, Modulus};
use crate::solution::PartialSolution;

/// `f(root) == 0`, or `f(root) ≡ 0 (mod N)` when a modulus is present.
#[derive(Clone, PartialEq, Eq)]
pub struct Relation {
    /// The integer polynomial.
    pub polynomial: Polynomial<Integer>,
    /// The modulus, `None` for an equation over the integers.
    pub modulus: Option<Modulus>,
}

impl Relation {
    /// Creates a relation.
    #[must_use]
    pub fn new(polynomial: Polynomial<Integer>, modulus: Option<Modulus>) -> Self {
        Self {
            polynomial,
            modulus,
        }
    }

    /// An equation over the integers.
    #[must_use]
    pub fn integer(polynomial: Polynomial<Integer>) -> Self {
        Self::new(polynomial, None)
    }

    /// A congruence modulo `modulus`.
    #[must_use]
    pub fn modular(polynomial: Polynomial<Integer>, modulus: impl Into<Modulus>) -> Self {
        Self::new(polynomial, Some(modulus.into()))
    }

    /// The polynomial ring.
    #[must_use]
    pub fn ring(&self) -> &Arc<PolyRing> {
        self.polynomial.ring()
    }

    /// Generators of the polynomial ring.
    #[must_use]
    pub fn variables(&self) -> &[Variable] {
        self.ring().variables()
    }

    /// Symbols of the modulus.
    #[must_use]
    pub fn unknown_moduli(&self) -> Vec<Variable> {
        self.modulus
            .as_ref()
            .map(|m| m.symbols().map(|(v, _)| v.clone()).collect())
            .unwrap_or_default()
    }

    /// True if the modulus is absent.
    #[must_use]
    pub fn is_integer(&self) -> bool {
        self.modulus.is_none()
    }

    /// True if the relation holds at `solution`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if a ring generator or modulus symbol
    /// has no value.
    pub fn check(&self, solution: &PartialSolution) -> Result<bool> {
        let point = solution.values_for(self.variables()).ok_or_else(|| {
            Error::invalid(format!("solution {solution} misses a variable of {self}"))
        })?;
        let value = self.polynomial.evaluate(&point);
        match &self.modulus {
            None => Ok(value.is_zero()),
            Some(m) => {
                let n = m.evaluate(solution).ok_or_else(|| {
                    Error::invalid(format!("solution {solution} misses a symbol of {m}"))
                })?;
                Ok(value.is_divisible_by(&n))
            }
        }
    }

    /// The product relation; moduli multiply and `None` is the identity.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RingMismatch`] if the rings differ.
    pub fn mul(&self, other: &Self) -> Result<Self> {
        if self.ring() != other.ring() {
            return Err(Error::RingMismatch);
        }
        Ok(Self {
            polynomial: &self.polynomial * &other.polynomial,
            modulus: combine(self.modulus.as_ref(), other.modulus.as_ref(), |a, b| a * b),
        })
    }

    /// Multiplies the polynomial by `f`, keeping the modulus.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RingMismatch`] if the rings differ.
    pub fn mul_poly(&self, f: &Polynomial<Integer>) -> Result<Self> {
        if self.ring() != f.ring() {
            return Err(Error::RingMismatch);
        }
        Ok(Self {
            polynomial: &self.polynomial * f,
            modulus: self.modulus.clone(),
        })
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.modulus {
            None => write!(f, "{} == 0", self.polynomial),
            Some(m) => write!(f, "{} == 0 modulo {m}", self.polynomial),
        }
    }
}

impl fmt::Debug for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Relation({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallroots_poly::{parse_polynomials, TermOrder};

    #[test]
    fn test_check_modular_and_symbolic() {
        let (_, polys) = parse_polynomials(&["x^2 - 2"]).unwrap();
        let rel = Relation::modular(polys[0].clone(), Integer::new(7));
        let sol: PartialSolution = [(Variable::new("x"), Integer::new(3))].into_iter().collect();
        assert!(rel.check(&sol).unwrap());

        let sym = Relation::modular(polys[0].clone(), Variable::new("p"));
        assert!(sym.check(&sol).is_err());
        let mut sol = sol;
        sol.insert(Variable::new("p"), Integer::new(7));
        assert!(sym.check(&sol).unwrap());
        sol.insert(Variable::new("p"), Integer::new(5));
        assert!(!sym.check(&sol).unwrap());
    }

    #[test]
    fn test_product_moduli() {
        let (_, polys) = parse_polynomials(&["x + 1", "x - 1"]).unwrap();
        let a = Relation::modular(polys[0].clone(), Integer::new(3));
        let b = Relation::modular(polys[1].clone(), Integer::new(5));
        let ab = a.mul(&b).unwrap();
        assert_eq!(ab.to_string(), "x^2 - 1 == 0 modulo 15");
        let c = Relation::integer(polys[1].clone());
        assert_eq!(a.mul(&c).unwrap().modulus, a.modulus);
        assert_eq!(c.mul(&c).unwrap().modulus, None);
    }

    #[test]
    fn test_ring_mismatch() {
        let ring = PolyRing::from_names(&["y"], TermOrder::default()).unwrap();
        let (_, polys) = parse_polynomials(&["x + 1"]).unwrap();
        let a = Relation::integer(polys[0].clone());
        let b = Relation::integer(Polynomial::var(ring, 0));
        assert!(matches!(a.mul(&b), Err(Error::RingMismatch)));
    }
}
