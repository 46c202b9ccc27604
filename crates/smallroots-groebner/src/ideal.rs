//! Ideals of ℤ[x_1, ..., x_n].

use std::fmt;
use std::ops::{Add, Mul};
use std::sync::{Arc, OnceLock};

use smallroots_integers::Integer;
use smallroots_poly::{PolyRing, Polynomial};

use crate::integer;

/// An ideal given by generators, with a lazily computed strong basis.
#[derive(Clone)]
pub struct Ideal {
    ring: Arc<PolyRing>,
    generators: Vec<Polynomial<Integer>>,
    basis: OnceLock<Vec<Polynomial<Integer>>>,
}

impl Ideal {
    /// The ideal generated by `generators`. Zero generators are dropped.
    ///
    /// # Panics
    ///
    /// Panics if a generator lives in another ring.
    #[must_use]
    pub fn new(ring: Arc<PolyRing>, generators: Vec<Polynomial<Integer>>) -> Self {
        for g in &generators {
            assert!(**g.ring() == *ring, "generator outside the ideal's ring");
        }
        Self {
            ring,
            generators: generators.into_iter().filter(|g| !g.is_zero()).collect(),
            basis: OnceLock::new(),
        }
    }

    /// The zero ideal.
    #[must_use]
    pub fn zero(ring: Arc<PolyRing>) -> Self {
        Self::new(ring, Vec::new())
    }

    /// The ambient ring.
    #[must_use]
    pub fn ring(&self) -> &Arc<PolyRing> {
        &self.ring
    }

    /// The generators as given.
    #[must_use]
    pub fn generators(&self) -> &[Polynomial<Integer>] {
        &self.generators
    }

    /// True for the zero ideal.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.generators.is_empty()
    }

    /// Strong Gröbner basis under the ring's order. Empty for the zero ideal.
    pub fn groebner_basis(&self) -> &[Polynomial<Integer>] {
        self.basis
            .get_or_init(|| integer::groebner_basis(&self.generators))
    }

    /// Normal form of `f` modulo the ideal.
    #[must_use]
    pub fn reduce(&self, f: &Polynomial<Integer>) -> Polynomial<Integer> {
        integer::reduce(f, self.groebner_basis())
    }

    /// Ideal membership.
    #[must_use]
    pub fn contains(&self, f: &Polynomial<Integer>) -> bool {
        self.reduce(f).is_zero()
    }

    /// `I + J`: the union of the generators.
    ///
    /// # Panics
    ///
    /// Panics if the rings differ.
    #[must_use]
    pub fn sum(&self, other: &Self) -> Self {
        let mut generators = self.generators.clone();
        generators.extend(other.generators.iter().cloned());
        Self::new(self.ring.clone(), generators)
    }

    /// `I * J`: all pairwise products of generators.
    ///
    /// # Panics
    ///
    /// Panics if the rings differ.
    #[must_use]
    pub fn product(&self, other: &Self) -> Self {
        let generators = self
            .generators
            .iter()
            .flat_map(|f| other.generators.iter().map(move |g| f * g))
            .collect();
        Self::new(self.ring.clone(), generators)
    }
}

impl Add for &Ideal {
    type Output = Ideal;

    fn add(self, rhs: Self) -> Ideal {
        self.sum(rhs)
    }
}

impl Mul for &Ideal {
    type Output = Ideal;

    fn mul(self, rhs: Self) -> Ideal {
        self.product(rhs)
    }
}

impl fmt::Debug for Ideal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.generators).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallroots_poly::{parse_polynomial_in, TermOrder};

    fn setup() -> (Arc<PolyRing>, Polynomial<Integer>, Polynomial<Integer>) {
        let ring = PolyRing::from_names(&["x"], TermOrder::Grevlex).unwrap();
        let f = parse_polynomial_in(&ring, "x^2 + 3").unwrap();
        let n = parse_polynomial_in(&ring, "7").unwrap();
        (ring, f, n)
    }

    #[test]
    fn test_product_and_sum() {
        let (ring, f, n) = setup();
        let i = Ideal::new(ring.clone(), vec![f.clone(), n.clone()]);
        let square = &i * &i;
        assert_eq!(square.generators().len(), 4);
        assert!(square.contains(&(&f * &f)));
        assert!(square.contains(&(&n * &f)));
        assert!(!square.contains(&f));
        let back = &square + &i;
        assert!(back.contains(&f));
        assert!(Ideal::zero(ring).product(&i).is_zero());
    }

    #[test]
    fn test_reduce_is_congruent() {
        let (ring, f, n) = setup();
        let i = Ideal::new(ring.clone(), vec![f, n]);
        let g = parse_polynomial_in(&ring, "x^3 + 20*x + 1").unwrap();
        let r = i.reduce(&g);
        assert!(i.contains(&(&g - &r)));
        assert!(r.total_degree() < 2);
    }
}
