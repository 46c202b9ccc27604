//! Sparse multivariate polynomials over an explicit ring.
//!
//! Terms are kept sorted from the leading term down under the ring's term
//! order, with like terms merged and zero coefficients dropped, so
//! structural equality is polynomial equality.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Mul, Neg, Sub};
use std::sync::Arc;

use num_traits::{One, Zero};
use rustc_hash::FxHashMap;
use smallroots_integers::{Integer, Rational, Ring};

use crate::error::PolyError;
use crate::monomial::Monomial;
use crate::ordering::TermOrder;
use crate::ring::PolyRing;
use crate::variable::Variable;

/// A polynomial with coefficients in `C`.
#[derive(Clone)]
pub struct Polynomial<C: Ring> {
    ring: Arc<PolyRing>,
    terms: Vec<(Monomial, C)>,
}

impl<C: Ring> Polynomial<C> {
    /// Creates a polynomial from terms. Terms are sorted and combined.
    #[must_use]
    pub fn from_terms(ring: Arc<PolyRing>, terms: Vec<(Monomial, C)>) -> Self {
        let mut poly = Self { ring, terms };
        poly.normalize();
        poly
    }

    /// The zero polynomial.
    #[must_use]
    pub fn zero(ring: Arc<PolyRing>) -> Self {
        Self {
            ring,
            terms: Vec::new(),
        }
    }

    /// The constant 1.
    #[must_use]
    pub fn one(ring: Arc<PolyRing>) -> Self {
        Self::constant(ring, C::one())
    }

    /// A constant polynomial.
    #[must_use]
    pub fn constant(ring: Arc<PolyRing>, c: C) -> Self {
        if c.is_zero() {
            return Self::zero(ring);
        }
        let n = ring.num_vars();
        Self {
            ring,
            terms: vec![(Monomial::one(n), c)],
        }
    }

    /// The generator `x_i`.
    ///
    /// # Panics
    ///
    /// Panics if `i` is not a generator index.
    #[must_use]
    pub fn var(ring: Arc<PolyRing>, i: usize) -> Self {
        let n = ring.num_vars();
        Self {
            ring,
            terms: vec![(Monomial::var(i, n), C::one())],
        }
    }

    /// The generator named `v`, if the ring has it.
    #[must_use]
    pub fn variable(ring: Arc<PolyRing>, v: &Variable) -> Option<Self> {
        let i = ring.index_of(v)?;
        Some(Self::var(ring, i))
    }

    /// A single term `c * m`.
    #[must_use]
    pub fn monomial(ring: Arc<PolyRing>, m: Monomial, c: C) -> Self {
        if c.is_zero() {
            return Self::zero(ring);
        }
        Self {
            ring,
            terms: vec![(m, c)],
        }
    }

    /// The ring this polynomial lives in.
    #[must_use]
    pub fn ring(&self) -> &Arc<PolyRing> {
        &self.ring
    }

    /// Terms from the leading term down.
    #[must_use]
    pub fn terms(&self) -> &[(Monomial, C)] {
        &self.terms
    }

    /// Number of non-zero terms.
    #[must_use]
    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    /// True for the zero polynomial.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    /// True if no generator occurs (zero included).
    #[must_use]
    pub fn is_constant(&self) -> bool {
        self.terms.iter().all(|(m, _)| m.is_one())
    }

    /// The constant term.
    #[must_use]
    pub fn constant_coeff(&self) -> C {
        self.terms
            .iter()
            .find(|(m, _)| m.is_one())
            .map_or_else(C::zero, |(_, c)| c.clone())
    }

    /// Coefficient of `m`.
    #[must_use]
    pub fn coeff(&self, m: &Monomial) -> C {
        self.terms
            .iter()
            .find(|(t, _)| t == m)
            .map_or_else(C::zero, |(_, c)| c.clone())
    }

    /// The leading term under the ring's order.
    #[must_use]
    pub fn leading_term(&self) -> Option<&(Monomial, C)> {
        self.terms.first()
    }

    /// The leading monomial.
    #[must_use]
    pub fn leading_monomial(&self) -> Option<&Monomial> {
        self.terms.first().map(|(m, _)| m)
    }

    /// The leading coefficient.
    #[must_use]
    pub fn leading_coeff(&self) -> Option<&C> {
        self.terms.first().map(|(_, c)| c)
    }

    /// Everything but the leading term.
    #[must_use]
    pub fn tail(&self) -> Self {
        Self {
            ring: self.ring.clone(),
            terms: self.terms.iter().skip(1).cloned().collect(),
        }
    }

    /// The monomials, from the leading one down.
    pub fn monomials(&self) -> impl Iterator<Item = &Monomial> + '_ {
        self.terms.iter().map(|(m, _)| m)
    }

    /// The coefficients, from the leading term down.
    pub fn coefficients(&self) -> impl Iterator<Item = &C> + '_ {
        self.terms.iter().map(|(_, c)| c)
    }

    /// Total degree, 0 for the zero polynomial.
    #[must_use]
    pub fn total_degree(&self) -> u32 {
        self.terms
            .iter()
            .map(|(m, _)| m.total_degree())
            .max()
            .unwrap_or(0)
    }

    /// Degree in generator `i`.
    #[must_use]
    pub fn degree_in(&self, i: usize) -> u32 {
        self.terms
            .iter()
            .map(|(m, _)| m.exponent(i))
            .max()
            .unwrap_or(0)
    }

    /// Indices of the generators that occur, ascending.
    #[must_use]
    pub fn variable_indices(&self) -> Vec<usize> {
        let n = self.ring.num_vars();
        (0..n)
            .filter(|&i| self.terms.iter().any(|(m, _)| m.exponent(i) > 0))
            .collect()
    }

    /// The generators that occur, in ring order.
    #[must_use]
    pub fn variables(&self) -> Vec<Variable> {
        self.variable_indices()
            .into_iter()
            .map(|i| self.ring.variables()[i].clone())
            .collect()
    }

    /// Applies `f` to every coefficient.
    #[must_use]
    pub fn map_coeffs<D: Ring>(&self, f: impl Fn(&C) -> D) -> Polynomial<D> {
        Polynomial::from_terms(
            self.ring.clone(),
            self.terms.iter().map(|(m, c)| (m.clone(), f(c))).collect(),
        )
    }

    /// The same polynomial in the same generators under another order.
    #[must_use]
    pub fn with_order(&self, order: TermOrder) -> Self {
        Self::from_terms(self.ring.with_order(order), self.terms.clone())
    }

    /// Moves the polynomial into a ring with the same generators.
    ///
    /// # Panics
    ///
    /// Panics if `ring` has a different number of generators.
    #[must_use]
    pub fn reinterpret(&self, ring: Arc<PolyRing>) -> Self {
        assert_eq!(ring.num_vars(), self.ring.num_vars(), "generator count mismatch");
        Self::from_terms(ring, self.terms.clone())
    }

    /// Maps generators by name into `target`.
    ///
    /// # Errors
    ///
    /// Returns [`PolyError::UnknownVariable`] if a generator that occurs in
    /// `self` is missing from `target`.
    pub fn embed(&self, target: &Arc<PolyRing>) -> Result<Self, PolyError> {
        if *target == self.ring {
            return Ok(self.reinterpret(target.clone()));
        }
        let n = target.num_vars();
        let mut map = Vec::with_capacity(self.ring.num_vars());
        for (i, v) in self.ring.variables().iter().enumerate() {
            let j = target.index_of(v);
            if j.is_none() && self.degree_in(i) > 0 {
                return Err(PolyError::UnknownVariable(v.name().to_string()));
            }
            map.push(j);
        }
        let terms = self
            .terms
            .iter()
            .map(|(m, c)| {
                let mut exps = vec![0; n];
                for (i, j) in map.iter().enumerate() {
                    if let Some(j) = j {
                        exps[*j] += m.exponent(i);
                    }
                }
                (Monomial::from_exponents(&exps), c.clone())
            })
            .collect();
        Ok(Self::from_terms(target.clone(), terms))
    }

    /// Evaluation homomorphism: replaces generator `i` by `images[i]`.
    ///
    /// The result lives in `target`.
    ///
    /// # Panics
    ///
    /// Panics if `images` does not have one entry per generator.
    #[must_use]
    pub fn substitute(&self, target: &Arc<PolyRing>, images: &[Self]) -> Self {
        assert_eq!(images.len(), self.ring.num_vars(), "one image per generator");
        let mut powers: Vec<Vec<Self>> = images
            .iter()
            .map(|img| vec![Self::one(target.clone()), img.clone()])
            .collect();
        let mut result = Self::zero(target.clone());
        for (m, c) in &self.terms {
            let mut term = Self::constant(target.clone(), c.clone());
            for (i, &e) in m.exponents().iter().enumerate() {
                if e == 0 {
                    continue;
                }
                let table = &mut powers[i];
                while table.len() <= e as usize {
                    let next = &table[table.len() - 1] * &table[1];
                    table.push(next);
                }
                term = &term * &table[e as usize];
            }
            result = result + term;
        }
        result
    }

    /// Replaces the listed generators by constants, staying in the same ring.
    #[must_use]
    pub fn partial_evaluate(&self, values: &FxHashMap<usize, C>) -> Self {
        let terms = self
            .terms
            .iter()
            .map(|(m, c)| {
                let mut coeff = c.clone();
                let mut exps: Vec<u32> = m.exponents().to_vec();
                for (i, e) in exps.iter_mut().enumerate() {
                    if let Some(v) = values.get(&i) {
                        coeff = coeff * pow_coeff(v, *e);
                        *e = 0;
                    }
                }
                (Monomial::from_exponents(&exps), coeff)
            })
            .collect();
        Self::from_terms(self.ring.clone(), terms)
    }

    /// Evaluates at a point with one value per generator.
    ///
    /// # Panics
    ///
    /// Panics if `point` does not have one entry per generator.
    #[must_use]
    pub fn evaluate(&self, point: &[C]) -> C {
        assert_eq!(point.len(), self.ring.num_vars(), "one value per generator");
        self.terms.iter().fold(C::zero(), |acc, (m, c)| {
            let value = m
                .exponents()
                .iter()
                .zip(point)
                .filter(|(e, _)| **e > 0)
                .fold(c.clone(), |v, (e, x)| v * pow_coeff(x, *e));
            acc + value
        })
    }

    /// Multiplies every coefficient by `c`.
    #[must_use]
    pub fn scale(&self, c: &C) -> Self {
        if c.is_zero() {
            return Self::zero(self.ring.clone());
        }
        Self {
            ring: self.ring.clone(),
            terms: self
                .terms
                .iter()
                .map(|(m, a)| (m.clone(), a.clone() * c.clone()))
                .filter(|(_, a)| !a.is_zero())
                .collect(),
        }
    }

    /// Multiplies by the term `c * m`.
    #[must_use]
    pub fn mul_term(&self, m: &Monomial, c: &C) -> Self {
        if c.is_zero() {
            return Self::zero(self.ring.clone());
        }
        // multiplying by a monomial preserves the order of the terms
        Self {
            ring: self.ring.clone(),
            terms: self
                .terms
                .iter()
                .map(|(t, a)| (t.mul(m), a.clone() * c.clone()))
                .filter(|(_, a)| !a.is_zero())
                .collect(),
        }
    }

    /// `self^k` by repeated squaring.
    #[must_use]
    pub fn pow(&self, mut k: u32) -> Self {
        let mut base = self.clone();
        let mut acc = Self::one(self.ring.clone());
        while k > 0 {
            if k & 1 == 1 {
                acc = &acc * &base;
            }
            k >>= 1;
            if k > 0 {
                base = &base * &base;
            }
        }
        acc
    }

    /// If only generator `i` occurs, its coefficients from degree 0 up.
    #[must_use]
    pub fn univariate_coeffs(&self, i: usize) -> Option<Vec<C>> {
        let mut coeffs = vec![C::zero(); self.degree_in(i) as usize + 1];
        for (m, c) in &self.terms {
            if m.support().any(|j| j != i) {
                return None;
            }
            coeffs[m.exponent(i) as usize] = c.clone();
        }
        Some(coeffs)
    }

    fn normalize(&mut self) {
        let order = self.ring.order().clone();
        let mut terms = std::mem::take(&mut self.terms);
        terms.sort_by(|a, b| order.compare(&b.0, &a.0));
        let mut merged: Vec<(Monomial, C)> = Vec::with_capacity(terms.len());
        for (m, c) in terms {
            match merged.last_mut() {
                Some((last, acc)) if *last == m => {
                    *acc = acc.clone() + c;
                }
                _ => merged.push((m, c)),
            }
        }
        merged.retain(|(_, c)| !c.is_zero());
        self.terms = merged;
    }

    fn check_ring(&self, other: &Self) {
        assert!(
            Arc::ptr_eq(&self.ring, &other.ring) || self.ring == other.ring,
            "polynomials from different rings: {} and {}",
            self.ring,
            other.ring
        );
    }

    fn add_ref(&self, other: &Self) -> Self {
        self.check_ring(other);
        let order = self.ring.order();
        let mut terms = Vec::with_capacity(self.terms.len() + other.terms.len());
        let (mut i, mut j) = (0, 0);
        while i < self.terms.len() && j < other.terms.len() {
            let (ma, ca) = &self.terms[i];
            let (mb, cb) = &other.terms[j];
            match order.compare(ma, mb) {
                Ordering::Greater => {
                    terms.push((ma.clone(), ca.clone()));
                    i += 1;
                }
                Ordering::Less => {
                    terms.push((mb.clone(), cb.clone()));
                    j += 1;
                }
                Ordering::Equal => {
                    let c = ca.clone() + cb.clone();
                    if !c.is_zero() {
                        terms.push((ma.clone(), c));
                    }
                    i += 1;
                    j += 1;
                }
            }
        }
        terms.extend_from_slice(&self.terms[i..]);
        terms.extend_from_slice(&other.terms[j..]);
        Self {
            ring: self.ring.clone(),
            terms,
        }
    }

    fn sub_ref(&self, other: &Self) -> Self {
        self.add_ref(&other.neg_ref())
    }

    fn neg_ref(&self) -> Self {
        Self {
            ring: self.ring.clone(),
            terms: self
                .terms
                .iter()
                .map(|(m, c)| (m.clone(), -c.clone()))
                .collect(),
        }
    }

    fn mul_ref(&self, other: &Self) -> Self {
        self.check_ring(other);
        if self.is_zero() || other.is_zero() {
            return Self::zero(self.ring.clone());
        }
        let mut acc: FxHashMap<Monomial, C> = FxHashMap::default();
        for (ma, ca) in &self.terms {
            for (mb, cb) in &other.terms {
                let m = ma.mul(mb);
                let c = ca.clone() * cb.clone();
                acc.entry(m)
                    .and_modify(|e| *e = e.clone() + c.clone())
                    .or_insert(c);
            }
        }
        Self::from_terms(self.ring.clone(), acc.into_iter().collect())
    }
}

fn pow_coeff<C: Ring>(x: &C, mut e: u32) -> C {
    let mut base = x.clone();
    let mut acc = C::one();
    while e > 0 {
        if e & 1 == 1 {
            acc = acc * base.clone();
        }
        e >>= 1;
        if e > 0 {
            base = base.clone() * base;
        }
    }
    acc
}

impl Polynomial<Integer> {
    /// Reduces every coefficient into `[0, |n|)`.
    #[must_use]
    pub fn reduce_mod(&self, n: &Integer) -> Self {
        Self::from_terms(
            self.ring.clone(),
            self.terms
                .iter()
                .map(|(m, c)| (m.clone(), c.modulo(n)))
                .collect(),
        )
    }

    /// Gcd of the coefficients, 0 for the zero polynomial.
    #[must_use]
    pub fn content(&self) -> Integer {
        self.terms
            .iter()
            .fold(Integer::zero(), |g, (_, c)| g.gcd(c))
    }

    /// Divides every coefficient by `d`, if all are divisible.
    #[must_use]
    pub fn div_exact(&self, d: &Integer) -> Option<Self> {
        let terms = self
            .terms
            .iter()
            .map(|(m, c)| c.div_exact(d).map(|q| (m.clone(), q)))
            .collect::<Option<Vec<_>>>()?;
        Some(Self {
            ring: self.ring.clone(),
            terms,
        })
    }

    /// Largest absolute coefficient.
    #[must_use]
    pub fn max_abs_coeff(&self) -> Integer {
        self.terms
            .iter()
            .map(|(_, c)| c.abs())
            .max()
            .unwrap_or_else(Integer::zero)
    }

    /// The same polynomial over ℚ.
    #[must_use]
    pub fn to_rational(&self) -> Polynomial<Rational> {
        self.map_coeffs(|c| Rational::from(c))
    }
}

impl Polynomial<Rational> {
    /// Multiplies by the lcm of the denominators.
    ///
    /// Returns the integer polynomial and the multiplier.
    #[must_use]
    pub fn clear_denominators(&self) -> (Polynomial<Integer>, Integer) {
        let denom = self
            .terms
            .iter()
            .fold(Integer::one(), |l, (_, c)| l.lcm(&c.denominator()));
        let poly = self.map_coeffs(|c| {
            (c.numerator() * &denom)
                .div_exact(&c.denominator())
                .unwrap_or_else(Integer::zero)
        });
        (poly, denom)
    }

    /// Divides by the leading coefficient.
    #[must_use]
    pub fn monic(&self) -> Self {
        match self.leading_coeff().and_then(Rational::inv) {
            Some(inv) => self.scale(&inv),
            None => self.clone(),
        }
    }
}

impl<C: Ring> PartialEq for Polynomial<C> {
    fn eq(&self, other: &Self) -> bool {
        self.terms == other.terms && self.ring == other.ring
    }
}

impl<C: Ring> Eq for Polynomial<C> {}

impl<C: Ring + Hash> Hash for Polynomial<C> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.terms.hash(state);
    }
}

macro_rules! forward_binop {
    ($trait:ident, $method:ident, $inner:ident) => {
        impl<C: Ring> $trait for &Polynomial<C> {
            type Output = Polynomial<C>;

            fn $method(self, rhs: Self) -> Self::Output {
                self.$inner(rhs)
            }
        }

        impl<C: Ring> $trait for Polynomial<C> {
            type Output = Polynomial<C>;

            fn $method(self, rhs: Self) -> Self::Output {
                (&self).$method(&rhs)
            }
        }

        impl<C: Ring> $trait<&Polynomial<C>> for Polynomial<C> {
            type Output = Polynomial<C>;

            fn $method(self, rhs: &Polynomial<C>) -> Self::Output {
                (&self).$method(rhs)
            }
        }
    };
}

forward_binop!(Add, add, add_ref);
forward_binop!(Sub, sub, sub_ref);
forward_binop!(Mul, mul, mul_ref);

impl<C: Ring> Neg for Polynomial<C> {
    type Output = Self;

    fn neg(self) -> Self::Output {
        self.neg_ref()
    }
}

impl<C: Ring> Neg for &Polynomial<C> {
    type Output = Polynomial<C>;

    fn neg(self) -> Self::Output {
        self.neg_ref()
    }
}

fn write_monomial(f: &mut fmt::Formatter<'_>, ring: &PolyRing, m: &Monomial) -> fmt::Result {
    let mut first = true;
    for (i, &e) in m.exponents().iter().enumerate() {
        if e == 0 {
            continue;
        }
        if !first {
            write!(f, "*")?;
        }
        first = false;
        write!(f, "{}", ring.variables()[i])?;
        if e > 1 {
            write!(f, "^{e}")?;
        }
    }
    Ok(())
}

impl<C: Ring> fmt::Display for Polynomial<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.terms.is_empty() {
            return write!(f, "0");
        }
        for (k, (m, c)) in self.terms.iter().enumerate() {
            let text = c.to_string();
            let (negative, magnitude) = match text.strip_prefix('-') {
                Some(rest) => (true, rest.to_string()),
                None => (false, text),
            };
            match (k, negative) {
                (0, true) => write!(f, "-")?,
                (0, false) => {}
                (_, true) => write!(f, " - ")?,
                (_, false) => write!(f, " + ")?,
            }
            if m.is_one() {
                write!(f, "{magnitude}")?;
            } else {
                if magnitude != "1" {
                    if magnitude.contains('/') {
                        write!(f, "({magnitude})*")?;
                    } else {
                        write!(f, "{magnitude}*")?;
                    }
                }
                write_monomial(f, &self.ring, m)?;
            }
        }
        Ok(())
    }
}

impl<C: Ring> fmt::Debug for Polynomial<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}
