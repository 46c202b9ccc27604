//! Open-interval bounds on unknowns.

use std::collections::BTreeMap;
use std::fmt;

use num_traits::{One, Zero};
use smallroots_integers::Integer;
use smallroots_poly::{Monomial, Polynomial, Variable};

use crate::error::{Error, Result};
use crate::modulus::Modulus;
use crate::solution::PartialSolution;

/// The open interval `(lower, upper)`; either side may be unbounded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bound {
    /// Exclusive lower bound.
    pub lower: Option<Integer>,
    /// Exclusive upper bound.
    pub upper: Option<Integer>,
}

impl Bound {
    /// `lower < x < upper`.
    #[must_use]
    pub fn new(lower: Integer, upper: Integer) -> Self {
        Self {
            lower: Some(lower),
            upper: Some(upper),
        }
    }

    /// `-bound < x < bound`.
    #[must_use]
    pub fn symmetric(bound: &Integer) -> Self {
        Self::new(-bound, bound.clone())
    }

    /// True if `value` lies strictly inside.
    #[must_use]
    pub fn contains(&self, value: &Integer) -> bool {
        self.lower.as_ref().map_or(true, |lo| value > lo)
            && self.upper.as_ref().map_or(true, |hi| value < hi)
    }

    /// Largest absolute value of the two ends, if both are set.
    #[must_use]
    pub fn max_abs(&self) -> Option<Integer> {
        let (lo, hi) = (self.lower.as_ref()?, self.upper.as_ref()?);
        Some(lo.abs().max(hi.abs()))
    }

    /// Writes `lower < name < upper`, abbreviating large ends as `±2^k`.
    fn write_for(&self, f: &mut fmt::Formatter<'_>, name: &Variable) -> fmt::Result {
        if let Some(lo) = &self.lower {
            write!(f, "{} < ", abbreviate(lo))?;
        }
        write!(f, "{name}")?;
        if let Some(hi) = &self.upper {
            write!(f, " < {}", abbreviate(hi))?;
        }
        Ok(())
    }
}

fn abbreviate(v: &Integer) -> String {
    if v.abs() < Integer::new(1000) {
        return v.to_string();
    }
    let sign = if v.is_negative() { "-" } else { "" };
    format!("{sign}2^{:.1}", v.log2())
}

/// Anything a [`BoundSet`] can bound: variables, polynomials and moduli.
pub trait Bounded {
    /// Lower bound on the value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingBound`] if an ingredient is unbounded.
    fn lower_in(&self, bounds: &BoundSet) -> Result<Integer>;

    /// Upper bound on the value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingBound`] if an ingredient is unbounded.
    fn upper_in(&self, bounds: &BoundSet) -> Result<Integer>;
}

impl Bounded for Variable {
    fn lower_in(&self, bounds: &BoundSet) -> Result<Integer> {
        bounds
            .get(self)
            .and_then(|b| b.lower.clone())
            .ok_or_else(|| Error::MissingBound(format!("lower bound not set for {self}")))
    }

    fn upper_in(&self, bounds: &BoundSet) -> Result<Integer> {
        bounds
            .get(self)
            .and_then(|b| b.upper.clone())
            .ok_or_else(|| Error::MissingBound(format!("upper bound not set for {self}")))
    }
}

impl Bounded for Polynomial<Integer> {
    fn lower_in(&self, bounds: &BoundSet) -> Result<Integer> {
        match as_generator(self) {
            Some(v) => v.lower_in(bounds),
            None => Ok(-bounds.poly_max_bound(self)?),
        }
    }

    fn upper_in(&self, bounds: &BoundSet) -> Result<Integer> {
        match as_generator(self) {
            Some(v) => v.upper_in(bounds),
            None => bounds.poly_max_bound(self),
        }
    }
}

impl Bounded for Modulus {
    fn lower_in(&self, bounds: &BoundSet) -> Result<Integer> {
        self.evaluate_with(|p| p.lower_in(bounds))
    }

    fn upper_in(&self, bounds: &BoundSet) -> Result<Integer> {
        self.evaluate_with(|p| p.upper_in(bounds))
    }
}

fn as_generator(f: &Polynomial<Integer>) -> Option<&Variable> {
    let [(m, c)] = f.terms() else {
        return None;
    };
    if !c.is_one() || m.total_degree() != 1 {
        return None;
    }
    let i = m.support().next()?;
    f.ring().variables().get(i)
}

/// Bounds keyed by variable.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct BoundSet(BTreeMap<Variable, Bound>);

impl BoundSet {
    /// The empty bound set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the bound of `v`.
    pub fn insert(&mut self, v: Variable, bound: Bound) -> Option<Bound> {
        self.0.insert(v, bound)
    }

    /// The bound of `v`.
    #[must_use]
    pub fn get(&self, v: &Variable) -> Option<&Bound> {
        self.0.get(v)
    }

    /// True if `v` has a bound.
    #[must_use]
    pub fn contains(&self, v: &Variable) -> bool {
        self.0.contains_key(v)
    }

    /// `(variable, bound)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&Variable, &Bound)> + '_ {
        self.0.iter()
    }

    /// Number of bounded variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if nothing is bounded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Lower bound of a variable, polynomial or modulus.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingBound`] if an ingredient is unbounded.
    pub fn lower_bound<T: Bounded + ?Sized>(&self, target: &T) -> Result<Integer> {
        target.lower_in(self)
    }

    /// Upper bound of a variable, polynomial or modulus.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingBound`] if an ingredient is unbounded.
    pub fn upper_bound<T: Bounded + ?Sized>(&self, target: &T) -> Result<Integer> {
        target.upper_in(self)
    }

    /// Bound on the absolute value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingBound`] if an ingredient is unbounded.
    pub fn abs_bound<T: Bounded + ?Sized>(&self, target: &T) -> Result<Integer> {
        let hi = target.upper_in(self)?;
        let lo = target.lower_in(self)?;
        Ok(hi.abs().max(lo.abs()))
    }

    /// Largest absolute value a monomial takes inside the bounds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingBound`] if a generator it contains is
    /// unbounded.
    pub fn monomial_bound(&self, m: &Monomial, variables: &[Variable]) -> Result<Integer> {
        let mut acc = Integer::one();
        for i in m.support() {
            let v = &variables[i];
            let b = self
                .get(v)
                .and_then(Bound::max_abs)
                .ok_or_else(|| Error::MissingBound(format!("no two-sided bound for {v}")))?;
            acc = acc * b.pow(m.exponent(i));
        }
        Ok(acc)
    }

    /// Triangle bound `Σ |c_i| * max|m_i|` on the absolute value of `f`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingBound`] if a generator occurring in `f` is
    /// unbounded.
    pub fn poly_max_bound(&self, f: &Polynomial<Integer>) -> Result<Integer> {
        let variables = f.ring().variables();
        let mut total = Integer::zero();
        for (m, c) in f.terms() {
            total = total + c.abs() * self.monomial_bound(m, variables)?;
        }
        Ok(total)
    }

    /// True if every assigned, bounded variable lies inside its bound.
    /// Unbounded variables are ignored.
    #[must_use]
    pub fn check(&self, solution: &PartialSolution) -> bool {
        self.0
            .iter()
            .all(|(v, b)| solution.get(v).map_or(true, |x| b.contains(x)))
    }
}

impl FromIterator<(Variable, Bound)> for BoundSet {
    fn from_iter<T: IntoIterator<Item = (Variable, Bound)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for BoundSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Bounds(")?;
        for (v, b) in &self.0 {
            write!(f, "\t")?;
            b.write_for(f, v)?;
            writeln!(f, ",")?;
        }
        write!(f, ")")
    }
}

impl fmt::Debug for BoundSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.0.keys().map(Variable::name).collect();
        write!(f, "BoundSet for ({})", names.join(", "))
    }
}
