//! Known and symbolic moduli.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::Mul;

use num_traits::One;
use smallroots_integers::Integer;
use smallroots_poly::Variable;

use crate::solution::PartialSolution;

/// A modulus `c * p_1^e_1 * ... * p_k^e_k`.
///
/// The symbols `p_i` are unknown moduli, treated as pairwise coprime and
/// coprime to the coefficient. With no symbols the modulus is a known
/// integer.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Modulus {
    coeff: Integer,
    symbols: BTreeMap<Variable, u32>,
}

impl Modulus {
    /// A known integer modulus. The sign is dropped.
    #[must_use]
    pub fn known(n: Integer) -> Self {
        Self {
            coeff: n.abs(),
            symbols: BTreeMap::new(),
        }
    }

    /// An unknown modulus named `p`.
    #[must_use]
    pub fn symbol(p: Variable) -> Self {
        Self {
            coeff: Integer::one(),
            symbols: BTreeMap::from([(p, 1)]),
        }
    }

    /// The integer value when no symbol occurs.
    #[must_use]
    pub fn as_integer(&self) -> Option<&Integer> {
        self.symbols.is_empty().then_some(&self.coeff)
    }

    /// True when the modulus involves unknown symbols.
    #[must_use]
    pub fn is_symbolic(&self) -> bool {
        !self.symbols.is_empty()
    }

    /// The integer coefficient.
    #[must_use]
    pub fn coefficient(&self) -> &Integer {
        &self.coeff
    }

    /// Symbols and their exponents, in name order.
    pub fn symbols(&self) -> impl Iterator<Item = (&Variable, u32)> + '_ {
        self.symbols.iter().map(|(v, &e)| (v, e))
    }

    /// Exponent of `p`, zero if absent.
    #[must_use]
    pub fn exponent(&self, p: &Variable) -> u32 {
        self.symbols.get(p).copied().unwrap_or(0)
    }

    /// `self^k`.
    #[must_use]
    pub fn pow(&self, k: u32) -> Self {
        Self {
            coeff: self.coeff.pow(k),
            symbols: self
                .symbols
                .iter()
                .filter(|_| k > 0)
                .map(|(v, &e)| (v.clone(), e * k))
                .collect(),
        }
    }

    /// Greatest common divisor, treating symbols as distinct primes.
    #[must_use]
    pub fn gcd(&self, other: &Self) -> Self {
        let symbols = self
            .symbols
            .iter()
            .filter_map(|(v, &e)| {
                let f = other.exponent(v).min(e);
                (f > 0).then(|| (v.clone(), f))
            })
            .collect();
        Self {
            coeff: self.coeff.gcd(&other.coeff),
            symbols,
        }
    }

    /// Least common multiple, treating symbols as distinct primes.
    #[must_use]
    pub fn lcm(&self, other: &Self) -> Self {
        let mut symbols = self.symbols.clone();
        for (v, &e) in &other.symbols {
            let slot = symbols.entry(v.clone()).or_insert(0);
            *slot = (*slot).max(e);
        }
        Self {
            coeff: self.coeff.lcm(&other.coeff),
            symbols,
        }
    }

    /// The value under `values`, if every symbol is assigned.
    #[must_use]
    pub fn evaluate(&self, values: &PartialSolution) -> Option<Integer> {
        let mut acc = self.coeff.clone();
        for (v, &e) in &self.symbols {
            acc = acc * values.get(v)?.pow(e);
        }
        Some(acc)
    }

    /// Folds the assigned symbols into the coefficient; the others stay.
    #[must_use]
    pub fn substitute(&self, values: &PartialSolution) -> Self {
        let mut coeff = self.coeff.clone();
        let mut symbols = BTreeMap::new();
        for (v, &e) in &self.symbols {
            match values.get(v) {
                Some(x) => coeff = coeff * x.abs().pow(e),
                None => {
                    symbols.insert(v.clone(), e);
                }
            }
        }
        Self { coeff, symbols }
    }

    /// Evaluates with `f` supplying a value per symbol.
    pub(crate) fn evaluate_with<E>(
        &self,
        mut f: impl FnMut(&Variable) -> Result<Integer, E>,
    ) -> Result<Integer, E> {
        let mut acc = self.coeff.clone();
        for (v, &e) in &self.symbols {
            acc = acc * f(v)?.pow(e);
        }
        Ok(acc)
    }
}

impl Mul for &Modulus {
    type Output = Modulus;

    fn mul(self, rhs: Self) -> Modulus {
        let mut symbols = self.symbols.clone();
        for (v, &e) in &rhs.symbols {
            *symbols.entry(v.clone()).or_insert(0) += e;
        }
        Modulus {
            coeff: &self.coeff * &rhs.coeff,
            symbols,
        }
    }
}

impl From<Integer> for Modulus {
    fn from(n: Integer) -> Self {
        Self::known(n)
    }
}

impl From<Variable> for Modulus {
    fn from(p: Variable) -> Self {
        Self::symbol(p)
    }
}

impl fmt::Display for Modulus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = Vec::new();
        if !self.coeff.is_one() || self.symbols.is_empty() {
            parts.push(self.coeff.to_string());
        }
        for (v, &e) in &self.symbols {
            if e == 1 {
                parts.push(v.to_string());
            } else {
                parts.push(format!("{v}^{e}"));
            }
        }
        write!(f, "{}", parts.join("*"))
    }
}

impl fmt::Debug for Modulus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Modulus({self})")
    }
}

/// Combines two optional moduli, treating `None` as the identity.
#[must_use]
pub fn combine(
    a: Option<&Modulus>,
    b: Option<&Modulus>,
    op: impl FnOnce(&Modulus, &Modulus) -> Modulus,
) -> Option<Modulus> {
    match (a, b) {
        (None, None) => None,
        (Some(m), None) | (None, Some(m)) => Some(m.clone()),
        (Some(a), Some(b)) => Some(op(a, b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p() -> Modulus {
        Modulus::symbol(Variable::new("p"))
    }

    fn q() -> Modulus {
        Modulus::symbol(Variable::new("q"))
    }

    #[test]
    fn test_display() {
        assert_eq!(Modulus::known(Integer::new(-3233)).to_string(), "3233");
        let m = &(&p().pow(2) * &q()) * &Modulus::known(Integer::new(2));
        assert_eq!(m.to_string(), "2*p^2*q");
        assert_eq!(p().to_string(), "p");
    }

    #[test]
    fn test_gcd_and_lcm() {
        let a = &p().pow(3) * &Modulus::known(Integer::new(12));
        let b = &(&p() * &q()) * &Modulus::known(Integer::new(18));
        assert_eq!(a.gcd(&b).to_string(), "6*p");
        assert_eq!(a.lcm(&b).to_string(), "36*p^3*q");
        assert_eq!(p().gcd(&q()).as_integer(), Some(&Integer::one()));
    }

    #[test]
    fn test_evaluate() {
        let m = &p().pow(2) * &q();
        let mut values = PartialSolution::new();
        values.insert(Variable::new("p"), Integer::new(3));
        assert_eq!(m.evaluate(&values), None);
        values.insert(Variable::new("q"), Integer::new(5));
        assert_eq!(m.evaluate(&values), Some(Integer::new(45)));
    }

    #[test]
    fn test_substitute_keeps_unassigned() {
        let m = &(&p().pow(2) * &q()) * &Modulus::known(Integer::new(2));
        let mut values = PartialSolution::new();
        values.insert(Variable::new("p"), Integer::new(3));
        let partial = m.substitute(&values);
        assert_eq!(partial.to_string(), "18*q");
        values.insert(Variable::new("q"), Integer::new(5));
        assert_eq!(partial.substitute(&values).as_integer(), Some(&Integer::new(90)));
    }

    #[test]
    fn test_combine_identity() {
        let n = Modulus::known(Integer::new(7));
        assert_eq!(combine(None, Some(&n), |a, b| a * b), Some(n.clone()));
        assert_eq!(combine(Some(&n), None, |a, b| a * b), Some(n.clone()));
        assert_eq!(combine(None, None, |a, b| a * b), None);
    }
}
