//! Term orders.
//!
//! Coppersmith shift selection needs a graded order whose weights are the
//! bit sizes of the variable bounds. Weights are integers in units of
//! `1/1024` bit so that comparisons are exact and the order is stable
//! under multiplication.

use std::cmp::Ordering;

use smallroots_integers::Integer;

use crate::monomial::{cmp_grevlex, cmp_lex, cmp_weighted, Monomial};

/// Fixed-point scale of [`TermOrder::weighted_by_bounds`] weights.
pub const WEIGHT_SCALE: u64 = 1024;

/// A monomial ordering.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Default)]
pub enum TermOrder {
    /// Lexicographic order with the first generator largest.
    Lex,

    /// Graded reverse lexicographic order.
    #[default]
    Grevlex,

    /// Weighted degree with lexicographic tiebreak.
    WeightedDegLex(Vec<u64>),
}

impl TermOrder {
    /// Compares two monomials according to this ordering.
    #[must_use]
    pub fn compare(&self, a: &Monomial, b: &Monomial) -> Ordering {
        match self {
            TermOrder::Lex => cmp_lex(a, b),
            TermOrder::Grevlex => cmp_grevlex(a, b),
            TermOrder::WeightedDegLex(w) => cmp_weighted(a, b, w),
        }
    }

    /// Weighted degree-lex order with weight `log2(X_i)` per generator.
    ///
    /// Bounds of at most 1 get weight one bit so that every generator
    /// still raises the degree.
    #[must_use]
    pub fn weighted_by_bounds(bounds: &[Integer]) -> Self {
        let weights = bounds
            .iter()
            .map(|b| {
                let bits = b.log2();
                if bits.is_finite() && bits > 1.0 {
                    // truncation of a positive float
                    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                    let w = (bits * WEIGHT_SCALE as f64).round() as u64;
                    w.max(WEIGHT_SCALE)
                } else {
                    WEIGHT_SCALE
                }
            })
            .collect();
        TermOrder::WeightedDegLex(weights)
    }

    /// Returns a short name for the ordering.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            TermOrder::Lex => "lex",
            TermOrder::Grevlex => "grevlex",
            TermOrder::WeightedDegLex(_) => "wdeglex",
        }
    }
}

impl std::fmt::Display for TermOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bound_weights() {
        let order = TermOrder::weighted_by_bounds(&[Integer::pow2(10), Integer::new(1)]);
        assert_eq!(order, TermOrder::WeightedDegLex(vec![10 * 1024, 1024]));
    }

    #[test]
    fn test_weighted_order_prefers_heavy_variables() {
        let order = TermOrder::weighted_by_bounds(&[Integer::pow2(8), Integer::pow2(64)]);
        let x4 = Monomial::from_exponents(&[4, 0]);
        let y = Monomial::from_exponents(&[0, 1]);
        assert_eq!(order.compare(&y, &x4), Ordering::Greater);
    }
}
