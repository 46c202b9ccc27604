//! Pair bookkeeping and Buchberger's criteria.
//!
//! These criteria allow early rejection of pairs whose S-polynomial would
//! reduce to zero.

use rustc_hash::FxHashSet;
use smallroots_poly::{Monomial, TermOrder};

/// A critical pair `(i, j)` with `i < j` and the lcm of the leading monomials.
#[derive(Clone, Debug)]
pub struct CriticalPair {
    /// Smaller basis index.
    pub i: usize,
    /// Larger basis index.
    pub j: usize,
    /// `lcm(lm(g_i), lm(g_j))`.
    pub lcm: Monomial,
}

impl CriticalPair {
    /// Creates the pair for basis elements `i` and `j`.
    #[must_use]
    pub fn new(i: usize, j: usize, lm_i: &Monomial, lm_j: &Monomial) -> Self {
        let (i, j) = if i < j { (i, j) } else { (j, i) };
        Self {
            i,
            j,
            lcm: lm_i.lcm(lm_j),
        }
    }
}

/// Buchberger's first criterion (product criterion).
///
/// Over a field, coprime leading monomials mean the S-polynomial reduces
/// to zero. This does not hold over ℤ.
#[must_use]
pub fn product_criterion(lm_f: &Monomial, lm_g: &Monomial) -> bool {
    lm_f.is_coprime(lm_g)
}

/// Buchberger's second criterion (chain criterion).
///
/// The pair is redundant if some other basis element's leading monomial
/// divides the pair's lcm and both connecting pairs are already done.
/// `admissible(k)` adds a side condition on the third element.
#[must_use]
pub fn chain_criterion(
    pair: &CriticalPair,
    leading: &[Monomial],
    processed: &FxHashSet<(usize, usize)>,
    admissible: impl Fn(usize) -> bool,
) -> bool {
    leading.iter().enumerate().any(|(k, lm_k)| {
        if k == pair.i || k == pair.j || !lm_k.divides(&pair.lcm) || !admissible(k) {
            return false;
        }
        let ik = (pair.i.min(k), pair.i.max(k));
        let jk = (pair.j.min(k), pair.j.max(k));
        processed.contains(&ik) && processed.contains(&jk)
    })
}

/// Removes and returns the pair with the smallest lcm (normal strategy).
pub fn select_pair(pairs: &mut Vec<CriticalPair>, order: &TermOrder) -> Option<CriticalPair> {
    let best = pairs
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| order.compare(&a.lcm, &b.lcm))
        .map(|(idx, _)| idx)?;
    Some(pairs.swap_remove(best))
}
