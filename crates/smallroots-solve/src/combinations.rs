//! Exponent vectors in order of increasing weight, and related helpers.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use rustc_hash::FxHashSet;
use smallroots_integers::Integer;
use smallroots_poly::{Monomial, Polynomial};

/// Smallest weight a coordinate may carry; a zero weight would make the
/// enumeration revisit the same total forever.
pub const MIN_WEIGHT: f64 = 1e-3;

#[derive(Clone, Debug)]
struct Entry {
    score: f64,
    exps: Vec<u32>,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .total_cmp(&other.score)
            .then_with(|| self.exps.cmp(&other.exps))
    }
}

/// Nonnegative integer vectors `e` in order of increasing `Σ e_i w_i`.
///
/// The iterator is infinite; callers stop once the weight passes their
/// limit. Ties are broken by the exponent vectors themselves, so the
/// order is deterministic.
#[derive(Clone, Debug)]
pub struct WeightedCombinations {
    weights: Vec<f64>,
    heap: BinaryHeap<Reverse<Entry>>,
    seen: FxHashSet<Vec<u32>>,
}

impl WeightedCombinations {
    /// Starts at the zero vector. Weights below [`MIN_WEIGHT`] are raised
    /// to it.
    #[must_use]
    pub fn new(weights: &[f64]) -> Self {
        let weights: Vec<f64> = weights
            .iter()
            .map(|&w| if w.is_finite() { w.max(MIN_WEIGHT) } else { MIN_WEIGHT })
            .collect();
        let zero = vec![0; weights.len()];
        let mut seen = FxHashSet::default();
        seen.insert(zero.clone());
        let mut heap = BinaryHeap::new();
        heap.push(Reverse(Entry {
            score: 0.0,
            exps: zero,
        }));
        Self {
            weights,
            heap,
            seen,
        }
    }

    fn score(&self, exps: &[u32]) -> f64 {
        exps.iter()
            .zip(&self.weights)
            .map(|(&e, w)| f64::from(e) * w)
            .sum()
    }
}

impl Iterator for WeightedCombinations {
    type Item = (Vec<u32>, f64);

    fn next(&mut self) -> Option<Self::Item> {
        let Reverse(Entry { score, exps }) = self.heap.pop()?;
        for i in 0..exps.len() {
            let mut next = exps.clone();
            next[i] += 1;
            if self.seen.insert(next.clone()) {
                let score = self.score(&next);
                self.heap.push(Reverse(Entry { score, exps: next }));
            }
        }
        Some((exps, score))
    }
}

/// True if the monomials occurring in `polys` are exactly their leading
/// monomials, each leading exactly one polynomial.
#[must_use]
pub fn is_suitable(polys: &[Polynomial<Integer>]) -> bool {
    let mut leading: FxHashSet<&Monomial> = FxHashSet::default();
    for f in polys {
        match f.leading_monomial() {
            Some(lm) if leading.insert(lm) => {}
            _ => return false,
        }
    }
    polys
        .iter()
        .flat_map(Polynomial::monomials)
        .all(|m| leading.contains(m))
}

/// Sizes `2^n` and `3 * 2^n`, from 2 up, at which a growing batch of
/// shift relations is worth trying early.
#[must_use]
pub fn is_intermediate_size(n: usize) -> bool {
    if n < 2 {
        return false;
    }
    n.is_power_of_two() || (n % 3 == 0 && (n / 3).is_power_of_two())
}
