//! LLL (Lenstra-Lenstra-Lovász) lattice reduction.
//!
//! This is the all-integer variant (Cohen, *A Course in Computational
//! Algebraic Number Theory*, Algorithm 2.6.7). Instead of the rational
//! Gram-Schmidt coefficients `μ_ij` it tracks
//!
//! - `d_i`, the Gram determinant of the first `i` rows, and
//! - `λ_ij = d_j μ_ij`,
//!
//! both of which are integers, so every step is exact and the output
//! depends on nothing but the input basis and `δ`.

use num_traits::{One, Zero};
use smallroots_integers::{Integer, Rational};
use tracing::trace;

use crate::error::LatticeError;
use crate::matrix::DenseMatrix;

/// LLL parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LllConfig {
    /// Lovász constant, in `(1/4, 1)`.
    pub delta: Rational,
}

impl Default for LllConfig {
    fn default() -> Self {
        Self {
            delta: Rational::from_i64(99, 100),
        }
    }
}

/// Result of LLL reduction.
#[derive(Clone, Debug)]
pub struct LllResult {
    /// The reduced basis, one vector per row.
    pub basis: DenseMatrix<Integer>,
    /// Number of row swaps performed.
    pub swaps: usize,
}

fn dot(a: &[Integer], b: &[Integer]) -> Integer {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Working state. Indices are 1-based as in the textbook; `d[0] = 1`.
struct State {
    b: DenseMatrix<Integer>,
    d: Vec<Integer>,
    lambda: Vec<Vec<Integer>>,
}

impl State {
    fn row(&self, k: usize) -> &[Integer] {
        self.b.row(k - 1)
    }

    /// Incremental Gram-Schmidt for row `k`.
    fn orthogonalize(&mut self, k: usize) -> Result<(), LatticeError> {
        for j in 1..=k {
            let mut u = dot(self.row(k), self.row(j));
            for i in 1..j {
                u = (&self.d[i] * &u - &self.lambda[k][i] * &self.lambda[j][i])
                    .div_exact(&self.d[i - 1])
                    .ok_or(LatticeError::DependentRows { row: k - 1 })?;
            }
            if j < k {
                self.lambda[k][j] = u;
            } else if u.is_zero() {
                return Err(LatticeError::DependentRows { row: k - 1 });
            } else {
                self.d[k] = u;
            }
        }
        Ok(())
    }

    /// Size-reduces row `k` against row `l`.
    fn reduce(&mut self, k: usize, l: usize) {
        let two_lambda = &self.lambda[k][l] + &self.lambda[k][l];
        if two_lambda.abs() <= self.d[l] {
            return;
        }
        let q = self.lambda[k][l].div_round(&self.d[l]);
        self.b.add_scaled_row(k - 1, l - 1, &-&q);
        self.lambda[k][l] = &self.lambda[k][l] - &(&q * &self.d[l]);
        for i in 1..l {
            self.lambda[k][i] = &self.lambda[k][i] - &(&q * &self.lambda[l][i]);
        }
    }

    /// Swaps rows `k-1` and `k` and repairs `d` and `λ`.
    fn swap(&mut self, k: usize, kmax: usize) {
        self.b.swap_rows(k - 1, k - 2);
        for j in 1..k - 1 {
            let t = std::mem::take(&mut self.lambda[k][j]);
            self.lambda[k][j] = std::mem::replace(&mut self.lambda[k - 1][j], t);
        }
        let lam = self.lambda[k][k - 1].clone();
        let big_b = (&self.d[k - 2] * &self.d[k] + &lam * &lam) / &self.d[k - 1];
        for i in k + 1..=kmax {
            let t = self.lambda[i][k].clone();
            self.lambda[i][k] =
                (&self.d[k] * &self.lambda[i][k - 1] - &lam * &t) / &self.d[k - 1];
            self.lambda[i][k - 1] = (&big_b * &t + &lam * &self.lambda[i][k]) / &self.d[k];
        }
        self.d[k - 1] = big_b;
    }

    /// Lovász condition fails for row `k`.
    fn should_swap(&self, k: usize, p: &Integer, q: &Integer) -> bool {
        let lam = &self.lambda[k][k - 1];
        let lhs = q * &(&self.d[k] * &self.d[k - 2]);
        let rhs = p * &(&self.d[k - 1] * &self.d[k - 1]) - q * &(lam * lam);
        lhs < rhs
    }
}

/// Reduces the rows of `basis`.
///
/// # Errors
///
/// Returns [`LatticeError::DependentRows`] if the rows are not linearly
/// independent.
pub fn lll_reduce(
    basis: &DenseMatrix<Integer>,
    config: &LllConfig,
) -> Result<LllResult, LatticeError> {
    let n = basis.num_rows();
    if n <= 1 {
        if n == 1 && basis.row(0).iter().all(Zero::is_zero) {
            return Err(LatticeError::DependentRows { row: 0 });
        }
        return Ok(LllResult {
            basis: basis.clone(),
            swaps: 0,
        });
    }
    let (p, q) = (config.delta.numerator(), config.delta.denominator());

    let mut state = State {
        b: basis.clone(),
        d: vec![Integer::zero(); n + 1],
        lambda: vec![vec![Integer::zero(); n + 1]; n + 1],
    };
    state.d[0] = Integer::one();
    state.orthogonalize(1)?;

    let mut k = 2;
    let mut kmax = 1;
    let mut swaps = 0;
    while k <= n {
        if k > kmax {
            kmax = k;
            state.orthogonalize(k)?;
        }
        state.reduce(k, k - 1);
        if state.should_swap(k, &p, &q) {
            state.swap(k, kmax);
            swaps += 1;
            k = (k - 1).max(2);
        } else {
            for l in (1..k - 1).rev() {
                state.reduce(k, l);
            }
            k += 1;
        }
    }
    trace!(target: "smallroots::Lll", rows = n, swaps, "LLL finished");
    Ok(LllResult {
        basis: state.b,
        swaps,
    })
}

/// Squared Euclidean norm of a row.
#[must_use]
pub fn norm_squared(v: &[Integer]) -> Integer {
    dot(v, v)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int_matrix(rows: &[&[i64]]) -> DenseMatrix<Integer> {
        DenseMatrix::from_rows(
            rows.iter()
                .map(|r| r.iter().map(|&v| Integer::new(v)).collect())
                .collect(),
        )
    }

    #[test]
    fn test_textbook_example() {
        let basis = int_matrix(&[&[1, 1, 1], &[-1, 0, 2], &[3, 5, 6]]);
        let reduced = lll_reduce(&basis, &LllConfig::default()).unwrap().basis;
        assert_eq!(reduced, int_matrix(&[&[0, 1, 0], &[1, 0, 1], &[-1, 0, 2]]));
    }

    #[test]
    fn test_finds_short_relation() {
        // 1*a + 2*b - 1*c = 0 for the knapsack (a, b, c) = (101, 203, 507)
        let scale = 1_000_000;
        let basis = int_matrix(&[
            &[1, 0, 0, 101 * scale],
            &[0, 1, 0, 203 * scale],
            &[0, 0, 1, 507 * scale],
        ]);
        let reduced = lll_reduce(&basis, &LllConfig::default()).unwrap().basis;
        let first = reduced.row(0);
        assert!(first[3].is_zero());
        // any relation among 101, 203, 507 has this small norm
        assert!(norm_squared(first) <= Integer::new(30));
    }

    #[test]
    fn test_dependent_rows() {
        let basis = int_matrix(&[&[1, 2], &[2, 4]]);
        assert!(matches!(
            lll_reduce(&basis, &LllConfig::default()),
            Err(LatticeError::DependentRows { .. })
        ));
    }

    #[test]
    fn test_reduced_basis_spans_same_lattice() {
        let basis = int_matrix(&[&[201, 37], &[1648, 297]]);
        let reduced = lll_reduce(&basis, &LllConfig::default()).unwrap().basis;
        // determinant preserved up to sign
        let det = |m: &DenseMatrix<Integer>| {
            &m[(0, 0)] * &m[(1, 1)] - &m[(0, 1)] * &m[(1, 0)]
        };
        assert_eq!(det(&reduced).abs(), det(&basis).abs());
        assert_eq!(reduced.row(0), &[Integer::new(1), Integer::new(32)]);
    }
}
