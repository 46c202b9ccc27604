//! Floating-point Gram-Schmidt data for enumeration.
//!
//! Entries are exact integers of arbitrary size; they are brought into
//! `f64` range by a common power-of-two shift, which scales every length
//! uniformly and leaves the geometry intact. Results of anything built on
//! top of this are only candidates and must be re-checked exactly.

use smallroots_integers::Integer;

use crate::matrix::DenseMatrix;

/// Bits of headroom kept below the `f64` exponent limit.
const TARGET_BITS: usize = 60;

/// Gram-Schmidt orthogonalisation of an integer basis.
#[derive(Clone, Debug)]
pub struct GramSchmidt {
    shift: usize,
    /// `mu[i][j] = <b_i, b*_j> / <b*_j, b*_j>` for `j < i`.
    mu: Vec<Vec<f64>>,
    /// `‖b*_i‖²`, in shifted units.
    r: Vec<f64>,
    /// Orthogonal vectors `b*_i`, in shifted units.
    orthogonal: Vec<Vec<f64>>,
}

impl GramSchmidt {
    /// Orthogonalises the rows of `basis`.
    #[must_use]
    pub fn new(basis: &DenseMatrix<Integer>) -> Self {
        let max_bits = basis
            .rows()
            .flat_map(|row| row.iter().map(Integer::bit_len))
            .max()
            .unwrap_or(0);
        let shift = max_bits.saturating_sub(TARGET_BITS);
        let n = basis.num_rows();
        let rows: Vec<Vec<f64>> = basis
            .rows()
            .map(|row| row.iter().map(|v| v.to_f64_scaled(shift)).collect())
            .collect();

        let mut mu = vec![vec![0.0; n]; n];
        let mut r = vec![0.0; n];
        let mut orthogonal: Vec<Vec<f64>> = Vec::with_capacity(n);
        for (i, row) in rows.iter().enumerate() {
            let mut v = row.clone();
            // modified Gram-Schmidt: project the running vector
            for j in 0..i {
                let m = if r[j] > 0.0 { dot(&v, &orthogonal[j]) / r[j] } else { 0.0 };
                mu[i][j] = m;
                for (vk, bk) in v.iter_mut().zip(&orthogonal[j]) {
                    *vk -= m * bk;
                }
            }
            r[i] = dot(&v, &v);
            orthogonal.push(v);
        }
        Self {
            shift,
            mu,
            r,
            orthogonal,
        }
    }

    /// Number of basis vectors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.r.len()
    }

    /// True for an empty basis.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.r.is_empty()
    }

    /// `μ_ij` for `j < i`.
    #[must_use]
    pub fn mu(&self, i: usize, j: usize) -> f64 {
        self.mu[i][j]
    }

    /// `‖b*_i‖²` in shifted units.
    #[must_use]
    pub fn r(&self, i: usize) -> f64 {
        self.r[i]
    }

    /// Converts an exact squared length into the shifted units used here.
    #[must_use]
    pub fn normalize_squared(&self, value: &Integer) -> f64 {
        value.to_f64_scaled(2 * self.shift)
    }

    /// Coordinates of `target` with respect to the orthogonal basis:
    /// `<t, b*_i> / ‖b*_i‖²`.
    #[must_use]
    pub fn from_canonical(&self, target: &[Integer]) -> Vec<f64> {
        let t: Vec<f64> = target.iter().map(|v| v.to_f64_scaled(self.shift)).collect();
        self.orthogonal
            .iter()
            .zip(&self.r)
            .map(|(b, &r)| if r > 0.0 { dot(&t, b) / r } else { 0.0 })
            .collect()
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
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
    fn test_orthogonalisation() {
        let gso = GramSchmidt::new(&int_matrix(&[&[3, 1], &[2, 2]]));
        assert!((gso.r(0) - 10.0).abs() < 1e-12);
        assert!((gso.mu(1, 0) - 0.8).abs() < 1e-12);
        // det^2 = (3*2 - 1*2)^2 = 16
        assert!((gso.r(0) * gso.r(1) - 16.0).abs() < 1e-9);
    }

    #[test]
    fn test_from_canonical_recovers_lattice_point() {
        let basis = int_matrix(&[&[1, 2, 0], &[0, 1, 3]]);
        let gso = GramSchmidt::new(&basis);
        // t = 2*b0 - b1
        let t = basis.combine_rows(&[Integer::new(2), Integer::new(-1)]);
        let coords = gso.from_canonical(&t);
        // back substitution recovers the integer coefficients
        let x1 = coords[1];
        let x0 = coords[0] - x1 * gso.mu(1, 0);
        assert!((x1 + 1.0).abs() < 1e-9);
        assert!((x0 - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_large_entries_are_shifted() {
        let big = Integer::pow2(3000);
        let basis = DenseMatrix::from_rows(vec![
            vec![big.clone(), Integer::new(0)],
            vec![Integer::new(0), big.clone()],
        ]);
        let gso = GramSchmidt::new(&basis);
        assert!(gso.r(0).is_finite() && gso.r(0) > 0.0);
        let ratio = gso.normalize_squared(&(&big * &big)) / gso.r(1);
        assert!((ratio - 1.0).abs() < 1e-9);
    }
}
