//! Dense row-major matrices.
//!
//! Lattice bases here are small (a few hundred rows at most) but carry
//! large entries, so a flat `Vec` of big integers is all that is needed.

use std::fmt;
use std::ops::{Index, IndexMut};

use num_traits::Zero;
use smallroots_integers::{Integer, Ring};

/// Dense matrix stored in row-major order.
#[derive(Clone, PartialEq, Eq)]
pub struct DenseMatrix<R> {
    data: Vec<R>,
    num_rows: usize,
    num_cols: usize,
}

impl<R: Ring> DenseMatrix<R> {
    /// Creates a new matrix filled with zeros.
    #[must_use]
    pub fn zeros(num_rows: usize, num_cols: usize) -> Self {
        Self {
            data: vec![R::zero(); num_rows * num_cols],
            num_rows,
            num_cols,
        }
    }

    /// Creates a matrix from its rows.
    ///
    /// # Panics
    ///
    /// Panics if the rows have different lengths.
    #[must_use]
    pub fn from_rows(rows: Vec<Vec<R>>) -> Self {
        let num_rows = rows.len();
        let num_cols = rows.first().map_or(0, Vec::len);
        let data: Vec<R> = rows.into_iter().flatten().collect();
        assert_eq!(data.len(), num_rows * num_cols, "ragged rows");
        Self {
            data,
            num_rows,
            num_cols,
        }
    }

    /// Creates an identity matrix.
    #[must_use]
    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m[(i, i)] = R::one();
        }
        m
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn num_cols(&self) -> usize {
        self.num_cols
    }

    /// Returns a slice of the specified row.
    #[must_use]
    pub fn row(&self, row: usize) -> &[R] {
        let start = row * self.num_cols;
        &self.data[start..start + self.num_cols]
    }

    /// Returns a mutable slice of the specified row.
    pub fn row_mut(&mut self, row: usize) -> &mut [R] {
        let start = row * self.num_cols;
        &mut self.data[start..start + self.num_cols]
    }

    /// Iterates over the rows.
    pub fn rows(&self) -> impl Iterator<Item = &[R]> {
        (0..self.num_rows).map(move |i| self.row(i))
    }

    /// Returns a column as a vector.
    #[must_use]
    pub fn col(&self, col: usize) -> Vec<R> {
        (0..self.num_rows).map(|row| self[(row, col)].clone()).collect()
    }

    /// Row vector times matrix: `x * A`, a combination of the rows.
    ///
    /// # Panics
    ///
    /// Panics if `x` does not have one entry per row.
    #[must_use]
    pub fn combine_rows(&self, x: &[R]) -> Vec<R> {
        assert_eq!(x.len(), self.num_rows);
        (0..self.num_cols)
            .map(|col| {
                x.iter()
                    .enumerate()
                    .filter(|(_, c)| !c.is_zero())
                    .fold(R::zero(), |acc, (row, c)| {
                        acc + c.clone() * self[(row, col)].clone()
                    })
            })
            .collect()
    }

    /// Swaps two rows in-place.
    pub fn swap_rows(&mut self, i: usize, j: usize) {
        if i == j {
            return;
        }
        let i_start = i * self.num_cols;
        let j_start = j * self.num_cols;
        for k in 0..self.num_cols {
            self.data.swap(i_start + k, j_start + k);
        }
    }

    /// Adds a scaled row to another: `row[target] += scale * row[source]`.
    pub fn add_scaled_row(&mut self, target: usize, source: usize, scale: &R) {
        for k in 0..self.num_cols {
            let val = self[(source, k)].clone() * scale.clone();
            self[(target, k)] = self[(target, k)].clone() + val;
        }
    }

    /// Scales a row by a scalar.
    pub fn scale_row(&mut self, row: usize, scale: &R) {
        for v in self.row_mut(row) {
            *v = v.clone() * scale.clone();
        }
    }

    /// Scales a column by a scalar.
    pub fn scale_col(&mut self, col: usize, scale: &R) {
        for row in 0..self.num_rows {
            self[(row, col)] = self[(row, col)].clone() * scale.clone();
        }
    }

    /// The matrix made of the selected rows, in the given order.
    #[must_use]
    pub fn select_rows(&self, rows: &[usize]) -> Self {
        Self::from_rows(rows.iter().map(|&i| self.row(i).to_vec()).collect())
            .with_cols(self.num_cols)
    }

    /// Applies `f` to every entry.
    #[must_use]
    pub fn map<S: Ring>(&self, f: impl Fn(&R) -> S) -> DenseMatrix<S> {
        DenseMatrix {
            data: self.data.iter().map(f).collect(),
            num_rows: self.num_rows,
            num_cols: self.num_cols,
        }
    }

    // `from_rows` cannot know the width of an empty row list
    fn with_cols(mut self, num_cols: usize) -> Self {
        if self.num_rows == 0 {
            self.num_cols = num_cols;
        }
        self
    }
}

impl DenseMatrix<Integer> {
    /// Row-style Hermite normal form: an echelon basis of the row lattice.
    ///
    /// Pivots are positive, entries above a pivot are reduced into
    /// `[0, pivot)`, and zero rows are dropped. Columns are processed left
    /// to right, so the leftmost columns are eliminated first.
    #[must_use]
    pub fn hermite_form(&self) -> Self {
        let mut m = self.clone();
        let mut pivot_row = 0;
        for col in 0..m.num_cols {
            if pivot_row == m.num_rows {
                break;
            }
            // fold every lower row into the pivot row with Bezout steps
            for row in pivot_row + 1..m.num_rows {
                let b = m[(row, col)].clone();
                if b.is_zero() {
                    continue;
                }
                let a = m[(pivot_row, col)].clone();
                let (g, u, v) = a.extended_gcd(&b);
                let (a_g, b_g) = (a / &g, b / &g);
                for k in col..m.num_cols {
                    let top = &u * &m[(pivot_row, k)] + &v * &m[(row, k)];
                    let bottom = &a_g * &m[(row, k)] - &b_g * &m[(pivot_row, k)];
                    m[(pivot_row, k)] = top;
                    m[(row, k)] = bottom;
                }
            }
            if m[(pivot_row, col)].is_zero() {
                continue;
            }
            if m[(pivot_row, col)].is_negative() {
                m.scale_row(pivot_row, &Integer::new(-1));
            }
            let pivot = m[(pivot_row, col)].clone();
            for row in 0..pivot_row {
                let q = m[(row, col)].div_floor(&pivot);
                if !q.is_zero() {
                    m.add_scaled_row(row, pivot_row, &-q);
                }
            }
            pivot_row += 1;
        }
        let rows: Vec<usize> = (0..pivot_row).collect();
        m.select_rows(&rows)
    }
}

impl<R> Index<(usize, usize)> for DenseMatrix<R> {
    type Output = R;

    fn index(&self, (row, col): (usize, usize)) -> &R {
        &self.data[row * self.num_cols + col]
    }
}

impl<R> IndexMut<(usize, usize)> for DenseMatrix<R> {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut R {
        &mut self.data[row * self.num_cols + col]
    }
}

impl<R: fmt::Display> fmt::Debug for DenseMatrix<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[{} x {}]", self.num_rows, self.num_cols)?;
        for row in 0..self.num_rows {
            let start = row * self.num_cols;
            let entries: Vec<String> = self.data[start..start + self.num_cols]
                .iter()
                .map(ToString::to_string)
                .collect();
            writeln!(f, "[{}]", entries.join(" "))?;
        }
        Ok(())
    }
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
    fn test_row_operations() {
        let mut m = int_matrix(&[&[1, 2], &[3, 4]]);
        m.add_scaled_row(1, 0, &Integer::new(-3));
        assert_eq!(m, int_matrix(&[&[1, 2], &[0, -2]]));
        m.swap_rows(0, 1);
        m.scale_col(1, &Integer::new(5));
        assert_eq!(m, int_matrix(&[&[0, -10], &[1, 10]]));
        assert_eq!(m.col(0), vec![Integer::new(0), Integer::new(1)]);
    }

    #[test]
    fn test_combine_rows() {
        let m = int_matrix(&[&[1, 0, 2], &[0, 1, 3]]);
        let v = m.combine_rows(&[Integer::new(2), Integer::new(-1)]);
        assert_eq!(v, vec![Integer::new(2), Integer::new(-1), Integer::new(1)]);
    }

    #[test]
    fn test_select_rows_keeps_width() {
        let m = int_matrix(&[&[1, 2, 3]]);
        let empty = m.select_rows(&[]);
        assert_eq!(empty.num_rows(), 0);
        assert_eq!(empty.num_cols(), 3);
    }

    #[test]
    fn test_hermite_form() {
        let m = int_matrix(&[&[4, 6], &[6, 9], &[2, 4]]);
        let h = m.hermite_form();
        // first coordinate even, second unrestricted
        assert_eq!(h, int_matrix(&[&[2, 0], &[0, 1]]));
    }

    #[test]
    fn test_hermite_form_drops_dependent_rows() {
        let m = int_matrix(&[&[1, 1, 0], &[2, 2, 0], &[0, 0, 5]]);
        let h = m.hermite_form();
        assert_eq!(h, int_matrix(&[&[1, 1, 0], &[0, 0, 5]]));
    }
}
