//! General dense storage.

use crate::error::ValidationError;
use crate::traits::LinearOperator;
use crate::types::StorageFormat;

/// General dense matrix, column-major.
///
/// # Layout
///
/// For a `rows x cols` matrix, `values[i + j * rows] = A(i, j)`. There is no
/// structural constraint; rectangular matrices are allowed for `matvec`, the
/// solver requires a square one.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseMatrix {
    rows: usize,
    cols: usize,
    values: Vec<f64>,
}

impl DenseMatrix {
    /// Wrap a column-major value array.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DimensionMismatch`] if
    /// `values.len() != rows * cols`.
    pub fn new(rows: usize, cols: usize, values: Vec<f64>) -> Result<Self, ValidationError> {
        if values.len() != rows * cols {
            return Err(ValidationError::DimensionMismatch(format!(
                "dense {}x{} matrix needs {} values, got {}",
                rows,
                cols,
                rows * cols,
                values.len(),
            )));
        }
        Ok(Self { rows, cols, values })
    }

    /// All-zero `rows x cols` matrix.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            values: vec![0.0; rows * cols],
        }
    }

    /// Square identity matrix of order `n`.
    pub fn identity(n: usize) -> Self {
        Self::from_fn(n, n, |i, j| if i == j { 1.0 } else { 0.0 })
    }

    /// Build a matrix by evaluating `f(i, j)` at every position.
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> f64) -> Self {
        let mut values = Vec::with_capacity(rows * cols);
        for j in 0..cols {
            for i in 0..rows {
                values.push(f(i, j));
            }
        }
        Self { rows, cols, values }
    }

    /// Build a matrix from row slices.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DimensionMismatch`] if the rows are ragged.
    pub fn from_rows(data: &[Vec<f64>]) -> Result<Self, ValidationError> {
        let rows = data.len();
        let cols = data.first().map_or(0, Vec::len);
        if let Some((i, row)) = data.iter().enumerate().find(|(_, r)| r.len() != cols) {
            return Err(ValidationError::DimensionMismatch(format!(
                "row {} has {} columns, row 0 has {}",
                i,
                row.len(),
                cols,
            )));
        }
        Ok(Self::from_fn(rows, cols, |i, j| data[i][j]))
    }

    /// Second-difference matrix of order `n`: 2 on the diagonal, -1 on both
    /// off-diagonals.
    pub fn dif2(n: usize) -> Self {
        Self::from_fn(n, n, |i, j| {
            if i == j {
                2.0
            } else if i + 1 == j || j + 1 == i {
                -1.0
            } else {
                0.0
            }
        })
    }

    /// Entry `A(i, j)`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= rows` or `j >= cols`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        assert!(i < self.rows && j < self.cols, "dense index ({i}, {j}) out of bounds");
        self.values[i + j * self.rows]
    }

    /// Column-major value array.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Add `v` to `A(i, j)`. Used while expanding other formats.
    #[inline]
    pub(crate) fn add_at(&mut self, i: usize, j: usize, v: f64) {
        self.values[i + j * self.rows] += v;
    }

    /// Largest absolute entry-wise difference to `other`, or `None` if the
    /// shapes differ.
    pub fn max_abs_diff(&self, other: &DenseMatrix) -> Option<f64> {
        if self.rows != other.rows || self.cols != other.cols {
            return None;
        }
        Some(
            self.values
                .iter()
                .zip(&other.values)
                .map(|(a, b)| (a - b).abs())
                .fold(0.0f64, f64::max),
        )
    }
}

impl LinearOperator for DenseMatrix {
    fn rows(&self) -> usize {
        self.rows
    }

    fn cols(&self) -> usize {
        self.cols
    }

    fn format(&self) -> StorageFormat {
        StorageFormat::Dense
    }

    fn stored_entries(&self) -> usize {
        self.values.len()
    }

    fn matvec_into(&self, x: &[f64], y: &mut [f64]) {
        debug_assert_eq!(x.len(), self.cols, "dense matvec: x.len() != cols");
        debug_assert_eq!(y.len(), self.rows, "dense matvec: y.len() != rows");

        y.fill(0.0);
        for (j, column) in self.values.chunks_exact(self.rows.max(1)).enumerate().take(self.cols) {
            let xj = x[j];
            for (yi, &aij) in y.iter_mut().zip(column) {
                *yi += aij * xj;
            }
        }
    }

    fn to_dense(&self) -> DenseMatrix {
        self.clone()
    }
}
