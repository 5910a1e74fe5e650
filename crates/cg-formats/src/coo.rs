//! Sparse coordinate (triplet) storage.

use crate::dense::DenseMatrix;
use crate::error::ValidationError;
use crate::traits::LinearOperator;
use crate::types::StorageFormat;

/// Sparse matrix as explicit `(row, col, value)` triplets.
///
/// Triplets are kept in insertion order. Repeated `(row, col)` pairs are not
/// merged; they add up in every kernel.
#[derive(Debug, Clone, PartialEq)]
pub struct SparseCoo {
    rows: usize,
    cols: usize,
    row_indices: Vec<usize>,
    col_indices: Vec<usize>,
    values: Vec<f64>,
}

impl SparseCoo {
    /// Empty `rows x cols` matrix.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            row_indices: Vec::new(),
            col_indices: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Build from `(row, col, value)` triplets.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::IndexOutOfBounds`] for the first triplet
    /// outside `rows x cols`.
    pub fn from_triplets(
        rows: usize,
        cols: usize,
        entries: impl IntoIterator<Item = (usize, usize, f64)>,
    ) -> Result<Self, ValidationError> {
        let mut matrix = Self::new(rows, cols);
        for (r, c, v) in entries {
            matrix.push(r, c, v)?;
        }
        Ok(matrix)
    }

    /// Append one triplet.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::IndexOutOfBounds`] if `(row, col)` lies
    /// outside the matrix.
    pub fn push(&mut self, row: usize, col: usize, value: f64) -> Result<(), ValidationError> {
        if row >= self.rows || col >= self.cols {
            return Err(ValidationError::IndexOutOfBounds {
                entry: self.values.len(),
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        self.row_indices.push(row);
        self.col_indices.push(col);
        self.values.push(value);
        Ok(())
    }

    /// Second-difference matrix of order `n`, triplets in row order.
    pub fn dif2(n: usize) -> Self {
        let mut matrix = Self::new(n, n);
        for i in 0..n {
            if i > 0 {
                matrix.push_unchecked(i, i - 1, -1.0);
            }
            matrix.push_unchecked(i, i, 2.0);
            if i + 1 < n {
                matrix.push_unchecked(i, i + 1, -1.0);
            }
        }
        matrix
    }

    fn push_unchecked(&mut self, row: usize, col: usize, value: f64) {
        self.row_indices.push(row);
        self.col_indices.push(col);
        self.values.push(value);
    }

    /// Number of stored triplets, duplicates included.
    #[inline]
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Iterate over stored `(row, col, value)` triplets in insertion order.
    pub fn triplets(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.row_indices
            .iter()
            .zip(&self.col_indices)
            .zip(&self.values)
            .map(|((&r, &c), &v)| (r, c, v))
    }
}

impl LinearOperator for SparseCoo {
    fn rows(&self) -> usize {
        self.rows
    }

    fn cols(&self) -> usize {
        self.cols
    }

    fn format(&self) -> StorageFormat {
        StorageFormat::SparseCoo
    }

    fn stored_entries(&self) -> usize {
        self.values.len()
    }

    fn matvec_into(&self, x: &[f64], y: &mut [f64]) {
        debug_assert_eq!(x.len(), self.cols, "coo matvec: x.len() != cols");
        debug_assert_eq!(y.len(), self.rows, "coo matvec: y.len() != rows");

        y.fill(0.0);
        for (r, c, v) in self.triplets() {
            y[r] += v * x[c];
        }
    }

    fn to_dense(&self) -> DenseMatrix {
        let mut dense = DenseMatrix::zeros(self.rows, self.cols);
        for (r, c, v) in self.triplets() {
            dense.add_at(r, c, v);
        }
        dense
    }
}
