//! Symmetric diagonal-offset storage.

use crate::dense::DenseMatrix;
use crate::error::ValidationError;
use crate::traits::LinearOperator;
use crate::types::StorageFormat;

/// Symmetric matrix stored as a set of super-diagonals.
///
/// # Layout
///
/// `offsets[k]` names a super-diagonal (0 is the main diagonal) and
/// `values[i + k * n] = A(i, i + offsets[k])`. Slots with
/// `i + offsets[k] >= n` fall outside the matrix and are ignored. The
/// sub-diagonals are implied by symmetry.
///
/// Offsets need not be sorted. Repeating an offset adds the two diagonals.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagOffsetSym {
    n: usize,
    offsets: Vec<usize>,
    values: Vec<f64>,
}

impl DiagOffsetSym {
    /// Wrap an `n x offsets.len()` column-major diagonal array.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ParameterOutOfRange`] for an offset that
    /// does not reach into the matrix, and
    /// [`ValidationError::DimensionMismatch`] unless
    /// `values.len() == n * offsets.len()`.
    pub fn new(n: usize, offsets: Vec<usize>, values: Vec<f64>) -> Result<Self, ValidationError> {
        if let Some(&bad) = offsets.iter().find(|&&d| d >= n.max(1)) {
            return Err(ValidationError::ParameterOutOfRange {
                name: "offset".into(),
                value: bad.to_string(),
                expected: format!("< order {n}"),
            });
        }
        if values.len() != n * offsets.len() {
            return Err(ValidationError::DimensionMismatch(format!(
                "order {} with {} diagonals needs {} values, got {}",
                n,
                offsets.len(),
                n * offsets.len(),
                values.len(),
            )));
        }
        Ok(Self { n, offsets, values })
    }

    /// Pick the listed super-diagonals out of a dense matrix.
    pub fn from_dense_upper(dense: &DenseMatrix, offsets: Vec<usize>) -> Result<Self, ValidationError> {
        let n = dense.rows();
        if dense.cols() != n {
            return Err(ValidationError::DimensionMismatch(format!(
                "diagonal-offset storage needs a square matrix, got {}x{}",
                n,
                dense.cols(),
            )));
        }
        let mut values = vec![0.0; n * offsets.len()];
        for (k, &d) in offsets.iter().enumerate() {
            for i in 0..n.saturating_sub(d) {
                values[i + k * n] = dense.get(i, i + d);
            }
        }
        Self::new(n, offsets, values)
    }

    /// Second-difference matrix of order `n`, offsets `[0, 1]`.
    ///
    /// Order 1 keeps only the main diagonal.
    pub fn dif2(n: usize) -> Self {
        let offsets: Vec<usize> = if n > 1 { vec![0, 1] } else { vec![0] };
        let mut values = vec![2.0; n * offsets.len()];
        if n > 1 {
            values[n..].fill(-1.0);
            // A(n-1, n) is outside the matrix.
            values[2 * n - 1] = 0.0;
        }
        Self { n, offsets, values }
    }

    /// Stored super-diagonal offsets.
    #[inline]
    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    /// Raw diagonal storage.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Visit every in-matrix stored entry as `(i, i + d, value)`.
    #[inline]
    fn for_each_stored(&self, mut f: impl FnMut(usize, usize, f64)) {
        for (k, &d) in self.offsets.iter().enumerate() {
            let diagonal = &self.values[k * self.n..(k + 1) * self.n];
            for (i, &a) in diagonal.iter().enumerate().take(self.n.saturating_sub(d)) {
                f(i, i + d, a);
            }
        }
    }
}

impl LinearOperator for DiagOffsetSym {
    fn rows(&self) -> usize {
        self.n
    }

    fn cols(&self) -> usize {
        self.n
    }

    fn format(&self) -> StorageFormat {
        StorageFormat::DiagOffsetSym
    }

    fn stored_entries(&self) -> usize {
        self.values.len()
    }

    fn matvec_into(&self, x: &[f64], y: &mut [f64]) {
        debug_assert_eq!(x.len(), self.n, "diag-offset matvec: x.len() != n");
        debug_assert_eq!(y.len(), self.n, "diag-offset matvec: y.len() != n");

        y.fill(0.0);
        self.for_each_stored(|i, j, a| {
            y[i] += a * x[j];
            if j != i {
                y[j] += a * x[i];
            }
        });
    }

    fn to_dense(&self) -> DenseMatrix {
        let mut dense = DenseMatrix::zeros(self.n, self.n);
        self.for_each_stored(|i, j, a| {
            dense.add_at(i, j, a);
            if j != i {
                dense.add_at(j, i, a);
            }
        });
        dense
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Symmetric 5x5 with nonzeros on offsets 0, 1 and 3 only.
    fn irregular() -> DenseMatrix {
        DenseMatrix::from_rows(&[
            vec![4.0, 1.0, 0.0, -2.0, 0.0],
            vec![1.0, 5.0, 1.5, 0.0, 0.5],
            vec![0.0, 1.5, 6.0, 2.0, 0.0],
            vec![-2.0, 0.0, 2.0, 7.0, -1.0],
            vec![0.0, 0.5, 0.0, -1.0, 8.0],
        ])
        .unwrap()
    }

    #[test]
    fn matvec_reflects_off_diagonals() {
        let dense = irregular();
        let a = DiagOffsetSym::from_dense_upper(&dense, vec![0, 1, 3]).unwrap();
        assert_eq!(a.to_dense(), dense);

        let x = [1.0, 2.0, -1.0, 0.5, 3.0];
        let expected = dense.matvec(&x);
        for (yi, ei) in a.matvec(&x).iter().zip(&expected) {
            assert!((yi - ei).abs() < 1e-12);
        }
    }

    #[test]
    fn unsorted_offsets_are_fine() {
        let dense = irregular();
        let a = DiagOffsetSym::from_dense_upper(&dense, vec![3, 0, 1]).unwrap();
        assert_eq!(a.to_dense(), dense);
    }

    #[test]
    fn padding_beyond_matrix_is_ignored() {
        let mut a = DiagOffsetSym::dif2(4).as_slice().to_vec();
        a[7] = 123.0;
        let a = DiagOffsetSym::new(4, vec![0, 1], a).unwrap();
        assert_eq!(a.to_dense(), DenseMatrix::dif2(4));
    }

    #[test]
    fn rejects_offset_outside_matrix() {
        assert!(matches!(
            DiagOffsetSym::new(3, vec![0, 3], vec![0.0; 6]),
            Err(ValidationError::ParameterOutOfRange { .. })
        ));
        assert!(matches!(
            DiagOffsetSym::new(3, vec![0, 1], vec![0.0; 5]),
            Err(ValidationError::DimensionMismatch(_))
        ));
    }

    #[test]
    fn dif2_matches_dense() {
        assert_eq!(DiagOffsetSym::dif2(6).to_dense(), DenseMatrix::dif2(6));
        assert_eq!(DiagOffsetSym::dif2(1).matvec(&[1.5]), vec![3.0]);
    }
}
