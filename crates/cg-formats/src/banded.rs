//! Symmetric banded storage (upper triangle only).

use crate::dense::DenseMatrix;
use crate::error::ValidationError;
use crate::traits::LinearOperator;
use crate::types::StorageFormat;

/// Symmetric banded matrix holding the diagonal and `mu` super-diagonals.
///
/// # Layout
///
/// A `(mu + 1) x n` band, column-major. For `j - mu <= i <= j`:
///
/// ```text
/// values[(mu + i - j) + j * (mu + 1)] = A(i, j)
/// ```
///
/// so band row `mu` is the main diagonal and band row `mu - k` is the `k`-th
/// super-diagonal. Slots with `i < 0` (the top-left triangle of the band) are
/// ignored. The lower triangle is implied by symmetry, and `matvec` applies
/// each strictly-upper entry to both `y[i]` and `y[j]`.
#[derive(Debug, Clone, PartialEq)]
pub struct BandedUpperSym {
    n: usize,
    mu: usize,
    values: Vec<f64>,
}

impl BandedUpperSym {
    /// Wrap a `(mu + 1) x n` column-major band.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DimensionMismatch`] unless
    /// `values.len() == (mu + 1) * n`, and
    /// [`ValidationError::ParameterOutOfRange`] if `mu >= n` for `n > 0`.
    pub fn new(n: usize, mu: usize, values: Vec<f64>) -> Result<Self, ValidationError> {
        if n > 0 && mu >= n {
            return Err(ValidationError::ParameterOutOfRange {
                name: "mu".into(),
                value: mu.to_string(),
                expected: format!("< order {n}"),
            });
        }
        if values.len() != (mu + 1) * n {
            return Err(ValidationError::DimensionMismatch(format!(
                "banded order {} with mu = {} needs {} values, got {}",
                n,
                mu,
                (mu + 1) * n,
                values.len(),
            )));
        }
        Ok(Self { n, mu, values })
    }

    /// Build from the upper band of a dense matrix. Entries outside the band
    /// and below the diagonal are not read.
    pub fn from_dense_upper(dense: &DenseMatrix, mu: usize) -> Result<Self, ValidationError> {
        let n = dense.rows();
        if dense.cols() != n {
            return Err(ValidationError::DimensionMismatch(format!(
                "banded storage needs a square matrix, got {}x{}",
                n,
                dense.cols(),
            )));
        }
        let mut values = vec![0.0; (mu + 1) * n];
        for j in 0..n {
            for i in j.saturating_sub(mu)..=j {
                values[(mu + i - j) + j * (mu + 1)] = dense.get(i, j);
            }
        }
        Self::new(n, mu, values)
    }

    /// Second-difference matrix of order `n` (`mu = 1`).
    ///
    /// Order 1 has no off-diagonal and is stored with `mu = 0`.
    pub fn dif2(n: usize) -> Self {
        let mu = usize::from(n > 1);
        let mut values = vec![0.0; (mu + 1) * n];
        for j in 0..n {
            if j > 0 {
                values[(mu - 1) + j * (mu + 1)] = -1.0;
            }
            values[mu + j * (mu + 1)] = 2.0;
        }
        Self { n, mu, values }
    }

    /// Upper bandwidth.
    #[inline]
    pub fn mu(&self) -> usize {
        self.mu
    }

    /// Raw band storage.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// `A(i, j)` for `j - mu <= i <= j`.
    #[inline]
    fn band(&self, i: usize, j: usize) -> f64 {
        self.values[(self.mu + i - j) + j * (self.mu + 1)]
    }
}

impl LinearOperator for BandedUpperSym {
    fn rows(&self) -> usize {
        self.n
    }

    fn cols(&self) -> usize {
        self.n
    }

    fn format(&self) -> StorageFormat {
        StorageFormat::BandedUpperSym
    }

    fn stored_entries(&self) -> usize {
        self.values.len()
    }

    fn matvec_into(&self, x: &[f64], y: &mut [f64]) {
        debug_assert_eq!(x.len(), self.n, "banded matvec: x.len() != n");
        debug_assert_eq!(y.len(), self.n, "banded matvec: y.len() != n");

        for j in 0..self.n {
            y[j] = self.band(j, j) * x[j];
        }

        for j in 0..self.n {
            for i in j.saturating_sub(self.mu)..j {
                let a = self.band(i, j);
                y[i] += a * x[j];
                y[j] += a * x[i];
            }
        }
    }

    fn to_dense(&self) -> DenseMatrix {
        let mut dense = DenseMatrix::zeros(self.n, self.n);
        for j in 0..self.n {
            dense.add_at(j, j, self.band(j, j));
            for i in j.saturating_sub(self.mu)..j {
                let a = self.band(i, j);
                dense.add_at(i, j, a);
                dense.add_at(j, i, a);
            }
        }
        dense
    }
}
