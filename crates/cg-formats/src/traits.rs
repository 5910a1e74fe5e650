//! Operator trait.
//!
//! Every storage format implements [`LinearOperator`]. The CG solver is
//! written once against this trait and never inspects the layout behind it.

use crate::dense::DenseMatrix;
use crate::types::StorageFormat;

/// A real matrix stored in some compact encoding.
///
/// Implementors are immutable after construction, so the trait requires
/// `Send + Sync` and every method takes `&self`.
pub trait LinearOperator: Send + Sync {
    /// Number of rows.
    fn rows(&self) -> usize;

    /// Number of columns.
    fn cols(&self) -> usize;

    /// Storage layout of this operator.
    fn format(&self) -> StorageFormat;

    /// Number of scalars held by the compact storage.
    fn stored_entries(&self) -> usize;

    /// Compute `y = A * x` into a caller-provided buffer.
    ///
    /// Uses only the compact representation; out-of-band entries are
    /// implicit zeros.
    ///
    /// # Panics
    ///
    /// Debug-asserts that `x.len() == self.cols()` and
    /// `y.len() == self.rows()`.
    fn matvec_into(&self, x: &[f64], y: &mut [f64]);

    /// Expand to a column-major dense matrix.
    ///
    /// For cross-checking and debugging only; the kernels never call it.
    fn to_dense(&self) -> DenseMatrix;

    /// Order of a square operator (`rows()`).
    #[inline]
    fn order(&self) -> usize {
        self.rows()
    }

    /// `true` if the operator has as many rows as columns.
    #[inline]
    fn is_square(&self) -> bool {
        self.rows() == self.cols()
    }

    /// Compute and return `y = A * x`.
    fn matvec(&self, x: &[f64]) -> Vec<f64> {
        let mut y = vec![0.0f64; self.rows()];
        self.matvec_into(x, &mut y);
        y
    }

    /// Compute the residual `r = b - A * x`.
    ///
    /// Evaluated as a full [`matvec`](Self::matvec) followed by element-wise
    /// subtraction, so `residual(x, b)[i] == b[i] - matvec(x)[i]` holds
    /// exactly.
    fn residual(&self, x: &[f64], b: &[f64]) -> Vec<f64> {
        debug_assert_eq!(b.len(), self.rows(), "residual: b.len() != rows");
        let mut r = self.matvec(x);
        for (ri, &bi) in r.iter_mut().zip(b) {
            *ri = bi - *ri;
        }
        r
    }
}

impl<T: LinearOperator + ?Sized> LinearOperator for &T {
    fn rows(&self) -> usize {
        (**self).rows()
    }

    fn cols(&self) -> usize {
        (**self).cols()
    }

    fn format(&self) -> StorageFormat {
        (**self).format()
    }

    fn stored_entries(&self) -> usize {
        (**self).stored_entries()
    }

    fn matvec_into(&self, x: &[f64], y: &mut [f64]) {
        (**self).matvec_into(x, y)
    }

    fn to_dense(&self) -> DenseMatrix {
        (**self).to_dense()
    }
}
