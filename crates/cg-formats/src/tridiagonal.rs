//! Tridiagonal storage: per-column band, Toeplitz scalar triple, and
//! per-row triples.
//!
//! All three layouts describe the same structure. Row `i` of the matrix has
//! at most three nonzeros, `A(i, i-1)`, `A(i, i)` and `A(i, i+1)`; the first
//! and last rows drop the neighbour that falls outside the matrix. The kernels
//! share [`tridiagonal_matvec`] and differ only in how they look up the three
//! coefficients of a row.

use crate::dense::DenseMatrix;
use crate::error::ValidationError;
use crate::traits::LinearOperator;
use crate::types::StorageFormat;

/// `y[i] = sub_i * x[i-1] + diag_i * x[i] + sup_i * x[i+1]`, where `row(i)`
/// yields `[sub_i, diag_i, sup_i]`. Out-of-range neighbour terms are omitted,
/// whatever `row` returns for them.
#[inline]
fn tridiagonal_matvec(x: &[f64], y: &mut [f64], row: impl Fn(usize) -> [f64; 3]) {
    let n = y.len();
    debug_assert_eq!(x.len(), n, "tridiagonal matvec: x.len() != y.len()");

    for i in 0..n {
        let [sub, diag, sup] = row(i);
        let mut sum = 0.0;
        if i > 0 {
            sum += sub * x[i - 1];
        }
        sum += diag * x[i];
        if i + 1 < n {
            sum += sup * x[i + 1];
        }
        y[i] = sum;
    }
}

/// Expand a tridiagonal matrix given by its row triples.
fn tridiagonal_to_dense(n: usize, row: impl Fn(usize) -> [f64; 3]) -> DenseMatrix {
    let mut dense = DenseMatrix::zeros(n, n);
    for i in 0..n {
        let [sub, diag, sup] = row(i);
        if i > 0 {
            dense.add_at(i, i - 1, sub);
        }
        dense.add_at(i, i, diag);
        if i + 1 < n {
            dense.add_at(i, i + 1, sup);
        }
    }
    dense
}

/// Check the three diagonals of an order-`n` tridiagonal matrix.
fn check_diagonals(sub: &[f64], diag: &[f64], sup: &[f64]) -> Result<usize, ValidationError> {
    let n = diag.len();
    let off = n.saturating_sub(1);
    if sub.len() != off || sup.len() != off {
        return Err(ValidationError::DimensionMismatch(format!(
            "order {} tridiagonal needs {} sub- and super-diagonal values, got {} and {}",
            n,
            off,
            sub.len(),
            sup.len(),
        )));
    }
    Ok(n)
}

fn check_band_len(n: usize, len: usize, what: &str) -> Result<(), ValidationError> {
    if len != 3 * n {
        return Err(ValidationError::DimensionMismatch(format!(
            "{what} of order {n} needs {} values, got {len}",
            3 * n,
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// TriCol
// ---------------------------------------------------------------------------

/// Tridiagonal matrix stored as a 3 x N column-major band.
///
/// # Layout
///
/// Column `j` occupies `values[3*j..3*j + 3]`:
///
/// | slot | entry         |
/// |------|---------------|
/// | 0    | `A(j - 1, j)` |
/// | 1    | `A(j, j)`     |
/// | 2    | `A(j + 1, j)` |
///
/// `values[0]` and `values[3 * (n - 1) + 2]` lie outside the matrix and are
/// ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct TriCol {
    n: usize,
    values: Vec<f64>,
}

impl TriCol {
    /// Wrap a 3 x N column-major band.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DimensionMismatch`] unless
    /// `values.len() == 3 * n`.
    pub fn new(n: usize, values: Vec<f64>) -> Result<Self, ValidationError> {
        check_band_len(n, values.len(), "column tridiagonal")?;
        Ok(Self { n, values })
    }

    /// Build from the three diagonals. `sub[i] = A(i + 1, i)`,
    /// `sup[i] = A(i, i + 1)`.
    pub fn from_diagonals(sub: &[f64], diag: &[f64], sup: &[f64]) -> Result<Self, ValidationError> {
        let n = check_diagonals(sub, diag, sup)?;
        Ok(Self::pack(n, |j| sup[j - 1], |j| diag[j], |j| sub[j]))
    }

    /// Second-difference matrix of order `n`.
    pub fn dif2(n: usize) -> Self {
        Self::pack(n, |_| -1.0, |_| 2.0, |_| -1.0)
    }

    /// Fill the band column by column. `above(j)` is only called for `j > 0`
    /// and `below(j)` only for `j + 1 < n`.
    fn pack(
        n: usize,
        above: impl Fn(usize) -> f64,
        diag: impl Fn(usize) -> f64,
        below: impl Fn(usize) -> f64,
    ) -> Self {
        let mut values = vec![0.0; 3 * n];
        for j in 0..n {
            if j > 0 {
                values[3 * j] = above(j);
            }
            values[3 * j + 1] = diag(j);
            if j + 1 < n {
                values[3 * j + 2] = below(j);
            }
        }
        Self { n, values }
    }

    /// Raw band storage.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    #[inline]
    fn row(&self, i: usize) -> [f64; 3] {
        // A(i, i-1) sits in column i-1, slot 2; A(i, i+1) in column i+1, slot 0.
        let sub = if i > 0 { self.values[3 * (i - 1) + 2] } else { 0.0 };
        let sup = if i + 1 < self.n { self.values[3 * (i + 1)] } else { 0.0 };
        [sub, self.values[3 * i + 1], sup]
    }
}

impl LinearOperator for TriCol {
    fn rows(&self) -> usize {
        self.n
    }

    fn cols(&self) -> usize {
        self.n
    }

    fn format(&self) -> StorageFormat {
        StorageFormat::TriCol
    }

    fn stored_entries(&self) -> usize {
        self.values.len()
    }

    fn matvec_into(&self, x: &[f64], y: &mut [f64]) {
        debug_assert_eq!(y.len(), self.n, "tri-col matvec: y.len() != n");
        tridiagonal_matvec(x, y, |i| self.row(i));
    }

    fn to_dense(&self) -> DenseMatrix {
        tridiagonal_to_dense(self.n, |i| self.row(i))
    }
}

// ---------------------------------------------------------------------------
// TriScalar
// ---------------------------------------------------------------------------

/// Toeplitz tridiagonal matrix: every row uses the same `[sub, diag, sup]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriScalar {
    n: usize,
    coefficients: [f64; 3],
}

impl TriScalar {
    /// Order-`n` matrix with `coefficients = [sub, diag, sup]`.
    pub fn new(n: usize, coefficients: [f64; 3]) -> Self {
        Self { n, coefficients }
    }

    /// Second-difference matrix of order `n`.
    pub fn dif2(n: usize) -> Self {
        Self::new(n, [-1.0, 2.0, -1.0])
    }

    /// The shared `[sub, diag, sup]` triple.
    #[inline]
    pub fn coefficients(&self) -> [f64; 3] {
        self.coefficients
    }
}

impl LinearOperator for TriScalar {
    fn rows(&self) -> usize {
        self.n
    }

    fn cols(&self) -> usize {
        self.n
    }

    fn format(&self) -> StorageFormat {
        StorageFormat::TriScalar
    }

    fn stored_entries(&self) -> usize {
        3
    }

    fn matvec_into(&self, x: &[f64], y: &mut [f64]) {
        debug_assert_eq!(y.len(), self.n, "tri-scalar matvec: y.len() != n");
        tridiagonal_matvec(x, y, |_| self.coefficients);
    }

    fn to_dense(&self) -> DenseMatrix {
        tridiagonal_to_dense(self.n, |_| self.coefficients)
    }
}

// ---------------------------------------------------------------------------
// TriRow
// ---------------------------------------------------------------------------

/// Tridiagonal matrix stored as N row triples.
///
/// # Layout
///
/// `values[3*i + k] = A(i, i + k - 1)` for `k in 0..3`. `values[0]` and
/// `values[3 * n - 1]` lie outside the matrix and are ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct TriRow {
    n: usize,
    values: Vec<f64>,
}

impl TriRow {
    /// Wrap N row triples.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DimensionMismatch`] unless
    /// `values.len() == 3 * n`.
    pub fn new(n: usize, values: Vec<f64>) -> Result<Self, ValidationError> {
        check_band_len(n, values.len(), "row tridiagonal")?;
        Ok(Self { n, values })
    }

    /// Build from the three diagonals. `sub[i] = A(i + 1, i)`,
    /// `sup[i] = A(i, i + 1)`.
    pub fn from_diagonals(sub: &[f64], diag: &[f64], sup: &[f64]) -> Result<Self, ValidationError> {
        let n = check_diagonals(sub, diag, sup)?;
        Ok(Self::pack(n, |i| sub[i - 1], |i| diag[i], |i| sup[i]))
    }

    /// Second-difference matrix of order `n`.
    pub fn dif2(n: usize) -> Self {
        Self::pack(n, |_| -1.0, |_| 2.0, |_| -1.0)
    }

    /// Fill the row triples. `left(i)` is only called for `i > 0` and
    /// `right(i)` only for `i + 1 < n`.
    fn pack(
        n: usize,
        left: impl Fn(usize) -> f64,
        diag: impl Fn(usize) -> f64,
        right: impl Fn(usize) -> f64,
    ) -> Self {
        let mut values = vec![0.0; 3 * n];
        for i in 0..n {
            if i > 0 {
                values[3 * i] = left(i);
            }
            values[3 * i + 1] = diag(i);
            if i + 1 < n {
                values[3 * i + 2] = right(i);
            }
        }
        Self { n, values }
    }

    /// Raw row-triple storage.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    #[inline]
    fn row(&self, i: usize) -> [f64; 3] {
        [self.values[3 * i], self.values[3 * i + 1], self.values[3 * i + 2]]
    }
}

impl LinearOperator for TriRow {
    fn rows(&self) -> usize {
        self.n
    }

    fn cols(&self) -> usize {
        self.n
    }

    fn format(&self) -> StorageFormat {
        StorageFormat::TriRow
    }

    fn stored_entries(&self) -> usize {
        self.values.len()
    }

    fn matvec_into(&self, x: &[f64], y: &mut [f64]) {
        debug_assert_eq!(y.len(), self.n, "tri-row matvec: y.len() != n");
        tridiagonal_matvec(x, y, |i| self.row(i));
    }

    fn to_dense(&self) -> DenseMatrix {
        tridiagonal_to_dense(self.n, |i| self.row(i))
    }
}
