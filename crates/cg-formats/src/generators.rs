//! Test-problem generators.
//!
//! The second-difference matrix `dif2(n)` has 2 on the diagonal and -1 on the
//! first sub- and super-diagonal. It is SPD, has known eigenvalues, and fits
//! every storage format, which makes it the reference problem for comparing
//! formats against each other.

use std::f64::consts::PI;

use rand::Rng;

use crate::encoding::Encoding;
use crate::types::StorageFormat;

/// `dif2(n)` in every storage format, in [`StorageFormat::ALL`] order.
pub fn dif2_all(n: usize) -> Vec<Encoding> {
    StorageFormat::ALL
        .into_iter()
        .map(|format| Encoding::dif2(format, n))
        .collect()
}

/// The `k`-th eigenvalue of `dif2(n)`, `2 - 2 cos(k pi / (n + 1))` for
/// `k = 1..=n`.
///
/// All eigenvalues lie in `(0, 4)`, so `dif2(n)` is SPD with condition number
/// growing like `n^2`.
pub fn dif2_eigenvalue(n: usize, k: usize) -> f64 {
    2.0 - 2.0 * (k as f64 * PI / (n as f64 + 1.0)).cos()
}

/// Vector of `n` values drawn uniformly from `[-1, 1)`.
pub fn random_vector<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<f64> {
    (0..n).map(|_| rng.gen_range(-1.0..1.0)).collect()
}
