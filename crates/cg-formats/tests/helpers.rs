//! Shared test helpers for the cg-formats integration test suite.
//!
//! Provides seeded random data, SPD matrix builders, and floating-point
//! comparison utilities used across all test modules.

#![allow(dead_code)]

use cg_formats::dense::DenseMatrix;
use cg_formats::generators;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// ---------------------------------------------------------------------------
// Random data
// ---------------------------------------------------------------------------

/// Deterministic RNG for reproducible test data.
pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Random vector with entries in `[-1, 1)`.
pub fn random_vector(n: usize, seed: u64) -> Vec<f64> {
    generators::random_vector(n, &mut rng(seed))
}

// ---------------------------------------------------------------------------
// Matrix generators
// ---------------------------------------------------------------------------

/// Random symmetric banded matrix with upper bandwidth `mu`.
///
/// Off-diagonals inside the band are uniform in `[-1, 1)`. The diagonal is
/// set to `1 + sum of |off-diagonals in the row|`, so the matrix is strictly
/// diagonally dominant with a positive diagonal and hence SPD.
pub fn random_spd_banded(n: usize, mu: usize, seed: u64) -> DenseMatrix {
    let mut rng = rng(seed);
    let mut a = vec![vec![0.0f64; n]; n];

    for j in 0..n {
        for i in j.saturating_sub(mu)..j {
            let v = rng.gen_range(-1.0..1.0);
            a[i][j] = v;
            a[j][i] = v;
        }
    }
    for i in 0..n {
        let off: f64 = (0..n).filter(|&j| j != i).map(|j| a[i][j].abs()).sum();
        a[i][i] = 1.0 + off + rng.gen_range(0.0..1.0);
    }

    DenseMatrix::from_rows(&a).expect("rows have equal length")
}

/// Random symmetric matrix whose nonzero super-diagonals are exactly
/// `offsets` (offset 0 is always present), diagonally dominant and SPD.
pub fn random_spd_offsets(n: usize, offsets: &[usize], seed: u64) -> DenseMatrix {
    let mut rng = rng(seed);
    let mut a = vec![vec![0.0f64; n]; n];

    for &d in offsets.iter().filter(|&&d| d > 0) {
        for i in 0..n.saturating_sub(d) {
            let v = rng.gen_range(-1.0..1.0);
            a[i][i + d] = v;
            a[i + d][i] = v;
        }
    }
    for i in 0..n {
        let off: f64 = (0..n).filter(|&j| j != i).map(|j| a[i][j].abs()).sum();
        a[i][i] = 1.0 + off;
    }

    DenseMatrix::from_rows(&a).expect("rows have equal length")
}

// ---------------------------------------------------------------------------
// Vector utilities
// ---------------------------------------------------------------------------

/// Compute the L2 norm of a vector.
pub fn l2_norm(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

/// Compute the L2 distance between two vectors.
pub fn l2_distance(a: &[f64], b: &[f64]) -> f64 {
    assert_eq!(a.len(), b.len(), "l2_distance: length mismatch");
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

/// Largest absolute element-wise difference.
pub fn max_abs_diff(a: &[f64], b: &[f64]) -> f64 {
    assert_eq!(a.len(), b.len(), "max_abs_diff: length mismatch");
    a.iter().zip(b).map(|(x, y)| (x - y).abs()).fold(0.0, f64::max)
}
