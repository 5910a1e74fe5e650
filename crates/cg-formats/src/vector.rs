//! Dense vector primitives used by the CG recurrence.
//!
//! Dot products use a 4-wide accumulator to shorten the dependency chain.

/// Compute the dot product of two `f64` slices with 4-wide accumulation.
///
/// # Panics
///
/// Panics if `a.len() != b.len()`.
#[inline]
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    assert_eq!(a.len(), b.len(), "dot: length mismatch");

    let a_chunks = a.chunks_exact(4);
    let b_chunks = b.chunks_exact(4);
    let tail: f64 = a_chunks
        .remainder()
        .iter()
        .zip(b_chunks.remainder())
        .map(|(x, y)| x * y)
        .sum();

    let mut acc = [0.0f64; 4];
    for (ca, cb) in a_chunks.zip(b_chunks) {
        for k in 0..4 {
            acc[k] += ca[k] * cb[k];
        }
    }

    (acc[0] + acc[1]) + (acc[2] + acc[3]) + tail
}

/// Compute `y[i] += alpha * x[i]` for all `i`.
///
/// # Panics
///
/// Panics if `x.len() != y.len()`.
#[inline]
pub fn axpy(alpha: f64, x: &[f64], y: &mut [f64]) {
    assert_eq!(x.len(), y.len(), "axpy: length mismatch");

    for (yi, &xi) in y.iter_mut().zip(x) {
        *yi += alpha * xi;
    }
}

/// Compute `p[i] = r[i] + beta * p[i]` for all `i` (search-direction update).
#[inline]
pub fn xpby(r: &[f64], beta: f64, p: &mut [f64]) {
    assert_eq!(r.len(), p.len(), "xpby: length mismatch");

    for (pi, &ri) in p.iter_mut().zip(r) {
        *pi = ri + beta * *pi;
    }
}

/// Compute the L2 norm.
#[inline]
pub fn norm2(x: &[f64]) -> f64 {
    dot(x, x).sqrt()
}

/// L2 distance `||a - b||_2`.
pub fn distance(a: &[f64], b: &[f64]) -> f64 {
    assert_eq!(a.len(), b.len(), "distance: length mismatch");
    a.iter()
        .zip(b)
        .map(|(&ai, &bi)| (ai - bi) * (ai - bi))
        .sum::<f64>()
        .sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dot_basic() {
        assert!((dot(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]) - 32.0).abs() < 1e-12);
    }

    #[test]
    fn dot_empty() {
        assert_eq!(dot(&[], &[]), 0.0);
    }

    #[test]
    fn dot_odd_length() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let b = [5.0, 4.0, 3.0, 2.0, 1.0];
        // 5 + 8 + 9 + 8 + 5 = 35
        assert!((dot(&a, &b) - 35.0).abs() < 1e-12);
    }

    #[test]
    #[should_panic(expected = "dot: length mismatch")]
    fn dot_length_mismatch_panics() {
        dot(&[1.0], &[1.0, 2.0]);
    }

    #[test]
    fn axpy_negative_alpha() {
        let x = [1.0, 1.0, 1.0];
        let mut y = [5.0, 5.0, 5.0];
        axpy(-3.0, &x, &mut y);
        assert_eq!(y, [2.0, 2.0, 2.0]);
    }

    #[test]
    fn xpby_updates_direction() {
        let r = [1.0, 2.0];
        let mut p = [10.0, 20.0];
        xpby(&r, 0.5, &mut p);
        assert_eq!(p, [6.0, 12.0]);
    }

    #[test]
    fn dot_matches_naive_sum_across_tail_lengths() {
        for n in 0..=9 {
            let a: Vec<f64> = (0..n).map(|i| 0.5 + i as f64).collect();
            let b: Vec<f64> = (0..n).map(|i| 1.0 - 0.25 * i as f64).collect();
            let naive: f64 = a.iter().zip(&b).map(|(x, y)| x * y).sum();
            assert!((dot(&a, &b) - naive).abs() < 1e-12, "n = {n}");
        }
    }

    #[test]
    fn norm_and_distance() {
        assert!((norm2(&[3.0, 4.0]) - 5.0).abs() < 1e-12);
        assert!((distance(&[1.0, 1.0], &[4.0, 5.0]) - 5.0).abs() < 1e-12);
    }
}
