//! Conjugate Gradient solver for symmetric positive-definite systems.
//!
//! Solves `Ax = b` for any [`LinearOperator`]. The loop only ever calls
//! [`matvec_into`](LinearOperator::matvec_into), so every storage format runs
//! exactly the same recurrence.
//!
//! # Algorithm
//!
//! ```text
//! x  = x0
//! r  = b - A*x
//! p  = r
//!
//! for it in 0..n:
//!     Ap    = A * p
//!     pAp   = p . Ap
//!     pr    = p . r
//!     if pAp == 0:
//!         breakdown; return x
//!     alpha = pr / pAp
//!     x     = x + alpha * p
//!     r     = r - alpha * Ap
//!     beta  = -(r . Ap) / pAp
//!     p     = r + beta * p
//! ```
//!
//! The iteration count is fixed at the system order `n`. In exact arithmetic
//! an SPD system is solved after at most `n` steps; there is no
//! tolerance-based early exit.
//!
//! # Preconditions
//!
//! `A` must be symmetric positive definite. This is not verified: a
//! non-positive `p . Ap` is logged with `warn!` and the iteration carries on,
//! producing unreliable results. Use
//! [`check_symmetric`](crate::validation::check_symmetric) on small problems
//! when in doubt.
//!
//! # Breakdown
//!
//! With [`BreakdownPolicy::Exact`] (the default) the solve stops only when
//! `p . Ap` is exactly `0.0`. A tiny but nonzero `p . Ap` is divided by as-is
//! and can produce NaN/Inf in later iterates; enable
//! [`CgOptions::detect_non_finite`] to turn that into an error, or opt into
//! [`BreakdownPolicy::Threshold`].

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::error::SolverError;
use crate::traits::LinearOperator;
use crate::types::{CgResult, ConvergenceInfo, Termination};
use crate::validation::{validate_options, validate_system};
use crate::vector::{axpy, dot, norm2, xpby};

// ═══════════════════════════════════════════════════════════════════════════
// Options
// ═══════════════════════════════════════════════════════════════════════════

/// When the recurrence is considered broken down.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BreakdownPolicy {
    /// Stop only when `p . Ap == 0.0` exactly.
    Exact,
    /// Stop when `|p . Ap| <= eps`. `eps` must be finite and non-negative.
    Threshold(f64),
}

impl BreakdownPolicy {
    #[inline]
    fn is_breakdown(self, pap: f64) -> bool {
        match self {
            BreakdownPolicy::Exact => pap == 0.0,
            BreakdownPolicy::Threshold(eps) => pap.abs() <= eps,
        }
    }
}

impl Default for BreakdownPolicy {
    fn default() -> Self {
        BreakdownPolicy::Exact
    }
}

/// Solver configuration.
///
/// # Example
///
/// ```
/// use cg_formats::cg::{BreakdownPolicy, CgOptions};
///
/// let options = CgOptions {
///     breakdown: BreakdownPolicy::Threshold(1e-300),
///     ..Default::default()
/// };
/// assert!(options.record_history);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CgOptions {
    /// Breakdown test applied to `p . Ap` each iteration.
    ///
    /// Default: [`BreakdownPolicy::Exact`].
    pub breakdown: BreakdownPolicy,

    /// Record the recurrence residual norm after every iteration.
    ///
    /// Default: `true`.
    pub record_history: bool,

    /// Reject NaN/Inf in `b` and `x0` before iterating.
    ///
    /// Default: `false`.
    pub validate_finite: bool,

    /// Fail with [`SolverError::NumericalInstability`] as soon as `p . Ap`,
    /// `alpha` or `beta` is not finite, instead of propagating it.
    ///
    /// Default: `false`.
    pub detect_non_finite: bool,

    /// Cap on the iteration count. Never raises it above the system order.
    ///
    /// Default: `None` (run `n` iterations).
    pub max_iterations: Option<usize>,
}

impl Default for CgOptions {
    fn default() -> Self {
        Self {
            breakdown: BreakdownPolicy::Exact,
            record_history: true,
            validate_finite: false,
            detect_non_finite: false,
            max_iterations: None,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// ConjugateGradientSolver
// ═══════════════════════════════════════════════════════════════════════════

/// Conjugate Gradient solver, generic over the storage format.
///
/// Stores only the [`CgOptions`]. Each solve allocates and owns its working
/// vectors, so one solver may be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct ConjugateGradientSolver {
    options: CgOptions,
}

impl ConjugateGradientSolver {
    /// Create a solver with the given options.
    pub fn new(options: CgOptions) -> Self {
        Self { options }
    }

    /// Return the configured options.
    #[inline]
    pub fn options(&self) -> &CgOptions {
        &self.options
    }

    /// Solve `A x = b` starting from `x0`.
    ///
    /// # Errors
    ///
    /// * [`SolverError::InvalidInput`] -- non-square operator, length
    ///   mismatch between `A`, `b` and `x0`, invalid options, or (with
    ///   `validate_finite`) non-finite inputs.
    /// * [`SolverError::NumericalInstability`] -- only with
    ///   `detect_non_finite`, when the recurrence produces NaN/Inf.
    pub fn solve<A>(&self, matrix: &A, rhs: &[f64], x0: &[f64]) -> Result<CgResult, SolverError>
    where
        A: LinearOperator + ?Sized,
    {
        validate_options(&self.options)?;
        validate_system(matrix, rhs, x0, self.options.validate_finite)?;
        self.solve_inner(matrix, rhs, x0)
    }

    /// Core CG loop. Inputs are already validated.
    fn solve_inner<A>(&self, matrix: &A, rhs: &[f64], x0: &[f64]) -> Result<CgResult, SolverError>
    where
        A: LinearOperator + ?Sized,
    {
        let start_time = Instant::now();
        let n = matrix.order();
        let format = matrix.format();

        // --- Trivial case: zero-dimensional system ---
        if n == 0 {
            return Ok(CgResult {
                solution: vec![],
                iterations: 0,
                termination: Termination::Completed,
                residual_norm: 0.0,
                wall_time: start_time.elapsed(),
                convergence_history: vec![],
                format,
            });
        }

        let max_iter = self.options.max_iterations.map_or(n, |m| m.min(n));

        // --- x = x0; ap = A*x; r = b - ap; p = r ---
        let mut x = x0.to_vec();
        let mut ap = vec![0.0f64; n];
        matrix.matvec_into(&x, &mut ap);
        let mut r: Vec<f64> = rhs.iter().zip(&ap).map(|(&bi, &ai)| bi - ai).collect();
        let mut p = r.clone();

        let mut convergence_history = if self.options.record_history {
            Vec::with_capacity(max_iter)
        } else {
            Vec::new()
        };
        let mut termination = Termination::Completed;
        let mut iterations = 0;
        let mut warned_indefinite = false;

        debug!(
            "CG: format={}, n={}, stored={}, iterations={}, breakdown={:?}",
            format,
            n,
            matrix.stored_entries(),
            max_iter,
            self.options.breakdown,
        );

        for it in 0..max_iter {
            // --- Ap = A * p ---
            matrix.matvec_into(&p, &mut ap);

            let pap = dot(&p, &ap);
            let pr = dot(&p, &r);

            if self.options.breakdown.is_breakdown(pap) {
                if pap != 0.0 {
                    warn!("CG: |p.Ap| = {:.3e} under breakdown threshold at iteration {it}", pap.abs());
                }
                debug!("CG: breakdown at iteration {it}, returning current iterate");
                termination = Termination::Breakdown { iteration: it };
                break;
            }

            if !pap.is_finite() && self.options.detect_non_finite {
                warn!("CG: non-finite p.Ap = {pap} at iteration {it}");
                return Err(SolverError::NumericalInstability {
                    iteration: it,
                    detail: format!("p.Ap = {pap} is not finite"),
                });
            }

            if pap < 0.0 && !warned_indefinite {
                warn!("CG: negative p.Ap = {pap:.4e} at iteration {it}; matrix may not be SPD");
                warned_indefinite = true;
            }

            let alpha = pr / pap;

            // --- x = x + alpha * p; r = r - alpha * Ap ---
            axpy(alpha, &p, &mut x);
            axpy(-alpha, &ap, &mut r);

            let rap = dot(&r, &ap);
            let beta = -rap / pap;

            if self.options.detect_non_finite && !(alpha.is_finite() && beta.is_finite()) {
                warn!("CG: non-finite step at iteration {it}: alpha={alpha}, beta={beta}");
                return Err(SolverError::NumericalInstability {
                    iteration: it,
                    detail: format!("alpha = {alpha}, beta = {beta}"),
                });
            }

            // --- p = r + beta * p ---
            xpby(&r, beta, &mut p);
            iterations = it + 1;

            if self.options.record_history {
                let r_norm = norm2(&r);
                trace!("CG iter {it}: ||r|| = {r_norm:.6e}, alpha = {alpha:.6e}, beta = {beta:.6e}");
                convergence_history.push(ConvergenceInfo {
                    iteration: it,
                    residual_norm: r_norm,
                });
            }
        }

        let residual_norm = norm2(&matrix.residual(&x, rhs));
        let wall_time = start_time.elapsed();

        debug!(
            "CG: {} after {iterations} iterations, ||b - Ax|| = {residual_norm:.6e}",
            if termination.is_breakdown() { "stopped" } else { "completed" },
        );

        Ok(CgResult {
            solution: x,
            iterations,
            termination,
            residual_norm,
            wall_time,
            convergence_history,
            format,
        })
    }
}

/// Solve `A x = b` from `x0` with default options and return the iterate.
///
/// Equivalent to `ConjugateGradientSolver::default().solve(..)` without the
/// convergence history.
///
/// # Errors
///
/// Returns [`SolverError::InvalidInput`] on a dimension mismatch.
///
/// # Example
///
/// ```
/// use cg_formats::cg::cg;
/// use cg_formats::traits::LinearOperator;
/// use cg_formats::tridiagonal::TriScalar;
///
/// let a = TriScalar::dif2(10);
/// let exact: Vec<f64> = (1..=10).map(f64::from).collect();
/// let b = a.matvec(&exact);
///
/// let x = cg(&a, &b, &[0.0; 10]).unwrap();
/// for (xi, ei) in x.iter().zip(&exact) {
///     assert!((xi - ei).abs() < 1e-6);
/// }
/// ```
pub fn cg<A>(matrix: &A, rhs: &[f64], x0: &[f64]) -> Result<Vec<f64>, SolverError>
where
    A: LinearOperator + ?Sized,
{
    let solver = ConjugateGradientSolver::new(CgOptions {
        record_history: false,
        ..CgOptions::default()
    });
    solver.solve(matrix, rhs, x0).map(|result| result.solution)
}

// ═══════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coo::SparseCoo;
    use crate::dense::DenseMatrix;
    use crate::error::ValidationError;
    use crate::tridiagonal::TriScalar;
    use crate::types::StorageFormat;

    fn default_solver() -> ConjugateGradientSolver {
        ConjugateGradientSolver::default()
    }

    // -----------------------------------------------------------------
    // Convergence
    // -----------------------------------------------------------------

    #[test]
    fn cg_tridiagonal_recovers_solution() {
        let n = 10;
        let a = TriScalar::new(n, [-1.0, 4.0, -1.0]);
        let exact: Vec<f64> = (0..n).map(|i| (i as f64).sin()).collect();
        let b = a.matvec(&exact);

        let result = default_solver().solve(&a, &b, &vec![0.0; n]).unwrap();

        assert_eq!(result.termination, Termination::Completed);
        assert_eq!(result.iterations, n);
        assert_eq!(result.format, StorageFormat::TriScalar);
        for i in 0..n {
            assert!(
                (result.solution[i] - exact[i]).abs() < 1e-8,
                "x[{i}] = {} != {}",
                result.solution[i],
                exact[i],
            );
        }
        assert!(result.residual_norm < 1e-10, "residual = {}", result.residual_norm);
    }

    #[test]
    fn cg_diagonal_matrix() {
        let a = SparseCoo::from_triplets(4, 4, vec![(0, 0, 2.0), (1, 1, 3.0), (2, 2, 5.0), (3, 3, 7.0)])
            .unwrap();
        let b = [4.0, 9.0, 25.0, 49.0];

        let x = cg(&a, &b, &[0.0; 4]).unwrap();

        let expected = [2.0, 3.0, 5.0, 7.0];
        for i in 0..4 {
            assert!((x[i] - expected[i]).abs() < 1e-10, "x[{i}] = {} != {}", x[i], expected[i]);
        }
    }

    // -----------------------------------------------------------------
    // Breakdown
    // -----------------------------------------------------------------

    #[test]
    fn identity_breaks_down_after_one_step() {
        let a = DenseMatrix::identity(5);
        let b = [1.0, 2.0, 3.0, 4.0, 5.0];

        let result = default_solver().solve(&a, &b, &[0.0; 5]).unwrap();

        // r becomes exactly zero after one step, so p = 0 and p.Ap = 0.
        assert_eq!(result.termination, Termination::Breakdown { iteration: 1 });
        assert_eq!(result.iterations, 1);
        assert_eq!(result.solution, b.to_vec());
        assert_eq!(result.residual_norm, 0.0);
    }

    #[test]
    fn zero_rhs_from_zero_guess_breaks_down_immediately() {
        let a = TriScalar::dif2(6);
        let result = default_solver().solve(&a, &[0.0; 6], &[0.0; 6]).unwrap();

        assert_eq!(result.termination, Termination::Breakdown { iteration: 0 });
        assert_eq!(result.iterations, 0);
        assert!(result.convergence_history.is_empty());
        assert_eq!(result.solution, vec![0.0; 6]);
    }

    #[test]
    fn exact_initial_guess_breaks_down_immediately() {
        let a = TriScalar::dif2(4);
        let x1 = [1.0, -1.0, 2.0, 0.0];
        let b = a.matvec(&x1);
        let result = default_solver().solve(&a, &b, &x1).unwrap();
        assert_eq!(result.termination, Termination::Breakdown { iteration: 0 });
        assert_eq!(result.solution, x1.to_vec());
    }

    #[test]
    fn threshold_policy_stops_on_tiny_pap() {
        // Scaling A by 1e-200 makes p.Ap ~ 1e-200 on the first step.
        let a = TriScalar::new(3, [0.0, 1e-200, 0.0]);
        let b = [1.0, 1.0, 1.0];

        let exact = default_solver().solve(&a, &b, &[0.0; 3]).unwrap();
        assert!(exact.iterations >= 1);

        let thresholded = ConjugateGradientSolver::new(CgOptions {
            breakdown: BreakdownPolicy::Threshold(1e-100),
            ..Default::default()
        })
        .solve(&a, &b, &[0.0; 3])
        .unwrap();
        assert_eq!(thresholded.termination, Termination::Breakdown { iteration: 0 });
        assert_eq!(thresholded.solution, vec![0.0; 3]);
    }

    // -----------------------------------------------------------------
    // Options
    // -----------------------------------------------------------------

    #[test]
    fn history_tracks_every_iteration() {
        let n = 8;
        let a = TriScalar::dif2(n);
        let b = vec![1.0; n];
        let result = default_solver().solve(&a, &b, &vec![0.0; n]).unwrap();

        assert_eq!(result.convergence_history.len(), result.iterations);
        for (k, info) in result.convergence_history.iter().enumerate() {
            assert_eq!(info.iteration, k);
            assert!(info.residual_norm.is_finite());
        }
    }

    #[test]
    fn history_can_be_disabled() {
        let a = TriScalar::dif2(5);
        let solver = ConjugateGradientSolver::new(CgOptions {
            record_history: false,
            ..Default::default()
        });
        // No reflection symmetry, so CG cannot finish early on dif2.
        let b = [1.0, 2.0, 3.0, 4.0, 5.0];
        let result = solver.solve(&a, &b, &[0.0; 5]).unwrap();
        assert!(result.convergence_history.is_empty());
        assert_eq!(result.termination, Termination::Completed);
        assert_eq!(result.iterations, 5);
    }

    #[test]
    fn max_iterations_caps_but_never_extends() {
        let a = TriScalar::dif2(6);
        let b = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];

        let capped = ConjugateGradientSolver::new(CgOptions {
            max_iterations: Some(2),
            ..Default::default()
        });
        assert_eq!(capped.solve(&a, &b, &[0.0; 6]).unwrap().iterations, 2);

        let generous = ConjugateGradientSolver::new(CgOptions {
            max_iterations: Some(100),
            ..Default::default()
        });
        let full = generous.solve(&a, &b, &[0.0; 6]).unwrap();
        assert_eq!(full.termination, Termination::Completed);
        assert_eq!(full.iterations, 6);
    }

    #[test]
    fn options_round_trip_through_json() {
        let options = CgOptions {
            breakdown: BreakdownPolicy::Threshold(1e-30),
            record_history: false,
            validate_finite: true,
            detect_non_finite: true,
            max_iterations: Some(12),
        };
        let json = serde_json::to_string(&options).unwrap();
        let back: CgOptions = serde_json::from_str(&json).unwrap();
        assert_eq!(back, options);

        let tiny = CgOptions {
            breakdown: BreakdownPolicy::Threshold(2.2250738585072014e-308),
            ..Default::default()
        };
        let back: CgOptions = serde_json::from_str(&serde_json::to_string(&tiny).unwrap()).unwrap();
        assert_eq!(back, tiny);
    }

    #[test]
    fn options_fill_missing_fields_with_defaults() {
        let options: CgOptions = serde_json::from_str(r#"{ "validate_finite": true }"#).unwrap();
        assert!(options.validate_finite);
        assert!(options.record_history);
        assert_eq!(options.breakdown, BreakdownPolicy::Exact);
    }

    // -----------------------------------------------------------------
    // Error cases
    // -----------------------------------------------------------------

    #[test]
    fn rhs_length_mismatch() {
        let a = TriScalar::dif2(3);
        let err = default_solver().solve(&a, &[1.0; 5], &[0.0; 3]).unwrap_err();
        assert!(matches!(err, SolverError::InvalidInput(ValidationError::DimensionMismatch(_))));
    }

    #[test]
    fn initial_guess_length_mismatch() {
        let a = TriScalar::dif2(3);
        let err = cg(&a, &[1.0; 3], &[0.0; 2]).unwrap_err();
        assert!(matches!(err, SolverError::InvalidInput(_)));
    }

    #[test]
    fn non_square_operator_rejected() {
        let a = DenseMatrix::zeros(2, 3);
        let err = cg(&a, &[1.0; 2], &[0.0; 3]).unwrap_err();
        assert!(matches!(err, SolverError::InvalidInput(_)));
    }

    #[test]
    fn empty_system() {
        let a = DenseMatrix::zeros(0, 0);
        let result = default_solver().solve(&a, &[], &[]).unwrap();
        assert!(result.solution.is_empty());
        assert_eq!(result.iterations, 0);
    }

    #[test]
    fn nan_propagates_by_default() {
        let a = TriScalar::dif2(3);
        let x = cg(&a, &[1.0, f64::NAN, 1.0], &[0.0; 3]).unwrap();
        assert!(x.iter().any(|v| v.is_nan()));
    }

    #[test]
    fn nan_detected_when_enabled() {
        let a = TriScalar::dif2(3);
        let solver = ConjugateGradientSolver::new(CgOptions {
            detect_non_finite: true,
            ..Default::default()
        });
        let err = solver.solve(&a, &[1.0, f64::NAN, 1.0], &[0.0; 3]).unwrap_err();
        assert!(matches!(err, SolverError::NumericalInstability { iteration: 0, .. }));
    }

    #[test]
    fn nan_rejected_up_front_when_validating() {
        let a = TriScalar::dif2(3);
        let solver = ConjugateGradientSolver::new(CgOptions {
            validate_finite: true,
            ..Default::default()
        });
        let err = solver.solve(&a, &[1.0, 1.0, 1.0], &[0.0, f64::INFINITY, 0.0]).unwrap_err();
        assert!(matches!(err, SolverError::InvalidInput(ValidationError::NonFiniteValue(_))));
    }

    #[test]
    fn invalid_threshold_rejected() {
        let a = TriScalar::dif2(3);
        let solver = ConjugateGradientSolver::new(CgOptions {
            breakdown: BreakdownPolicy::Threshold(-1.0),
            ..Default::default()
        });
        let err = solver.solve(&a, &[1.0; 3], &[0.0; 3]).unwrap_err();
        assert!(matches!(
            err,
            SolverError::InvalidInput(ValidationError::ParameterOutOfRange { .. })
        ));
    }

    #[test]
    fn solves_through_trait_object() {
        let a: Box<dyn LinearOperator> = Box::new(TriScalar::dif2(4));
        let b = a.matvec(&[1.0, 2.0, 3.0, 4.0]);
        let x = cg(a.as_ref(), &b, &[0.0; 4]).unwrap();
        for (xi, ei) in x.iter().zip([1.0, 2.0, 3.0, 4.0]) {
            assert!((xi - ei).abs() < 1e-10);
        }
    }
}
