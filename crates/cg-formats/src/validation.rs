//! Input validation for solver operations.
//!
//! Every check runs before the first matrix-vector product, so a malformed
//! call fails with a [`ValidationError`] instead of a panic deep inside a
//! kernel. [`ValidationError`] converts into [`SolverError::InvalidInput`]
//! via `From`.
//!
//! [`SolverError::InvalidInput`]: crate::error::SolverError::InvalidInput

use crate::cg::{BreakdownPolicy, CgOptions};
use crate::error::ValidationError;
use crate::traits::LinearOperator;
use crate::types::CgResult;

// ---------------------------------------------------------------------------
// Vector validation
// ---------------------------------------------------------------------------

/// Validate a vector argument of a solve.
///
/// Checks:
///
/// 1. `v.len() == expected_len`.
/// 2. With `check_finite`, no `NaN` or `Inf` entries.
///
/// # Errors
///
/// Returns [`ValidationError::DimensionMismatch`] or
/// [`ValidationError::NonFiniteValue`].
pub fn validate_vector(
    name: &str,
    v: &[f64],
    expected_len: usize,
    check_finite: bool,
) -> Result<(), ValidationError> {
    if v.len() != expected_len {
        return Err(ValidationError::DimensionMismatch(format!(
            "{} length {} does not match operator order {}",
            name,
            v.len(),
            expected_len,
        )));
    }

    if check_finite {
        if let Some((i, &bad)) = v.iter().enumerate().find(|(_, x)| !x.is_finite()) {
            return Err(ValidationError::NonFiniteValue(format!("{name}[{i}] = {bad}")));
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// System validation
// ---------------------------------------------------------------------------

/// Validate `A x = b` with initial guess `x0` before a solve.
///
/// The operator must be square and both vectors must have its order. An
/// all-zero `b` is accepted but logged with `warn!`.
///
/// # Errors
///
/// Returns [`ValidationError`] on the first failing check.
pub fn validate_system<A>(
    matrix: &A,
    rhs: &[f64],
    x0: &[f64],
    check_finite: bool,
) -> Result<(), ValidationError>
where
    A: LinearOperator + ?Sized,
{
    if !matrix.is_square() {
        return Err(ValidationError::DimensionMismatch(format!(
            "solver requires a square operator but got {}x{} ({})",
            matrix.rows(),
            matrix.cols(),
            matrix.format(),
        )));
    }

    let n = matrix.order();
    validate_vector("rhs", rhs, n, check_finite)?;
    validate_vector("x0", x0, n, check_finite)?;

    if !rhs.is_empty() && rhs.iter().all(|&v| v == 0.0) {
        tracing::warn!("rhs vector is all zeros; solution will be trivially zero");
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Option validation
// ---------------------------------------------------------------------------

/// Validate solver options.
///
/// # Rules
///
/// - A [`BreakdownPolicy::Threshold`] must be finite and non-negative.
/// - `max_iterations`, when set, must be at least 1.
///
/// # Errors
///
/// Returns [`ValidationError::ParameterOutOfRange`].
pub fn validate_options(options: &CgOptions) -> Result<(), ValidationError> {
    if let BreakdownPolicy::Threshold(eps) = options.breakdown {
        if !eps.is_finite() || eps < 0.0 {
            return Err(ValidationError::ParameterOutOfRange {
                name: "breakdown threshold".into(),
                value: format!("{eps:.2e}"),
                expected: "finite and >= 0".into(),
            });
        }
    }

    if options.max_iterations == Some(0) {
        return Err(ValidationError::ParameterOutOfRange {
            name: "max_iterations".into(),
            value: "0".into(),
            expected: ">= 1".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Symmetry check
// ---------------------------------------------------------------------------

/// Check that an operator is symmetric to within `tolerance`.
///
/// Expands the operator with [`to_dense`](LinearOperator::to_dense), so this
/// costs `O(n^2)` memory and is meant for tests and small problems. The
/// solver itself never calls it.
///
/// # Errors
///
/// Returns [`ValidationError::DimensionMismatch`] for a non-square operator
/// and [`ValidationError::NotSymmetric`] for the first pair (in column-major
/// order) with `|A(i,j) - A(j,i)| > tolerance`.
pub fn check_symmetric<A>(matrix: &A, tolerance: f64) -> Result<(), ValidationError>
where
    A: LinearOperator + ?Sized,
{
    if !matrix.is_square() {
        return Err(ValidationError::DimensionMismatch(format!(
            "symmetry check needs a square operator, got {}x{}",
            matrix.rows(),
            matrix.cols(),
        )));
    }

    let dense = matrix.to_dense();
    let n = dense.rows();
    for j in 0..n {
        for i in 0..j {
            let upper = dense.get(i, j);
            let lower = dense.get(j, i);
            if (upper - lower).abs() > tolerance || upper.is_nan() != lower.is_nan() {
                return Err(ValidationError::NotSymmetric {
                    row: i,
                    col: j,
                    upper,
                    lower,
                });
            }
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Output validation (post-solve)
// ---------------------------------------------------------------------------

/// Validate a solver result after computation completes.
///
/// Catches NaN/Inf that propagated silently through the recurrence:
///
/// 1. No `NaN` or `Inf` in the solution vector.
/// 2. The residual norm is finite.
///
/// # Errors
///
/// Returns [`ValidationError::NonFiniteValue`] if the output is corrupted.
pub fn validate_output(result: &CgResult) -> Result<(), ValidationError> {
    if let Some((i, &v)) = result.solution.iter().enumerate().find(|(_, x)| !x.is_finite()) {
        return Err(ValidationError::NonFiniteValue(format!("solution[{i}] = {v}")));
    }

    if !result.residual_norm.is_finite() {
        return Err(ValidationError::NonFiniteValue(format!(
            "residual_norm = {}",
            result.residual_norm,
        )));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
