//! Error types for the solver crate.
//!
//! Provides structured error variants for invalid inputs, numerical
//! instabilities, and the triplet exchange file. All errors implement
//! `std::error::Error` via `thiserror`.
//!
//! Breakdown of the CG recurrence (`p . Ap == 0`) is not an error: it ends
//! the solve early and is reported through
//! [`Termination`](crate::types::Termination).

/// Primary error type for solver operations.
#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    /// A non-finite value appeared in the CG recurrence.
    ///
    /// Only raised when
    /// [`CgOptions::detect_non_finite`](crate::cg::CgOptions::detect_non_finite)
    /// is enabled; otherwise NaN/Inf propagate into the returned iterate.
    #[error("numerical instability at iteration {iteration}: {detail}")]
    NumericalInstability {
        /// Iteration at which the instability was detected.
        iteration: usize,
        /// Human-readable explanation.
        detail: String,
    },

    /// The caller supplied invalid input (dimensions, parameters, etc.).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] ValidationError),
}

/// Validation errors for operators, vectors, and solver options.
///
/// These are raised eagerly before any computation begins so that callers get
/// clear diagnostics rather than out-of-bounds panics deep inside a kernel.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// Storage or vector lengths are inconsistent with the declared shape.
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// A value is NaN or infinite where a finite number is required.
    #[error("non-finite value detected: {0}")]
    NonFiniteValue(String),

    /// A triplet refers to a position outside the declared shape.
    #[error("entry {entry} at ({row}, {col}) out of bounds for a {rows}x{cols} matrix")]
    IndexOutOfBounds {
        /// Position of the offending triplet.
        entry: usize,
        /// Row index of the triplet.
        row: usize,
        /// Column index of the triplet.
        col: usize,
        /// Declared number of rows.
        rows: usize,
        /// Declared number of columns.
        cols: usize,
    },

    /// A parameter is outside its valid range.
    #[error("parameter out of range: {name} = {value} (expected {expected})")]
    ParameterOutOfRange {
        /// Name of the parameter.
        name: String,
        /// The invalid value (as a string for flexibility).
        value: String,
        /// Human-readable description of the valid range.
        expected: String,
    },

    /// The operator is not symmetric within the requested tolerance.
    #[error("matrix is not symmetric: A({row}, {col}) = {upper:e} but A({col}, {row}) = {lower:e}")]
    NotSymmetric {
        /// Row of the first offending entry.
        row: usize,
        /// Column of the first offending entry.
        col: usize,
        /// Value above the diagonal.
        upper: f64,
        /// Mirrored value below the diagonal.
        lower: f64,
    },
}

/// Errors raised while reading or writing a triplet exchange file.
#[derive(Debug, thiserror::Error)]
pub enum TripletFileError {
    /// Underlying I/O failure.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A line could not be parsed as `<row> <col> <value>`.
    #[error("line {line}: {reason}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// What was wrong with the line.
        reason: String,
    },

    /// The parsed triplets do not form a valid matrix.
    #[error("invalid triplet data: {0}")]
    Invalid(#[from] ValidationError),
}
