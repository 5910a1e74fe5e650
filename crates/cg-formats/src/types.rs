//! Core types shared by the storage formats and the solver.
//!
//! Provides the [`StorageFormat`] tag every operator reports, and the result
//! types returned by [`ConjugateGradientSolver`](crate::cg::ConjugateGradientSolver).

use std::time::Duration;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// StorageFormat
// ---------------------------------------------------------------------------

/// Identifier for a compact matrix storage layout.
///
/// Each variant names one concrete encoding of the same abstract linear
/// operator. All of them honour the same `matvec`/`residual` contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StorageFormat {
    /// Full column-major array, see [`DenseMatrix`](crate::dense::DenseMatrix).
    Dense,
    /// Tridiagonal, 3 x N band stored per column.
    TriCol,
    /// Toeplitz tridiagonal, one `[sub, diag, super]` triple for every row.
    TriScalar,
    /// Tridiagonal, N rows of 3 values each.
    TriRow,
    /// Symmetric banded, diagonal plus `mu` super-diagonals.
    BandedUpperSym,
    /// Symmetric, main diagonal plus a set of super-diagonal offsets.
    DiagOffsetSym,
    /// Coordinate triplets; duplicates are additive.
    SparseCoo,
}

impl StorageFormat {
    /// All formats, in declaration order.
    pub const ALL: [StorageFormat; 7] = [
        StorageFormat::Dense,
        StorageFormat::TriCol,
        StorageFormat::TriScalar,
        StorageFormat::TriRow,
        StorageFormat::BandedUpperSym,
        StorageFormat::DiagOffsetSym,
        StorageFormat::SparseCoo,
    ];

    /// Whether the format stores only one triangle and mirrors it in `matvec`.
    pub fn exploits_symmetry(self) -> bool {
        matches!(self, StorageFormat::BandedUpperSym | StorageFormat::DiagOffsetSym)
    }
}

impl std::fmt::Display for StorageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageFormat::Dense => write!(f, "dense"),
            StorageFormat::TriCol => write!(f, "tri-col"),
            StorageFormat::TriScalar => write!(f, "tri-scalar"),
            StorageFormat::TriRow => write!(f, "tri-row"),
            StorageFormat::BandedUpperSym => write!(f, "banded-upper-sym"),
            StorageFormat::DiagOffsetSym => write!(f, "diag-offset-sym"),
            StorageFormat::SparseCoo => write!(f, "sparse-coo"),
        }
    }
}

// ---------------------------------------------------------------------------
// Solver result types
// ---------------------------------------------------------------------------

/// How a CG solve ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    /// All scheduled iterations ran.
    Completed,
    /// `p . Ap` hit the breakdown condition at the given iteration; the
    /// iterate from before that iteration was returned.
    Breakdown {
        /// 0-based iteration at which the breakdown was detected.
        iteration: usize,
    },
}

impl Termination {
    /// `true` if the solve stopped on breakdown.
    #[inline]
    pub fn is_breakdown(&self) -> bool {
        matches!(self, Termination::Breakdown { .. })
    }
}

/// Per-iteration convergence snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConvergenceInfo {
    /// Iteration index (0-based).
    pub iteration: usize,
    /// L2 norm of the recurrence residual after this iteration.
    pub residual_norm: f64,
}

/// Result returned by a CG solve.
#[derive(Debug, Clone)]
pub struct CgResult {
    /// Solution vector x.
    pub solution: Vec<f64>,
    /// Number of completed iterations.
    pub iterations: usize,
    /// Why the iteration stopped.
    pub termination: Termination,
    /// `||b - A x||_2` recomputed from the final iterate.
    pub residual_norm: f64,
    /// Wall-clock time taken.
    pub wall_time: Duration,
    /// Per-iteration convergence history (empty when recording is disabled).
    pub convergence_history: Vec<ConvergenceInfo>,
    /// Storage format of the operator that was solved.
    pub format: StorageFormat,
}
