//! Conjugate Gradient over interchangeable matrix storage formats.
//!
//! One generic CG loop solves `Ax = b` for a symmetric positive-definite `A`
//! held in any of seven compact layouts. Each layout supplies only a
//! matrix-vector product through [`LinearOperator`]; the solver never looks
//! at the storage behind it.
//!
//! # Storage formats
//!
//! | Format | Type | Stored scalars |
//! |--------|------|----------------|
//! | Dense | [`DenseMatrix`] | `rows * cols` |
//! | Tridiagonal, per column | [`TriCol`] | `3n` |
//! | Tridiagonal, constant | [`TriScalar`] | 3 |
//! | Tridiagonal, per row | [`TriRow`] | `3n` |
//! | Symmetric banded, upper | [`BandedUpperSym`] | `(mu + 1) n` |
//! | Symmetric diagonal-offset | [`DiagOffsetSym`] | `n * ndiag` |
//! | Coordinate triplets | [`SparseCoo`] | `nnz` |
//!
//! # Example
//!
//! ```rust
//! use cg_formats::cg::ConjugateGradientSolver;
//! use cg_formats::generators::dif2_all;
//! use cg_formats::traits::LinearOperator;
//!
//! let n = 10;
//! let exact: Vec<f64> = (1..=n).map(|i| i as f64).collect();
//! let solver = ConjugateGradientSolver::default();
//!
//! for a in dif2_all(n) {
//!     let b = a.matvec(&exact);
//!     let result = solver.solve(&a, &b, &vec![0.0; n]).unwrap();
//!     assert!(result.residual_norm < 1e-8, "{}: {}", a.format(), result.residual_norm);
//! }
//! ```

pub mod banded;
pub mod cg;
pub mod coo;
pub mod dense;
pub mod encoding;
pub mod error;
pub mod generators;
pub mod offset;
pub mod traits;
pub mod tridiagonal;
pub mod types;
pub mod validation;
pub mod vector;

#[cfg(feature = "triplet-io")]
pub mod io;

// Re-exports for ergonomic use.
pub use banded::BandedUpperSym;
pub use cg::{cg, BreakdownPolicy, CgOptions, ConjugateGradientSolver};
pub use coo::SparseCoo;
pub use dense::DenseMatrix;
pub use encoding::Encoding;
pub use error::{SolverError, TripletFileError, ValidationError};
pub use offset::DiagOffsetSym;
pub use traits::LinearOperator;
pub use tridiagonal::{TriCol, TriRow, TriScalar};
pub use types::{CgResult, ConvergenceInfo, StorageFormat, Termination};
