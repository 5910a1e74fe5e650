//! Tagged union over the seven storage formats.
//!
//! [`Encoding`] lets callers hold "a matrix in one of the formats" without
//! generics, e.g. when the layout is chosen at runtime or read from a file.
//! It forwards every [`LinearOperator`] method to the wrapped format.

use crate::banded::BandedUpperSym;
use crate::coo::SparseCoo;
use crate::dense::DenseMatrix;
use crate::offset::DiagOffsetSym;
use crate::traits::LinearOperator;
use crate::tridiagonal::{TriCol, TriRow, TriScalar};
use crate::types::StorageFormat;

/// A matrix in exactly one storage format.
#[derive(Debug, Clone, PartialEq)]
pub enum Encoding {
    /// General dense.
    Dense(DenseMatrix),
    /// Tridiagonal, per-column band.
    TriCol(TriCol),
    /// Tridiagonal, shared scalar triple.
    TriScalar(TriScalar),
    /// Tridiagonal, per-row triples.
    TriRow(TriRow),
    /// Symmetric banded, upper storage.
    BandedUpperSym(BandedUpperSym),
    /// Symmetric diagonal-offset.
    DiagOffsetSym(DiagOffsetSym),
    /// Coordinate triplets.
    SparseCoo(SparseCoo),
}

macro_rules! dispatch {
    ($self:expr, $m:ident => $body:expr) => {
        match $self {
            Encoding::Dense($m) => $body,
            Encoding::TriCol($m) => $body,
            Encoding::TriScalar($m) => $body,
            Encoding::TriRow($m) => $body,
            Encoding::BandedUpperSym($m) => $body,
            Encoding::DiagOffsetSym($m) => $body,
            Encoding::SparseCoo($m) => $body,
        }
    };
}

impl Encoding {
    /// Second-difference matrix of order `n` in the requested format.
    pub fn dif2(format: StorageFormat, n: usize) -> Self {
        match format {
            StorageFormat::Dense => DenseMatrix::dif2(n).into(),
            StorageFormat::TriCol => TriCol::dif2(n).into(),
            StorageFormat::TriScalar => TriScalar::dif2(n).into(),
            StorageFormat::TriRow => TriRow::dif2(n).into(),
            StorageFormat::BandedUpperSym => BandedUpperSym::dif2(n).into(),
            StorageFormat::DiagOffsetSym => DiagOffsetSym::dif2(n).into(),
            StorageFormat::SparseCoo => SparseCoo::dif2(n).into(),
        }
    }
}

impl LinearOperator for Encoding {
    fn rows(&self) -> usize {
        dispatch!(self, m => m.rows())
    }

    fn cols(&self) -> usize {
        dispatch!(self, m => m.cols())
    }

    fn format(&self) -> StorageFormat {
        dispatch!(self, m => m.format())
    }

    fn stored_entries(&self) -> usize {
        dispatch!(self, m => m.stored_entries())
    }

    fn matvec_into(&self, x: &[f64], y: &mut [f64]) {
        dispatch!(self, m => m.matvec_into(x, y))
    }

    fn to_dense(&self) -> DenseMatrix {
        dispatch!(self, m => m.to_dense())
    }
}

macro_rules! impl_from {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for Encoding {
                fn from(m: $variant) -> Self {
                    Encoding::$variant(m)
                }
            }
        )*
    };
}

impl_from!(TriCol, TriScalar, TriRow, BandedUpperSym, DiagOffsetSym, SparseCoo);

impl From<DenseMatrix> for Encoding {
    fn from(m: DenseMatrix) -> Self {
        Encoding::Dense(m)
    }
}
