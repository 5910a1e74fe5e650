//! Triplet exchange file.
//!
//! Plain text, one stored entry per line:
//!
//! ```text
//! <row> <col> <value>
//! ```
//!
//! Fields are whitespace-separated, indices are 0-based, and there is no
//! header or entry count. Blank lines are skipped. Repeated `(row, col)`
//! pairs are kept as separate triplets and therefore add up.
//!
//! The file does not record the matrix shape. [`parse_triplets`] infers it
//! as `(max_row + 1, max_col + 1)`; use [`parse_triplets_with_shape`] when
//! trailing rows or columns are empty.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use tracing::debug;

use crate::coo::SparseCoo;
use crate::error::TripletFileError;
use crate::traits::LinearOperator;

/// Read a triplet file, inferring the shape from the largest indices.
///
/// # Errors
///
/// [`TripletFileError::Io`] if the file cannot be opened or read, and
/// [`TripletFileError::Parse`] for the first malformed line.
pub fn read_triplets(path: impl AsRef<Path>) -> Result<SparseCoo, TripletFileError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let matrix = parse_triplets(BufReader::new(file))?;
    debug!(
        "read {} triplets ({}x{}) from {}",
        matrix.nnz(),
        matrix.rows(),
        matrix.cols(),
        path.display(),
    );
    Ok(matrix)
}

/// Parse triplets from a reader, inferring the shape from the largest
/// indices. An input without entries yields a `0 x 0` matrix.
///
/// # Errors
///
/// See [`read_triplets`].
pub fn parse_triplets<R: BufRead>(reader: R) -> Result<SparseCoo, TripletFileError> {
    let entries = parse_entries(reader)?;
    let rows = entries.iter().map(|&(r, _, _)| r + 1).max().unwrap_or(0);
    let cols = entries.iter().map(|&(_, c, _)| c + 1).max().unwrap_or(0);
    Ok(SparseCoo::from_triplets(rows, cols, entries)?)
}

/// Parse triplets from a reader into a matrix of the given shape.
///
/// # Errors
///
/// As [`parse_triplets`], plus [`TripletFileError::Invalid`] if an entry
/// falls outside `rows x cols`.
pub fn parse_triplets_with_shape<R: BufRead>(
    reader: R,
    rows: usize,
    cols: usize,
) -> Result<SparseCoo, TripletFileError> {
    let entries = parse_entries(reader)?;
    Ok(SparseCoo::from_triplets(rows, cols, entries)?)
}

/// Write a matrix as a triplet file, one stored triplet per line in storage
/// order.
///
/// Values are printed with the shortest representation that parses back to
/// the same `f64`, so a write/read cycle is lossless.
///
/// # Errors
///
/// [`TripletFileError::Io`] on any write failure.
pub fn write_triplets(path: impl AsRef<Path>, matrix: &SparseCoo) -> Result<(), TripletFileError> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    write_triplets_to(&mut writer, matrix)?;
    writer.flush()?;
    debug!("wrote {} triplets to {}", matrix.nnz(), path.display());
    Ok(())
}

/// Write a matrix in triplet form to any writer.
///
/// # Errors
///
/// [`TripletFileError::Io`] on any write failure.
pub fn write_triplets_to<W: Write>(mut writer: W, matrix: &SparseCoo) -> Result<(), TripletFileError> {
    for (r, c, v) in matrix.triplets() {
        writeln!(writer, "{r} {c} {v}")?;
    }
    Ok(())
}

fn parse_entries<R: BufRead>(reader: R) -> Result<Vec<(usize, usize, f64)>, TripletFileError> {
    let mut entries = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        entries.push(parse_line(&line).map_err(|reason| TripletFileError::Parse {
            line: index + 1,
            reason,
        })?);
    }
    Ok(entries)
}

fn parse_line(line: &str) -> Result<(usize, usize, f64), String> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let &[row, col, value] = fields.as_slice() else {
        return Err(format!("expected 3 fields, found {}", fields.len()));
    };

    let row = row
        .parse::<usize>()
        .map_err(|e| format!("invalid row index {row:?}: {e}"))?;
    let col = col
        .parse::<usize>()
        .map_err(|e| format!("invalid column index {col:?}: {e}"))?;
    let value = value
        .parse::<f64>()
        .map_err(|e| format!("invalid value {value:?}: {e}"))?;

    Ok((row, col, value))
}
