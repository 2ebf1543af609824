//! Submodule providing a permissive Matrix Market (`.mtx`) coordinate-format
//! reader shared by [`crate::coo::CooMatrix`] and [`crate::csr::CsrMatrix`].

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use crate::{coord::Coord, errors::MatrixError};

/// Reads the nonzero coordinates, 0-based, out of a Matrix Market file.
///
/// Comment lines (starting with `%`) and blank lines are skipped. The first
/// non-comment line must be `rows cols nnz`; the following `nnz`
/// non-comment lines must be `row col value` with 1-based indices. Entries
/// whose value is exactly `0` are dropped.
///
/// # Errors
///
/// Returns [`MatrixError::FileError`] if the file cannot be opened, a
/// header or nonzero line cannot be parsed, or the file ends before `nnz`
/// entries are read. Returns [`MatrixError::OutOfRange`] if a `row` or
/// `col` falls outside the declared `rows x cols` shape.
pub fn read_mtx_coords(path: impl AsRef<Path>) -> Result<(usize, usize, Vec<Coord>), MatrixError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|err| MatrixError::FileError {
        path: path.display().to_string(),
        reason: err.to_string(),
    })?;
    let mut lines = BufReader::new(file).lines();

    let file_error = |reason: &str| MatrixError::FileError {
        path: path.display().to_string(),
        reason: reason.to_string(),
    };

    let header = loop {
        let Some(line) = lines.next() else {
            return Err(file_error("missing header line"));
        };
        let line = line.map_err(|err| file_error(&err.to_string()))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('%') {
            continue;
        }
        break trimmed.to_string();
    };

    let mut header_fields = header.split_whitespace();
    let (rows, cols, nnz) = (|| {
        let rows: usize = header_fields.next()?.parse().ok()?;
        let cols: usize = header_fields.next()?.parse().ok()?;
        let nnz: usize = header_fields.next()?.parse().ok()?;
        Some((rows, cols, nnz))
    })()
    .ok_or_else(|| file_error(&format!("could not parse 'rows cols nnz' from '{header}'")))?;

    let mut coords = Vec::with_capacity(nnz);
    let mut read = 0;
    while read < nnz {
        let Some(line) = lines.next() else {
            return Err(file_error("file ended before reading all nonzeros"));
        };
        let line = line.map_err(|err| file_error(&err.to_string()))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('%') {
            continue;
        }

        let mut fields = trimmed.split_whitespace();
        let parsed = (|| {
            let row: usize = fields.next()?.parse().ok()?;
            let col: usize = fields.next()?.parse().ok()?;
            let value: f64 = fields.next()?.parse().ok()?;
            Some((row, col, value))
        })()
        .ok_or_else(|| file_error(&format!("could not parse a nonzero line: '{trimmed}'")))?;
        let (row, col, value) = parsed;

        if row == 0 || row > rows || col == 0 || col > cols {
            return Err(MatrixError::OutOfRange {
                row: row as i64 - 1,
                col: col as i64 - 1,
                rows: rows as i64,
                cols: cols as i64,
            });
        }

        if value != 0.0 {
            coords.push(Coord::new(row - 1, col - 1));
        }
        read += 1;
    }

    Ok((rows, cols, coords))
}
