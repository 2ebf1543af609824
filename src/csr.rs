//! Submodule providing [`CsrMatrix`], a compressed-sparse-row representation
//! of a sparse Boolean matrix.

use std::path::Path;

use crate::{coord::Coord, errors::MatrixError, mtx};

/// A sparse Boolean matrix stored in compressed-sparse-row form.
///
/// Invariants, maintained by every constructor: `row_ptr[0] == 0`,
/// `row_ptr` is non-decreasing, `row_ptr[rows] == col_idx.len()`, and each
/// row's slice of `col_idx` is strictly increasing and within `[0, cols)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsrMatrix {
    rows: usize,
    cols: usize,
    row_ptr: Vec<usize>,
    col_idx: Vec<usize>,
}

impl CsrMatrix {
    /// Builds a [`CsrMatrix`] from an explicit coordinate list and shape.
    ///
    /// Construction is canonical: coordinates are sorted by `(row, col)`,
    /// counted per row, exclusive-prefix-summed into `row_ptr`, then
    /// scattered into `col_idx`.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::InvalidArgument`] if either dimension is
    /// zero, and [`MatrixError::OutOfRange`] if any coordinate falls
    /// outside `rows x cols`.
    pub fn new(mut coords: Vec<Coord>, rows: usize, cols: usize) -> Result<Self, MatrixError> {
        if rows == 0 || cols == 0 {
            return Err(MatrixError::invalid_argument(format!(
                "matrix dimensions must be positive, got {rows}x{cols}"
            )));
        }
        for coord in &coords {
            if coord.row >= rows || coord.col >= cols {
                return Err(MatrixError::OutOfRange {
                    row: coord.row as i64,
                    col: coord.col as i64,
                    rows: rows as i64,
                    cols: cols as i64,
                });
            }
        }

        coords.sort_unstable_by_key(|c| (c.row, c.col));

        let mut row_ptr = vec![0usize; rows + 1];
        for coord in &coords {
            row_ptr[coord.row + 1] += 1;
        }
        for i in 0..rows {
            row_ptr[i + 1] += row_ptr[i];
        }

        let mut col_idx = vec![0usize; coords.len()];
        let mut cursor = row_ptr.clone();
        for coord in &coords {
            col_idx[cursor[coord.row]] = coord.col;
            cursor[coord.row] += 1;
        }

        Ok(Self { rows, cols, row_ptr, col_idx })
    }

    /// Loads a [`CsrMatrix`] from a Matrix Market coordinate file.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::FileError`] on any I/O or parse failure.
    pub fn from_mtx_file(path: impl AsRef<Path>) -> Result<Self, MatrixError> {
        let (rows, cols, coords) = mtx::read_mtx_coords(path)?;
        Self::new(coords, rows, cols)
    }

    /// Builds an empty matrix of the given shape.
    #[must_use]
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self { rows, cols, row_ptr: vec![0; rows + 1], col_idx: Vec::new() }
    }

    /// Assembles a [`CsrMatrix`] directly from already-canonical parts,
    /// skipping the validation and sort [`Self::new`] performs.
    ///
    /// Used by the multiplication kernels, which build `row_ptr`/`col_idx`
    /// in canonical form as a byproduct of their own algorithm (including
    /// the `rows == 0` boundary case `Self::new` rejects).
    pub(crate) fn from_parts(
        rows: usize,
        cols: usize,
        row_ptr: Vec<usize>,
        col_idx: Vec<usize>,
    ) -> Self {
        Self { rows, cols, row_ptr, col_idx }
    }

    /// Returns the `(rows, cols)` shape of the matrix.
    #[must_use]
    pub const fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Returns the number of rows.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Returns the number of columns.
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Returns the row-pointer array, of length `rows() + 1`.
    #[must_use]
    pub fn row_ptr(&self) -> &[usize] {
        &self.row_ptr
    }

    /// Returns the column-index array, of length `row_ptr()[rows()]`.
    #[must_use]
    pub fn col_idx(&self) -> &[usize] {
        &self.col_idx
    }

    /// Returns the number of nonzero entries.
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.col_idx.len()
    }

    /// Returns the column indices of row `row`, in ascending order.
    #[must_use]
    pub fn row(&self, row: usize) -> &[usize] {
        &self.col_idx[self.row_ptr[row]..self.row_ptr[row + 1]]
    }

    /// Returns the nonzero coordinates in row-major, per-row-ascending
    /// order, by walking `row_ptr`/`col_idx`.
    #[must_use]
    pub fn coords(&self) -> Vec<Coord> {
        let mut coords = Vec::with_capacity(self.nnz());
        for row in 0..self.rows {
            for &col in self.row(row) {
                coords.push(Coord::new(row, col));
            }
        }
        coords
    }

    /// Checks the CSR structural invariants; used by tests.
    #[cfg(test)]
    fn check_invariants(&self) {
        assert_eq!(self.row_ptr[0], 0);
        assert_eq!(*self.row_ptr.last().unwrap(), self.col_idx.len());
        for window in self.row_ptr.windows(2) {
            assert!(window[0] <= window[1], "row_ptr must be non-decreasing");
        }
        for row in 0..self.rows {
            let cols = self.row(row);
            for pair in cols.windows(2) {
                assert!(pair[0] < pair[1], "columns within a row must be strictly increasing");
            }
            for &col in cols {
                assert!(col < self.cols);
            }
        }
    }
}
