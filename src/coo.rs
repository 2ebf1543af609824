//! Submodule providing [`CooMatrix`], a coordinate-list representation of a
//! sparse Boolean matrix that carries a precomputed [`HashCoord`] alongside
//! every [`Coord`].

use std::path::Path;

use crate::{
    coord::{Coord, HashCoord},
    errors::MatrixError,
    hash::HashContext,
    mtx,
};

/// A sparse Boolean matrix stored as a coordinate list, with every entry's
/// row- and column-hash precomputed under a [`HashContext`].
#[derive(Debug, Clone)]
pub struct CooMatrix {
    rows: usize,
    cols: usize,
    coords: Vec<Coord>,
    hashed: Vec<HashCoord>,
}

impl CooMatrix {
    /// Builds a [`CooMatrix`] from an explicit coordinate list and shape,
    /// computing the per-axis hashes under `ctx`.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::InvalidArgument`] if either dimension is
    /// zero, and [`MatrixError::OutOfRange`] if any coordinate falls
    /// outside `rows x cols`.
    pub fn new(
        coords: Vec<Coord>,
        rows: usize,
        cols: usize,
        ctx: &HashContext,
    ) -> Result<Self, MatrixError> {
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

        let hashed = coords.iter().map(|&coord| HashCoord::new(coord, ctx)).collect();
        Ok(Self { rows, cols, coords, hashed })
    }

    /// Loads a [`CooMatrix`] from a Matrix Market coordinate file.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::FileError`] on any I/O or parse failure.
    pub fn from_mtx_file(path: impl AsRef<Path>, ctx: &HashContext) -> Result<Self, MatrixError> {
        let (rows, cols, coords) = mtx::read_mtx_coords(path)?;
        Self::new(coords, rows, cols, ctx)
    }

    /// Returns the nonzero coordinates, in construction order.
    #[must_use]
    pub fn coords(&self) -> &[Coord] {
        &self.coords
    }

    /// Returns the nonzero coordinates enriched with their per-axis hashes,
    /// positionwise-corresponding to [`Self::coords`].
    #[must_use]
    pub fn hashed_coords(&self) -> &[HashCoord] {
        &self.hashed
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

    /// Returns the number of nonzero entries.
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.coords.len()
    }
}
