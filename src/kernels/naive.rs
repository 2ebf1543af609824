//! Submodule providing the naive row-wise gather-scatter CSR SpGEMM kernel.

use super::check_matmul_dims;
use crate::{csr::CsrMatrix, errors::MatrixError};

/// Scratch space reused across back-to-back [`naive_matmul`] calls to
/// amortize the `visited` array's allocation.
///
/// `visited[k] == i` (as an `i64`, so the sentinel `-1` can mean "never
/// touched") means column `k` has already been emitted for the row
/// currently being built; this sentinel trick avoids clearing the array
/// between rows.
#[derive(Debug, Default)]
pub struct SpgemmScratch {
    visited: Vec<i64>,
}

impl SpgemmScratch {
    /// Builds an empty scratch buffer; it grows lazily to fit the widest
    /// right operand it is used with.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_capacity(&mut self, cols: usize) {
        if self.visited.len() < cols {
            self.visited.resize(cols, -1);
        }
    }
}

/// Computes the Boolean product `A . B` of two CSR matrices.
///
/// For each left row, gathers every right row reachable through a nonzero
/// of the left row, deduplicating with the `visited` sentinel trick rather
/// than clearing a scratch array per row, then sorts the row's newly
/// appended columns to restore CSR's per-row ascending-column invariant.
///
/// # Errors
///
/// Returns [`MatrixError::InvalidArgument`] if `a.cols() != b.rows()`.
pub fn naive_matmul(a: &CsrMatrix, b: &CsrMatrix) -> Result<CsrMatrix, MatrixError> {
    let mut scratch = SpgemmScratch::new();
    naive_matmul_with_scratch(a, b, &mut scratch)
}

/// As [`naive_matmul`], but reuses a caller-supplied [`SpgemmScratch`]
/// instead of allocating a fresh one.
///
/// # Errors
///
/// Returns [`MatrixError::InvalidArgument`] if `a.cols() != b.rows()`.
pub fn naive_matmul_with_scratch(
    a: &CsrMatrix,
    b: &CsrMatrix,
    scratch: &mut SpgemmScratch,
) -> Result<CsrMatrix, MatrixError> {
    check_matmul_dims(a.cols(), b.rows())?;
    scratch.ensure_capacity(b.cols());

    let mut row_ptr = vec![0usize; a.rows() + 1];
    let mut col_idx: Vec<usize> = Vec::new();

    for i in 0..a.rows() {
        let before = col_idx.len();
        for &j in a.row(i) {
            for &k in b.row(j) {
                if scratch.visited[k] != i as i64 {
                    scratch.visited[k] = i as i64;
                    col_idx.push(k);
                }
            }
        }
        col_idx[before..].sort_unstable();
        row_ptr[i + 1] = col_idx.len();
    }

    Ok(CsrMatrix::from_parts(a.rows(), b.cols(), row_ptr, col_idx))
}

/// Multiplies one left operand against many right operands, sharing a
/// single [`SpgemmScratch`] across the batch.
///
/// All right operands' row counts are validated against `a.cols()` before
/// any multiplication runs, so a mismatch anywhere in `bs` leaves no
/// partial results behind.
///
/// # Errors
///
/// Returns [`MatrixError::InvalidArgument`] if any `bs[i].rows() !=
/// a.cols()`.
pub fn batch_naive_matmul(a: &CsrMatrix, bs: &[CsrMatrix]) -> Result<Vec<CsrMatrix>, MatrixError> {
    for b in bs {
        check_matmul_dims(a.cols(), b.rows())?;
    }

    let mut scratch = SpgemmScratch::new();
    bs.iter().map(|b| naive_matmul_with_scratch(a, b, &mut scratch)).collect()
}

#[cfg(test)]
mod tests {
    use super::{batch_naive_matmul, naive_matmul};
    use crate::{coord::Coord, csr::CsrMatrix, errors::MatrixError};

    #[test]
    fn matmul_on_the_loaded_csr_scenario() {
        // A is the 2x3 matrix from the CSR-load scenario; B is 3x7 with 12
        // nonzeros. Expected nonzero set from the literal scenario fixture.
        let a = CsrMatrix::new(
            vec![Coord::new(0, 1), Coord::new(1, 1), Coord::new(1, 2)],
            2,
            3,
        )
        .unwrap();

        let b_coords_1based = [
            (1, 2), (2, 2), (1, 3), (2, 3), (3, 3), (2, 4), (3, 4), (2, 5), (3, 5), (2, 6), (3, 6), (3, 7),
        ];
        let b_coords: Vec<Coord> =
            b_coords_1based.iter().map(|&(r, c)| Coord::new(r - 1, c - 1)).collect();
        let b = CsrMatrix::new(b_coords, 3, 7).unwrap();

        let product = naive_matmul(&a, &b).unwrap();
        assert_eq!(product.shape(), (2, 7));

        let expected_1based = [
            (1, 2), (1, 3), (1, 4), (1, 5), (1, 6), (2, 2), (2, 3), (2, 4), (2, 5), (2, 6), (2, 7),
        ];
        let mut expected: Vec<Coord> =
            expected_1based.iter().map(|&(r, c)| Coord::new(r - 1, c - 1)).collect();
        expected.sort_unstable_by_key(|c| (c.row, c.col));

        assert_eq!(product.coords(), expected);
    }

    #[test]
    fn mismatched_dimensions_are_rejected() {
        let a = CsrMatrix::new(vec![Coord::new(0, 0)], 2, 2).unwrap();
        let b = CsrMatrix::new(vec![Coord::new(0, 0)], 3, 2).unwrap();
        assert!(matches!(naive_matmul(&a, &b), Err(MatrixError::InvalidArgument { .. })));
    }

    #[test]
    fn empty_left_operand_yields_empty_result() {
        let a = CsrMatrix::zeros(0, 3);
        let b = CsrMatrix::new(vec![Coord::new(0, 0)], 3, 2).unwrap();
        let product = naive_matmul(&a, &b).unwrap();
        assert_eq!(product.row_ptr(), &[0]);
        assert!(product.col_idx().is_empty());
    }

    #[test]
    fn batch_validates_all_operands_before_running_any() {
        let a = CsrMatrix::new(vec![Coord::new(0, 0)], 2, 2).unwrap();
        let good = CsrMatrix::new(vec![Coord::new(0, 0)], 2, 2).unwrap();
        let bad = CsrMatrix::new(vec![Coord::new(0, 0)], 3, 2).unwrap();
        let err = batch_naive_matmul(&a, &[good, bad]).unwrap_err();
        assert!(matches!(err, MatrixError::InvalidArgument { .. }));
    }

    #[test]
    fn batch_runs_each_pair_in_order() {
        let a = CsrMatrix::new(vec![Coord::new(0, 0), Coord::new(1, 1)], 2, 2).unwrap();
        let b1 = CsrMatrix::new(vec![Coord::new(0, 0)], 2, 1).unwrap();
        let b2 = CsrMatrix::new(vec![Coord::new(1, 0)], 2, 1).unwrap();
        let results = batch_naive_matmul(&a, &[b1, b2]).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].coords(), vec![Coord::new(0, 0)]);
        assert_eq!(results[1].coords(), vec![Coord::new(1, 0)]);
    }

    #[test]
    fn dedups_within_a_row_when_multiple_inner_witnesses_share_a_column() {
        let a = CsrMatrix::new(vec![Coord::new(0, 0), Coord::new(0, 1)], 1, 2).unwrap();
        let b = CsrMatrix::new(vec![Coord::new(0, 0), Coord::new(1, 0)], 2, 1).unwrap();
        let product = naive_matmul(&a, &b).unwrap();
        assert_eq!(product.coords(), vec![Coord::new(0, 0)]);
    }
}
