//! Submodule providing the estimator-sized SpGEMM kernel: it calls
//! [`crate::estimator::estimate_product_size`] to size its output buffer
//! once, then fills that buffer with a single Cartesian-join pass, so the
//! whole multiplication performs exactly one allocation for its result.

use hashbrown::HashSet;

use super::check_matmul_dims;
use crate::{
    coo::CooMatrix,
    coord::{ACPair, Coord, HashCoord},
    csr::CsrMatrix,
    errors::MatrixError,
    hash::HashContext,
};

/// Partitions `hashed`, assumed grouped by `key_fn` but not necessarily
/// sorted, into a lookup from key to the rows sharing it.
fn build_groups(
    hashed: &[HashCoord],
    key_fn: impl Fn(&HashCoord) -> usize,
) -> hashbrown::HashMap<usize, Vec<HashCoord>> {
    let mut groups: hashbrown::HashMap<usize, Vec<HashCoord>> = hashbrown::HashMap::new();
    for &entry in hashed {
        groups.entry(key_fn(&entry)).or_default().push(entry);
    }
    groups
}

/// Joins `left` (keyed on `col`, the `b` side) against `right` (keyed on
/// `row`, the `b` side), emitting every distinct `(a, c)` pair reachable
/// through a shared `b`, into `out`.
///
/// Ordering matches [`CooMatrix`]'s documented iteration order: outer loop
/// ascending over the shared join key, inner loops ascending over the
/// left row and then the right column. Pairs already emitted by an
/// earlier join key are skipped via `seen`, since two distinct `b`
/// witnesses can produce the same `(a, c)` pair.
fn emit_cartesian(
    left: &hashbrown::HashMap<usize, Vec<HashCoord>>,
    right: &hashbrown::HashMap<usize, Vec<HashCoord>>,
    out: &mut Vec<ACPair>,
    seen: &mut HashSet<u64>,
) {
    let mut keys: Vec<usize> = left.keys().copied().filter(|k| right.contains_key(k)).collect();
    keys.sort_unstable();

    for key in keys {
        let mut a_side = left[&key].clone();
        a_side.sort_unstable_by_key(|h| h.row);
        let mut c_side = right[&key].clone();
        c_side.sort_unstable_by_key(|h| h.col);

        for a in &a_side {
            for c in &c_side {
                if seen.insert(ACPair::key(a.row, c.col)) {
                    out.push(ACPair { a: a.row, c: c.col, h1: a.h1, h2: c.h2 });
                }
            }
        }
    }
}

/// Runs the estimator-sized join against an already-built `left_groups`
/// index, sizing the candidate buffer with
/// [`crate::estimator::estimate_product_size`], reserving it once, then
/// filling it by a full Cartesian sweep over matching join-key groups,
/// deduplicating as it goes so the result always satisfies the Boolean
/// "no duplicate coordinate" invariant regardless of how many inner-
/// dimension witnesses a pair shares.
fn estimator_sized_coords_with_left_groups(
    left: &CooMatrix,
    left_groups: &hashbrown::HashMap<usize, Vec<HashCoord>>,
    right: &CooMatrix,
    epsilon: f64,
) -> Result<Vec<Coord>, MatrixError> {
    let estimate = crate::estimator::estimate_product_size(
        left.hashed_coords(),
        right.hashed_coords(),
        epsilon,
    )?;

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let capacity = estimate as usize;

    let right_groups = build_groups(right.hashed_coords(), |h| h.row);

    let mut pairs: Vec<ACPair> = Vec::with_capacity(capacity);
    let mut seen: HashSet<u64> = HashSet::with_capacity(capacity);
    emit_cartesian(left_groups, &right_groups, &mut pairs, &mut seen);

    Ok(pairs.into_iter().map(|pair| Coord::new(pair.a, pair.c)).collect())
}

/// Runs the estimator-sized join for a single pair, building `left_groups`
/// from scratch. Batched callers should build `left_groups` once with
/// [`build_groups`] and call
/// [`estimator_sized_coords_with_left_groups`] directly instead.
fn estimator_sized_coords(
    left: &CooMatrix,
    right: &CooMatrix,
    epsilon: f64,
) -> Result<Vec<Coord>, MatrixError> {
    let left_groups = build_groups(left.hashed_coords(), |h| h.col);
    estimator_sized_coords_with_left_groups(left, &left_groups, right, epsilon)
}

/// Computes the Boolean product `A . B` of two [`CooMatrix`] operands,
/// sizing the output with the product-size estimator and returning it as
/// a [`CsrMatrix`].
///
/// # Errors
///
/// Returns [`MatrixError::InvalidArgument`] if `a.cols() != b.rows()` or
/// if `epsilon` is outside `(0, 1)`.
pub fn estimator_sized_matmul_csr(
    a: &CooMatrix,
    b: &CooMatrix,
    epsilon: f64,
) -> Result<CsrMatrix, MatrixError> {
    check_matmul_dims(a.cols(), b.rows())?;
    let coords = estimator_sized_coords(a, b, epsilon)?;
    CsrMatrix::new(coords, a.rows(), b.cols())
}

/// As [`estimator_sized_matmul_csr`], but returns a [`CooMatrix`] whose
/// entries are hashed under `ctx`.
///
/// # Errors
///
/// Returns [`MatrixError::InvalidArgument`] if `a.cols() != b.rows()` or
/// if `epsilon` is outside `(0, 1)`.
pub fn estimator_sized_matmul_coo(
    a: &CooMatrix,
    b: &CooMatrix,
    epsilon: f64,
    ctx: &HashContext,
) -> Result<CooMatrix, MatrixError> {
    check_matmul_dims(a.cols(), b.rows())?;
    let coords = estimator_sized_coords(a, b, epsilon)?;
    CooMatrix::new(coords, a.rows(), b.cols(), ctx)
}

/// Multiplies one left operand against many right operands using the
/// estimator-sized kernel, returning each product as a [`CsrMatrix`].
///
/// All right operands' row counts are validated against `a.cols()` before
/// any multiplication runs, so a mismatch anywhere in `bs` leaves no
/// partial results behind. `left_groups` is built once from `a` and
/// reused across every pair in the batch, rather than being rebuilt per
/// right operand.
///
/// # Errors
///
/// Returns [`MatrixError::InvalidArgument`] if any `bs[i].rows() !=
/// a.cols()`, or if `epsilon` is outside `(0, 1)`.
pub fn batch_estimator_matmul_csr(
    a: &CooMatrix,
    bs: &[CooMatrix],
    epsilon: f64,
) -> Result<Vec<CsrMatrix>, MatrixError> {
    for b in bs {
        check_matmul_dims(a.cols(), b.rows())?;
    }

    let left_groups = build_groups(a.hashed_coords(), |h| h.col);
    bs.iter()
        .map(|b| {
            let coords = estimator_sized_coords_with_left_groups(a, &left_groups, b, epsilon)?;
            CsrMatrix::new(coords, a.rows(), b.cols())
        })
        .collect()
}

/// As [`batch_estimator_matmul_csr`], but returns each product as a
/// [`CooMatrix`] hashed under `ctx`.
///
/// `left_groups` is built once from `a` and reused across every pair in
/// the batch, rather than being rebuilt per right operand.
///
/// # Errors
///
/// Returns [`MatrixError::InvalidArgument`] if any `bs[i].rows() !=
/// a.cols()`, or if `epsilon` is outside `(0, 1)`.
pub fn batch_estimator_matmul_coo(
    a: &CooMatrix,
    bs: &[CooMatrix],
    epsilon: f64,
    ctx: &HashContext,
) -> Result<Vec<CooMatrix>, MatrixError> {
    for b in bs {
        check_matmul_dims(a.cols(), b.rows())?;
    }

    let left_groups = build_groups(a.hashed_coords(), |h| h.col);
    bs.iter()
        .map(|b| {
            let coords = estimator_sized_coords_with_left_groups(a, &left_groups, b, epsilon)?;
            CooMatrix::new(coords, a.rows(), b.cols(), ctx)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{batch_estimator_matmul_csr, estimator_sized_matmul_coo, estimator_sized_matmul_csr};
    use crate::{coo::CooMatrix, coord::Coord, errors::MatrixError, hash::HashContext};

    fn coo(coords: Vec<Coord>, rows: usize, cols: usize, ctx: &HashContext) -> CooMatrix {
        CooMatrix::new(coords, rows, cols, ctx).unwrap()
    }

    #[test]
    fn matches_ground_truth_on_the_one_to_one_join_scenario() {
        let ctx = HashContext::with_seeds(1, 2);
        let a = coo(vec![Coord::new(0, 1)], 1, 2, &ctx);
        let b = coo(vec![Coord::new(1, 2)], 2, 3, &ctx);
        let product = estimator_sized_matmul_csr(&a, &b, 0.1).unwrap();
        assert_eq!(product.coords(), vec![Coord::new(0, 2)]);
    }

    #[test]
    fn matches_ground_truth_on_the_cross_join_scenario() {
        let ctx = HashContext::with_seeds(1, 2);
        let a = coo(vec![Coord::new(0, 1), Coord::new(2, 1)], 3, 2, &ctx);
        let b = coo(vec![Coord::new(1, 3), Coord::new(1, 4)], 2, 5, &ctx);
        let product = estimator_sized_matmul_csr(&a, &b, 0.1).unwrap();
        let mut expected =
            vec![Coord::new(0, 3), Coord::new(0, 4), Coord::new(2, 3), Coord::new(2, 4)];
        expected.sort_unstable_by_key(|c| (c.row, c.col));
        assert_eq!(product.coords(), expected);
    }

    #[test]
    fn dedups_pairs_reachable_through_multiple_witnesses() {
        let ctx = HashContext::with_seeds(1, 2);
        let a = coo(vec![Coord::new(0, 1), Coord::new(0, 2)], 1, 3, &ctx);
        let b = coo(vec![Coord::new(1, 9), Coord::new(2, 9)], 3, 10, &ctx);
        let product = estimator_sized_matmul_csr(&a, &b, 0.1).unwrap();
        assert_eq!(product.coords(), vec![Coord::new(0, 9)]);
    }

    #[test]
    fn disjoint_join_keys_yield_an_empty_product() {
        let ctx = HashContext::with_seeds(1, 2);
        let a = coo(vec![Coord::new(0, 0)], 1, 2, &ctx);
        let b = coo(vec![Coord::new(1, 0)], 2, 1, &ctx);
        let product = estimator_sized_matmul_csr(&a, &b, 0.1).unwrap();
        assert!(product.coords().is_empty());
    }

    #[test]
    fn mismatched_dimensions_are_rejected() {
        let ctx = HashContext::with_seeds(1, 2);
        let a = coo(vec![Coord::new(0, 0)], 2, 2, &ctx);
        let b = coo(vec![Coord::new(0, 0)], 3, 2, &ctx);
        assert!(matches!(
            estimator_sized_matmul_csr(&a, &b, 0.1),
            Err(MatrixError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn coo_output_carries_hashes_for_its_own_entries() {
        let ctx = HashContext::with_seeds(1, 2);
        let a = coo(vec![Coord::new(0, 1)], 1, 2, &ctx);
        let b = coo(vec![Coord::new(1, 2)], 2, 3, &ctx);
        let product = estimator_sized_matmul_coo(&a, &b, 0.1, &ctx).unwrap();
        assert_eq!(product.coords(), vec![Coord::new(0, 2)]);
        assert_eq!(product.hashed_coords().len(), 1);
    }

    #[test]
    fn batch_runs_each_pair_against_the_same_left_operand() {
        let ctx = HashContext::with_seeds(1, 2);
        let a = coo(vec![Coord::new(0, 0), Coord::new(1, 1)], 2, 2, &ctx);
        let b1 = coo(vec![Coord::new(0, 0)], 2, 1, &ctx);
        let b2 = coo(vec![Coord::new(1, 0)], 2, 1, &ctx);
        let results = batch_estimator_matmul_csr(&a, &[b1, b2], 0.1).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].coords(), vec![Coord::new(0, 0)]);
        assert_eq!(results[1].coords(), vec![Coord::new(1, 0)]);
    }
}
