//! Submodule providing the ground-truth join-size oracle used by tests to
//! validate [`crate::estimator::estimate_product_size`] and the
//! multiplication kernels.
//!
//! This computes the exact join size in time proportional to the true join
//! size, so it is unsuitable as a capacity hint (that is the whole reason
//! the estimator exists) but is exact and simple enough to trust as a test
//! oracle.

use hashbrown::{HashMap, HashSet};

use crate::coord::Coord;

/// Returns the exact number of distinct `(a, c)` pairs in the Boolean join
/// of `r1` (relation `(a, b)`, keyed by `col`) and `r2` (relation `(b, c)`,
/// keyed by `row`).
#[must_use]
pub fn ground_truth_nnz(r1: &[Coord], r2: &[Coord]) -> usize {
    let mut r1_map: HashMap<usize, Vec<usize>> = HashMap::new();
    for coord in r1 {
        r1_map.entry(coord.col).or_default().push(coord.row);
    }

    let mut r2_map: HashMap<usize, Vec<usize>> = HashMap::new();
    for coord in r2 {
        r2_map.entry(coord.row).or_default().push(coord.col);
    }

    let mut join_pairs: HashSet<(usize, usize)> = HashSet::new();
    for (key, a_list) in &r1_map {
        if let Some(c_list) = r2_map.get(key) {
            for &a in a_list {
                for &c in c_list {
                    join_pairs.insert((a, c));
                }
            }
        }
    }

    join_pairs.len()
}
