//! Submodule providing the product-size estimator: a pairwise-hash min-sketch
//! that approximates `|pi_{a,c}(R1 join R2)|` in time proportional to
//! `|R1| + |R2|`.
//!
//! The estimator treats Boolean matrix multiplication as a project-join
//! query over the nonzero sets of the two operands. Each `HashCoord` of the
//! left operand plays the role of an R1 tuple `(a, b, h1(a))` with `col`
//! acting as the join key `b`; each `HashCoord` of the right operand plays
//! the role of an R2 tuple `(b, c, h2(c))` with `row` acting as the join
//! key. [`estimate_product_size`] returns `k / p` when the sketch fills to
//! exactly `k = floor(9 / epsilon^2)` elements, or the conservative upper
//! bound `k^2` otherwise.

use hashbrown::HashSet;

use crate::{coord::{ACPair, HashCoord}, errors::MatrixError, hash::combine};

/// Configuration for a single estimation run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EstimatorConfig {
    /// Relative-error target; controls the sketch size `k = floor(9 /
    /// epsilon^2)`. Must lie in `(0, 1)`.
    pub epsilon: f64,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self { epsilon: 0.1 }
    }
}

impl EstimatorConfig {
    /// Validates `epsilon` and returns the sketch size `k`.
    fn validated_k(self) -> Result<usize, MatrixError> {
        if !(self.epsilon > 0.0 && self.epsilon < 1.0) {
            return Err(MatrixError::invalid_argument(format!(
                "epsilon must lie in (0, 1), got {}",
                self.epsilon
            )));
        }
        #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
        Ok((9.0 / (self.epsilon * self.epsilon)) as usize)
    }
}

/// Returns an ε-accurate estimate of `|pi_{a,c}(R1 join R2)|` given the
/// hashed nonzero coordinates of both operands.
///
/// `r1_hashed`'s `col` field is the join key and `h1` the a-hash; `r2_hashed`'s
/// `row` field is the join key and `h2` the c-hash. Neither input is
/// mutated; both are copied locally before sorting.
///
/// # Errors
///
/// Returns [`MatrixError::InvalidArgument`] if `epsilon` is outside `(0,
/// 1)`. Never fails on the contents of the inputs: empty or pathological
/// inputs simply fall back to the `k^2` upper bound.
pub fn estimate_product_size(
    r1_hashed: &[HashCoord],
    r2_hashed: &[HashCoord],
    epsilon: f64,
) -> Result<f64, MatrixError> {
    let k = EstimatorConfig { epsilon }.validated_k()?;

    let mut r1 = r1_hashed.to_vec();
    let mut r2 = r2_hashed.to_vec();
    r1.sort_by(|x, y| x.col.cmp(&y.col).then(x.h1.total_cmp(&y.h1)));
    r2.sort_by(|x, y| x.row.cmp(&y.row).then(x.h2.total_cmp(&y.h2)));

    let ai = group_by(&r1, |h| h.col);
    let ci = group_by(&r2, |h| h.row);

    let mut s: Vec<ACPair> = Vec::with_capacity(k);
    let mut f: Vec<ACPair> = Vec::with_capacity(k);
    let mut p = 1.0f64;
    let mut seen: HashSet<u64> = HashSet::new();

    let (mut i, mut j) = (0usize, 0usize);
    while i < ai.len() && j < ci.len() {
        match ai[i].0.cmp(&ci[j].0) {
            core::cmp::Ordering::Equal => {
                pointer_sweep(&ai[i].1, &ci[j].1, &mut p, k, &mut s, &mut f, &mut seen);
                i += 1;
                j += 1;
            }
            core::cmp::Ordering::Less => i += 1,
            core::cmp::Ordering::Greater => j += 1,
        }
    }

    combine_sketch(&mut s, &mut f, k, &mut p);

    #[allow(clippy::cast_precision_loss)]
    if s.len() == k { Ok(k as f64 / p) } else { Ok((k * k) as f64) }
}

/// Partitions a slice already sorted by `key_fn` into contiguous groups.
fn group_by(sorted: &[HashCoord], key_fn: impl Fn(&HashCoord) -> usize) -> Vec<(usize, Vec<HashCoord>)> {
    let mut groups = Vec::new();
    let mut i = 0;
    while i < sorted.len() {
        let key = key_fn(&sorted[i]);
        let mut j = i + 1;
        while j < sorted.len() && key_fn(&sorted[j]) == key {
            j += 1;
        }
        groups.push((key, sorted[i..j].to_vec()));
        i = j;
    }
    groups
}

/// Merges `f` into `s`, keeping only the `k` smallest-`hAC` survivors and
/// updating the shared threshold `p` to the new k-th smallest hash.
///
/// `p` is left untouched if `s` does not exceed `k` after the merge, so
/// repeated calls within one [`estimate_product_size`] invocation see `p`
/// monotonically non-increasing.
fn combine_sketch(s: &mut Vec<ACPair>, f: &mut Vec<ACPair>, k: usize, p: &mut f64) {
    s.append(f);
    if s.len() <= k {
        return;
    }

    s.select_nth_unstable_by(k - 1, |x, y| x.h_ac().total_cmp(&y.h_ac()));
    let thresh = s[k - 1].h_ac();
    s.retain(|pair| pair.h_ac() <= thresh);
    if s.len() > k {
        s.truncate(k);
    }
    *p = thresh;
}

/// Sweeps one matching join-key group of the left (`a`) and right (`c`)
/// operands, admitting every `(a, c)` candidate whose combined hash is
/// below the current threshold `p` into `f`, draining `f` into `s` whenever
/// it fills to `k`.
fn pointer_sweep(
    a: &[HashCoord],
    c: &[HashCoord],
    p: &mut f64,
    k: usize,
    s: &mut Vec<ACPair>,
    f: &mut Vec<ACPair>,
    seen: &mut HashSet<u64>,
) {
    if a.is_empty() {
        return;
    }

    for c_tuple in c {
        let c_hash = c_tuple.h2;

        let mut s_bar = 0;
        let mut best = combine(a[0].h1, c_hash);
        for (idx, entry) in a.iter().enumerate().skip(1) {
            let h = combine(entry.h1, c_hash);
            if h < best {
                best = h;
                s_bar = idx;
            }
        }

        for offset in 0..a.len() {
            let idx = (s_bar + offset) % a.len();
            let h = combine(a[idx].h1, c_hash);
            if h >= *p {
                break;
            }

            let key = ACPair::key(a[idx].row, c_tuple.col);
            if seen.insert(key) {
                f.push(ACPair { a: a[idx].row, c: c_tuple.col, h1: a[idx].h1, h2: c_hash });
            }

            if f.len() >= k {
                combine_sketch(s, f, k, p);
            }
        }
    }
}
