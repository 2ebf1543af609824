//! Submodule providing the seeded hash layer the estimator and the matrix
//! constructors build on: a keyed integer hash mapped into `[0, 1)` and a
//! pairwise-independent combiner over two such hashes.

use std::io::Cursor;

use rand::Rng;

/// Upper bound (exclusive) for the seeds drawn by [`HashContext::random`].
///
/// Matches the prime used by the estimator this crate is modeled on; any
/// sufficiently large prime would do, but tests pin this exact value.
pub const PRIME: u64 = 4_294_967_311;

/// Holds the two independent seeds used to compute the row-hash and the
/// column-hash of every [`crate::coord::HashCoord`].
///
/// Unlike a process-wide global, a [`HashContext`] is an ordinary value:
/// callers construct one and pass it by reference into every matrix
/// constructor and into [`crate::estimator::estimate_product_size`], which
/// keeps the "seeds are fixed for the lifetime of a call" contract explicit
/// in the type system instead of relying on write-once global state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashContext {
    /// Seed used to hash row indices (the "a" side of a join).
    pub seed1: u64,
    /// Seed used to hash column indices (the "c" side of a join).
    pub seed2: u64,
}

impl HashContext {
    /// Draws two independent seeds from a non-deterministic source, each
    /// uniform in `[1, PRIME - 1]`.
    #[must_use]
    pub fn random() -> Self {
        let mut rng = rand::thread_rng();
        let seed1 = rng.gen_range(1..PRIME);
        let seed2 = rng.gen_range(1..PRIME);
        Self { seed1, seed2 }
    }

    /// Builds a context from explicit seeds, for deterministic tests.
    #[must_use]
    pub const fn with_seeds(seed1: u64, seed2: u64) -> Self {
        Self { seed1, seed2 }
    }

    /// Hashes a row index with this context's first seed.
    #[must_use]
    pub fn hash_row(&self, row: i64) -> f64 {
        hash(row, self.seed1)
    }

    /// Hashes a column index with this context's second seed.
    #[must_use]
    pub fn hash_col(&self, col: i64) -> f64 {
        hash(col, self.seed2)
    }
}

/// Applies a 32-bit keyed integer hash (`MurmurHash3_x86_32` semantics, via
/// the `murmur3` crate) to `x` and maps the result to a value uniformly
/// distributed in `[0, 1)`.
///
/// `x` is truncated to 32 bits before hashing, mirroring the original
/// algorithm's `int` input and the `u32` packing the sketch's `seen` set
/// relies on elsewhere in this crate.
#[must_use]
pub fn hash(x: i64, seed: u64) -> f64 {
    let bytes = (x as i32).to_le_bytes();
    let mut cursor = Cursor::new(bytes);
    let seed = (seed % (u64::from(u32::MAX) + 1)) as u32;
    let hashed = murmur3::murmur3_32(&mut cursor, seed)
        .expect("hashing a fixed in-memory byte array cannot fail");
    f64::from(hashed) / f64::from(u32::MAX)
}

/// Pairwise-independent combiner over two independent `[0, 1)` hashes:
/// the fractional part of `h1 - h2`.
///
/// `combine(x, x)` is exactly `0.0`; for a fixed `h2`, `h1 -> combine(h1,
/// h2)` is a bijection on `[0, 1)` (it is a rotation of the unit interval).
/// `combine` is intentionally not symmetric.
#[must_use]
pub fn combine(h1: f64, h2: f64) -> f64 {
    let diff = h1 - h2;
    if diff < 0.0 { diff + 1.0 } else { diff }
}
