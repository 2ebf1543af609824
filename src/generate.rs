//! Submodule providing deterministic sparse-matrix generation via rejection
//! sampling, used to build synthetic test and benchmark inputs.

use hashbrown::HashSet;
use rand::{Rng, SeedableRng, rngs::SmallRng};

use crate::{coord::Coord, errors::MatrixError};

/// Generates `floor(rows * cols * sparsity)` distinct nonzero coordinates
/// for a `rows x cols` matrix, drawn by rejection sampling from a
/// [`SmallRng`] seeded by `seed`.
///
/// # Errors
///
/// Returns [`MatrixError::InvalidArgument`] if `sparsity` is outside `(0,
/// 1]`.
pub fn generate_sparse_coords(
    sparsity: f64,
    rows: usize,
    cols: usize,
    seed: u64,
) -> Result<Vec<Coord>, MatrixError> {
    if !(sparsity > 0.0 && sparsity <= 1.0) {
        return Err(MatrixError::invalid_argument(format!(
            "sparsity must lie in (0, 1], got {sparsity}"
        )));
    }

    #[allow(clippy::cast_precision_loss, clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    let target = ((rows * cols) as f64 * sparsity) as usize;

    let mut rng = SmallRng::seed_from_u64(seed);
    let mut seen: HashSet<(usize, usize)> = HashSet::with_capacity(target);
    let mut coords = Vec::with_capacity(target);

    while coords.len() < target {
        let row = rng.gen_range(0..rows);
        let col = rng.gen_range(0..cols);
        if seen.insert((row, col)) {
            coords.push(Coord::new(row, col));
        }
    }

    Ok(coords)
}
