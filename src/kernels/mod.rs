//! Submodule providing the sparse multiplication kernels: a naive row-wise
//! gather-scatter CSR SpGEMM and an estimator-sized join-oriented kernel
//! that allocates its output buffer exactly once, plus batched variants of
//! both that multiply one left operand against many right operands.

mod estimator_sized;
mod naive;

pub use estimator_sized::{
    batch_estimator_matmul_coo, batch_estimator_matmul_csr, estimator_sized_matmul_coo,
    estimator_sized_matmul_csr,
};
pub use naive::{SpgemmScratch, batch_naive_matmul, naive_matmul};

use crate::errors::MatrixError;

/// Validates that the left operand's column count matches the right
/// operand's row count, the precondition every multiplication kernel
/// shares.
fn check_matmul_dims(left_cols: usize, right_rows: usize) -> Result<(), MatrixError> {
    if left_cols != right_rows {
        return Err(MatrixError::invalid_argument(format!(
            "matmul dimension mismatch: left cols ({left_cols}) != right rows ({right_rows})"
        )));
    }
    Ok(())
}
