#![doc = include_str!("../README.md")]

pub mod coo;
pub mod coord;
pub mod csr;
pub mod errors;
pub mod estimator;
pub mod generate;
pub mod hash;
pub mod kernels;
pub mod mtx;
pub mod oracle;

/// Prelude module re-exporting the types most callers need.
pub mod prelude {
    pub use crate::{
        coo::CooMatrix,
        coord::{ACPair, Coord, HashCoord},
        csr::CsrMatrix,
        errors::MatrixError,
        estimator::{EstimatorConfig, estimate_product_size},
        hash::HashContext,
        kernels::{
            SpgemmScratch, batch_estimator_matmul_coo, batch_estimator_matmul_csr,
            batch_naive_matmul, estimator_sized_matmul_coo, estimator_sized_matmul_csr,
            naive_matmul,
        },
    };
}
