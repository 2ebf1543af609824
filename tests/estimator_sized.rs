//! Integration tests for sized estimator behavior.

use bool_spgemm::{
    coo::CooMatrix,
    coord::Coord,
    generate::generate_sparse_coords,
    hash::HashContext,
    kernels::{batch_naive_matmul, estimator_sized_matmul_csr, naive_matmul},
    oracle::ground_truth_nnz,
};

#[test]
fn estimator_sized_kernel_agrees_with_the_naive_kernel_on_a_random_join() {
    let ctx = HashContext::with_seeds(555, 777);

    let left_coords = generate_sparse_coords(0.05, 40, 40, 10).unwrap();
    let right_coords = generate_sparse_coords(0.05, 40, 40, 20).unwrap();

    let left_coo = CooMatrix::new(left_coords.clone(), 40, 40, &ctx).unwrap();
    let right_coo = CooMatrix::new(right_coords.clone(), 40, 40, &ctx).unwrap();

    let left_csr = bool_spgemm::csr::CsrMatrix::new(left_coords.clone(), 40, 40).unwrap();
    let right_csr = bool_spgemm::csr::CsrMatrix::new(right_coords.clone(), 40, 40).unwrap();

    let by_estimator = estimator_sized_matmul_csr(&left_coo, &right_coo, 0.2).unwrap();
    let by_naive = naive_matmul(&left_csr, &right_csr).unwrap();

    assert_eq!(by_estimator.coords(), by_naive.coords());

    let truth = ground_truth_nnz(&left_coords, &right_coords);
    assert_eq!(by_naive.nnz(), truth);
}

#[test]
fn batch_naive_matmul_matches_individual_calls() {
    let a = bool_spgemm::csr::CsrMatrix::new(
        vec![Coord::new(0, 0), Coord::new(1, 1)],
        2,
        2,
    )
    .unwrap();
    let b1 = bool_spgemm::csr::CsrMatrix::new(vec![Coord::new(0, 0)], 2, 3).unwrap();
    let b2 = bool_spgemm::csr::CsrMatrix::new(vec![Coord::new(1, 2)], 2, 3).unwrap();

    let batched = batch_naive_matmul(&a, &[b1.clone(), b2.clone()]).unwrap();
    let individually = vec![naive_matmul(&a, &b1).unwrap(), naive_matmul(&a, &b2).unwrap()];

    assert_eq!(batched, individually);
}
