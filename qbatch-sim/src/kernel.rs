//! Tensor contraction of a gate matrix into a batched state
//!
//! The acted-upon qubit axes are moved to the front, the tensor is viewed as
//! a `(2^k, 2^(N-k), B)` block, the matrix is multiplied in along the first
//! axis, and the original axis order is restored. The full `2^N × 2^N`
//! operator is never formed.

use crate::config::ExecutionConfig;
use ndarray::{Array3, ArrayD, Axis, Zip};
use num_complex::Complex64;
use qbatch_core::{QuantumError, Result};
use qbatch_gates::MatrixBatch;
use qbatch_state::StateTensor;

/// Axis permutation bringing `qubits` to the front, in order
///
/// The remaining qubit axes keep their relative order; the batch axis
/// stays last.
fn front_permutation(qubits: &[usize], num_qubits: usize) -> Vec<usize> {
    let mut perm = Vec::with_capacity(num_qubits + 1);
    perm.extend_from_slice(qubits);
    perm.extend((0..num_qubits).filter(|q| !qubits.contains(q)));
    perm.push(num_qubits);
    perm
}

fn inverse_permutation(perm: &[usize]) -> Vec<usize> {
    let mut inverse = vec![0; perm.len()];
    for (i, &axis) in perm.iter().enumerate() {
        inverse[axis] = i;
    }
    inverse
}

/// Apply `matrices` to the qubit axes `qubits` of `state`
///
/// `qubits[0]` is the most significant sub-index of the matrix. A shared
/// matrix is applied to every batch entry with one matrix product; a
/// batched stack applies matrix `b` to entry `b`.
///
/// # Errors
/// Returns `ShapeMismatch` if the matrix size is not `2^qubits.len()` or a
/// batched stack does not hold exactly one matrix per batch entry, and
/// `InvalidDimension` for an out-of-range qubit axis
pub fn apply_matrix(
    state: &StateTensor,
    qubits: &[usize],
    matrices: &MatrixBatch,
    config: &ExecutionConfig,
) -> Result<StateTensor> {
    let num_qubits = state.num_qubits();
    let batch = state.batch_size();
    let k = qubits.len();
    let d = 1usize << k;

    if let Some(&bad) = qubits.iter().find(|&&q| q >= num_qubits) {
        return Err(QuantumError::invalid_qubit(bad, num_qubits));
    }
    if matrices.dim() != d {
        return Err(QuantumError::shape_mismatch(
            format!("{}x{} matrix for {} qubit(s)", d, d, k),
            format!("{}x{} matrix", matrices.dim(), matrices.dim()),
        ));
    }
    if let MatrixBatch::Batched(stack) = matrices {
        if stack.shape()[0] != batch {
            return Err(QuantumError::shape_mismatch(
                format!("1 or {} parameter sets", batch),
                format!("{} parameter sets", stack.shape()[0]),
            ));
        }
    }

    let rest = 1usize << (num_qubits - k);
    let perm = front_permutation(qubits, num_qubits);
    let psi = state
        .view()
        .permuted_axes(perm.clone())
        .as_standard_layout()
        .into_owned()
        .into_shape_with_order((d, rest, batch))?;

    let evolved: Array3<Complex64> = match matrices {
        MatrixBatch::Shared(matrix) => {
            let flat = psi.into_shape_with_order((d, rest * batch))?;
            matrix.dot(&flat).into_shape_with_order((d, rest, batch))?
        }
        MatrixBatch::Batched(stack) => {
            let mut out = Array3::<Complex64>::zeros((d, rest, batch));
            let zip = Zip::from(out.axis_iter_mut(Axis(2)))
                .and(psi.axis_iter(Axis(2)))
                .and(stack.axis_iter(Axis(0)));
            if config.parallel_for(batch) {
                zip.par_for_each(|mut entry, amplitudes, matrix| {
                    entry.assign(&matrix.dot(&amplitudes))
                });
            } else {
                zip.for_each(|mut entry, amplitudes, matrix| {
                    entry.assign(&matrix.dot(&amplitudes))
                });
            }
            out
        }
    };

    let mut shape = vec![2; num_qubits];
    shape.push(batch);
    let permuted: ArrayD<Complex64> = evolved.into_shape_with_order(shape)?;
    let restored = permuted
        .permuted_axes(inverse_permutation(&perm))
        .as_standard_layout()
        .into_owned();
    StateTensor::from_array(restored)
}
