//! Shared or per-batch-entry stacks of gate matrices
//!
//! A parametric gate evaluated on one angle set yields a single matrix used
//! by every batch entry; evaluated on P angle sets it yields P matrices, one
//! per batch entry.

use ndarray::{s, Array2, Array3, ArrayView2, Axis};
use num_complex::Complex64;
use qbatch_core::{QuantumError, Result};

/// Gate matrices resolved for one application
#[derive(Clone, Debug, PartialEq)]
pub enum MatrixBatch {
    /// One `d × d` matrix applied to every batch entry
    Shared(Array2<Complex64>),
    /// `P × d × d` stack, matrix `b` applied to batch entry `b`
    Batched(Array3<Complex64>),
}

impl MatrixBatch {
    /// Collect evaluated matrices, collapsing a single matrix to `Shared`
    ///
    /// # Errors
    /// Returns `ShapeMismatch` if the list is empty or the matrices differ
    /// in size
    pub fn from_matrices(mut matrices: Vec<Array2<Complex64>>) -> Result<Self> {
        match matrices.len() {
            0 => Err(QuantumError::shape_mismatch("at least one gate matrix", "none")),
            1 => Ok(Self::Shared(matrices.remove(0))),
            _ => {
                let views: Vec<ArrayView2<'_, Complex64>> =
                    matrices.iter().map(|m| m.view()).collect();
                Ok(Self::Batched(ndarray::stack(Axis(0), &views)?))
            }
        }
    }

    /// Side length `d` of each matrix
    pub fn dim(&self) -> usize {
        match self {
            Self::Shared(matrix) => matrix.nrows(),
            Self::Batched(stack) => stack.shape()[1],
        }
    }

    /// Number of distinct matrices (1 when shared)
    pub fn batch_size(&self) -> usize {
        match self {
            Self::Shared(_) => 1,
            Self::Batched(stack) => stack.shape()[0],
        }
    }

    /// The matrix applied to batch entry `index`
    ///
    /// Shared batches return the same matrix for every index.
    pub fn matrix(&self, index: usize) -> ArrayView2<'_, Complex64> {
        match self {
            Self::Shared(matrix) => matrix.view(),
            Self::Batched(stack) => stack.index_axis(Axis(0), index),
        }
    }

    /// Embed every matrix as the controlled block of a larger identity
    ///
    /// The result acts on `n_controls` control qubits followed by the
    /// original qubits. Controls are the most significant sub-indices, so
    /// the base gate lands on the all-controls-set block.
    pub fn controlled(&self, n_controls: usize) -> Self {
        if n_controls == 0 {
            return self.clone();
        }
        match self {
            Self::Shared(matrix) => Self::Shared(controlled_matrix(matrix.view(), n_controls)),
            Self::Batched(stack) => {
                let d = stack.shape()[1] << n_controls;
                let mut out = Array3::zeros((stack.shape()[0], d, d));
                for (mut target, base) in out.outer_iter_mut().zip(stack.outer_iter()) {
                    target.assign(&controlled_matrix(base, n_controls));
                }
                Self::Batched(out)
            }
        }
    }

    /// Whether every matrix satisfies U†U = I within `tolerance`
    pub fn is_unitary(&self, tolerance: f64) -> bool {
        (0..self.batch_size()).all(|b| is_unitary(self.matrix(b), tolerance))
    }
}

/// Identity of size `d·2^n_controls` with `base` in the bottom-right block
pub fn controlled_matrix(base: ArrayView2<'_, Complex64>, n_controls: usize) -> Array2<Complex64> {
    let d = base.nrows();
    let full = d << n_controls;
    let offset = full - d;
    let mut out = Array2::<Complex64>::eye(full);
    out.slice_mut(s![offset.., offset..]).assign(&base);
    out
}

/// Check U†U = I
pub fn is_unitary(matrix: ArrayView2<'_, Complex64>, tolerance: f64) -> bool {
    if matrix.nrows() != matrix.ncols() {
        return false;
    }
    let adjoint = matrix.t().mapv(|z| z.conj());
    let product = adjoint.dot(&matrix);
    product.indexed_iter().all(|((i, j), value)| {
        let expected = if i == j { Complex64::new(1.0, 0.0) } else { Complex64::new(0.0, 0.0) };
        (*value - expected).norm() <= tolerance
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrices::{self, to_array};

    #[test]
    fn test_single_matrix_collapses_to_shared() {
        let batch = MatrixBatch::from_matrices(vec![to_array(&matrices::PAULI_X)]).unwrap();
        assert!(matches!(batch, MatrixBatch::Shared(_)));
        assert_eq!(batch.batch_size(), 1);
        assert_eq!(batch.dim(), 2);
    }

    #[test]
    fn test_stacked_matrices() {
        let batch = MatrixBatch::from_matrices(vec![
            to_array(&matrices::rotation_x(0.1)),
            to_array(&matrices::rotation_x(0.2)),
            to_array(&matrices::rotation_x(0.3)),
        ])
        .unwrap();
        assert_eq!(batch.batch_size(), 3);
        assert_eq!(batch.matrix(2), to_array(&matrices::rotation_x(0.3)));
        assert!(batch.is_unitary(1e-12));
    }

    #[test]
    fn test_empty_list_rejected() {
        assert!(MatrixBatch::from_matrices(vec![]).is_err());
    }

    #[test]
    fn test_controlled_x_is_cnot() {
        let cnot = controlled_matrix(to_array(&matrices::PAULI_X).view(), 1);
        let one = Complex64::new(1.0, 0.0);
        let zero = Complex64::new(0.0, 0.0);
        let expected = Array2::from_shape_vec(
            (4, 4),
            vec![
                one, zero, zero, zero, //
                zero, one, zero, zero, //
                zero, zero, zero, one, //
                zero, zero, one, zero,
            ],
        )
        .unwrap();
        assert_eq!(cnot, expected);
    }

    #[test]
    fn test_double_control_is_toffoli_block() {
        let toffoli = controlled_matrix(to_array(&matrices::PAULI_X).view(), 2);
        assert_eq!(toffoli.dim(), (8, 8));
        assert_eq!(toffoli[[6, 7]], Complex64::new(1.0, 0.0));
        assert_eq!(toffoli[[7, 6]], Complex64::new(1.0, 0.0));
        assert_eq!(toffoli[[5, 5]], Complex64::new(1.0, 0.0));
        assert!(is_unitary(toffoli.view(), 1e-12));
    }

    #[test]
    fn test_controlled_batch_keeps_per_entry_matrices() {
        let batch = MatrixBatch::from_matrices(vec![
            to_array(&matrices::phase(0.5)),
            to_array(&matrices::phase(1.5)),
        ])
        .unwrap()
        .controlled(1);
        assert_eq!(batch.dim(), 4);
        assert_eq!(batch.batch_size(), 2);
        let phase = matrices::phase(1.5)[1][1];
        assert_eq!(batch.matrix(1)[[3, 3]], phase);
        assert_eq!(batch.matrix(1)[[2, 2]], Complex64::new(1.0, 0.0));
    }
}
