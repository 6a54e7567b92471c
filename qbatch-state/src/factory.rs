//! Standard initial states

use crate::tensor::{check_dims, StateTensor};
use ndarray::Array2;
use num_complex::Complex64;
use qbatch_core::{QuantumError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// |0…0⟩ replicated across the batch
///
/// # Errors
/// Returns `InvalidDimension` if `num_qubits < 1` or `batch_size < 1`
///
/// # Example
/// ```
/// use qbatch_state::zero_state;
/// use num_complex::Complex64;
///
/// let state = zero_state(2, 3).unwrap();
/// for b in 0..3 {
///     assert_eq!(state.amplitude(&[0, 0], b), Some(Complex64::new(1.0, 0.0)));
/// }
/// ```
pub fn zero_state(num_qubits: usize, batch_size: usize) -> Result<StateTensor> {
    basis_state(num_qubits, 0, batch_size)
}

/// A computational basis state replicated across the batch
///
/// `index` is read with qubit 0 as the most significant bit.
///
/// # Errors
/// Returns `InvalidDimension` for bad sizes or if `index >= 2^N`
pub fn basis_state(num_qubits: usize, index: usize, batch_size: usize) -> Result<StateTensor> {
    check_dims(num_qubits, batch_size)?;
    let dimension = 1usize << num_qubits;
    if index >= dimension {
        return Err(QuantumError::InvalidDimension {
            reason: format!("basis index {} out of range for {} qubits", index, num_qubits),
        });
    }
    let mut columns = Array2::<Complex64>::zeros((dimension, batch_size));
    columns.row_mut(index).fill(Complex64::new(1.0, 0.0));
    StateTensor::from_columns(columns)
}

/// Equal superposition |+…+⟩ replicated across the batch
pub fn uniform_state(num_qubits: usize, batch_size: usize) -> Result<StateTensor> {
    check_dims(num_qubits, batch_size)?;
    let dimension = 1usize << num_qubits;
    let amplitude = Complex64::new(1.0 / (dimension as f64).sqrt(), 0.0);
    StateTensor::from_columns(Array2::from_elem((dimension, batch_size), amplitude))
}

/// Independent random normalized state for each batch entry
///
/// A fixed `seed` gives reproducible states; `None` draws from entropy.
pub fn random_state(num_qubits: usize, batch_size: usize, seed: Option<u64>) -> Result<StateTensor> {
    check_dims(num_qubits, batch_size)?;
    let dimension = 1usize << num_qubits;
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut columns = Array2::from_shape_simple_fn((dimension, batch_size), || {
        Complex64::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0))
    });
    for mut column in columns.columns_mut() {
        let norm = column.iter().map(|a| a.norm_sqr()).sum::<f64>().sqrt();
        if norm > 0.0 {
            column.mapv_inplace(|a| a / norm);
        } else {
            column.fill(Complex64::new(0.0, 0.0));
            column[0] = Complex64::new(1.0, 0.0);
        }
    }
    StateTensor::from_columns(columns)
}
