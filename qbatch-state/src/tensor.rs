//! Batched rank-(N+1) state tensor
//!
//! Layout invariant: for an N-qubit state with batch size B the tensor has
//! shape `[2, 2, …, 2, B]`. Axis `q` (for `q < N`) holds qubit `q`, axis `N`
//! is the batch axis. When a batch entry is flattened to a vector of length
//! 2^N, qubit 0 is the most significant bit of the basis index, so the
//! amplitude of `|q0 q1 … q(N-1)⟩` sits at index `q0·2^(N-1) + … + q(N-1)`.

use ndarray::{Array1, Array2, ArrayD, ArrayViewD, Axis, IxDyn, Zip};
use num_complex::Complex64;
use qbatch_core::{QuantumError, Result};
use std::fmt;

/// Largest register a dense state tensor may hold
pub const MAX_QUBITS: usize = 30;

/// Batched statevector
///
/// # Example
/// ```
/// use qbatch_state::zero_state;
///
/// let state = zero_state(3, 4).unwrap();
/// assert_eq!(state.num_qubits(), 3);
/// assert_eq!(state.batch_size(), 4);
/// assert_eq!(state.as_array().shape(), &[2, 2, 2, 4]);
/// ```
#[derive(Clone, PartialEq)]
pub struct StateTensor {
    data: ArrayD<Complex64>,
    num_qubits: usize,
}

/// Shape of an N-qubit tensor with batch size B
pub(crate) fn tensor_shape(num_qubits: usize, batch_size: usize) -> Vec<usize> {
    let mut shape = vec![2; num_qubits];
    shape.push(batch_size);
    shape
}

/// Check register and batch sizes
pub(crate) fn check_dims(num_qubits: usize, batch_size: usize) -> Result<()> {
    if num_qubits < 1 {
        return Err(QuantumError::invalid_qubit_count(num_qubits));
    }
    if num_qubits > MAX_QUBITS {
        return Err(QuantumError::InvalidDimension {
            reason: format!("{} qubits exceeds the maximum of {}", num_qubits, MAX_QUBITS),
        });
    }
    if batch_size < 1 {
        return Err(QuantumError::invalid_batch_size(batch_size));
    }
    Ok(())
}

impl StateTensor {
    /// Wrap a rank-(N+1) tensor after checking its shape
    ///
    /// # Errors
    /// Returns `ShapeMismatch` if any qubit axis is not of size 2 and
    /// `InvalidDimension` for an empty register or batch
    pub fn from_array(data: ArrayD<Complex64>) -> Result<Self> {
        let shape = data.shape();
        let Some((&batch_size, qubit_axes)) = shape.split_last() else {
            return Err(QuantumError::shape_mismatch("rank >= 2 tensor", "rank 0 tensor"));
        };
        let num_qubits = qubit_axes.len();
        check_dims(num_qubits, batch_size)?;
        if qubit_axes.iter().any(|&len| len != 2) {
            return Err(QuantumError::shape_mismatch(
                format!("{:?}", tensor_shape(num_qubits, batch_size)),
                format!("{:?}", shape),
            ));
        }
        Ok(Self { data, num_qubits })
    }

    /// Build from a `(2^N, B)` matrix whose column `b` is batch entry `b`
    ///
    /// # Errors
    /// Returns `ShapeMismatch` if the row count is not a power of two
    pub fn from_columns(columns: Array2<Complex64>) -> Result<Self> {
        let (dimension, batch_size) = columns.dim();
        if !dimension.is_power_of_two() || dimension < 2 {
            return Err(QuantumError::shape_mismatch(
                "power-of-two amplitude count >= 2",
                dimension.to_string(),
            ));
        }
        let num_qubits = dimension.trailing_zeros() as usize;
        check_dims(num_qubits, batch_size)?;
        let data = columns
            .as_standard_layout()
            .into_owned()
            .into_shape_with_order(tensor_shape(num_qubits, batch_size))?;
        Ok(Self { data, num_qubits })
    }

    /// Build from one flattened amplitude vector per batch entry
    ///
    /// # Errors
    /// Returns `InvalidDimension` for an empty batch and `ShapeMismatch` if
    /// any vector does not hold exactly 2^N amplitudes
    ///
    /// # Example
    /// ```
    /// use qbatch_state::StateTensor;
    /// use num_complex::Complex64;
    ///
    /// let one = Complex64::new(1.0, 0.0);
    /// let zero = Complex64::new(0.0, 0.0);
    /// let state = StateTensor::from_batch_vectors(1, &[vec![one, zero], vec![zero, one]]).unwrap();
    /// assert_eq!(state.batch_size(), 2);
    /// assert_eq!(state.amplitude(&[1], 1), Some(one));
    /// ```
    pub fn from_batch_vectors(num_qubits: usize, entries: &[Vec<Complex64>]) -> Result<Self> {
        check_dims(num_qubits, entries.len())?;
        let dimension = 1usize << num_qubits;
        if let Some(bad) = entries.iter().find(|entry| entry.len() != dimension) {
            return Err(QuantumError::shape_mismatch(
                format!("{} amplitudes per batch entry", dimension),
                bad.len().to_string(),
            ));
        }
        let columns = Array2::from_shape_fn((dimension, entries.len()), |(i, b)| entries[b][i]);
        Self::from_columns(columns)
    }

    /// Number of qubits N
    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Batch size B
    #[inline]
    pub fn batch_size(&self) -> usize {
        self.data.shape()[self.num_qubits]
    }

    /// Amplitudes per batch entry (2^N)
    #[inline]
    pub fn dimension(&self) -> usize {
        1 << self.num_qubits
    }

    /// Index of the batch axis
    #[inline]
    pub fn batch_axis(&self) -> Axis {
        Axis(self.num_qubits)
    }

    /// The underlying tensor
    #[inline]
    pub fn as_array(&self) -> &ArrayD<Complex64> {
        &self.data
    }

    /// Read-only view of the underlying tensor
    #[inline]
    pub fn view(&self) -> ArrayViewD<'_, Complex64> {
        self.data.view()
    }

    /// Take ownership of the underlying tensor
    pub fn into_array(self) -> ArrayD<Complex64> {
        self.data
    }

    /// Amplitude of the basis state given qubit by qubit
    ///
    /// Returns `None` when `bits` has the wrong length, a bit is not 0/1, or
    /// `batch` is out of range.
    pub fn amplitude(&self, bits: &[u8], batch: usize) -> Option<Complex64> {
        if bits.len() != self.num_qubits || bits.iter().any(|&bit| bit > 1) {
            return None;
        }
        let mut index: Vec<usize> = bits.iter().map(|&bit| bit as usize).collect();
        index.push(batch);
        self.data.get(IxDyn(&index)).copied()
    }

    /// Amplitude at a flattened basis index (qubit 0 most significant)
    pub fn amplitude_at(&self, basis_index: usize, batch: usize) -> Option<Complex64> {
        if basis_index >= self.dimension() {
            return None;
        }
        let bits: Vec<u8> = (0..self.num_qubits)
            .map(|q| ((basis_index >> (self.num_qubits - 1 - q)) & 1) as u8)
            .collect();
        self.amplitude(&bits, batch)
    }

    /// Flattened amplitudes of one batch entry
    ///
    /// # Errors
    /// Returns `InvalidDimension` if `batch` is out of range
    pub fn batch_entry(&self, batch: usize) -> Result<Vec<Complex64>> {
        self.check_batch_index(batch)?;
        Ok(self.data.index_axis(self.batch_axis(), batch).iter().copied().collect())
    }

    /// A batch-size-1 state holding entry `batch`
    ///
    /// # Errors
    /// Returns `InvalidDimension` if `batch` is out of range
    pub fn select_batch(&self, batch: usize) -> Result<Self> {
        self.check_batch_index(batch)?;
        let entry = self
            .data
            .index_axis(self.batch_axis(), batch)
            .to_owned()
            .insert_axis(self.batch_axis());
        Ok(Self {
            data: entry,
            num_qubits: self.num_qubits,
        })
    }

    /// Concatenate states along the batch axis
    ///
    /// # Errors
    /// Returns `InvalidDimension` for an empty list and `ShapeMismatch` if
    /// the qubit counts differ
    pub fn stack(states: &[StateTensor]) -> Result<Self> {
        let Some(first) = states.first() else {
            return Err(QuantumError::invalid_batch_size(0));
        };
        let num_qubits = first.num_qubits;
        if let Some(bad) = states.iter().find(|s| s.num_qubits != num_qubits) {
            return Err(QuantumError::shape_mismatch(
                format!("{} qubits", num_qubits),
                format!("{} qubits", bad.num_qubits),
            ));
        }
        let views: Vec<ArrayViewD<'_, Complex64>> = states.iter().map(|s| s.data.view()).collect();
        let data = ndarray::concatenate(Axis(num_qubits), &views)?;
        Self::from_array(data)
    }

    /// Total probability of each batch entry
    pub fn norms_sqr(&self) -> Array1<f64> {
        self.data
            .axis_iter(self.batch_axis())
            .map(|entry| entry.iter().map(|a| a.norm_sqr()).sum::<f64>())
            .collect()
    }

    /// Measurement probabilities, shape `(2^N, B)`
    pub fn probabilities(&self) -> Array2<f64> {
        let entries: Vec<Vec<f64>> = self
            .data
            .axis_iter(self.batch_axis())
            .map(|entry| entry.iter().map(|a| a.norm_sqr()).collect())
            .collect();
        Array2::from_shape_fn((self.dimension(), self.batch_size()), |(i, b)| entries[b][i])
    }

    /// Per-entry inner product ⟨self|other⟩
    ///
    /// # Errors
    /// Returns `ShapeMismatch` if the tensors have different shapes
    pub fn overlap(&self, other: &StateTensor) -> Result<Array1<Complex64>> {
        self.check_same_shape(other)?;
        let axis = self.batch_axis();
        Ok(self
            .data
            .axis_iter(axis)
            .zip(other.data.axis_iter(axis))
            .map(|(bra, ket)| {
                Zip::from(&bra)
                    .and(&ket)
                    .fold(Complex64::new(0.0, 0.0), |acc, a, b| acc + a.conj() * b)
            })
            .collect())
    }

    /// Elementwise comparison within `epsilon` on real and imaginary parts
    pub fn approx_eq(&self, other: &StateTensor, epsilon: f64) -> bool {
        if self.data.shape() != other.data.shape() {
            return false;
        }
        Zip::from(&self.data).and(&other.data).all(|a, b| {
            let difference = a - b;
            difference.re.abs() <= epsilon && difference.im.abs() <= epsilon
        })
    }

    fn check_batch_index(&self, batch: usize) -> Result<()> {
        if batch >= self.batch_size() {
            return Err(QuantumError::InvalidDimension {
                reason: format!(
                    "batch index {} out of range for batch size {}",
                    batch,
                    self.batch_size()
                ),
            });
        }
        Ok(())
    }

    fn check_same_shape(&self, other: &StateTensor) -> Result<()> {
        if self.data.shape() != other.data.shape() {
            return Err(QuantumError::shape_mismatch(
                format!("{:?}", self.data.shape()),
                format!("{:?}", other.data.shape()),
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for StateTensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "StateTensor ({} qubits, batch {}) (",
            self.num_qubits,
            self.batch_size()
        )?;
        for (b, entry) in self.data.axis_iter(self.batch_axis()).enumerate() {
            writeln!(f, "  [{}]", b)?;
            for (idx, amplitude) in entry.iter().enumerate() {
                if amplitude.norm_sqr() == 0.0 {
                    continue;
                }
                let bits = format!("{:0width$b}", idx, width = self.num_qubits);
                writeln!(f, "    |{}⟩: {}+{}i", bits, amplitude.re, amplitude.im)?;
            }
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    #[test]
    fn test_from_array_rejects_bad_axes() {
        let data = ArrayD::<Complex64>::zeros(IxDyn(&[2, 3, 1]));
        assert!(matches!(
            StateTensor::from_array(data),
            Err(QuantumError::ShapeMismatch { .. })
        ));

        let data = ArrayD::<Complex64>::zeros(IxDyn(&[2, 2, 0]));
        assert!(matches!(
            StateTensor::from_array(data),
            Err(QuantumError::InvalidDimension { .. })
        ));
    }

    #[test]
    fn test_basis_index_convention() {
        // |10⟩ is basis index 2: qubit 0 is the most significant bit
        let mut amplitudes = vec![c(0.0, 0.0); 4];
        amplitudes[2] = c(1.0, 0.0);
        let state = StateTensor::from_batch_vectors(2, &[amplitudes]).unwrap();
        assert_eq!(state.amplitude(&[1, 0], 0), Some(c(1.0, 0.0)));
        assert_eq!(state.amplitude(&[0, 1], 0), Some(c(0.0, 0.0)));
        assert_eq!(state.amplitude_at(2, 0), Some(c(1.0, 0.0)));
        assert_eq!(state.amplitude(&[2, 0], 0), None);
    }

    #[test]
    fn test_select_and_stack_round_trip() {
        let a = vec![c(1.0, 0.0), c(0.0, 0.0)];
        let b = vec![c(0.0, 0.0), c(0.0, 1.0)];
        let state = StateTensor::from_batch_vectors(1, &[a.clone(), b.clone()]).unwrap();

        let first = state.select_batch(0).unwrap();
        let second = state.select_batch(1).unwrap();
        assert_eq!(first.batch_size(), 1);
        assert_eq!(second.batch_entry(0).unwrap(), b);

        let restacked = StateTensor::stack(&[first, second]).unwrap();
        assert_eq!(restacked, state);
        assert!(state.select_batch(2).is_err());
    }

    #[test]
    fn test_stack_rejects_mixed_registers() {
        let one = StateTensor::from_batch_vectors(1, &[vec![c(1.0, 0.0), c(0.0, 0.0)]]).unwrap();
        let two = StateTensor::from_batch_vectors(2, &[vec![c(1.0, 0.0); 4]]).unwrap();
        assert!(StateTensor::stack(&[one, two]).is_err());
        assert!(StateTensor::stack(&[]).is_err());
    }

    #[test]
    fn test_norms_and_probabilities() {
        let h = std::f64::consts::FRAC_1_SQRT_2;
        let state = StateTensor::from_batch_vectors(
            1,
            &[vec![c(h, 0.0), c(0.0, h)], vec![c(1.0, 0.0), c(0.0, 0.0)]],
        )
        .unwrap();
        let norms = state.norms_sqr();
        assert_relative_eq!(norms[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(norms[1], 1.0, epsilon = 1e-12);

        let probs = state.probabilities();
        assert_eq!(probs.dim(), (2, 2));
        assert_relative_eq!(probs[[1, 0]], 0.5, epsilon = 1e-12);
        assert_relative_eq!(probs[[1, 1]], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_overlap() {
        let h = std::f64::consts::FRAC_1_SQRT_2;
        let plus = StateTensor::from_batch_vectors(1, &[vec![c(h, 0.0), c(h, 0.0)]]).unwrap();
        let zero = StateTensor::from_batch_vectors(1, &[vec![c(1.0, 0.0), c(0.0, 0.0)]]).unwrap();
        let overlap = zero.overlap(&plus).unwrap();
        assert_relative_eq!(overlap[0].re, h, epsilon = 1e-12);
        assert_relative_eq!(plus.overlap(&plus).unwrap()[0].re, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_debug_lists_nonzero_kets() {
        let state = StateTensor::from_batch_vectors(2, &[vec![
            c(0.0, 0.0),
            c(1.0, 0.0),
            c(0.0, 0.0),
            c(0.0, 0.0),
        ]])
        .unwrap();
        let text = format!("{:?}", state);
        assert!(text.contains("|01⟩"));
        assert!(!text.contains("|00⟩"));
    }
}
