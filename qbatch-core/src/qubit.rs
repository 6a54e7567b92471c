//! Qubit addressing
//!
//! A qubit index doubles as the tensor axis holding that qubit: qubit `q` of
//! an N-qubit state lives on axis `q`, and axis `N` is the batch axis.

use crate::{QuantumError, Result};
use std::fmt;

/// Type-safe identifier for a qubit
///
/// # Example
/// ```
/// use qbatch_core::QubitId;
///
/// let q0 = QubitId::new(0);
/// let q1 = QubitId::new(1);
/// assert!(q0 < q1);
/// ```
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct QubitId(usize);

impl QubitId {
    /// Create a new qubit identifier
    #[inline]
    pub const fn new(id: usize) -> Self {
        Self(id)
    }

    /// Create a qubit identifier checked against a register size
    ///
    /// # Errors
    /// Returns `InvalidDimension` if `id >= num_qubits`
    ///
    /// # Example
    /// ```
    /// use qbatch_core::QubitId;
    ///
    /// assert!(QubitId::checked(1, 2).is_ok());
    /// assert!(QubitId::checked(2, 2).is_err());
    /// ```
    pub fn checked(id: usize, num_qubits: usize) -> Result<Self> {
        if id >= num_qubits {
            return Err(QuantumError::invalid_qubit(id, num_qubits));
        }
        Ok(Self(id))
    }

    /// Get the underlying index
    #[inline]
    pub const fn index(&self) -> usize {
        self.0
    }

    /// Tensor axis holding this qubit
    #[inline]
    pub const fn axis(&self) -> usize {
        self.0
    }
}

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

impl From<usize> for QubitId {
    #[inline]
    fn from(id: usize) -> Self {
        Self::new(id)
    }
}

impl From<QubitId> for usize {
    #[inline]
    fn from(qid: QubitId) -> Self {
        qid.index()
    }
}
