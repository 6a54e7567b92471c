//! Error types for qbatch

use crate::QubitId;
use thiserror::Error;

/// Errors that can occur while building or running batched circuits
#[derive(Debug, Error, Clone, PartialEq)]
pub enum QuantumError {
    /// Bad qubit count, batch size, or out-of-range qubit index
    #[error("Invalid dimension: {reason}")]
    InvalidDimension { reason: String },

    /// The same qubit appears twice among an operator's targets and controls
    #[error("Qubit {qubit} is used more than once in a gate operation")]
    QubitCollision { qubit: QubitId },

    /// A parametric operator was applied without angle data
    #[error("Gate '{gate}' is parametric but no parameters were supplied")]
    MissingParameter { gate: String },

    /// Tensor rank or size inconsistent with what the operation expects
    #[error("Shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },

    /// A gate family cannot be used in the requested role
    #[error("Gate '{gate}' is not supported here: {reason}")]
    UnsupportedGate { gate: String, reason: String },

    /// Output state drifted away from unit total probability
    #[error("Batch entry {batch_index} is not normalized: total probability {total_probability}")]
    NotNormalized {
        batch_index: usize,
        total_probability: f64,
    },

    /// Rejected execution configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl QuantumError {
    /// Create an out-of-range qubit error
    pub fn invalid_qubit(qubit: usize, num_qubits: usize) -> Self {
        Self::InvalidDimension {
            reason: format!("qubit index {} out of range for {} qubits", qubit, num_qubits),
        }
    }

    /// Create an invalid qubit count error
    pub fn invalid_qubit_count(num_qubits: usize) -> Self {
        Self::InvalidDimension {
            reason: format!("qubit count must be at least 1, got {}", num_qubits),
        }
    }

    /// Create an invalid batch size error
    pub fn invalid_batch_size(batch_size: usize) -> Self {
        Self::InvalidDimension {
            reason: format!("batch size must be at least 1, got {}", batch_size),
        }
    }

    /// Create a shape mismatch error
    pub fn shape_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::ShapeMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create an unsupported gate error
    pub fn unsupported_gate(gate: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnsupportedGate {
            gate: gate.into(),
            reason: reason.into(),
        }
    }
}

impl From<ndarray::ShapeError> for QuantumError {
    fn from(err: ndarray::ShapeError) -> Self {
        Self::ShapeMismatch {
            expected: "compatible tensor layout".to_string(),
            actual: err.to_string(),
        }
    }
}
