//! Batched statevector tensors
//!
//! A [`StateTensor`] holds B independent N-qubit statevectors as one tensor
//! of shape `[2; N] + [B]`: one size-2 axis per qubit, then the batch axis.
//! Gate application in `qbatch-sim` contracts directly on the qubit axes, so
//! every batch entry is processed in the same pass.
//!
//! # Example
//!
//! ```
//! use qbatch_state::{uniform_state, validate_normalization, DEFAULT_NORM_TOLERANCE};
//!
//! let state = uniform_state(3, 2).unwrap();
//! assert_eq!(state.dimension(), 8);
//! assert!(validate_normalization(&state, DEFAULT_NORM_TOLERANCE).is_valid());
//! ```

pub mod factory;
pub mod tensor;
pub mod validation;

pub use factory::{basis_state, random_state, uniform_state, zero_state};
pub use tensor::{StateTensor, MAX_QUBITS};
pub use validation::{
    ensure_normalized, validate_normalization, ValidationPolicy, ValidationReport,
    DEFAULT_NORM_TOLERANCE,
};
