//! Core types for the qbatch statevector simulator
//!
//! This crate provides the vocabulary shared by every other qbatch crate:
//! - [`QuantumError`]: the error taxonomy used across the workspace
//! - [`QubitId`]: type-safe qubit addressing
//! - [`Parameters`]: the external, optionally batched angle tensor
//! - [`InitPolicy`]: how trainable angles are initialized
//!
//! # Example
//! ```
//! use qbatch_core::{Parameters, QubitId};
//!
//! let q0 = QubitId::new(0);
//! let thetas = Parameters::batch(vec![0.1, 0.2, 0.3]).unwrap();
//! assert_eq!(q0.index(), 0);
//! assert_eq!(thetas.batch_size(), 3);
//! ```

pub mod error;
pub mod parameter;
pub mod qubit;

// Re-exports for convenience
pub use error::QuantumError;
pub use parameter::{InitPolicy, Parameters};
pub use qubit::QubitId;

/// Type alias for results in qbatch
pub type Result<T> = std::result::Result<T, QuantumError>;
