//! Gate matrix catalog for qbatch
//!
//! This crate produces the small fixed-size unitaries applied by the
//! simulator:
//!
//! - [`matrices`]: constant matrices for fixed gates (I, X, Y, Z, H, S, T,
//!   SWAP) and closed-form generators for rotations (RX, RY, RZ, PHASE, U)
//! - [`GateFamily`]: the gate templates, with their target/angle counts
//! - [`MatrixBatch`]: a shared matrix or a per-batch-entry stack, plus the
//!   controlled-block embedding used for controlled gates
//!
//! # Example
//!
//! ```
//! use qbatch_gates::{GateFamily, MatrixBatch};
//! use ndarray::array;
//!
//! // CNOT is X with one control
//! let cnot = GateFamily::X.matrices(array![[0.0]].view()).unwrap().controlled(1);
//! assert_eq!(cnot.dim(), 4);
//!
//! // Batched RX: one matrix per angle
//! let rx = GateFamily::RX.matrices(array![[0.1, 0.2]].view()).unwrap();
//! assert!(matches!(rx, MatrixBatch::Batched(_)));
//! assert!(rx.is_unitary(1e-12));
//! ```

pub mod batch;
pub mod family;
pub mod matrices;

pub use batch::{controlled_matrix, is_unitary, MatrixBatch};
pub use family::GateFamily;
