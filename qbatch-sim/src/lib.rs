//! Batched gate application and circuit composition
//!
//! This crate evolves a [`StateTensor`](qbatch_state::StateTensor) of B
//! independent N-qubit states through gates, layers and nested circuits.
//! Every gate is applied by tensor contraction on the qubit axes it touches,
//! so a whole batch moves through a circuit in one pass and the full
//! `2^N × 2^N` operator is never built.
//!
//! # Features
//!
//! - **Shared or per-entry angles**: one angle set for the whole batch, or
//!   one per batch entry
//! - **Composable circuits**: gates, feature maps, variational and
//!   entangling layers, and nested circuits behind one [`Operation`] trait
//! - **Parallel execution**: per-entry matrix products and parameter sweeps
//!   run on rayon
//! - **Configurable checks**: optional normalization validation of outputs
//!
//! # Example
//!
//! ```
//! use qbatch_sim::{Circuit, EntanglingLayer, FeatureMap, Operation, VariationalLayer};
//! use qbatch_core::Parameters;
//! use qbatch_gates::GateFamily;
//! use qbatch_state::zero_state;
//!
//! let n = 3;
//! let mut circuit = Circuit::new(n).unwrap();
//! circuit.push(FeatureMap::new(GateFamily::RX, n).unwrap()).unwrap();
//! circuit.push(VariationalLayer::new(GateFamily::U, n).unwrap()).unwrap();
//! circuit.push(EntanglingLayer::new(n).unwrap()).unwrap();
//!
//! // Four data points encoded as four batch entries
//! let data = Parameters::batch(vec![0.1, 0.2, 0.3, 0.4]).unwrap();
//! let out = circuit.apply(&zero_state(n, 4).unwrap(), Some(&data)).unwrap();
//! assert_eq!(out.batch_size(), 4);
//! ```

pub mod circuit;
pub mod config;
pub mod executor;
pub mod kernel;
pub mod layers;
pub mod operator;

pub use circuit::{Circuit, Element, Operation};
pub use config::ExecutionConfig;
pub use executor::Executor;
pub use kernel::apply_matrix;
pub use layers::{EntanglingLayer, FeatureMap, VariationalLayer};
pub use operator::{GateOperator, OperatorInfo, ParameterSource};
