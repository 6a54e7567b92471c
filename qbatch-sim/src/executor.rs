//! Configured runs of circuits and parameter sweeps

use crate::circuit::Operation;
use crate::config::ExecutionConfig;
use qbatch_core::{Parameters, Result};
use qbatch_state::{ensure_normalized, validate_normalization, StateTensor, ValidationPolicy};
use rayon::prelude::*;
use std::time::Instant;
use tracing::{debug, warn};

/// Runs operations under an [`ExecutionConfig`] and applies its output checks
#[derive(Debug, Clone, Default)]
pub struct Executor {
    config: ExecutionConfig,
}

impl Executor {
    /// # Errors
    /// Returns `InvalidConfig` if the configuration does not validate
    pub fn new(config: ExecutionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    #[inline]
    pub fn config(&self) -> &ExecutionConfig {
        &self.config
    }

    /// Apply `operation` to `state` and check the output
    ///
    /// # Errors
    /// Propagates the operation's error, and returns `NotNormalized` under
    /// [`ValidationPolicy::Strict`] when the output drifts
    pub fn run<O: Operation + ?Sized>(
        &self,
        operation: &O,
        state: &StateTensor,
        params: Option<&Parameters>,
    ) -> Result<StateTensor> {
        let start = Instant::now();
        debug!(
            qubits = state.num_qubits(),
            batch = state.batch_size(),
            "executor run started"
        );
        let output = operation.apply_with(state, params, &self.config)?;
        self.check_output(&output)?;
        debug!(
            elapsed_us = start.elapsed().as_micros() as u64,
            "executor run finished"
        );
        Ok(output)
    }

    /// Run the same operation once per parameter set, in parallel
    ///
    /// Results are returned in the order of `parameter_sets`; a failure in
    /// one run does not affect the others.
    pub fn run_batch<O: Operation + ?Sized>(
        &self,
        operation: &O,
        state: &StateTensor,
        parameter_sets: &[Parameters],
    ) -> Vec<Result<StateTensor>> {
        debug!(runs = parameter_sets.len(), "executor sweep started");
        parameter_sets
            .par_iter()
            .map(|params| self.run(operation, state, Some(params)))
            .collect()
    }

    fn check_output(&self, output: &StateTensor) -> Result<()> {
        match self.config.validation {
            ValidationPolicy::None => Ok(()),
            ValidationPolicy::Warn => {
                let report = validate_normalization(output, self.config.norm_tolerance);
                if !report.is_valid() {
                    warn!(%report, "output state is not normalized");
                }
                Ok(())
            }
            ValidationPolicy::Strict => ensure_normalized(output, self.config.norm_tolerance),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Circuit, GateOperator, VariationalLayer};
    use num_complex::Complex64;
    use qbatch_core::{InitPolicy, QuantumError};
    use qbatch_gates::GateFamily;
    use qbatch_state::zero_state;

    #[test]
    fn test_new_validates_config() {
        let config = ExecutionConfig::new().with_parallel_batch_threshold(0);
        assert!(matches!(
            Executor::new(config),
            Err(QuantumError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_run_matches_direct_apply() {
        let circuit = Circuit::from_elements(
            2,
            [GateOperator::h(0, 2).unwrap(), GateOperator::cnot(0, 1, 2).unwrap()],
        )
        .unwrap();
        let state = zero_state(2, 2).unwrap();
        let executor = Executor::new(ExecutionConfig::debug()).unwrap();
        assert_eq!(
            executor.run(&circuit, &state, None).unwrap(),
            circuit.apply(&state, None).unwrap()
        );
    }

    #[test]
    fn test_strict_policy_rejects_unnormalized_output() {
        let one = Complex64::new(1.0, 0.0);
        let state = StateTensor::from_batch_vectors(1, &[vec![one, one]]).unwrap();
        let x = GateOperator::x(0, 1).unwrap();

        let strict = Executor::new(ExecutionConfig::debug()).unwrap();
        assert!(matches!(
            strict.run(&x, &state, None),
            Err(QuantumError::NotNormalized { batch_index: 0, .. })
        ));

        let warn = Executor::new(ExecutionConfig::new().with_validation(ValidationPolicy::Warn))
            .unwrap();
        assert!(warn.run(&x, &state, None).is_ok());
    }

    #[test]
    fn test_run_batch_preserves_order() {
        let ry = GateOperator::ry(0, 1).unwrap();
        let state = zero_state(1, 1).unwrap();
        let sets: Vec<Parameters> = [0.0, 1.0, 2.0, 3.0]
            .iter()
            .map(|&theta| Parameters::scalar(theta))
            .collect();
        let executor = Executor::default();
        let results = executor.run_batch(&ry, &state, &sets);
        assert_eq!(results.len(), 4);
        for (result, params) in results.into_iter().zip(&sets) {
            let expected = ry.apply(&state, Some(params)).unwrap();
            assert_eq!(result.unwrap(), expected);
        }
    }

    #[test]
    fn test_run_batch_isolates_failures() {
        let rx = GateOperator::rx(0, 1).unwrap();
        let state = zero_state(1, 2).unwrap();
        let sets = vec![
            Parameters::scalar(0.5),
            Parameters::batch(vec![0.1, 0.2, 0.3]).unwrap(),
        ];
        let results = Executor::default().run_batch(&rx, &state, &sets);
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(QuantumError::ShapeMismatch { .. })));
    }

    #[test]
    fn test_run_with_dyn_operation() {
        let layer = VariationalLayer::with_init(GateFamily::RZ, 2, InitPolicy::Zeros).unwrap();
        let operation: &dyn Operation = &layer;
        let state = zero_state(2, 1).unwrap();
        assert_eq!(Executor::default().run(operation, &state, None).unwrap(), state);
    }
}
