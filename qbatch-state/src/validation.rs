//! Normalization checks on batched states
//!
//! Gates are unitary, so a normalized input stays normalized up to floating
//! point drift. These checks are opt-in and sit outside the contraction path.

use crate::tensor::StateTensor;
use ndarray::Array1;
use qbatch_core::{QuantumError, Result};
use std::fmt;

/// Default tolerance on |total probability − 1|
pub const DEFAULT_NORM_TOLERANCE: f64 = 1e-6;

/// What to do with an output state that fails the normalization check
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ValidationPolicy {
    /// Skip the check
    #[default]
    None,
    /// Check and log a warning on failure
    Warn,
    /// Check and return `NotNormalized` on failure
    Strict,
}

/// Result of a normalization check
#[derive(Clone, Debug, PartialEq)]
pub struct ValidationReport {
    /// Total probability of each batch entry
    pub total_probabilities: Array1<f64>,
    /// Largest |p − 1| across the batch
    pub max_deviation: f64,
    /// Tolerance the report was produced with
    pub tolerance: f64,
}

impl ValidationReport {
    /// Whether every batch entry is within tolerance
    pub fn is_valid(&self) -> bool {
        self.max_deviation <= self.tolerance
    }

    /// Batch index and total probability of the entry furthest from 1
    pub fn worst_entry(&self) -> Option<(usize, f64)> {
        self.total_probabilities
            .iter()
            .copied()
            .enumerate()
            .max_by(|(_, a), (_, b)| (a - 1.0).abs().total_cmp(&(b - 1.0).abs()))
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.worst_entry() {
            Some((index, p)) => write!(
                f,
                "{} batch entries, max deviation {:.3e} at entry {} (p = {}), tolerance {:.1e}",
                self.total_probabilities.len(),
                self.max_deviation,
                index,
                p,
                self.tolerance
            ),
            None => write!(f, "empty batch"),
        }
    }
}

/// Measure how far each batch entry is from unit total probability
pub fn validate_normalization(state: &StateTensor, tolerance: f64) -> ValidationReport {
    let total_probabilities = state.norms_sqr();
    let max_deviation = total_probabilities
        .iter()
        .map(|p| (p - 1.0).abs())
        .fold(0.0, f64::max);
    ValidationReport {
        total_probabilities,
        max_deviation,
        tolerance,
    }
}

/// Fail with `NotNormalized` on the worst offending batch entry
pub fn ensure_normalized(state: &StateTensor, tolerance: f64) -> Result<()> {
    let report = validate_normalization(state, tolerance);
    if report.is_valid() {
        return Ok(());
    }
    let (batch_index, total_probability) = report.worst_entry().unwrap_or((0, f64::NAN));
    Err(QuantumError::NotNormalized {
        batch_index,
        total_probability,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::{uniform_state, zero_state};
    use num_complex::Complex64;

    #[test]
    fn test_zero_state_is_valid() {
        let report = validate_normalization(&zero_state(3, 4).unwrap(), DEFAULT_NORM_TOLERANCE);
        assert!(report.is_valid());
        assert_eq!(report.total_probabilities.len(), 4);
    }

    #[test]
    fn test_unnormalized_entry_is_reported() {
        let one = Complex64::new(1.0, 0.0);
        let zero = Complex64::new(0.0, 0.0);
        let state =
            StateTensor::from_batch_vectors(1, &[vec![one, zero], vec![one, one]]).unwrap();
        let report = validate_normalization(&state, DEFAULT_NORM_TOLERANCE);
        assert!(!report.is_valid());
        assert_eq!(report.worst_entry(), Some((1, 2.0)));

        match ensure_normalized(&state, DEFAULT_NORM_TOLERANCE) {
            Err(QuantumError::NotNormalized { batch_index, .. }) => assert_eq!(batch_index, 1),
            other => panic!("expected NotNormalized, got {:?}", other),
        }
    }

    #[test]
    fn test_default_policy_is_none() {
        assert_eq!(ValidationPolicy::default(), ValidationPolicy::None);
        assert!(ensure_normalized(&uniform_state(2, 1).unwrap(), 1e-12).is_ok());
    }
}
