//! Execution configuration

use qbatch_core::{QuantumError, Result};
use qbatch_state::{ValidationPolicy, DEFAULT_NORM_TOLERANCE};

/// Configuration for gate application and circuit runs
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionConfig {
    /// Minimum batch size at which per-entry matrix products run in parallel
    ///
    /// Batches smaller than this are contracted on the calling thread.
    /// Shared (unbatched) matrices always use a single matrix product.
    ///
    /// Default: 8
    pub parallel_batch_threshold: usize,

    /// Normalization check applied to executor outputs
    ///
    /// Default: `ValidationPolicy::None`
    pub validation: ValidationPolicy,

    /// Allowed |total probability − 1| per batch entry
    ///
    /// Default: 1e-6
    pub norm_tolerance: f64,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            parallel_batch_threshold: 8,
            validation: ValidationPolicy::None,
            norm_tolerance: DEFAULT_NORM_TOLERANCE,
        }
    }
}

impl ExecutionConfig {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration tuned for throughput
    ///
    /// - Parallel contraction from batch size 2
    /// - No output validation
    pub fn fast() -> Self {
        Self {
            parallel_batch_threshold: 2,
            validation: ValidationPolicy::None,
            ..Default::default()
        }
    }

    /// Configuration for debugging
    ///
    /// - Sequential contraction
    /// - Strict normalization checks on every output
    pub fn debug() -> Self {
        Self {
            parallel_batch_threshold: usize::MAX,
            validation: ValidationPolicy::Strict,
            ..Default::default()
        }
    }

    /// Set the parallel batch threshold
    pub fn with_parallel_batch_threshold(mut self, threshold: usize) -> Self {
        self.parallel_batch_threshold = threshold;
        self
    }

    /// Set the output validation policy
    pub fn with_validation(mut self, policy: ValidationPolicy) -> Self {
        self.validation = policy;
        self
    }

    /// Set the normalization tolerance
    pub fn with_norm_tolerance(mut self, tolerance: f64) -> Self {
        self.norm_tolerance = tolerance;
        self
    }

    /// Whether a batch of `batch_size` entries should be contracted in parallel
    #[inline]
    pub fn parallel_for(&self, batch_size: usize) -> bool {
        batch_size >= self.parallel_batch_threshold
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.parallel_batch_threshold == 0 {
            return Err(QuantumError::InvalidConfig(
                "parallel_batch_threshold must be > 0".to_string(),
            ));
        }
        if !self.norm_tolerance.is_finite() || self.norm_tolerance <= 0.0 {
            return Err(QuantumError::InvalidConfig(format!(
                "norm_tolerance must be a positive finite number, got {}",
                self.norm_tolerance
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ExecutionConfig::default();
        assert_eq!(config.parallel_batch_threshold, 8);
        assert_eq!(config.validation, ValidationPolicy::None);
        assert_eq!(config.norm_tolerance, 1e-6);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_presets() {
        assert!(ExecutionConfig::fast().parallel_for(2));
        let debug = ExecutionConfig::debug();
        assert!(!debug.parallel_for(1024));
        assert_eq!(debug.validation, ValidationPolicy::Strict);
    }

    #[test]
    fn test_builder_pattern() {
        let config = ExecutionConfig::new()
            .with_parallel_batch_threshold(4)
            .with_validation(ValidationPolicy::Warn)
            .with_norm_tolerance(1e-9);
        assert!(config.parallel_for(4));
        assert!(!config.parallel_for(3));
        assert_eq!(config.validation, ValidationPolicy::Warn);
        assert_eq!(config.norm_tolerance, 1e-9);
    }

    #[test]
    fn test_validation() {
        let config = ExecutionConfig::new().with_parallel_batch_threshold(0);
        assert!(matches!(config.validate(), Err(QuantumError::InvalidConfig(_))));

        let config = ExecutionConfig::new().with_norm_tolerance(-1.0);
        assert!(config.validate().is_err());

        let config = ExecutionConfig::new().with_norm_tolerance(f64::NAN);
        assert!(config.validate().is_err());
    }
}
