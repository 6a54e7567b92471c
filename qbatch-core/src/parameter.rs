//! Angle tensors for parametric gates and trainable-angle initialization
//!
//! [`Parameters`] is the external parameter tensor threaded through a
//! circuit. It is a 2-D array of shape `(rows, batch)`:
//! - `rows` is the number of angles a gate consumes (1 for RX/RY/RZ/PHASE,
//!   3 for U)
//! - `batch` is either 1 (one angle set shared by every batch entry) or the
//!   batch size of the state it is applied to (one angle set per entry)

use crate::{QuantumError, Result};
use ndarray::{Array2, ArrayView1, ArrayView2, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;

/// External, optionally batched angle tensor
///
/// # Example
/// ```
/// use qbatch_core::Parameters;
///
/// // One angle shared by the whole batch
/// let shared = Parameters::scalar(0.5);
/// assert_eq!(shared.batch_size(), 1);
///
/// // One angle per batch entry
/// let batched = Parameters::batch(vec![0.1, 0.2, 0.3, 0.4]).unwrap();
/// assert_eq!(batched.num_rows(), 1);
/// assert_eq!(batched.batch_size(), 4);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Parameters {
    values: Array2<f64>,
}

impl Parameters {
    /// A single angle shared by every batch entry
    pub fn scalar(theta: f64) -> Self {
        Self {
            values: Array2::from_elem((1, 1), theta),
        }
    }

    /// One angle per batch entry
    ///
    /// # Errors
    /// Returns `InvalidDimension` if `thetas` is empty
    pub fn batch(thetas: Vec<f64>) -> Result<Self> {
        let len = thetas.len();
        if len == 0 {
            return Err(QuantumError::invalid_batch_size(0));
        }
        let values = Array2::from_shape_vec((1, len), thetas)?;
        Ok(Self { values })
    }

    /// Several angle rows (e.g. φ, θ, ω for U), each holding one value per
    /// batch entry
    ///
    /// # Errors
    /// Returns `InvalidDimension` when there are no rows or no columns and
    /// `ShapeMismatch` when the rows have different lengths
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let Some(first) = rows.first() else {
            return Err(QuantumError::InvalidDimension {
                reason: "parameter tensor needs at least one row".to_string(),
            });
        };
        let width = first.len();
        if let Some(bad) = rows.iter().find(|row| row.len() != width) {
            return Err(QuantumError::shape_mismatch(
                format!("rows of length {}", width),
                format!("row of length {}", bad.len()),
            ));
        }
        let flat: Vec<f64> = rows.iter().flatten().copied().collect();
        Self::from_array(Array2::from_shape_vec((rows.len(), width), flat)?)
    }

    /// Wrap an existing `(rows, batch)` array
    ///
    /// # Errors
    /// Returns `InvalidDimension` if either axis is empty
    pub fn from_array(values: Array2<f64>) -> Result<Self> {
        if values.nrows() == 0 {
            return Err(QuantumError::InvalidDimension {
                reason: "parameter tensor needs at least one row".to_string(),
            });
        }
        if values.ncols() == 0 {
            return Err(QuantumError::invalid_batch_size(0));
        }
        Ok(Self { values })
    }

    /// Number of angle rows
    #[inline]
    pub fn num_rows(&self) -> usize {
        self.values.nrows()
    }

    /// Number of angle sets (columns)
    #[inline]
    pub fn batch_size(&self) -> usize {
        self.values.ncols()
    }

    /// View of the whole tensor
    #[inline]
    pub fn values(&self) -> ArrayView2<'_, f64> {
        self.values.view()
    }

    /// View of one angle row
    pub fn row(&self, index: usize) -> Option<ArrayView1<'_, f64>> {
        (index < self.num_rows()).then(|| self.values.row(index))
    }

    /// The angle rows a gate consuming `rows` angles will read
    ///
    /// # Errors
    /// Returns `ShapeMismatch` if the row count differs
    pub fn expect_rows(&self, rows: usize) -> Result<ArrayView2<'_, f64>> {
        if self.num_rows() != rows {
            return Err(QuantumError::shape_mismatch(
                format!("{} parameter row(s)", rows),
                format!("{} row(s)", self.num_rows()),
            ));
        }
        Ok(self.values.view())
    }

    /// The angle set seen by batch entry `index`
    ///
    /// Shared (single-column) parameters return themselves.
    ///
    /// # Errors
    /// Returns `InvalidDimension` if `index` is out of range
    pub fn select_batch(&self, index: usize) -> Result<Self> {
        if self.batch_size() == 1 {
            return Ok(self.clone());
        }
        if index >= self.batch_size() {
            return Err(QuantumError::InvalidDimension {
                reason: format!(
                    "batch index {} out of range for {} parameter sets",
                    index,
                    self.batch_size()
                ),
            });
        }
        let column = self.values.index_axis(Axis(1), index).to_owned();
        Ok(Self {
            values: column.insert_axis(Axis(1)),
        })
    }
}

impl From<f64> for Parameters {
    fn from(theta: f64) -> Self {
        Self::scalar(theta)
    }
}

/// Initialization policy for internally owned trainable angles
#[derive(Clone, Debug, PartialEq)]
pub enum InitPolicy {
    /// All angles start at zero
    Zeros,
    /// All angles start at the same value
    Constant(f64),
    /// Angles drawn uniformly from `[low, high)`
    Uniform {
        low: f64,
        high: f64,
        /// Fixed seed for reproducible initialization
        seed: Option<u64>,
    },
}

impl Default for InitPolicy {
    /// Uniform in `[-2π, 2π)` with a random seed
    fn default() -> Self {
        Self::Uniform {
            low: -2.0 * PI,
            high: 2.0 * PI,
            seed: None,
        }
    }
}

impl InitPolicy {
    /// Uniform policy with a fixed seed over the default range
    pub fn seeded(seed: u64) -> Self {
        Self::Uniform {
            low: -2.0 * PI,
            high: 2.0 * PI,
            seed: Some(seed),
        }
    }

    /// Check that the policy can produce values
    ///
    /// # Errors
    /// Returns `InvalidConfig` for non-finite values or an empty range
    pub fn validate(&self) -> Result<()> {
        match *self {
            Self::Zeros => Ok(()),
            Self::Constant(value) if value.is_finite() => Ok(()),
            Self::Constant(value) => Err(QuantumError::InvalidConfig(format!(
                "constant initial angle must be finite, got {}",
                value
            ))),
            Self::Uniform { low, high, .. } => {
                if !low.is_finite() || !high.is_finite() || low >= high {
                    return Err(QuantumError::InvalidConfig(format!(
                        "uniform initialization needs finite low < high, got [{}, {})",
                        low, high
                    )));
                }
                Ok(())
            }
        }
    }

    /// Produce an array of initial angles
    ///
    /// # Errors
    /// Propagates [`InitPolicy::validate`] failures
    pub fn sample(&self, shape: (usize, usize)) -> Result<Array2<f64>> {
        self.validate()?;
        let values = match *self {
            Self::Zeros => Array2::zeros(shape),
            Self::Constant(value) => Array2::from_elem(shape, value),
            Self::Uniform { low, high, seed } => {
                let mut rng = match seed {
                    Some(seed) => StdRng::seed_from_u64(seed),
                    None => StdRng::from_entropy(),
                };
                Array2::from_shape_fn(shape, |_| rng.gen_range(low..high))
            }
        };
        Ok(values)
    }
}
