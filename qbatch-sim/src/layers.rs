//! Layer templates: one gate per qubit, or a ring of controlled gates

use crate::circuit::Operation;
use crate::config::ExecutionConfig;
use crate::operator::{GateOperator, OperatorInfo, ParameterSource};
use ndarray::{Array2, ArrayView2, ArrayViewMut2, Axis};
use qbatch_core::{InitPolicy, Parameters, QuantumError, Result};
use qbatch_gates::GateFamily;
use qbatch_state::StateTensor;
use std::fmt;

fn single_qubit_operators(family: GateFamily, num_qubits: usize) -> Result<Vec<GateOperator>> {
    (0..num_qubits)
        .map(|q| GateOperator::new(family, &[q], num_qubits))
        .collect()
}

fn check_register(num_qubits: usize) -> Result<()> {
    if num_qubits < 1 {
        return Err(QuantumError::invalid_qubit_count(num_qubits));
    }
    Ok(())
}

fn check_state(state: &StateTensor, num_qubits: usize) -> Result<()> {
    if state.num_qubits() != num_qubits {
        return Err(QuantumError::shape_mismatch(
            format!("{}-qubit state", num_qubits),
            format!("{}-qubit state", state.num_qubits()),
        ));
    }
    Ok(())
}

/// The same single-qubit gate on every qubit, angles taken from the caller
///
/// Every gate receives the full external parameter tensor, so a batched
/// angle set encodes one data point per batch entry.
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureMap {
    family: GateFamily,
    operators: Vec<GateOperator>,
}

impl FeatureMap {
    /// # Errors
    /// Returns `UnsupportedGate` for multi-qubit families and
    /// `InvalidDimension` if `num_qubits < 1`
    pub fn new(family: GateFamily, num_qubits: usize) -> Result<Self> {
        check_register(num_qubits)?;
        if family.num_targets() != 1 {
            return Err(QuantumError::unsupported_gate(
                family.name(),
                "feature maps need a single-qubit gate",
            ));
        }
        Ok(Self {
            family,
            operators: single_qubit_operators(family, num_qubits)?,
        })
    }

    #[inline]
    pub fn family(&self) -> GateFamily {
        self.family
    }

    /// Inspection records, qubit 0 first
    pub fn operators(&self) -> Vec<OperatorInfo> {
        self.operators.iter().map(GateOperator::info).collect()
    }
}

impl Operation for FeatureMap {
    fn num_qubits(&self) -> usize {
        self.operators.len()
    }

    fn apply_with(
        &self,
        state: &StateTensor,
        params: Option<&Parameters>,
        config: &ExecutionConfig,
    ) -> Result<StateTensor> {
        check_state(state, self.operators.len())?;
        let mut current = state.clone();
        for op in &self.operators {
            current = op.apply_with(&current, params, config)?;
        }
        Ok(current)
    }
}

impl fmt::Display for FeatureMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FeatureMap[{} x {}]", self.family, self.operators.len())
    }
}

/// The same parametric single-qubit gate on every qubit, with its own
/// trainable angles
///
/// The angle buffer has shape `(num_qubits, num_params)`: row `q` holds the
/// angles of the gate on qubit `q`. External parameters are ignored.
///
/// # Example
/// ```
/// use qbatch_sim::VariationalLayer;
/// use qbatch_gates::GateFamily;
/// use qbatch_core::InitPolicy;
///
/// let mut layer = VariationalLayer::with_init(GateFamily::U, 3, InitPolicy::Zeros).unwrap();
/// assert_eq!(layer.parameters().dim(), (3, 3));
/// layer.parameters_mut()[[1, 0]] = 0.5;
/// assert_eq!(layer.parameters()[[1, 0]], 0.5);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct VariationalLayer {
    family: GateFamily,
    operators: Vec<GateOperator>,
    angles: Array2<f64>,
}

impl VariationalLayer {
    /// Layer with angles drawn from the default [`InitPolicy`]
    pub fn new(family: GateFamily, num_qubits: usize) -> Result<Self> {
        Self::with_init(family, num_qubits, InitPolicy::default())
    }

    /// Layer with angles drawn from `policy`
    ///
    /// # Errors
    /// Returns `UnsupportedGate` for fixed or multi-qubit families,
    /// `InvalidDimension` if `num_qubits < 1`, and `InvalidConfig` for a
    /// bad policy
    pub fn with_init(family: GateFamily, num_qubits: usize, policy: InitPolicy) -> Result<Self> {
        check_register(num_qubits)?;
        if !family.is_parametric() || family.num_targets() != 1 {
            return Err(QuantumError::unsupported_gate(
                family.name(),
                "variational layers need a parametric single-qubit gate",
            ));
        }
        let angles = policy.sample((num_qubits, family.num_params()))?;
        Ok(Self {
            family,
            operators: single_qubit_operators(family, num_qubits)?,
            angles,
        })
    }

    #[inline]
    pub fn family(&self) -> GateFamily {
        self.family
    }

    /// Number of trainable angles
    pub fn num_parameters(&self) -> usize {
        self.angles.len()
    }

    /// Angle buffer, shape `(num_qubits, num_params)`
    pub fn parameters(&self) -> ArrayView2<'_, f64> {
        self.angles.view()
    }

    /// Mutable angle buffer for optimizers
    pub fn parameters_mut(&mut self) -> ArrayViewMut2<'_, f64> {
        self.angles.view_mut()
    }

    /// Replace the angle buffer
    ///
    /// # Errors
    /// Returns `ShapeMismatch` if the shape differs from the current buffer
    pub fn set_parameters(&mut self, angles: Array2<f64>) -> Result<()> {
        if angles.dim() != self.angles.dim() {
            return Err(QuantumError::shape_mismatch(
                format!("{:?}", self.angles.dim()),
                format!("{:?}", angles.dim()),
            ));
        }
        self.angles = angles;
        Ok(())
    }

    /// Inspection records with each gate's current angles
    pub fn operators(&self) -> Vec<OperatorInfo> {
        self.operators
            .iter()
            .zip(self.angles.outer_iter())
            .map(|(op, row)| op.info_with(ParameterSource::Internal(row.to_vec())))
            .collect()
    }
}

impl Operation for VariationalLayer {
    fn num_qubits(&self) -> usize {
        self.operators.len()
    }

    fn apply_with(
        &self,
        state: &StateTensor,
        _params: Option<&Parameters>,
        config: &ExecutionConfig,
    ) -> Result<StateTensor> {
        check_state(state, self.operators.len())?;
        let mut current = state.clone();
        for (op, row) in self.operators.iter().zip(self.angles.outer_iter()) {
            let own = Parameters::from_array(row.to_owned().insert_axis(Axis(1)))?;
            current = op.apply_with(&current, Some(&own), config)?;
        }
        Ok(current)
    }
}

impl fmt::Display for VariationalLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "VariationalLayer[{} x {}, {} params]",
            self.family,
            self.operators.len(),
            self.num_parameters()
        )
    }
}

/// Ring of controlled gates coupling qubit `i` to qubit `(i + 1) mod N`
///
/// Empty for a single qubit. Parameters are ignored.
#[derive(Clone, Debug, PartialEq)]
pub struct EntanglingLayer {
    family: GateFamily,
    num_qubits: usize,
    operators: Vec<GateOperator>,
}

impl EntanglingLayer {
    /// CNOT ring
    pub fn new(num_qubits: usize) -> Result<Self> {
        Self::with_family(GateFamily::X, num_qubits)
    }

    /// Ring of singly controlled `family` gates
    ///
    /// # Errors
    /// Returns `UnsupportedGate` for parametric or multi-qubit families and
    /// `InvalidDimension` if `num_qubits < 1`
    pub fn with_family(family: GateFamily, num_qubits: usize) -> Result<Self> {
        check_register(num_qubits)?;
        if family.is_parametric() || family.num_targets() != 1 {
            return Err(QuantumError::unsupported_gate(
                family.name(),
                "entangling layers need a fixed single-qubit gate",
            ));
        }
        let operators = if num_qubits < 2 {
            Vec::new()
        } else {
            (0..num_qubits)
                .map(|i| GateOperator::controlled(family, &[i], &[(i + 1) % num_qubits], num_qubits))
                .collect::<Result<Vec<_>>>()?
        };
        Ok(Self {
            family,
            num_qubits,
            operators,
        })
    }

    #[inline]
    pub fn family(&self) -> GateFamily {
        self.family
    }

    pub fn operators(&self) -> Vec<OperatorInfo> {
        self.operators.iter().map(GateOperator::info).collect()
    }
}

impl Operation for EntanglingLayer {
    fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    fn apply_with(
        &self,
        state: &StateTensor,
        _params: Option<&Parameters>,
        config: &ExecutionConfig,
    ) -> Result<StateTensor> {
        check_state(state, self.num_qubits)?;
        let mut current = state.clone();
        for op in &self.operators {
            current = op.apply_with(&current, None, config)?;
        }
        Ok(current)
    }
}

impl fmt::Display for EntanglingLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self
            .operators
            .first()
            .map(GateOperator::name)
            .unwrap_or_else(|| format!("C{}", self.family.name()));
        write!(f, "EntanglingLayer[{} ring x {}]", name, self.operators.len())
    }
}
