//! Gate operators: a gate family bound to target and control qubits

use crate::circuit::Operation;
use crate::config::ExecutionConfig;
use crate::kernel::apply_matrix;
use qbatch_core::{Parameters, QuantumError, QubitId, Result};
use qbatch_gates::{GateFamily, MatrixBatch};
use qbatch_state::StateTensor;
use smallvec::SmallVec;
use std::fmt;

/// Where an operator's angles come from when it is applied
#[derive(Clone, Debug, PartialEq)]
pub enum ParameterSource {
    /// Fixed gate, no angles
    None,
    /// Angles supplied by the caller at apply time
    External,
    /// Angles owned by an enclosing variational layer
    Internal(Vec<f64>),
}

/// Inspection record for one operator
#[derive(Clone, Debug, PartialEq)]
pub struct OperatorInfo {
    /// Display name, e.g. `CNOT` or `RX`
    pub name: String,
    /// Underlying gate family
    pub family: GateFamily,
    /// Target qubits in matrix order
    pub targets: Vec<QubitId>,
    /// Control qubits
    pub controls: Vec<QubitId>,
    /// Angle source
    pub source: ParameterSource,
}

/// A gate family applied to specific qubits of an N-qubit register
///
/// The matrix acts on the controls followed by the targets, with the first
/// control as the most significant sub-index.
///
/// # Example
/// ```
/// use qbatch_sim::{GateOperator, Operation};
/// use qbatch_state::zero_state;
/// use num_complex::Complex64;
///
/// let x = GateOperator::x(0, 2).unwrap();
/// let cnot = GateOperator::cnot(0, 1, 2).unwrap();
/// let state = zero_state(2, 1).unwrap();
/// let state = x.apply(&state, None).unwrap();
/// let state = cnot.apply(&state, None).unwrap();
/// assert_eq!(state.amplitude(&[1, 1], 0), Some(Complex64::new(1.0, 0.0)));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct GateOperator {
    family: GateFamily,
    targets: SmallVec<[QubitId; 2]>,
    controls: SmallVec<[QubitId; 2]>,
    num_qubits: usize,
}

impl GateOperator {
    /// Bind `family` to `targets` in an N-qubit register
    ///
    /// # Errors
    /// Returns `InvalidDimension` if `num_qubits < 1`, a qubit is out of
    /// range, or the target count does not match the family, and
    /// `QubitCollision` if a qubit repeats
    pub fn new(family: GateFamily, targets: &[usize], num_qubits: usize) -> Result<Self> {
        Self::controlled(family, &[], targets, num_qubits)
    }

    /// Bind `family` to `targets` with additional `controls`
    ///
    /// # Errors
    /// Same as [`GateOperator::new`]; collisions between controls and
    /// targets are also `QubitCollision`
    pub fn controlled(
        family: GateFamily,
        controls: &[usize],
        targets: &[usize],
        num_qubits: usize,
    ) -> Result<Self> {
        if num_qubits < 1 {
            return Err(QuantumError::invalid_qubit_count(num_qubits));
        }
        if targets.len() != family.num_targets() {
            return Err(QuantumError::InvalidDimension {
                reason: format!(
                    "{} acts on {} target qubit(s), got {}",
                    family.name(),
                    family.num_targets(),
                    targets.len()
                ),
            });
        }
        let controls = controls
            .iter()
            .map(|&q| QubitId::checked(q, num_qubits))
            .collect::<Result<SmallVec<[QubitId; 2]>>>()?;
        let targets = targets
            .iter()
            .map(|&q| QubitId::checked(q, num_qubits))
            .collect::<Result<SmallVec<[QubitId; 2]>>>()?;

        let mut seen: SmallVec<[QubitId; 4]> = SmallVec::new();
        for &qubit in controls.iter().chain(targets.iter()) {
            if seen.contains(&qubit) {
                return Err(QuantumError::QubitCollision { qubit });
            }
            seen.push(qubit);
        }

        Ok(Self {
            family,
            targets,
            controls,
            num_qubits,
        })
    }

    /// Identity on `q`
    pub fn i(q: usize, n: usize) -> Result<Self> {
        Self::new(GateFamily::I, &[q], n)
    }

    /// Pauli-X on `q`
    pub fn x(q: usize, n: usize) -> Result<Self> {
        Self::new(GateFamily::X, &[q], n)
    }

    /// Pauli-Y on `q`
    pub fn y(q: usize, n: usize) -> Result<Self> {
        Self::new(GateFamily::Y, &[q], n)
    }

    /// Pauli-Z on `q`
    pub fn z(q: usize, n: usize) -> Result<Self> {
        Self::new(GateFamily::Z, &[q], n)
    }

    /// Hadamard on `q`
    pub fn h(q: usize, n: usize) -> Result<Self> {
        Self::new(GateFamily::H, &[q], n)
    }

    /// S on `q`
    pub fn s(q: usize, n: usize) -> Result<Self> {
        Self::new(GateFamily::S, &[q], n)
    }

    /// T on `q`
    pub fn t(q: usize, n: usize) -> Result<Self> {
        Self::new(GateFamily::T, &[q], n)
    }

    /// RX on `q`, angle supplied at apply time
    pub fn rx(q: usize, n: usize) -> Result<Self> {
        Self::new(GateFamily::RX, &[q], n)
    }

    /// RY on `q`, angle supplied at apply time
    pub fn ry(q: usize, n: usize) -> Result<Self> {
        Self::new(GateFamily::RY, &[q], n)
    }

    /// RZ on `q`, angle supplied at apply time
    pub fn rz(q: usize, n: usize) -> Result<Self> {
        Self::new(GateFamily::RZ, &[q], n)
    }

    /// Phase shift on `q`, angle supplied at apply time
    pub fn phase(q: usize, n: usize) -> Result<Self> {
        Self::new(GateFamily::Phase, &[q], n)
    }

    /// General single-qubit rotation on `q`, angles (φ, θ, ω) as three rows
    pub fn u(q: usize, n: usize) -> Result<Self> {
        Self::new(GateFamily::U, &[q], n)
    }

    /// Swap qubits `a` and `b`
    pub fn swap(a: usize, b: usize, n: usize) -> Result<Self> {
        Self::new(GateFamily::Swap, &[a, b], n)
    }

    /// Controlled-X
    pub fn cnot(control: usize, target: usize, n: usize) -> Result<Self> {
        Self::controlled(GateFamily::X, &[control], &[target], n)
    }

    /// Controlled-Y
    pub fn cy(control: usize, target: usize, n: usize) -> Result<Self> {
        Self::controlled(GateFamily::Y, &[control], &[target], n)
    }

    /// Controlled-Z
    pub fn cz(control: usize, target: usize, n: usize) -> Result<Self> {
        Self::controlled(GateFamily::Z, &[control], &[target], n)
    }

    /// Controlled RX
    pub fn crx(control: usize, target: usize, n: usize) -> Result<Self> {
        Self::controlled(GateFamily::RX, &[control], &[target], n)
    }

    /// Controlled RY
    pub fn cry(control: usize, target: usize, n: usize) -> Result<Self> {
        Self::controlled(GateFamily::RY, &[control], &[target], n)
    }

    /// Controlled RZ
    pub fn crz(control: usize, target: usize, n: usize) -> Result<Self> {
        Self::controlled(GateFamily::RZ, &[control], &[target], n)
    }

    /// Controlled phase shift
    pub fn cphase(control: usize, target: usize, n: usize) -> Result<Self> {
        Self::controlled(GateFamily::Phase, &[control], &[target], n)
    }

    /// Doubly controlled X
    pub fn toffoli(c1: usize, c2: usize, target: usize, n: usize) -> Result<Self> {
        Self::controlled(GateFamily::X, &[c1, c2], &[target], n)
    }

    /// Controlled swap
    pub fn fredkin(control: usize, a: usize, b: usize, n: usize) -> Result<Self> {
        Self::controlled(GateFamily::Swap, &[control], &[a, b], n)
    }

    #[inline]
    pub fn family(&self) -> GateFamily {
        self.family
    }

    #[inline]
    pub fn targets(&self) -> &[QubitId] {
        &self.targets
    }

    #[inline]
    pub fn controls(&self) -> &[QubitId] {
        &self.controls
    }

    /// Register size this operator was built for
    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    #[inline]
    pub fn is_parametric(&self) -> bool {
        self.family.is_parametric()
    }

    /// Display name: `CNOT`, `TOFFOLI`, or the family name prefixed by one
    /// `C` per control
    pub fn name(&self) -> String {
        match (self.family, self.controls.len()) {
            (GateFamily::X, 1) => "CNOT".to_string(),
            (GateFamily::X, 2) => "TOFFOLI".to_string(),
            (family, n) => format!("{}{}", "C".repeat(n), family.name()),
        }
    }

    /// Inspection record for this operator
    pub fn info(&self) -> OperatorInfo {
        self.info_with(if self.is_parametric() {
            ParameterSource::External
        } else {
            ParameterSource::None
        })
    }

    pub(crate) fn info_with(&self, source: ParameterSource) -> OperatorInfo {
        OperatorInfo {
            name: self.name(),
            family: self.family,
            targets: self.targets.to_vec(),
            controls: self.controls.to_vec(),
            source,
        }
    }

    /// Axes the matrix acts on, controls first
    fn axes(&self) -> SmallVec<[usize; 4]> {
        self.controls
            .iter()
            .chain(self.targets.iter())
            .map(QubitId::axis)
            .collect()
    }

    /// Evaluate the full (controlled) matrix for `params`
    ///
    /// # Errors
    /// Returns `MissingParameter` for a parametric family with no params,
    /// and `ShapeMismatch` if the parameter rows do not match the family
    pub fn resolve(&self, params: Option<&Parameters>) -> Result<MatrixBatch> {
        let base = match (self.family.fixed_matrix(), params) {
            (Some(fixed), _) => MatrixBatch::Shared(fixed),
            (None, None) => {
                return Err(QuantumError::MissingParameter {
                    gate: self.name(),
                })
            }
            (None, Some(params)) => self
                .family
                .matrices(params.expect_rows(self.family.num_params())?)?,
        };
        Ok(base.controlled(self.controls.len()))
    }
}

impl Operation for GateOperator {
    fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    fn apply_with(
        &self,
        state: &StateTensor,
        params: Option<&Parameters>,
        config: &ExecutionConfig,
    ) -> Result<StateTensor> {
        if state.num_qubits() != self.num_qubits {
            return Err(QuantumError::shape_mismatch(
                format!("{}-qubit state for {}", self.num_qubits, self),
                format!("{}-qubit state", state.num_qubits()),
            ));
        }
        let matrices = self.resolve(params)?;
        apply_matrix(state, &self.axes(), &matrices, config)
    }
}

impl fmt::Display for GateOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name())?;
        for (i, qubit) in self.controls.iter().chain(self.targets.iter()).enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", qubit)?;
        }
        write!(f, ")")
    }
}
