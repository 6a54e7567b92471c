//! Circuit composition
//!
//! A [`Circuit`] is an ordered list of [`Element`]s acting on the same
//! register. Applying it threads the state through the elements in
//! declaration order and forwards the caller's parameters unchanged to each
//! one; what an element does with them depends on its kind.

use crate::config::ExecutionConfig;
use crate::layers::{EntanglingLayer, FeatureMap, VariationalLayer};
use crate::operator::{GateOperator, OperatorInfo};
use qbatch_core::{Parameters, QuantumError, Result};
use qbatch_state::StateTensor;
use std::fmt;
use tracing::{debug, trace};

/// Anything that maps a batched state to a new batched state
pub trait Operation: Send + Sync {
    /// Register size the operation acts on
    fn num_qubits(&self) -> usize;

    /// Apply with an explicit execution configuration
    fn apply_with(
        &self,
        state: &StateTensor,
        params: Option<&Parameters>,
        config: &ExecutionConfig,
    ) -> Result<StateTensor>;

    /// Apply with the default configuration
    fn apply(&self, state: &StateTensor, params: Option<&Parameters>) -> Result<StateTensor> {
        self.apply_with(state, params, &ExecutionConfig::default())
    }
}

/// One step of a circuit
#[derive(Clone, Debug, PartialEq)]
pub enum Element {
    /// A single gate operator
    Gate(GateOperator),
    /// A nested circuit
    Circuit(Circuit),
    /// One gate per qubit driven by the external parameters
    FeatureMap(FeatureMap),
    /// One gate per qubit driven by internally owned angles
    Variational(VariationalLayer),
    /// Ring of controlled gates
    Entangling(EntanglingLayer),
}

impl Element {
    fn as_operation(&self) -> &dyn Operation {
        match self {
            Self::Gate(op) => op,
            Self::Circuit(circuit) => circuit,
            Self::FeatureMap(layer) => layer,
            Self::Variational(layer) => layer,
            Self::Entangling(layer) => layer,
        }
    }

    fn collect_operators(&self, out: &mut Vec<OperatorInfo>) {
        match self {
            Self::Gate(op) => out.push(op.info()),
            Self::Circuit(circuit) => {
                for element in &circuit.elements {
                    element.collect_operators(out);
                }
            }
            Self::FeatureMap(layer) => out.extend(layer.operators()),
            Self::Variational(layer) => out.extend(layer.operators()),
            Self::Entangling(layer) => out.extend(layer.operators()),
        }
    }

    fn num_trainable_parameters(&self) -> usize {
        match self {
            Self::Circuit(circuit) => circuit.num_trainable_parameters(),
            Self::Variational(layer) => layer.num_parameters(),
            _ => 0,
        }
    }

    fn collect_trainable(&self, out: &mut Vec<f64>) {
        match self {
            Self::Circuit(circuit) => {
                for element in &circuit.elements {
                    element.collect_trainable(out);
                }
            }
            Self::Variational(layer) => out.extend(layer.parameters().iter().copied()),
            _ => {}
        }
    }

    /// Overwrite trainable angles from the front of `values`, returning the rest
    fn assign_trainable<'a>(&mut self, values: &'a [f64]) -> &'a [f64] {
        match self {
            Self::Circuit(circuit) => {
                let mut rest = values;
                for element in &mut circuit.elements {
                    rest = element.assign_trainable(rest);
                }
                rest
            }
            Self::Variational(layer) => {
                let (head, rest) = values.split_at(layer.num_parameters());
                for (slot, value) in layer.parameters_mut().iter_mut().zip(head) {
                    *slot = *value;
                }
                rest
            }
            _ => values,
        }
    }
}

impl Operation for Element {
    fn num_qubits(&self) -> usize {
        self.as_operation().num_qubits()
    }

    fn apply_with(
        &self,
        state: &StateTensor,
        params: Option<&Parameters>,
        config: &ExecutionConfig,
    ) -> Result<StateTensor> {
        self.as_operation().apply_with(state, params, config)
    }
}

impl From<GateOperator> for Element {
    fn from(op: GateOperator) -> Self {
        Self::Gate(op)
    }
}

impl From<Circuit> for Element {
    fn from(circuit: Circuit) -> Self {
        Self::Circuit(circuit)
    }
}

impl From<FeatureMap> for Element {
    fn from(layer: FeatureMap) -> Self {
        Self::FeatureMap(layer)
    }
}

impl From<VariationalLayer> for Element {
    fn from(layer: VariationalLayer) -> Self {
        Self::Variational(layer)
    }
}

impl From<EntanglingLayer> for Element {
    fn from(layer: EntanglingLayer) -> Self {
        Self::Entangling(layer)
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gate(op) => write!(f, "{}", op),
            Self::Circuit(circuit) => write!(f, "Circuit[{} elements]", circuit.len()),
            Self::FeatureMap(layer) => write!(f, "{}", layer),
            Self::Variational(layer) => write!(f, "{}", layer),
            Self::Entangling(layer) => write!(f, "{}", layer),
        }
    }
}

/// Ordered composition of elements on an N-qubit register
///
/// # Example
/// ```
/// use qbatch_sim::{Circuit, GateOperator, Operation};
/// use qbatch_state::zero_state;
/// use num_complex::Complex64;
///
/// let mut circuit = Circuit::new(2).unwrap();
/// circuit.push(GateOperator::x(0, 2).unwrap()).unwrap();
/// circuit.push(GateOperator::cnot(0, 1, 2).unwrap()).unwrap();
///
/// let out = circuit.apply(&zero_state(2, 1).unwrap(), None).unwrap();
/// assert_eq!(out.amplitude(&[1, 1], 0), Some(Complex64::new(1.0, 0.0)));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Circuit {
    num_qubits: usize,
    elements: Vec<Element>,
}

impl Circuit {
    /// Create an empty circuit
    ///
    /// # Errors
    /// Returns `InvalidDimension` if `num_qubits < 1`
    pub fn new(num_qubits: usize) -> Result<Self> {
        if num_qubits < 1 {
            return Err(QuantumError::invalid_qubit_count(num_qubits));
        }
        Ok(Self {
            num_qubits,
            elements: Vec::new(),
        })
    }

    /// Create a circuit from a list of elements
    ///
    /// # Errors
    /// Fails like [`Circuit::new`] and [`Circuit::push`]
    pub fn from_elements<I, E>(num_qubits: usize, elements: I) -> Result<Self>
    where
        I: IntoIterator<Item = E>,
        E: Into<Element>,
    {
        let mut circuit = Self::new(num_qubits)?;
        for element in elements {
            circuit.push(element)?;
        }
        Ok(circuit)
    }

    /// Append an element
    ///
    /// # Errors
    /// Returns `ShapeMismatch` if the element was built for another
    /// register size
    pub fn push(&mut self, element: impl Into<Element>) -> Result<&mut Self> {
        let element = element.into();
        if element.num_qubits() != self.num_qubits {
            return Err(QuantumError::shape_mismatch(
                format!("element on {} qubits", self.num_qubits),
                format!("{} on {} qubits", element, element.num_qubits()),
            ));
        }
        self.elements.push(element);
        Ok(self)
    }

    /// Concatenate `other` after this circuit
    ///
    /// # Errors
    /// Returns `ShapeMismatch` if the register sizes differ
    pub fn then(mut self, other: Circuit) -> Result<Self> {
        if other.num_qubits != self.num_qubits {
            return Err(QuantumError::shape_mismatch(
                format!("circuit on {} qubits", self.num_qubits),
                format!("circuit on {} qubits", other.num_qubits),
            ));
        }
        self.elements.extend(other.elements);
        Ok(self)
    }

    /// Copy with every nested plain circuit inlined, recursively
    ///
    /// Layers are kept as single elements.
    pub fn flatten(&self) -> Circuit {
        let mut elements = Vec::with_capacity(self.elements.len());
        for element in &self.elements {
            match element {
                Element::Circuit(inner) => elements.extend(inner.flatten().elements),
                other => elements.push(other.clone()),
            }
        }
        Circuit {
            num_qubits: self.num_qubits,
            elements,
        }
    }

    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Number of top-level elements
    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Top-level elements in order
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Every gate operator, nested circuits and layers expanded, in
    /// application order
    pub fn operators(&self) -> Vec<OperatorInfo> {
        let mut out = Vec::new();
        for element in &self.elements {
            element.collect_operators(&mut out);
        }
        out
    }

    /// Total number of internally owned angles
    pub fn num_trainable_parameters(&self) -> usize {
        self.elements.iter().map(Element::num_trainable_parameters).sum()
    }

    /// Internally owned angles in declaration order, row-major per layer
    pub fn trainable_parameters(&self) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.num_trainable_parameters());
        for element in &self.elements {
            element.collect_trainable(&mut out);
        }
        out
    }

    /// Overwrite internally owned angles in the order of
    /// [`Circuit::trainable_parameters`]
    ///
    /// # Errors
    /// Returns `ShapeMismatch` if `values` has the wrong length
    pub fn set_trainable_parameters(&mut self, values: &[f64]) -> Result<()> {
        let expected = self.num_trainable_parameters();
        if values.len() != expected {
            return Err(QuantumError::shape_mismatch(
                format!("{} trainable parameters", expected),
                values.len().to_string(),
            ));
        }
        let mut rest = values;
        for element in &mut self.elements {
            rest = element.assign_trainable(rest);
        }
        Ok(())
    }

    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let pad = "  ".repeat(depth);
        writeln!(f, "{}Circuit ({} qubits) [", pad, self.num_qubits)?;
        for element in &self.elements {
            match element {
                Element::Circuit(inner) => inner.fmt_indented(f, depth + 1)?,
                other => writeln!(f, "{}  {}", pad, other)?,
            }
        }
        writeln!(f, "{}]", pad)
    }
}

impl Operation for Circuit {
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
                format!("{}-qubit state", self.num_qubits),
                format!("{}-qubit state", state.num_qubits()),
            ));
        }
        debug!(
            qubits = self.num_qubits,
            batch = state.batch_size(),
            elements = self.elements.len(),
            "applying circuit"
        );

        let mut current: Option<StateTensor> = None;
        for (index, element) in self.elements.iter().enumerate() {
            let input = current.as_ref().unwrap_or(state);
            let next = element.apply_with(input, params, config)?;
            trace!(index, element = %element, "applied element");
            current = Some(next);
        }

        debug!(elements = self.elements.len(), "circuit complete");
        Ok(current.unwrap_or_else(|| state.clone()))
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indented(f, 0)
    }
}
