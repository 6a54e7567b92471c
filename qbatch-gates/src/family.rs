//! Supported gate families
//!
//! A family is the uncontrolled gate template: its name, how many target
//! qubits and angles it takes, and how to produce its matrix. Control qubits
//! are attached later by the operator that binds a family to qubits.

use crate::batch::MatrixBatch;
use crate::matrices::{self, to_array};
use ndarray::{Array2, ArrayView2};
use num_complex::Complex64;
use qbatch_core::{QuantumError, Result};
use std::fmt;

/// Gate template known to the catalog
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GateFamily {
    /// Identity
    I,
    /// Pauli-X
    X,
    /// Pauli-Y
    Y,
    /// Pauli-Z
    Z,
    /// Hadamard
    H,
    /// Phase gate √Z
    S,
    /// π/8 gate
    T,
    /// Two-qubit swap
    Swap,
    /// Rotation about X by θ
    RX,
    /// Rotation about Y by θ
    RY,
    /// Rotation about Z by θ
    RZ,
    /// diag(1, e^(iθ))
    Phase,
    /// RZ(ω)·RY(θ)·RZ(φ), angles given as rows φ, θ, ω
    U,
}

impl GateFamily {
    /// All families, in catalog order
    pub const ALL: [GateFamily; 13] = [
        GateFamily::I,
        GateFamily::X,
        GateFamily::Y,
        GateFamily::Z,
        GateFamily::H,
        GateFamily::S,
        GateFamily::T,
        GateFamily::Swap,
        GateFamily::RX,
        GateFamily::RY,
        GateFamily::RZ,
        GateFamily::Phase,
        GateFamily::U,
    ];

    /// Short gate name
    pub fn name(&self) -> &'static str {
        match self {
            Self::I => "I",
            Self::X => "X",
            Self::Y => "Y",
            Self::Z => "Z",
            Self::H => "H",
            Self::S => "S",
            Self::T => "T",
            Self::Swap => "SWAP",
            Self::RX => "RX",
            Self::RY => "RY",
            Self::RZ => "RZ",
            Self::Phase => "PHASE",
            Self::U => "U",
        }
    }

    /// Number of target qubits
    pub fn num_targets(&self) -> usize {
        match self {
            Self::Swap => 2,
            _ => 1,
        }
    }

    /// Number of angle rows consumed (0 for fixed gates)
    pub fn num_params(&self) -> usize {
        match self {
            Self::RX | Self::RY | Self::RZ | Self::Phase => 1,
            Self::U => 3,
            _ => 0,
        }
    }

    /// Whether the matrix depends on angles
    #[inline]
    pub fn is_parametric(&self) -> bool {
        self.num_params() > 0
    }

    /// Constant matrix of a fixed family, `None` for parametric ones
    pub fn fixed_matrix(&self) -> Option<Array2<Complex64>> {
        let matrix = match self {
            Self::I => to_array(&matrices::IDENTITY),
            Self::X => to_array(&matrices::PAULI_X),
            Self::Y => to_array(&matrices::PAULI_Y),
            Self::Z => to_array(&matrices::PAULI_Z),
            Self::H => to_array(&matrices::HADAMARD),
            Self::S => to_array(&matrices::S_GATE),
            Self::T => to_array(&matrices::T_GATE),
            Self::Swap => to_array(&matrices::SWAP),
            Self::RX | Self::RY | Self::RZ | Self::Phase | Self::U => return None,
        };
        Some(matrix)
    }

    /// Matrix of a parametric family for a single angle set
    ///
    /// # Errors
    /// Returns `ShapeMismatch` if `angles.len() != num_params()` and
    /// `UnsupportedGate` for fixed families
    fn matrix_at(&self, angles: &[f64]) -> Result<Array2<Complex64>> {
        let matrix = match (self, angles) {
            (Self::RX, [theta]) => to_array(&matrices::rotation_x(*theta)),
            (Self::RY, [theta]) => to_array(&matrices::rotation_y(*theta)),
            (Self::RZ, [theta]) => to_array(&matrices::rotation_z(*theta)),
            (Self::Phase, [theta]) => to_array(&matrices::phase(*theta)),
            (Self::U, [phi, theta, omega]) => to_array(&matrices::u(*phi, *theta, *omega)),
            (Self::RX | Self::RY | Self::RZ | Self::Phase | Self::U, _) => {
                return Err(QuantumError::shape_mismatch(
                    format!("{} angle(s) for {}", self.num_params(), self.name()),
                    format!("{} angle(s)", angles.len()),
                ))
            }
            (
                Self::I | Self::X | Self::Y | Self::Z | Self::H | Self::S | Self::T | Self::Swap,
                _,
            ) => {
                return Err(QuantumError::unsupported_gate(
                    self.name(),
                    "fixed gates are not evaluated from angles",
                ))
            }
        };
        Ok(matrix)
    }

    /// Evaluate the family on an angle tensor of shape `(num_params, P)`
    ///
    /// One column yields a shared matrix; P columns yield P matrices. Fixed
    /// families ignore `angles` and return their constant.
    ///
    /// # Errors
    /// Returns `ShapeMismatch` if the row count differs from
    /// [`GateFamily::num_params`] or there are no columns
    ///
    /// # Example
    /// ```
    /// use qbatch_gates::GateFamily;
    /// use ndarray::array;
    ///
    /// let angles = array![[0.1, 0.2, 0.3]];
    /// let batch = GateFamily::RY.matrices(angles.view()).unwrap();
    /// assert_eq!(batch.batch_size(), 3);
    /// assert_eq!(batch.dim(), 2);
    /// ```
    pub fn matrices(&self, angles: ArrayView2<'_, f64>) -> Result<MatrixBatch> {
        if let Some(fixed) = self.fixed_matrix() {
            return Ok(MatrixBatch::Shared(fixed));
        }
        if angles.nrows() != self.num_params() {
            return Err(QuantumError::shape_mismatch(
                format!("{} angle row(s) for {}", self.num_params(), self.name()),
                format!("{} row(s)", angles.nrows()),
            ));
        }
        if angles.ncols() == 0 {
            return Err(QuantumError::shape_mismatch(
                "at least one angle set",
                "empty angle tensor",
            ));
        }
        let evaluated = angles
            .columns()
            .into_iter()
            .map(|column| self.matrix_at(&column.to_vec()))
            .collect::<Result<Vec<_>>>()?;
        MatrixBatch::from_matrices(evaluated)
    }
}

impl fmt::Display for GateFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
