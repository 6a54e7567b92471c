//! Constant gate matrices and closed-form parametric generators
//!
//! Fixed gates are `const` arrays; parametric gates are written out in closed
//! form rather than evaluated as matrix exponentials.

use ndarray::Array2;
use num_complex::Complex64;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);
const I: Complex64 = Complex64::new(0.0, 1.0);
const NEG_I: Complex64 = Complex64::new(0.0, -1.0);
const NEG_ONE: Complex64 = Complex64::new(-1.0, 0.0);

const INV_SQRT2: f64 = std::f64::consts::FRAC_1_SQRT_2;

// Single-qubit gate matrices (2x2)

/// Identity
pub const IDENTITY: [[Complex64; 2]; 2] = [[ONE, ZERO], [ZERO, ONE]];

/// Pauli-X (bit flip)
/// X = [[0, 1],
///      [1, 0]]
pub const PAULI_X: [[Complex64; 2]; 2] = [[ZERO, ONE], [ONE, ZERO]];

/// Pauli-Y
/// Y = [[0, -i],
///      [i,  0]]
pub const PAULI_Y: [[Complex64; 2]; 2] = [[ZERO, NEG_I], [I, ZERO]];

/// Pauli-Z (phase flip)
/// Z = [[1,  0],
///      [0, -1]]
pub const PAULI_Z: [[Complex64; 2]; 2] = [[ONE, ZERO], [ZERO, NEG_ONE]];

/// Hadamard
/// H = 1/√2 * [[1,  1],
///             [1, -1]]
pub const HADAMARD: [[Complex64; 2]; 2] = [
    [Complex64::new(INV_SQRT2, 0.0), Complex64::new(INV_SQRT2, 0.0)],
    [Complex64::new(INV_SQRT2, 0.0), Complex64::new(-INV_SQRT2, 0.0)],
];

/// S = diag(1, i)
pub const S_GATE: [[Complex64; 2]; 2] = [[ONE, ZERO], [ZERO, I]];

/// T = diag(1, e^(iπ/4))
pub const T_GATE: [[Complex64; 2]; 2] = [[ONE, ZERO], [ZERO, Complex64::new(INV_SQRT2, INV_SQRT2)]];

// Two-qubit gate matrices (4x4)

/// SWAP exchanges the two acted-upon qubits
pub const SWAP: [[Complex64; 4]; 4] = [
    [ONE, ZERO, ZERO, ZERO],
    [ZERO, ZERO, ONE, ZERO],
    [ZERO, ONE, ZERO, ZERO],
    [ZERO, ZERO, ZERO, ONE],
];

/// e^(iφ)
#[inline]
fn expi(phi: f64) -> Complex64 {
    Complex64::new(phi.cos(), phi.sin())
}

/// RX(θ) = cos(θ/2)·I − i·sin(θ/2)·X
/// RX(θ) = [[cos(θ/2),    -i·sin(θ/2)],
///          [-i·sin(θ/2),  cos(θ/2)]]
#[inline]
pub fn rotation_x(theta: f64) -> [[Complex64; 2]; 2] {
    let (sin_val, cos_val) = (theta / 2.0).sin_cos();
    [
        [Complex64::new(cos_val, 0.0), Complex64::new(0.0, -sin_val)],
        [Complex64::new(0.0, -sin_val), Complex64::new(cos_val, 0.0)],
    ]
}

/// RY(θ) = cos(θ/2)·I − i·sin(θ/2)·Y
/// RY(θ) = [[cos(θ/2), -sin(θ/2)],
///          [sin(θ/2),  cos(θ/2)]]
#[inline]
pub fn rotation_y(theta: f64) -> [[Complex64; 2]; 2] {
    let (sin_val, cos_val) = (theta / 2.0).sin_cos();
    [
        [Complex64::new(cos_val, 0.0), Complex64::new(-sin_val, 0.0)],
        [Complex64::new(sin_val, 0.0), Complex64::new(cos_val, 0.0)],
    ]
}

/// RZ(θ) = cos(θ/2)·I − i·sin(θ/2)·Z = diag(e^(-iθ/2), e^(iθ/2))
#[inline]
pub fn rotation_z(theta: f64) -> [[Complex64; 2]; 2] {
    let half_theta = theta / 2.0;
    [[expi(-half_theta), ZERO], [ZERO, expi(half_theta)]]
}

/// P(θ) = diag(1, e^(iθ))
#[inline]
pub fn phase(theta: f64) -> [[Complex64; 2]; 2] {
    [[ONE, ZERO], [ZERO, expi(theta)]]
}

/// U(φ, θ, ω) = RZ(ω)·RY(θ)·RZ(φ)
///
/// U = [[cos(θ/2)·e^(-i(φ+ω)/2), -sin(θ/2)·e^(i(φ-ω)/2)],
///      [sin(θ/2)·e^(-i(φ-ω)/2),  cos(θ/2)·e^(i(φ+ω)/2)]]
#[inline]
pub fn u(phi: f64, theta: f64, omega: f64) -> [[Complex64; 2]; 2] {
    let (sin_val, cos_val) = (theta / 2.0).sin_cos();
    let plus = (phi + omega) / 2.0;
    let minus = (phi - omega) / 2.0;
    [
        [expi(-plus) * cos_val, -expi(minus) * sin_val],
        [expi(-minus) * sin_val, expi(plus) * cos_val],
    ]
}

/// Copy a fixed-size matrix into an `ndarray` matrix
pub fn to_array<const D: usize>(matrix: &[[Complex64; D]; D]) -> Array2<Complex64> {
    Array2::from_shape_fn((D, D), |(i, j)| matrix[i][j])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn mult_2x2(a: &[[Complex64; 2]; 2], b: &[[Complex64; 2]; 2]) -> [[Complex64; 2]; 2] {
        let mut result = [[ZERO; 2]; 2];
        for i in 0..2 {
            for j in 0..2 {
                for k in 0..2 {
                    result[i][j] += a[i][k] * b[k][j];
                }
            }
        }
        result
    }

    fn assert_close(a: &[[Complex64; 2]; 2], b: &[[Complex64; 2]; 2]) {
        for i in 0..2 {
            for j in 0..2 {
                assert_relative_eq!(a[i][j].re, b[i][j].re, epsilon = 1e-12);
                assert_relative_eq!(a[i][j].im, b[i][j].im, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_pauli_squares_are_identity() {
        for pauli in [&PAULI_X, &PAULI_Y, &PAULI_Z] {
            assert_close(&mult_2x2(pauli, pauli), &IDENTITY);
        }
    }

    #[test]
    fn test_rotation_x_matches_generator_form() {
        // cos(θ/2)·I − i·sin(θ/2)·X, elementwise
        let theta: f64 = 0.731;
        let (s, c) = (theta / 2.0).sin_cos();
        let mut expected = [[ZERO; 2]; 2];
        for i in 0..2 {
            for j in 0..2 {
                expected[i][j] = IDENTITY[i][j] * c - I * PAULI_X[i][j] * s;
            }
        }
        assert_close(&rotation_x(theta), &expected);
    }

    #[test]
    fn test_rotations_at_zero_are_identity() {
        assert_close(&rotation_x(0.0), &IDENTITY);
        assert_close(&rotation_y(0.0), &IDENTITY);
        assert_close(&rotation_z(0.0), &IDENTITY);
        assert_close(&phase(0.0), &IDENTITY);
        assert_close(&u(0.0, 0.0, 0.0), &IDENTITY);
    }

    #[test]
    fn test_u_is_rz_ry_rz() {
        let (phi, theta, omega) = (0.3, 1.1, -0.4);
        let expected = mult_2x2(&rotation_z(omega), &mult_2x2(&rotation_y(theta), &rotation_z(phi)));
        assert_close(&u(phi, theta, omega), &expected);
    }

    #[test]
    fn test_t_squared_is_s() {
        assert_close(&mult_2x2(&T_GATE, &T_GATE), &S_GATE);
        assert_close(&phase(PI / 4.0), &T_GATE);
    }

    #[test]
    fn test_to_array_layout() {
        let x = to_array(&PAULI_X);
        assert_eq!(x.dim(), (2, 2));
        assert_eq!(x[[0, 1]], ONE);
        assert_eq!(x[[1, 1]], ZERO);
    }
}
