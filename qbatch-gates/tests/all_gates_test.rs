//! Unitarity and closed-form checks for every gate family

use approx::assert_relative_eq;
use ndarray::{array, Array2};
use num_complex::Complex64;
use qbatch_gates::{controlled_matrix, is_unitary, matrices, GateFamily, MatrixBatch};
use std::f64::consts::PI;

const EPSILON: f64 = 1e-10;

fn angle_grid(rows: usize) -> Array2<f64> {
    let angles = [-2.0 * PI, -PI, -0.3, 0.0, 0.25, PI / 2.0, PI, 3.7];
    Array2::from_shape_fn((rows, angles.len()), |(r, c)| angles[(c + r) % angles.len()])
}

#[test]
fn test_every_family_is_unitary() {
    for family in GateFamily::ALL {
        let angles = angle_grid(family.num_params().max(1));
        let angles = if family.is_parametric() {
            angles
        } else {
            array![[0.0]]
        };
        let batch = family.matrices(angles.view()).unwrap();
        assert!(batch.is_unitary(EPSILON), "{} is not unitary", family);
        assert_eq!(batch.dim(), 1 << family.num_targets());
    }
}

#[test]
fn test_every_controlled_family_is_unitary() {
    for family in GateFamily::ALL {
        let rows = family.num_params().max(1);
        let batch = family.matrices(angle_grid(rows).view()).unwrap();
        for n_controls in 1..=2 {
            let controlled = batch.controlled(n_controls);
            assert!(controlled.is_unitary(EPSILON), "C^{}{} is not unitary", n_controls, family);
            assert_eq!(controlled.dim(), batch.dim() << n_controls);
        }
    }
}

#[test]
fn test_rotations_by_two_pi_are_minus_identity() {
    for family in [GateFamily::RX, GateFamily::RY, GateFamily::RZ] {
        let batch = family.matrices(array![[2.0 * PI]].view()).unwrap();
        let m = batch.matrix(0);
        assert_relative_eq!(m[[0, 0]].re, -1.0, epsilon = EPSILON);
        assert_relative_eq!(m[[1, 1]].re, -1.0, epsilon = EPSILON);
        assert_relative_eq!(m[[0, 1]].norm(), 0.0, epsilon = EPSILON);
    }
}

#[test]
fn test_controlled_phase_matches_diagonal() {
    let theta = 0.9;
    let cphase = GateFamily::Phase
        .matrices(array![[theta]].view())
        .unwrap()
        .controlled(1);
    let m = cphase.matrix(0);
    for i in 0..3 {
        assert_eq!(m[[i, i]], Complex64::new(1.0, 0.0));
    }
    assert_relative_eq!(m[[3, 3]].re, theta.cos(), epsilon = EPSILON);
    assert_relative_eq!(m[[3, 3]].im, theta.sin(), epsilon = EPSILON);
}

#[test]
fn test_controlled_swap_is_fredkin() {
    let fredkin = controlled_matrix(matrices::to_array(&matrices::SWAP).view(), 1);
    assert_eq!(fredkin.dim(), (8, 8));
    // |101⟩ ↔ |110⟩
    assert_eq!(fredkin[[5, 6]], Complex64::new(1.0, 0.0));
    assert_eq!(fredkin[[6, 5]], Complex64::new(1.0, 0.0));
    assert_eq!(fredkin[[3, 3]], Complex64::new(1.0, 0.0));
    assert!(is_unitary(fredkin.view(), EPSILON));
}

#[test]
fn test_batched_rotation_entries_match_scalar_evaluation() {
    let thetas = [0.1, 0.7, -1.3];
    let batch = GateFamily::RY
        .matrices(Array2::from_shape_vec((1, 3), thetas.to_vec()).unwrap().view())
        .unwrap();
    assert!(matches!(batch, MatrixBatch::Batched(_)));
    for (b, &theta) in thetas.iter().enumerate() {
        assert_eq!(batch.matrix(b), matrices::to_array(&matrices::rotation_y(theta)));
    }
}
