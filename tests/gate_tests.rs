use approx::assert_abs_diff_eq;
use ndarray::Array2;
use num_complex::Complex64;
use std::f64::consts::PI;

use vqc_sweep::quantum::gate::constants;
use vqc_sweep::quantum::{Gate, ParametrizedGate, QuantumGate, StandardGate, StateVector};
use vqc_sweep::Error;

/// Helper function for comparing complex matrices with tolerance
fn assert_matrix_eq(a: &Array2<Complex64>, b: &Array2<Complex64>) {
    assert_eq!(a.dim(), b.dim());
    let diff: f64 = (a - b).iter().map(|x| x.norm()).sum();
    assert!(diff < 1e-10, "matrices differ by {}", diff);
}

fn identity(dim: usize) -> Array2<Complex64> {
    Array2::from_shape_fn((dim, dim), |(i, j)| {
        if i == j {
            Complex64::new(1.0, 0.0)
        } else {
            Complex64::new(0.0, 0.0)
        }
    })
}

fn all_gates() -> Vec<Gate> {
    let mut gates: Vec<Gate> = [
        StandardGate::X,
        StandardGate::Y,
        StandardGate::Z,
        StandardGate::H,
        StandardGate::CNOT,
    ]
    .into_iter()
    .map(Gate::from)
    .collect();

    for theta in [0.0, 0.3, PI / 2.0, 2.7, -1.1] {
        gates.push(ParametrizedGate::Rx(theta).into());
        gates.push(ParametrizedGate::Ry(theta).into());
        gates.push(ParametrizedGate::Rz(theta).into());
    }
    gates
}

#[test]
fn test_gates_are_unitary() {
    for gate in all_gates() {
        let u = gate.matrix();
        let u_dagger = u.t().mapv(|c| c.conj());
        assert_matrix_eq(&u_dagger.dot(&u), &identity(u.nrows()));
    }
}

#[test]
fn test_adjoint_is_inverse() {
    for gate in all_gates() {
        let product = gate.adjoint().matrix().dot(&gate.matrix());
        assert_matrix_eq(&product, &identity(1 << gate.qubit_count()));
    }
}

#[test]
fn test_rotation_by_pi_matches_pauli() {
    // R(π) = -i G for every Pauli generator G
    for rotation in [
        ParametrizedGate::Rx(PI),
        ParametrizedGate::Ry(PI),
        ParametrizedGate::Rz(PI),
    ] {
        let expected = rotation.generator().matrix().mapv(|c| -constants::I * c);
        assert_matrix_eq(&rotation.matrix(), &expected);
    }
}

#[test]
fn test_hadamard_creates_superposition() {
    let mut state = StateVector::zero_state(1).unwrap();
    StandardGate::H.apply_to_qubits(&mut state, &[0]).unwrap();

    assert_abs_diff_eq!(state.probability(0), 0.5, epsilon = 1e-12);
    assert_abs_diff_eq!(state.probability(1), 0.5, epsilon = 1e-12);
}

#[test]
fn test_wrong_wire_count_is_rejected() {
    let mut state = StateVector::zero_state(2).unwrap();

    let err = StandardGate::CNOT.apply_to_qubits(&mut state, &[0]).unwrap_err();
    assert!(matches!(err, Error::WireCountMismatch { expected: 2, got: 1, .. }));

    let err = ParametrizedGate::Rx(0.1)
        .apply_to_qubits(&mut state, &[0, 1])
        .unwrap_err();
    assert!(matches!(err, Error::WireCountMismatch { expected: 1, got: 2, .. }));
}

#[test]
fn test_out_of_range_qubit_is_rejected() {
    let mut state = StateVector::zero_state(2).unwrap();
    let err = StandardGate::X.apply_to_qubits(&mut state, &[2]).unwrap_err();
    assert!(matches!(
        err,
        Error::QubitOutOfRange {
            qubit: 2,
            qubit_count: 2
        }
    ));
}

#[test]
fn test_cnot_needs_distinct_wires() {
    let mut state = StateVector::zero_state(2).unwrap();
    let err = StandardGate::CNOT.apply_to_qubits(&mut state, &[1, 1]).unwrap_err();
    assert!(matches!(err, Error::RepeatedWire(1)));
}
