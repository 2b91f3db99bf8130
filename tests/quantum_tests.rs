// tests/quantum_tests.rs
//! Tests for circuit templates and gradient rules

use approx::assert_abs_diff_eq;
use ndarray::{Array1, Array3};

use vqc_sweep::machine_learning::quantum::CircuitEvaluator;
use vqc_sweep::quantum::circuit::CircuitBuilder;
use vqc_sweep::quantum::differentiation::{
    adjoint_gradient, expectation_pauli_z, parameter_shift_gradient,
};
use vqc_sweep::quantum::gate::{Gate, ParametrizedGate, StandardGate};
use vqc_sweep::Error;

#[test]
fn test_adjoint_matches_parameter_shift() {
    for (qubits, layers) in [(1, 2), (2, 1), (3, 2), (4, 3)] {
        let evaluator = CircuitEvaluator::new(qubits, layers).unwrap();
        let weights = evaluator.init_weights(7);
        let features = Array1::linspace(0.2, 2.4, qubits);

        let (_, adjoint) = evaluator
            .evaluate_with_gradient(features.view(), &weights)
            .unwrap();
        let shift = evaluator
            .parameter_shift_gradient(features.view(), &weights)
            .unwrap();

        assert_eq!(adjoint.dim(), (layers, qubits, 3));
        for (a, s) in adjoint.iter().zip(shift.iter()) {
            assert_abs_diff_eq!(*a, *s, epsilon = 1e-9);
        }
    }
}

#[test]
fn test_adjoint_matches_finite_differences() {
    let evaluator = CircuitEvaluator::new(3, 2).unwrap();
    let weights = evaluator.init_weights(11);
    let features = Array1::from_vec(vec![0.3, 1.1, 2.0]);

    let (value, gradient) = evaluator
        .evaluate_with_gradient(features.view(), &weights)
        .unwrap();
    assert_abs_diff_eq!(
        value,
        evaluator.evaluate(features.view(), &weights).unwrap(),
        epsilon = 1e-12
    );

    let h = 1e-6;
    for index in 0..evaluator.parameter_count() {
        let mut plus = weights.clone();
        let mut minus = weights.clone();
        plus.as_slice_mut().unwrap()[index] += h;
        minus.as_slice_mut().unwrap()[index] -= h;

        let numeric = (evaluator.evaluate(features.view(), &plus).unwrap()
            - evaluator.evaluate(features.view(), &minus).unwrap())
            / (2.0 * h);
        assert_abs_diff_eq!(gradient.as_slice().unwrap()[index], numeric, epsilon = 1e-6);
    }
}

#[test]
fn test_gradient_of_single_rotation() {
    // d/dθ cos θ = -sin θ
    let theta = 0.9;
    let mut builder = CircuitBuilder::new(1);
    builder.h(0).unwrap().h(0).unwrap();
    let mut circuit = builder.build();
    circuit
        .add_trainable_gate(ParametrizedGate::Rx(theta), 0, 0)
        .unwrap();

    let (value, gradient) = adjoint_gradient(&circuit, 0, 1).unwrap();
    assert_abs_diff_eq!(value, theta.cos(), epsilon = 1e-12);
    assert_abs_diff_eq!(gradient[0], -theta.sin(), epsilon = 1e-12);

    let shift = parameter_shift_gradient(&circuit, 0, 1).unwrap();
    assert_abs_diff_eq!(shift[0], -theta.sin(), epsilon = 1e-12);
}

#[test]
fn test_fixed_gates_have_no_gradient() {
    let mut builder = CircuitBuilder::new(2);
    builder.rx(0, 0.5).unwrap().cnot(0, 1).unwrap();
    let circuit = builder.build();

    let (value, gradient) = adjoint_gradient(&circuit, 0, 0).unwrap();
    assert!(gradient.is_empty());
    assert_abs_diff_eq!(value, expectation_pauli_z(&circuit, 0).unwrap(), epsilon = 1e-12);
}

#[test]
fn test_parameter_index_out_of_range() {
    let mut circuit = CircuitBuilder::new(1).build();
    circuit
        .add_trainable_gate(ParametrizedGate::Ry(0.1), 0, 3)
        .unwrap();

    assert!(matches!(
        adjoint_gradient(&circuit, 0, 2),
        Err(Error::DimensionMismatch(_))
    ));
}

#[test]
fn test_strongly_entangling_cnot_ranges() {
    // 4 wires: ranges cycle through 1, 2, 3, 1
    let weights = Array3::zeros((4, 4, 3));
    let mut builder = CircuitBuilder::new(4);
    builder.strongly_entangling_layers(&weights).unwrap();
    let circuit = builder.build();

    let cnots: Vec<Vec<usize>> = circuit
        .operations
        .iter()
        .filter(|op| op.gate == Gate::Standard(StandardGate::CNOT))
        .map(|op| op.wires.clone())
        .collect();

    assert_eq!(cnots.len(), 16);
    assert_eq!(cnots[0], vec![0, 1]);
    assert_eq!(cnots[4], vec![0, 2]);
    assert_eq!(cnots[8], vec![0, 3]);
    assert_eq!(cnots[11], vec![3, 2]);
    assert_eq!(cnots[12], vec![0, 1]);
}

#[test]
fn test_rotation_order_and_parameter_tags() {
    let weights = Array3::from_shape_fn((1, 2, 3), |(_, w, k)| (w * 3 + k) as f64);
    let mut builder = CircuitBuilder::new(2);
    builder.strongly_entangling_layers(&weights).unwrap();
    let circuit = builder.build();

    let first_wire: Vec<_> = circuit.operations[..3].iter().map(|op| (op.gate, op.parameter)).collect();
    assert_eq!(
        first_wire,
        vec![
            (Gate::Parametrized(ParametrizedGate::Rz(0.0)), Some(0)),
            (Gate::Parametrized(ParametrizedGate::Ry(1.0)), Some(1)),
            (Gate::Parametrized(ParametrizedGate::Rz(2.0)), Some(2)),
        ]
    );
    assert_eq!(circuit.operations[3].parameter, Some(3));
    assert_eq!(circuit.trainable_count(), 6);
}

#[test]
fn test_fewer_features_than_qubits() {
    let evaluator = CircuitEvaluator::new(3, 0).unwrap();
    let weights = evaluator.init_weights(0);
    let features = Array1::from_vec(vec![1.3]);

    let score = evaluator.evaluate(features.view(), &weights).unwrap();
    assert_abs_diff_eq!(score, 1.3_f64.cos(), epsilon = 1e-12);
}
