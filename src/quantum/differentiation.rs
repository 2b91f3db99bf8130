// src/quantum/differentiation.rs
//! Gradients of a Pauli-Z expectation value with respect to circuit weights
//!
//! Two methods are provided. [`adjoint_gradient`] runs the circuit once and
//! walks it backwards, producing every derivative in a single pass; it is
//! what training uses. [`parameter_shift_gradient`] evaluates each trainable
//! rotation at `θ ± π/2` and serves as an independent reference.

use std::f64::consts::FRAC_PI_2;

use crate::error::{Error, Result};
use crate::quantum::circuit::QuantumCircuit;
use crate::quantum::gate::{Gate, QuantumGate, StandardGate};
use crate::simulators::StatevectorSimulator;

/// ⟨Z⟩ on `qubit` after running `circuit` from |0...0⟩
pub fn expectation_pauli_z(circuit: &QuantumCircuit, qubit: usize) -> Result<f64> {
    let mut simulator = StatevectorSimulator::new(circuit.qubit_count)?;
    simulator.run_circuit(circuit)?;
    simulator.expectation_pauli_z(qubit)
}

fn check_parameter(index: usize, parameter_count: usize) -> Result<()> {
    if index >= parameter_count {
        return Err(Error::DimensionMismatch(format!(
            "operation reads weight {} but only {} weights exist",
            index, parameter_count
        )));
    }
    Ok(())
}

/// Expectation value and its gradient by adjoint differentiation.
///
/// With |λ⟩ = Z|ψ⟩, the derivative for a rotation `exp(-iθG/2)` whose output
/// state is |ψ_k⟩ is `Im⟨λ|G|ψ_k⟩`. Both |ψ⟩ and |λ⟩ are then un-computed
/// through the gate's adjoint before moving to the previous operation.
pub fn adjoint_gradient(
    circuit: &QuantumCircuit,
    qubit: usize,
    parameter_count: usize,
) -> Result<(f64, Vec<f64>)> {
    let mut simulator = StatevectorSimulator::new(circuit.qubit_count)?;
    simulator.run_circuit(circuit)?;
    let expectation = simulator.expectation_pauli_z(qubit)?;

    let mut psi = simulator.into_state();
    let mut lambda = psi.clone();
    StandardGate::Z.apply_to_qubits(&mut lambda, &[qubit])?;

    let mut gradient = vec![0.0; parameter_count];

    for (position, op) in circuit.operations.iter().enumerate().rev() {
        if let (Gate::Parametrized(rotation), Some(index)) = (&op.gate, op.parameter) {
            check_parameter(index, parameter_count)?;

            let mut mu = psi.clone();
            rotation.generator().apply_to_qubits(&mut mu, &op.wires)?;
            gradient[index] += lambda.inner_product(&mu)?.im;
        }

        // Nothing precedes the first operation, so there is nothing to undo.
        if position > 0 {
            let inverse = op.gate.adjoint();
            inverse.apply_to_qubits(&mut psi, &op.wires)?;
            inverse.apply_to_qubits(&mut lambda, &op.wires)?;
        }
    }

    Ok((expectation, gradient))
}

/// Gradient of ⟨Z⟩ by the parameter-shift rule,
/// `∂f/∂θ = (f(θ + π/2) - f(θ - π/2)) / 2`.
pub fn parameter_shift_gradient(
    circuit: &QuantumCircuit,
    qubit: usize,
    parameter_count: usize,
) -> Result<Vec<f64>> {
    let mut gradient = vec![0.0; parameter_count];

    for (position, op) in circuit.operations.iter().enumerate() {
        let (rotation, index) = match (&op.gate, op.parameter) {
            (Gate::Parametrized(rotation), Some(index)) => (*rotation, index),
            _ => continue,
        };
        check_parameter(index, parameter_count)?;

        let mut shifted = circuit.clone();

        shifted.operations[position].gate =
            Gate::Parametrized(rotation.with_angle(rotation.angle() + FRAC_PI_2));
        let forward = expectation_pauli_z(&shifted, qubit)?;

        shifted.operations[position].gate =
            Gate::Parametrized(rotation.with_angle(rotation.angle() - FRAC_PI_2));
        let backward = expectation_pauli_z(&shifted, qubit)?;

        gradient[index] += (forward - backward) / 2.0;
    }

    Ok(gradient)
}
