// src/quantum/gate.rs
//! Quantum gates implementation
//!
//! Gates are described by their matrices. The simulator applies them in place
//! on a [`StateVector`]; rotation gates additionally expose the Pauli
//! generator used for differentiation, `R(θ) = exp(-i θ G / 2)`.

use std::fmt::Debug;

use ndarray::{array, Array2};
use num_complex::Complex64;

use super::state::StateVector;
use crate::error::{Error, Result};

/// Common complex numbers used in quantum gates
pub mod constants {
    use num_complex::Complex64;

    /// The imaginary unit i
    pub const I: Complex64 = Complex64::new(0.0, 1.0);

    /// 1/sqrt(2)
    pub const FRAC_1_SQRT_2: f64 = std::f64::consts::FRAC_1_SQRT_2;
}

/// Trait for quantum gates
pub trait QuantumGate: Debug {
    /// Returns the number of qubits this gate acts on
    fn qubit_count(&self) -> usize;

    /// Returns the matrix representation of this gate
    fn matrix(&self) -> Array2<Complex64>;

    /// Returns a display name for this gate
    fn name(&self) -> String;

    /// Apply this gate in place to the given wires of a state
    fn apply_to_qubits(&self, state: &mut StateVector, qubits: &[usize]) -> Result<()>;
}

/// Standard quantum gates (Pauli, Hadamard, CNOT)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StandardGate {
    /// Pauli-X gate (NOT gate)
    X,

    /// Pauli-Y gate
    Y,

    /// Pauli-Z gate
    Z,

    /// Hadamard gate
    H,

    /// CNOT gate
    CNOT,
}

impl QuantumGate for StandardGate {
    fn qubit_count(&self) -> usize {
        match self {
            StandardGate::X | StandardGate::Y | StandardGate::Z | StandardGate::H => 1,
            StandardGate::CNOT => 2,
        }
    }

    fn matrix(&self) -> Array2<Complex64> {
        let zero = Complex64::new(0.0, 0.0);
        let one = Complex64::new(1.0, 0.0);

        match self {
            StandardGate::X => array![[zero, one], [one, zero]],
            StandardGate::Y => array![[zero, -constants::I], [constants::I, zero]],
            StandardGate::Z => array![[one, zero], [zero, -one]],
            StandardGate::H => {
                let h = Complex64::new(constants::FRAC_1_SQRT_2, 0.0);
                array![[h, h], [h, -h]]
            }
            StandardGate::CNOT => array![
                [one, zero, zero, zero],
                [zero, one, zero, zero],
                [zero, zero, zero, one],
                [zero, zero, one, zero]
            ],
        }
    }

    fn name(&self) -> String {
        match self {
            StandardGate::X => "X",
            StandardGate::Y => "Y",
            StandardGate::Z => "Z",
            StandardGate::H => "H",
            StandardGate::CNOT => "CNOT",
        }
        .to_string()
    }

    fn apply_to_qubits(&self, state: &mut StateVector, qubits: &[usize]) -> Result<()> {
        check_wires(self, qubits)?;

        match self {
            StandardGate::CNOT => state.apply_cnot(qubits[0], qubits[1]),
            _ => state.apply_single_qubit_matrix(&self.matrix(), qubits[0]),
        }
    }
}

/// Single-qubit rotations by an angle
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ParametrizedGate {
    /// Rotation around X-axis
    Rx(f64),

    /// Rotation around Y-axis
    Ry(f64),

    /// Rotation around Z-axis
    Rz(f64),
}

impl ParametrizedGate {
    /// The rotation angle
    pub fn angle(&self) -> f64 {
        match self {
            ParametrizedGate::Rx(theta)
            | ParametrizedGate::Ry(theta)
            | ParametrizedGate::Rz(theta) => *theta,
        }
    }

    /// The same rotation with a different angle
    pub fn with_angle(&self, theta: f64) -> Self {
        match self {
            ParametrizedGate::Rx(_) => ParametrizedGate::Rx(theta),
            ParametrizedGate::Ry(_) => ParametrizedGate::Ry(theta),
            ParametrizedGate::Rz(_) => ParametrizedGate::Rz(theta),
        }
    }

    /// Rotation gates have adjoint = rotation by negative angle
    pub fn adjoint(&self) -> Self {
        self.with_angle(-self.angle())
    }

    /// Pauli generator `G` with `R(θ) = exp(-i θ G / 2)`
    pub fn generator(&self) -> StandardGate {
        match self {
            ParametrizedGate::Rx(_) => StandardGate::X,
            ParametrizedGate::Ry(_) => StandardGate::Y,
            ParametrizedGate::Rz(_) => StandardGate::Z,
        }
    }
}

impl QuantumGate for ParametrizedGate {
    fn qubit_count(&self) -> usize {
        1
    }

    fn matrix(&self) -> Array2<Complex64> {
        match self {
            ParametrizedGate::Rx(theta) => {
                let cos = (theta / 2.0).cos();
                let sin = (theta / 2.0).sin();
                array![
                    [Complex64::new(cos, 0.0), Complex64::new(0.0, -sin)],
                    [Complex64::new(0.0, -sin), Complex64::new(cos, 0.0)]
                ]
            }
            ParametrizedGate::Ry(theta) => {
                let cos = (theta / 2.0).cos();
                let sin = (theta / 2.0).sin();
                array![
                    [Complex64::new(cos, 0.0), Complex64::new(-sin, 0.0)],
                    [Complex64::new(sin, 0.0), Complex64::new(cos, 0.0)]
                ]
            }
            ParametrizedGate::Rz(theta) => {
                let phase_neg = Complex64::from_polar(1.0, -theta / 2.0);
                let phase_pos = Complex64::from_polar(1.0, theta / 2.0);
                array![
                    [phase_neg, Complex64::new(0.0, 0.0)],
                    [Complex64::new(0.0, 0.0), phase_pos]
                ]
            }
        }
    }

    fn name(&self) -> String {
        match self {
            ParametrizedGate::Rx(theta) => format!("Rx({:.2})", theta),
            ParametrizedGate::Ry(theta) => format!("Ry({:.2})", theta),
            ParametrizedGate::Rz(theta) => format!("Rz({:.2})", theta),
        }
    }

    fn apply_to_qubits(&self, state: &mut StateVector, qubits: &[usize]) -> Result<()> {
        check_wires(self, qubits)?;
        state.apply_single_qubit_matrix(&self.matrix(), qubits[0])
    }
}

/// Any gate a circuit can hold
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Gate {
    Standard(StandardGate),
    Parametrized(ParametrizedGate),
}

impl Gate {
    /// Returns the adjoint (Hermitian conjugate) of this gate
    pub fn adjoint(&self) -> Gate {
        match self {
            // X, Y, Z, H and CNOT are self-inverse
            Gate::Standard(gate) => Gate::Standard(*gate),
            Gate::Parametrized(gate) => Gate::Parametrized(gate.adjoint()),
        }
    }
}

impl From<StandardGate> for Gate {
    fn from(gate: StandardGate) -> Self {
        Gate::Standard(gate)
    }
}

impl From<ParametrizedGate> for Gate {
    fn from(gate: ParametrizedGate) -> Self {
        Gate::Parametrized(gate)
    }
}

impl QuantumGate for Gate {
    fn qubit_count(&self) -> usize {
        match self {
            Gate::Standard(gate) => gate.qubit_count(),
            Gate::Parametrized(gate) => gate.qubit_count(),
        }
    }

    fn matrix(&self) -> Array2<Complex64> {
        match self {
            Gate::Standard(gate) => gate.matrix(),
            Gate::Parametrized(gate) => gate.matrix(),
        }
    }

    fn name(&self) -> String {
        match self {
            Gate::Standard(gate) => gate.name(),
            Gate::Parametrized(gate) => gate.name(),
        }
    }

    fn apply_to_qubits(&self, state: &mut StateVector, qubits: &[usize]) -> Result<()> {
        match self {
            Gate::Standard(gate) => gate.apply_to_qubits(state, qubits),
            Gate::Parametrized(gate) => gate.apply_to_qubits(state, qubits),
        }
    }
}

fn check_wires<G: QuantumGate + ?Sized>(gate: &G, qubits: &[usize]) -> Result<()> {
    if qubits.len() != gate.qubit_count() {
        return Err(Error::WireCountMismatch {
            gate: gate.name(),
            expected: gate.qubit_count(),
            got: qubits.len(),
        });
    }
    Ok(())
}
