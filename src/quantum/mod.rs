// src/quantum/mod.rs
//! Quantum computing primitives
//!
//! State vectors, gates, circuits and gradient rules for the simulated
//! classifier circuit.

pub mod state;
pub mod gate;
pub mod circuit;
pub mod differentiation;

pub use state::{StateVector, MAX_QUBITS};
pub use gate::{Gate, QuantumGate, StandardGate, ParametrizedGate};
pub use circuit::{QuantumCircuit, CircuitBuilder, Operation};
pub use differentiation::{adjoint_gradient, parameter_shift_gradient, expectation_pauli_z};

/// Re-export commonly used types and traits
pub mod prelude {
    pub use super::{StateVector, QuantumGate, StandardGate, ParametrizedGate, Gate};
    pub use super::{QuantumCircuit, CircuitBuilder};
}
