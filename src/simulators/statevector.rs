//! Statevector simulator
//!
//! Analytic simulation of a qubit register: gates are applied in place and
//! observables are evaluated exactly from the amplitudes, so repeated runs of
//! the same circuit always agree bit for bit.

use std::collections::HashMap;
use std::fmt;

use crate::error::{Error, Result};
use crate::quantum::circuit::QuantumCircuit;
use crate::quantum::gate::QuantumGate;
use crate::quantum::state::StateVector;

/// A measurement outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Measurement yielded 0
    Zero,
    /// Measurement yielded 1
    One,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Zero => write!(f, "0"),
            Outcome::One => write!(f, "1"),
        }
    }
}

/// A statevector simulator for quantum circuits
#[derive(Clone, Debug)]
pub struct StatevectorSimulator {
    /// The current state of the simulator
    state: StateVector,
}

impl StatevectorSimulator {
    /// Create a new statevector simulator with the specified number of qubits
    pub fn new(qubit_count: usize) -> Result<Self> {
        Ok(StatevectorSimulator {
            state: StateVector::zero_state(qubit_count)?,
        })
    }

    /// Get the current state vector
    pub fn state(&self) -> &StateVector {
        &self.state
    }

    /// Consume the simulator and keep its final state
    pub fn into_state(self) -> StateVector {
        self.state
    }

    /// Reset the simulator to the |0...0⟩ state
    pub fn reset(&mut self) {
        self.state.reset();
    }

    /// Get the number of qubits in the simulator
    pub fn qubit_count(&self) -> usize {
        self.state.qubit_count()
    }

    /// Apply a quantum gate to the specified qubits
    pub fn apply_gate<G: QuantumGate + ?Sized>(&mut self, gate: &G, qubits: &[usize]) -> Result<()> {
        gate.apply_to_qubits(&mut self.state, qubits)
    }

    /// Apply every operation of a circuit in order
    pub fn run_circuit(&mut self, circuit: &QuantumCircuit) -> Result<()> {
        if circuit.qubit_count > self.qubit_count() {
            return Err(Error::DimensionMismatch(format!(
                "circuit has {} qubits, but simulator has only {}",
                circuit.qubit_count,
                self.qubit_count()
            )));
        }

        circuit.apply(&mut self.state)
    }

    /// Measure a single qubit without collapsing the state
    pub fn measure_qubit_probability(&self, qubit: usize) -> Result<HashMap<Outcome, f64>> {
        let mask = self.state.qubit_mask(qubit)?;

        let mut prob_zero = 0.0;
        let mut prob_one = 0.0;

        for (i, amp) in self.state.amplitudes().iter().enumerate() {
            if i & mask == 0 {
                prob_zero += amp.norm_sqr();
            } else {
                prob_one += amp.norm_sqr();
            }
        }

        let mut probabilities = HashMap::with_capacity(2);
        probabilities.insert(Outcome::Zero, prob_zero);
        probabilities.insert(Outcome::One, prob_one);

        Ok(probabilities)
    }

    /// Expectation value of Pauli-Z on one qubit, `P(0) - P(1)`
    pub fn expectation_pauli_z(&self, qubit: usize) -> Result<f64> {
        let probabilities = self.measure_qubit_probability(qubit)?;
        let prob_zero = probabilities.get(&Outcome::Zero).copied().unwrap_or(0.0);
        let prob_one = probabilities.get(&Outcome::One).copied().unwrap_or(0.0);
        Ok(prob_zero - prob_one)
    }
}
