//! Quantum circuits and the templates used by the classifier
//!
//! A circuit is an ordered list of operations. Operations produced from the
//! trainable weight tensor carry the flat index of the weight they read, so a
//! gradient pass can route each derivative back to its parameter.

use ndarray::{Array3, ArrayView1};

use crate::error::{Error, Result};
use crate::quantum::gate::{Gate, ParametrizedGate, QuantumGate, StandardGate};
use crate::quantum::state::StateVector;

/// One gate placed on specific wires
#[derive(Clone, Debug, PartialEq)]
pub struct Operation {
    pub gate: Gate,
    pub wires: Vec<usize>,
    /// Flat index into the weight tensor when the gate angle is trainable
    pub parameter: Option<usize>,
}

/// A quantum circuit consisting of a sequence of gates
#[derive(Clone, Debug, PartialEq)]
pub struct QuantumCircuit {
    pub operations: Vec<Operation>,
    pub qubit_count: usize,
}

impl QuantumCircuit {
    /// Create a new empty quantum circuit
    pub fn new(qubit_count: usize) -> Self {
        QuantumCircuit {
            operations: Vec::new(),
            qubit_count,
        }
    }

    /// Append a fixed gate
    pub fn add_gate<G: Into<Gate>>(&mut self, gate: G, qubits: &[usize]) -> Result<()> {
        self.push(gate.into(), qubits, None)
    }

    /// Append a rotation whose angle is read from weight `parameter`
    pub fn add_trainable_gate(
        &mut self,
        gate: ParametrizedGate,
        qubit: usize,
        parameter: usize,
    ) -> Result<()> {
        self.push(Gate::Parametrized(gate), &[qubit], Some(parameter))
    }

    fn push(&mut self, gate: Gate, qubits: &[usize], parameter: Option<usize>) -> Result<()> {
        for &q in qubits {
            if q >= self.qubit_count {
                return Err(Error::QubitOutOfRange {
                    qubit: q,
                    qubit_count: self.qubit_count,
                });
            }
        }

        if gate.qubit_count() != qubits.len() {
            return Err(Error::WireCountMismatch {
                gate: gate.name(),
                expected: gate.qubit_count(),
                got: qubits.len(),
            });
        }

        self.operations.push(Operation {
            gate,
            wires: qubits.to_vec(),
            parameter,
        });
        Ok(())
    }

    /// Get the number of gates in the circuit
    pub fn gate_count(&self) -> usize {
        self.operations.len()
    }

    /// Number of operations tagged with a trainable weight
    pub fn trainable_count(&self) -> usize {
        self.operations
            .iter()
            .filter(|op| op.parameter.is_some())
            .count()
    }

    /// Apply the circuit to a quantum state in place
    pub fn apply(&self, state: &mut StateVector) -> Result<()> {
        if state.qubit_count() < self.qubit_count {
            return Err(Error::DimensionMismatch(format!(
                "state has {} qubits, but circuit requires at least {}",
                state.qubit_count(),
                self.qubit_count
            )));
        }

        for op in &self.operations {
            op.gate.apply_to_qubits(state, &op.wires)?;
        }

        Ok(())
    }
}

/// Builder for constructing quantum circuits
pub struct CircuitBuilder {
    circuit: QuantumCircuit,
}

impl CircuitBuilder {
    pub fn new(qubit_count: usize) -> Self {
        CircuitBuilder {
            circuit: QuantumCircuit::new(qubit_count),
        }
    }

    pub fn build(self) -> QuantumCircuit {
        self.circuit
    }

    pub fn h(&mut self, qubit: usize) -> Result<&mut Self> {
        self.circuit.add_gate(StandardGate::H, &[qubit])?;
        Ok(self)
    }

    pub fn x(&mut self, qubit: usize) -> Result<&mut Self> {
        self.circuit.add_gate(StandardGate::X, &[qubit])?;
        Ok(self)
    }

    pub fn cnot(&mut self, control: usize, target: usize) -> Result<&mut Self> {
        self.circuit.add_gate(StandardGate::CNOT, &[control, target])?;
        Ok(self)
    }

    pub fn rx(&mut self, qubit: usize, theta: f64) -> Result<&mut Self> {
        self.circuit.add_gate(ParametrizedGate::Rx(theta), &[qubit])?;
        Ok(self)
    }

    pub fn ry(&mut self, qubit: usize, theta: f64) -> Result<&mut Self> {
        self.circuit.add_gate(ParametrizedGate::Ry(theta), &[qubit])?;
        Ok(self)
    }

    pub fn rz(&mut self, qubit: usize, theta: f64) -> Result<&mut Self> {
        self.circuit.add_gate(ParametrizedGate::Rz(theta), &[qubit])?;
        Ok(self)
    }

    /// Encode one feature per wire as an X rotation.
    ///
    /// Fewer features than wires leave the remaining wires untouched.
    pub fn angle_embedding(&mut self, features: ArrayView1<f64>) -> Result<&mut Self> {
        let qubit_count = self.circuit.qubit_count;
        if features.len() > qubit_count {
            return Err(Error::DimensionMismatch(format!(
                "{} features cannot be embedded into {} qubits",
                features.len(),
                qubit_count
            )));
        }

        for (wire, &value) in features.iter().enumerate() {
            self.rx(wire, value)?;
        }
        Ok(self)
    }

    /// Append strongly-entangling layers driven by `weights` of shape
    /// `(layers, qubits, 3)`.
    ///
    /// Each layer rotates every wire by `RZ(w2)·RY(w1)·RZ(w0)` and then, on
    /// more than one wire, applies `CNOT(i, (i + r) mod n)` with range
    /// `r = (layer mod (n - 1)) + 1`.
    pub fn strongly_entangling_layers(&mut self, weights: &Array3<f64>) -> Result<&mut Self> {
        let qubit_count = self.circuit.qubit_count;
        let (layers, wires, angles) = weights.dim();

        if wires != qubit_count || angles != 3 {
            return Err(Error::DimensionMismatch(format!(
                "weights must have shape (layers, {}, 3), got ({}, {}, {})",
                qubit_count, layers, wires, angles
            )));
        }

        for layer in 0..layers {
            for wire in 0..qubit_count {
                let base = (layer * qubit_count + wire) * 3;
                let w = weights.slice(ndarray::s![layer, wire, ..]);

                self.circuit
                    .add_trainable_gate(ParametrizedGate::Rz(w[0]), wire, base)?;
                self.circuit
                    .add_trainable_gate(ParametrizedGate::Ry(w[1]), wire, base + 1)?;
                self.circuit
                    .add_trainable_gate(ParametrizedGate::Rz(w[2]), wire, base + 2)?;
            }

            if qubit_count > 1 {
                let range = layer % (qubit_count - 1) + 1;
                for wire in 0..qubit_count {
                    self.cnot(wire, (wire + range) % qubit_count)?;
                }
            }
        }

        Ok(self)
    }
}
