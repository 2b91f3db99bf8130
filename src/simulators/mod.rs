//! Quantum circuit simulators
//!
//! This module provides simulators for quantum circuits, offering
//! tools to efficiently simulate quantum algorithms on classical hardware.

pub mod statevector;

pub use statevector::{
    StatevectorSimulator,
    Outcome,
};
