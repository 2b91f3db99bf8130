//! Quantum machine learning module

pub mod model;
pub mod variational;

// Re-exports for convenience
pub use model::{CircuitEvaluator, OBSERVABLE_QUBIT};
pub use variational::{AccuracyObjective, LossObjective, VariationalQuantumClassifier};
