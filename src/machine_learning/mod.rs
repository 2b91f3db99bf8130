//! Machine learning module for the variational classifier
//!
//! Objectives, losses and optimizers over the circuit weight tensor, dataset
//! loading, and the training and sweep drivers built on them.

pub mod core;
pub mod loss;
pub mod optimizer;
pub mod dataset;
pub mod quantum;
pub mod training;
pub mod sweep;

/// Re-exports of commonly used components
pub mod prelude {
    // Core ML components
    pub use super::core::{DifferentiableObjective, Objective};
    pub use super::loss::{sign, sign_accuracy, LossFunction, MeanSquaredError};
    pub use super::optimizer::{Adam, AdamState, GradientDescent, Optimizer};
    pub use super::dataset::{CsvDatasetLoader, DatasetLoader, DatasetSplit, SyntheticDataset};

    // Quantum ML components
    pub use super::quantum::{CircuitEvaluator, VariationalQuantumClassifier};

    // Drivers
    pub use super::training::{run, TrainingHistory};
    pub use super::sweep::{sweep, SweepResult};
}

