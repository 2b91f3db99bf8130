//! Variational Quantum Classifier Sweep
//!
//! This crate trains a variational quantum circuit as a binary classifier on a
//! state-vector simulator and sweeps the number of strongly-entangling layers,
//! reporting final train and test accuracy for each. It includes the
//! simulator, the circuit templates and their gradients, first-order
//! optimizers, dataset loaders and an SVG chart writer.

pub mod error;
pub mod config;
pub mod quantum;
pub mod simulators;
pub mod machine_learning;
pub mod plotting;

pub use error::{Error, Result};

// Create a prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{ExperimentConfig, OptimizerKind, SweepConfig, TestEvaluation};
    pub use crate::error::{Error, Result};
    pub use crate::machine_learning::prelude::*;
    pub use crate::plotting::{Plotter, SvgPlotter};
    pub use crate::quantum::prelude::*;
    pub use crate::simulators::StatevectorSimulator;
}

/// Crate version, recorded in every sweep summary
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
