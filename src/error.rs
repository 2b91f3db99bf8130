//! Error types for the crate.

use thiserror::Error;

/// Errors produced while building circuits, loading data, training or plotting.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A gate or measurement references a qubit the register does not have.
    #[error("qubit index {qubit} out of range for a {qubit_count}-qubit register")]
    QubitOutOfRange {
        /// The offending qubit index.
        qubit: usize,
        /// Number of qubits in the register.
        qubit_count: usize,
    },

    /// A gate was given the wrong number of wires.
    #[error("gate {gate} acts on {expected} qubits, but {got} wires were given")]
    WireCountMismatch {
        gate: String,
        expected: usize,
        got: usize,
    },

    /// A register too wide to hold its amplitudes in memory.
    #[error("{qubit_count} qubits exceed the simulator limit of {max}")]
    TooManyQubits { qubit_count: usize, max: usize },

    /// Two control and target wires coincide.
    #[error("control and target must differ, both are {0}")]
    RepeatedWire(usize),

    /// Shapes of arrays, states or parameters disagree.
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// Configuration values that can never produce a run.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Dataset could not be read or split.
    #[error("dataset error: {0}")]
    Dataset(String),

    /// A run recorded no epochs, so there is no final metric to report.
    #[error("training history is empty, there is no final epoch")]
    EmptyHistory,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("could not parse number: {0}")]
    ParseFloat(#[from] std::num::ParseFloatError),

    /// Rendering a chart into a string failed.
    #[error("formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
