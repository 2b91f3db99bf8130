//! Experiment and sweep configuration
//!
//! [`ExperimentConfig`] describes one training run and is read-only once
//! built; the sweep derives one per layer count with
//! [`ExperimentConfig::with_layer_count`]. [`SweepConfig`] adds the layer
//! counts, the dataset source and the output directory, and can be read from
//! a JSON file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::quantum::state::MAX_QUBITS;
use crate::machine_learning::dataset::{
    CsvDatasetLoader, DatasetLoader, DatasetSplit, SyntheticDataset,
};

/// File the binary reads its sweep configuration from, when present
pub const DEFAULT_CONFIG_FILE: &str = "sweep.json";

/// Dataset the binary loads when no configuration file overrides it
pub const DEFAULT_DATASET_FILE: &str = "dataset.csv";

/// First-order update rule used for training
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizerKind {
    /// Adam with β₁ = 0.9, β₂ = 0.999, ε = 1e-8
    #[default]
    Adam,
    GradientDescent,
}

/// Which parameters the test metrics are computed with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestEvaluation {
    /// The final parameters, once for every epoch index; the test curves are
    /// flat
    #[default]
    FinalParameters,
    /// The pre-update parameters of each epoch, alongside the training metrics
    PerEpoch,
}

/// Settings of a single training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Seeds the weight initialization and the dataset split
    pub seed: u64,
    pub train_size: usize,
    pub test_size: usize,
    pub qubit_count: usize,
    pub layer_count: usize,
    pub learning_rate: f64,
    pub epoch_count: usize,
    pub optimizer: OptimizerKind,
    pub test_evaluation: TestEvaluation,
    /// Emit an `info` progress event every this many epochs; 0 disables it
    pub log_every: usize,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        ExperimentConfig {
            seed: 0,
            train_size: 60_000,
            test_size: 50_000,
            qubit_count: 16,
            layer_count: 0,
            learning_rate: 1e-3,
            epoch_count: 1000,
            optimizer: OptimizerKind::default(),
            test_evaluation: TestEvaluation::default(),
            log_every: 100,
        }
    }
}

impl ExperimentConfig {
    /// Copy of this configuration training `layer_count` layers
    pub fn with_layer_count(&self, layer_count: usize) -> Self {
        ExperimentConfig {
            layer_count,
            ..self.clone()
        }
    }

    /// Reject values that can never produce a run
    pub fn validate(&self) -> Result<()> {
        if self.qubit_count == 0 {
            return Err(Error::InvalidConfig(
                "qubit_count must be greater than 0".to_string(),
            ));
        }

        if self.qubit_count > MAX_QUBITS {
            return Err(Error::InvalidConfig(format!(
                "qubit_count must be at most {}, got {}",
                MAX_QUBITS, self.qubit_count
            )));
        }

        if self.train_size == 0 || self.test_size == 0 {
            return Err(Error::InvalidConfig(format!(
                "train_size and test_size must be positive, got {} and {}",
                self.train_size, self.test_size
            )));
        }

        if !self.learning_rate.is_finite() || self.learning_rate < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "learning_rate must be finite and non-negative, got {}",
                self.learning_rate
            )));
        }

        Ok(())
    }
}

/// Where the sweep takes its data from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DatasetSource {
    Csv(CsvDatasetLoader),
    Synthetic(SyntheticDataset),
}

impl Default for DatasetSource {
    fn default() -> Self {
        DatasetSource::Csv(CsvDatasetLoader::new(DEFAULT_DATASET_FILE))
    }
}

impl DatasetLoader for DatasetSource {
    fn load(&self, train_size: usize, test_size: usize, seed: u64) -> Result<DatasetSplit> {
        match self {
            DatasetSource::Csv(loader) => loader.load(train_size, test_size, seed),
            DatasetSource::Synthetic(loader) => loader.load(train_size, test_size, seed),
        }
    }
}

/// Settings of a full layer-count sweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// Base run; its `layer_count` is replaced for each sweep entry
    pub experiment: ExperimentConfig,
    pub layer_counts: Vec<usize>,
    pub dataset: DatasetSource,
    /// Directory the plot and the summary are written to
    pub output_dir: PathBuf,
}

impl Default for SweepConfig {
    fn default() -> Self {
        SweepConfig {
            experiment: ExperimentConfig::default(),
            layer_counts: (0..10).collect(),
            dataset: DatasetSource::default(),
            output_dir: PathBuf::from("."),
        }
    }
}

impl SweepConfig {
    /// Load a sweep configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config: SweepConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Read `path` when it exists, otherwise fall back to the defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_json_file(path)
        } else {
            Ok(SweepConfig::default())
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.experiment.validate()?;

        if self.layer_counts.is_empty() {
            return Err(Error::InvalidConfig(
                "layer_counts must name at least one layer count".to_string(),
            ));
        }

        Ok(())
    }
}
