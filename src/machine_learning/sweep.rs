//! Layer-count sweep
//!
//! Trains one classifier per layer count, each from scratch with the same
//! seed, and keeps the last epoch's train and test accuracy.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::ExperimentConfig;
use crate::error::Result;
use crate::machine_learning::dataset::DatasetLoader;
use crate::machine_learning::training::run;
use crate::plotting::{Plotter, SweepPlot};

/// Final accuracies indexed by sweep position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepResult {
    /// Layer count trained at each position
    pub layer_counts: Vec<usize>,
    pub train_accuracy: Vec<f64>,
    pub test_accuracy: Vec<f64>,
}

impl SweepResult {
    pub fn len(&self) -> usize {
        self.layer_counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layer_counts.is_empty()
    }

    /// Horizontal plot positions, `1..=len`
    pub fn plot_positions(&self) -> Vec<f64> {
        (1..=self.len()).map(|x| x as f64).collect()
    }
}

/// Train once per entry of `layer_counts`
pub fn sweep<L: DatasetLoader + ?Sized>(
    base: &ExperimentConfig,
    layer_counts: &[usize],
    loader: &L,
) -> Result<SweepResult> {
    let mut result = SweepResult {
        layer_counts: Vec::with_capacity(layer_counts.len()),
        train_accuracy: Vec::with_capacity(layer_counts.len()),
        test_accuracy: Vec::with_capacity(layer_counts.len()),
    };

    info!(runs = layer_counts.len(), "starting layer sweep");

    for &layer_count in layer_counts {
        let config = base.with_layer_count(layer_count);
        let history = run(&config, loader)?;

        result.layer_counts.push(layer_count);
        result.train_accuracy.push(history.final_train_accuracy()?);
        result.test_accuracy.push(history.final_test_accuracy()?);
    }

    info!("layer sweep finished");
    Ok(result)
}

/// Hand the sweep to `plotter` as an accuracy-versus-layers chart
pub fn plot_sweep<P: Plotter + ?Sized>(
    result: &SweepResult,
    base: &ExperimentConfig,
    plotter: &P,
) -> Result<PathBuf> {
    let plot = SweepPlot::accuracy_vs_layers(result, base.train_size, base.test_size);
    let path = plotter.plot(&plot)?;
    info!(path = %path.display(), "wrote accuracy plot");
    Ok(path)
}
