//! Layer-count sweep of the variational quantum classifier.
//!
//! Reads `sweep.json` from the working directory when present, trains one
//! classifier per layer count and writes the accuracy chart plus a JSON
//! summary. Log verbosity follows `RUST_LOG` (default `info`).

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use vqc_sweep::config::{SweepConfig, DEFAULT_CONFIG_FILE};
use vqc_sweep::machine_learning::sweep::{plot_sweep, sweep};
use vqc_sweep::plotting::{write_summary, SvgPlotter};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = SweepConfig::load_or_default(DEFAULT_CONFIG_FILE)
        .with_context(|| format!("failed to load {}", DEFAULT_CONFIG_FILE))?;

    info!(
        version = vqc_sweep::VERSION,
        layer_counts = ?config.layer_counts,
        qubits = config.experiment.qubit_count,
        epochs = config.experiment.epoch_count,
        "vqc-sweep starting"
    );

    let result = sweep(&config.experiment, &config.layer_counts, &config.dataset)
        .context("layer sweep failed")?;

    let plotter = SvgPlotter::new(&config.output_dir);
    let chart = plot_sweep(&result, &config.experiment, &plotter).context("failed to plot sweep")?;
    let summary = write_summary(&config, &result).context("failed to write sweep summary")?;

    for ((layers, train), test) in result
        .layer_counts
        .iter()
        .zip(&result.train_accuracy)
        .zip(&result.test_accuracy)
    {
        info!(layers, train_accuracy = train, test_accuracy = test, "final accuracy");
    }
    info!(chart = %chart.display(), summary = %summary.display(), "done");

    Ok(())
}
