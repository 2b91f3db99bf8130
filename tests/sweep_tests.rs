//! Tests for the layer sweep, plotting and configuration files

use std::fs;
use std::path::PathBuf;

use vqc_sweep::config::{DatasetSource, ExperimentConfig, SweepConfig};
use vqc_sweep::machine_learning::dataset::SyntheticDataset;
use vqc_sweep::machine_learning::sweep::{plot_sweep, sweep, SweepResult};
use vqc_sweep::machine_learning::training::run;
use vqc_sweep::plotting::{write_summary, Plotter, SvgPlotter, SweepPlot};
use vqc_sweep::{Error, Result};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("vqc-sweep-{}-{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    dir
}

fn base_config() -> ExperimentConfig {
    ExperimentConfig {
        seed: 1,
        train_size: 8,
        test_size: 4,
        qubit_count: 2,
        learning_rate: 0.02,
        epoch_count: 3,
        ..ExperimentConfig::default()
    }
}

#[test]
fn test_sweep_has_one_entry_per_layer_count() {
    let loader = SyntheticDataset::new(2);
    let result = sweep(&base_config(), &[0, 1, 2], &loader).unwrap();

    assert_eq!(result.len(), 3);
    assert_eq!(result.layer_counts, vec![0, 1, 2]);
    assert_eq!(result.train_accuracy.len(), 3);
    assert_eq!(result.test_accuracy.len(), 3);
    assert_eq!(result.plot_positions(), vec![1.0, 2.0, 3.0]);
}

#[test]
fn test_sweep_entries_are_final_epoch_accuracies() {
    let loader = SyntheticDataset::new(2);
    let result = sweep(&base_config(), &[2], &loader).unwrap();

    let history = run(&base_config().with_layer_count(2), &loader).unwrap();
    assert_eq!(result.train_accuracy[0], history.train_accuracy[2]);
    assert_eq!(result.test_accuracy[0], history.test_accuracy[2]);
}

#[test]
fn test_sweep_is_reproducible() {
    let loader = SyntheticDataset::new(2);
    let first = sweep(&base_config(), &[0, 1], &loader).unwrap();
    let second = sweep(&base_config(), &[0, 1], &loader).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_sweep_aborts_on_empty_history() {
    let config = ExperimentConfig {
        epoch_count: 0,
        ..base_config()
    };
    let result = sweep(&config, &[0, 1], &SyntheticDataset::new(2));
    assert!(matches!(result, Err(Error::EmptyHistory)));
}

#[test]
fn test_svg_plot_named_after_sizes() {
    let dir = scratch_dir("plot");
    let result = SweepResult {
        layer_counts: vec![0, 1],
        train_accuracy: vec![0.5, 0.75],
        test_accuracy: vec![0.5, 0.5],
    };

    let path = plot_sweep(&result, &base_config(), &SvgPlotter::new(&dir)).unwrap();
    assert_eq!(path, dir.join("training8_testing4.svg"));

    let svg = fs::read_to_string(&path).unwrap();
    assert!(svg.contains("Accuracy vs Layers"));
    assert!(svg.contains("Training"));
    assert!(svg.contains("Testing"));
    assert!(svg.trim_end().ends_with("</svg>"));
}

/// Records the chart instead of drawing it
struct RecordingPlotter {
    seen: std::cell::RefCell<Vec<SweepPlot>>,
}

impl Plotter for RecordingPlotter {
    fn plot(&self, plot: &SweepPlot) -> Result<PathBuf> {
        self.seen.borrow_mut().push(plot.clone());
        Ok(PathBuf::from(format!("{}.svg", plot.file_stem)))
    }
}

#[test]
fn test_plot_receives_axis_labels_and_series() {
    let plotter = RecordingPlotter {
        seen: Default::default(),
    };
    let loader = SyntheticDataset::new(2);
    let result = sweep(&base_config(), &[0, 1, 2], &loader).unwrap();
    plot_sweep(&result, &base_config(), &plotter).unwrap();

    let seen = plotter.seen.borrow();
    assert_eq!(seen.len(), 1);
    let plot = &seen[0];
    assert_eq!(plot.title, "Accuracy vs Layers");
    assert_eq!(plot.x_label, "# of layers");
    assert_eq!(plot.y_label, "Accuracy");
    assert_eq!(plot.x_positions, vec![1.0, 2.0, 3.0]);
    assert_eq!(plot.series[0].values, result.train_accuracy);
    assert_eq!(plot.series[1].values, result.test_accuracy);
}

#[test]
fn test_summary_round_trips_result() {
    let dir = scratch_dir("summary");
    let config = SweepConfig {
        experiment: base_config(),
        layer_counts: vec![0, 1],
        dataset: DatasetSource::Synthetic(SyntheticDataset::new(2)),
        output_dir: dir.clone(),
    };
    let result = sweep(&config.experiment, &config.layer_counts, &config.dataset).unwrap();

    let path = write_summary(&config, &result).unwrap();
    assert_eq!(path, dir.join("training8_testing4.json"));

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let stored: SweepResult = serde_json::from_value(json["result"].clone()).unwrap();
    assert_eq!(stored, result);
    assert_eq!(json["config"]["experiment"]["qubit_count"], 2);
}

#[test]
fn test_config_file_overrides_defaults() {
    let dir = scratch_dir("config");
    fs::create_dir_all(&dir).unwrap();

    let missing = SweepConfig::load_or_default(dir.join("sweep.json")).unwrap();
    assert_eq!(missing, SweepConfig::default());

    let path = dir.join("sweep.json");
    fs::write(
        &path,
        r#"{
            "experiment": { "seed": 5, "qubit_count": 3, "test_evaluation": "per_epoch" },
            "layer_counts": [1, 3],
            "dataset": { "kind": "csv", "path": "data/iris.csv", "label_column": "species" }
        }"#,
    )
    .unwrap();

    let config = SweepConfig::load_or_default(&path).unwrap();
    assert_eq!(config.experiment.seed, 5);
    assert_eq!(config.experiment.qubit_count, 3);
    assert_eq!(config.layer_counts, vec![1, 3]);
    match &config.dataset {
        DatasetSource::Csv(loader) => {
            assert_eq!(loader.label_column.as_deref(), Some("species"));
            assert_eq!(loader.feature_range, (0.0, 1.0));
        }
        other => panic!("expected a CSV source, got {:?}", other),
    }

    fs::write(&path, r#"{ "layer_counts": [] }"#).unwrap();
    assert!(matches!(
        SweepConfig::load_or_default(&path),
        Err(Error::InvalidConfig(_))
    ));
}
