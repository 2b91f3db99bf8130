//! Dataset loading for the binary classifier
//!
//! A loader produces a [`DatasetSplit`] of the requested sizes from a seed.
//! Labels are always signed (`+1` / `-1`) so that they can be compared with
//! the sign of the circuit output.

use std::f64::consts::PI;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use ndarray::{s, Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Train and test features with signed labels
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetSplit {
    pub train_features: Array2<f64>,
    pub train_labels: Array1<f64>,
    pub test_features: Array2<f64>,
    pub test_labels: Array1<f64>,
}

impl DatasetSplit {
    /// Create a split, checking that features and labels line up
    pub fn new(
        train_features: Array2<f64>,
        train_labels: Array1<f64>,
        test_features: Array2<f64>,
        test_labels: Array1<f64>,
    ) -> Result<Self> {
        if train_features.nrows() != train_labels.len() {
            return Err(Error::DimensionMismatch(format!(
                "{} training rows but {} training labels",
                train_features.nrows(),
                train_labels.len()
            )));
        }

        if test_features.nrows() != test_labels.len() {
            return Err(Error::DimensionMismatch(format!(
                "{} test rows but {} test labels",
                test_features.nrows(),
                test_labels.len()
            )));
        }

        if train_features.ncols() != test_features.ncols() {
            return Err(Error::DimensionMismatch(format!(
                "training data has {} features, test data has {}",
                train_features.ncols(),
                test_features.ncols()
            )));
        }

        Ok(DatasetSplit {
            train_features,
            train_labels,
            test_features,
            test_labels,
        })
    }

    /// Number of features per sample
    pub fn feature_count(&self) -> usize {
        self.train_features.ncols()
    }
}

/// Source of train/test splits
pub trait DatasetLoader {
    /// Load `train_size` training and `test_size` test samples using `seed`
    fn load(&self, train_size: usize, test_size: usize, seed: u64) -> Result<DatasetSplit>;
}

/// Map any label onto ±1 by sign: positive values become `+1`, everything
/// else `-1`, so `{0, 1}` labels turn into `{-1, +1}`.
pub fn signed_label(value: f64) -> f64 {
    if value > 0.0 {
        1.0
    } else {
        -1.0
    }
}

/// Scale each column linearly into `[low, high]`.
///
/// Constant columns are set to `low`.
pub fn normalize_min_max(features: &mut Array2<f64>, low: f64, high: f64) {
    for mut column in features.axis_iter_mut(Axis(1)) {
        let min_val = column.fold(f64::INFINITY, |a, &b| a.min(b));
        let max_val = column.fold(f64::NEG_INFINITY, |a, &b| a.max(b));

        let range = max_val - min_val;
        if range > 1e-10 {
            column.mapv_inplace(|x| low + (x - min_val) / range * (high - low));
        } else {
            column.fill(low);
        }
    }
}

/// Shuffle row order with `seed` and cut the first `train_size` rows for
/// training and the next `test_size` rows for testing.
fn seeded_split(
    features: &Array2<f64>,
    labels: &Array1<f64>,
    train_size: usize,
    test_size: usize,
    seed: u64,
) -> Result<DatasetSplit> {
    let available = features.nrows();
    if train_size + test_size > available {
        return Err(Error::Dataset(format!(
            "requested {} training and {} test samples, but only {} are available",
            train_size, test_size, available
        )));
    }

    let mut indices: Vec<usize> = (0..available).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let train_idx = &indices[..train_size];
    let test_idx = &indices[train_size..train_size + test_size];

    DatasetSplit::new(
        features.select(Axis(0), train_idx),
        labels.select(Axis(0), train_idx),
        features.select(Axis(0), test_idx),
        labels.select(Axis(0), test_idx),
    )
}

/// Loads a headed CSV file with one label column and numeric features
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsvDatasetLoader {
    /// Path of the CSV file
    pub path: PathBuf,
    /// Header name of the label column; the last column when `None`
    #[serde(default)]
    pub label_column: Option<String>,
    /// Target range of min-max feature scaling
    #[serde(default = "default_feature_range")]
    pub feature_range: (f64, f64),
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

fn default_feature_range() -> (f64, f64) {
    (0.0, 1.0)
}

fn default_delimiter() -> char {
    ','
}

impl CsvDatasetLoader {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        CsvDatasetLoader {
            path: path.as_ref().to_path_buf(),
            label_column: None,
            feature_range: default_feature_range(),
            delimiter: default_delimiter(),
        }
    }

    pub fn with_label_column(mut self, name: impl Into<String>) -> Self {
        self.label_column = Some(name.into());
        self
    }

    pub fn with_feature_range(mut self, low: f64, high: f64) -> Self {
        self.feature_range = (low, high);
        self
    }

    /// Read every row; features are scaled, labels are signed
    pub fn read_all(&self) -> Result<(Array2<f64>, Array1<f64>)> {
        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        let mut lines = reader.lines();

        let header = match lines.next() {
            Some(line) => line?,
            None => {
                return Err(Error::Dataset(format!(
                    "{} is empty",
                    self.path.display()
                )))
            }
        };
        let columns: Vec<&str> = header.split(self.delimiter).map(str::trim).collect();

        let label_index = match &self.label_column {
            Some(name) => columns.iter().position(|c| *c == name.as_str()).ok_or_else(|| {
                Error::Dataset(format!(
                    "label column '{}' not found in {}",
                    name,
                    self.path.display()
                ))
            })?,
            None => columns.len().saturating_sub(1),
        };

        if columns.len() < 2 {
            return Err(Error::Dataset(format!(
                "{} needs at least one feature column and one label column",
                self.path.display()
            )));
        }

        let feature_count = columns.len() - 1;
        let mut feature_data = Vec::new();
        let mut label_data = Vec::new();

        for (row, line) in lines.enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let values: Vec<&str> = line.split(self.delimiter).map(str::trim).collect();
            if values.len() != columns.len() {
                return Err(Error::Dataset(format!(
                    "row {} has {} fields, header has {}",
                    row + 2,
                    values.len(),
                    columns.len()
                )));
            }

            for (col, value) in values.iter().enumerate() {
                let value = value.parse::<f64>()?;
                if col == label_index {
                    label_data.push(signed_label(value));
                } else {
                    feature_data.push(value);
                }
            }
        }

        let n_samples = label_data.len();
        let mut features = Array2::from_shape_vec((n_samples, feature_count), feature_data)
            .map_err(|e| Error::DimensionMismatch(e.to_string()))?;
        normalize_min_max(&mut features, self.feature_range.0, self.feature_range.1);

        debug!(
            path = %self.path.display(),
            samples = n_samples,
            features = feature_count,
            "read dataset"
        );

        Ok((features, Array1::from_vec(label_data)))
    }
}

impl DatasetLoader for CsvDatasetLoader {
    fn load(&self, train_size: usize, test_size: usize, seed: u64) -> Result<DatasetSplit> {
        let (features, labels) = self.read_all()?;
        seeded_split(&features, &labels, train_size, test_size, seed)
    }
}

/// Seeded synthetic data with a linear decision boundary.
///
/// Features are uniform in `[0, π)`; the label is `+1` when the feature sum
/// is below `feature_count · π / 2` and `-1` otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SyntheticDataset {
    pub feature_count: usize,
}

impl SyntheticDataset {
    pub fn new(feature_count: usize) -> Self {
        SyntheticDataset { feature_count }
    }
}

impl DatasetLoader for SyntheticDataset {
    fn load(&self, train_size: usize, test_size: usize, seed: u64) -> Result<DatasetSplit> {
        let n_samples = train_size + test_size;
        let mut rng = StdRng::seed_from_u64(seed);

        let features =
            Array2::from_shape_fn((n_samples, self.feature_count), |_| rng.gen::<f64>() * PI);
        let threshold = self.feature_count as f64 * PI / 2.0;
        let labels = features.map_axis(Axis(1), |row| {
            if row.sum() < threshold {
                1.0
            } else {
                -1.0
            }
        });

        DatasetSplit::new(
            features.slice(s![..train_size, ..]).to_owned(),
            labels.slice(s![..train_size]).to_owned(),
            features.slice(s![train_size.., ..]).to_owned(),
            labels.slice(s![train_size..]).to_owned(),
        )
    }
}
