//! Variational quantum classifier with data-bound objectives
//!
//! The classifier hands out loss and accuracy objectives that borrow one
//! feature matrix and its labels. Each exposes a pure `evaluate(weights)`.

use ndarray::{Array1, Array2, Array3};

use crate::error::{Error, Result};
use crate::machine_learning::core::{DifferentiableObjective, Objective};
use crate::machine_learning::loss::{sign_accuracy, LossFunction, MeanSquaredError};
use crate::machine_learning::quantum::model::CircuitEvaluator;

/// Binary classifier scored by the sign of ⟨Z₀⟩
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariationalQuantumClassifier {
    evaluator: CircuitEvaluator,
}

impl VariationalQuantumClassifier {
    pub fn new(qubit_count: usize, layer_count: usize) -> Result<Self> {
        Ok(VariationalQuantumClassifier {
            evaluator: CircuitEvaluator::new(qubit_count, layer_count)?,
        })
    }

    pub fn evaluator(&self) -> &CircuitEvaluator {
        &self.evaluator
    }

    /// Mean squared error against `labels`
    pub fn loss<'a>(
        &'a self,
        features: &'a Array2<f64>,
        labels: &'a Array1<f64>,
    ) -> Result<LossObjective<'a>> {
        check_rows(features, labels)?;
        Ok(LossObjective {
            evaluator: &self.evaluator,
            features,
            labels,
            loss: MeanSquaredError,
        })
    }

    /// Sign accuracy against `labels`
    pub fn accuracy<'a>(
        &'a self,
        features: &'a Array2<f64>,
        labels: &'a Array1<f64>,
    ) -> Result<AccuracyObjective<'a>> {
        check_rows(features, labels)?;
        Ok(AccuracyObjective {
            evaluator: &self.evaluator,
            features,
            labels,
        })
    }
}

fn check_rows(features: &Array2<f64>, labels: &Array1<f64>) -> Result<()> {
    if features.nrows() != labels.len() {
        return Err(Error::DimensionMismatch(format!(
            "{} samples but {} labels",
            features.nrows(),
            labels.len()
        )));
    }
    Ok(())
}

/// Mean squared error of the circuit scores on fixed data
#[derive(Debug, Clone, Copy)]
pub struct LossObjective<'a> {
    evaluator: &'a CircuitEvaluator,
    features: &'a Array2<f64>,
    labels: &'a Array1<f64>,
    loss: MeanSquaredError,
}

impl Objective for LossObjective<'_> {
    fn evaluate(&self, parameters: &Array3<f64>) -> Result<f64> {
        let predictions = self.evaluator.evaluate_batch(self.features, parameters)?;
        Ok(self.loss.calculate_loss(&predictions, self.labels))
    }
}

impl DifferentiableObjective for LossObjective<'_> {
    fn value_and_grad(&self, parameters: &Array3<f64>) -> Result<(f64, Array3<f64>)> {
        let sample_count = self.labels.len();

        // Chain rule: each score gradient is weighted by ∂loss/∂score
        let (predictions, gradient) = self.evaluator.evaluate_batch_with_weighted_gradient(
            self.features,
            parameters,
            |i, score| self.loss.sample_gradient(score, self.labels[i], sample_count),
        )?;

        let value = self.loss.calculate_loss(&predictions, self.labels);
        Ok((value, gradient))
    }
}

/// Fraction of samples classified correctly on fixed data
#[derive(Debug, Clone, Copy)]
pub struct AccuracyObjective<'a> {
    evaluator: &'a CircuitEvaluator,
    features: &'a Array2<f64>,
    labels: &'a Array1<f64>,
}

impl Objective for AccuracyObjective<'_> {
    fn evaluate(&self, parameters: &Array3<f64>) -> Result<f64> {
        let predictions = self.evaluator.evaluate_batch(self.features, parameters)?;
        Ok(sign_accuracy(&predictions, self.labels))
    }
}
