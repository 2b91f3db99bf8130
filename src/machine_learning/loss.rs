//! Loss functions and metrics for the classifier

use ndarray::{Array1, Zip};

/// Trait for loss functions
pub trait LossFunction {
    /// Calculate the loss between predictions and targets
    fn calculate_loss(&self, predictions: &Array1<f64>, targets: &Array1<f64>) -> f64;

    /// Derivative of the loss with respect to one of `sample_count` predictions
    fn sample_gradient(&self, prediction: f64, target: f64, sample_count: usize) -> f64;

    /// Calculate gradients of the loss with respect to predictions
    fn calculate_gradients(&self, predictions: &Array1<f64>, targets: &Array1<f64>) -> Array1<f64> {
        let sample_count = predictions.len();
        Zip::from(predictions)
            .and(targets)
            .map_collect(|&p, &t| self.sample_gradient(p, t, sample_count))
    }
}

/// Mean Squared Error loss
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanSquaredError;

impl LossFunction for MeanSquaredError {
    fn calculate_loss(&self, predictions: &Array1<f64>, targets: &Array1<f64>) -> f64 {
        let diff = predictions - targets;
        let squared_diff = diff.mapv(|x| x * x);
        squared_diff.sum() / predictions.len() as f64
    }

    fn sample_gradient(&self, prediction: f64, target: f64, sample_count: usize) -> f64 {
        2.0 * (prediction - target) / sample_count as f64
    }
}

/// Sign with `sign(0) = 0` and `sign(NaN) = NaN`.
///
/// `f64::signum` maps zero to one, which would count a score of exactly zero
/// as a positive prediction.
pub fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        // 0.0, -0.0 and NaN pass through unchanged
        x * 0.0
    }
}

/// Fraction of samples whose prediction sign equals the signed label
pub fn sign_accuracy(predictions: &Array1<f64>, targets: &Array1<f64>) -> f64 {
    let hits = predictions
        .iter()
        .zip(targets.iter())
        .filter(|(p, t)| sign(**p) == **t)
        .count();

    hits as f64 / predictions.len() as f64
}
