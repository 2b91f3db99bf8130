//! Core traits for training objectives
//!
//! An objective is a scalar function of the weight tensor with its data bound
//! at construction. Training only ever sees these traits, so a loss over the
//! training split and an accuracy over the test split look the same to it.

use ndarray::Array3;

use crate::error::Result;

/// Scalar function of the circuit weights
pub trait Objective {
    /// Evaluate at `parameters`
    fn evaluate(&self, parameters: &Array3<f64>) -> Result<f64>;
}

/// Objective that also provides its gradient
pub trait DifferentiableObjective: Objective {
    /// Value and gradient at `parameters`; the gradient has the same shape
    fn value_and_grad(&self, parameters: &Array3<f64>) -> Result<(f64, Array3<f64>)>;
}
