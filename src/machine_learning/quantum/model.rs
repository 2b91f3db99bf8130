//! Circuit evaluator: the classifier score of one sample
//!
//! The score is ⟨Z⟩ on wire 0 after angle-embedding the features and applying
//! `layer_count` strongly-entangling layers. Batched evaluation runs samples
//! in parallel and returns them in input order.

use std::f64::consts::PI;

use ndarray::{Array1, Array2, Array3, ArrayView1};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::quantum::circuit::{CircuitBuilder, QuantumCircuit};
use crate::quantum::differentiation::{
    adjoint_gradient, expectation_pauli_z, parameter_shift_gradient,
};
use crate::quantum::state::MAX_QUBITS;

/// Wire whose Pauli-Z expectation is the classifier score
pub const OBSERVABLE_QUBIT: usize = 0;

/// Samples one parallel task folds in order when reducing gradients
pub const GRADIENT_CHUNK: usize = 256;

/// Builds and evaluates the classifier circuit for given weights
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CircuitEvaluator {
    qubit_count: usize,
    layer_count: usize,
}

impl CircuitEvaluator {
    pub fn new(qubit_count: usize, layer_count: usize) -> Result<Self> {
        if qubit_count == 0 {
            return Err(Error::InvalidConfig(
                "the classifier needs at least one qubit".to_string(),
            ));
        }
        if qubit_count > MAX_QUBITS {
            return Err(Error::InvalidConfig(format!(
                "the classifier supports at most {} qubits, got {}",
                MAX_QUBITS, qubit_count
            )));
        }

        Ok(CircuitEvaluator {
            qubit_count,
            layer_count,
        })
    }

    pub fn qubit_count(&self) -> usize {
        self.qubit_count
    }

    pub fn layer_count(&self) -> usize {
        self.layer_count
    }

    /// Shape of the weight tensor, `(layers, qubits, 3)`
    pub fn weight_shape(&self) -> (usize, usize, usize) {
        (self.layer_count, self.qubit_count, 3)
    }

    pub fn parameter_count(&self) -> usize {
        self.layer_count * self.qubit_count * 3
    }

    /// Weights drawn uniformly from `[0, π)` with a seeded generator
    pub fn init_weights(&self, seed: u64) -> Array3<f64> {
        let mut rng = StdRng::seed_from_u64(seed);
        Array3::from_shape_fn(self.weight_shape(), |_| rng.gen::<f64>() * PI)
    }

    fn check_weights(&self, weights: &Array3<f64>) -> Result<()> {
        if weights.dim() != self.weight_shape() {
            return Err(Error::DimensionMismatch(format!(
                "expected weights of shape {:?}, got {:?}",
                self.weight_shape(),
                weights.dim()
            )));
        }
        Ok(())
    }

    /// The full circuit for one sample
    pub fn circuit(&self, features: ArrayView1<f64>, weights: &Array3<f64>) -> Result<QuantumCircuit> {
        self.check_weights(weights)?;

        let mut builder = CircuitBuilder::new(self.qubit_count);
        builder
            .angle_embedding(features)?
            .strongly_entangling_layers(weights)?;
        Ok(builder.build())
    }

    /// Classifier score of one sample
    pub fn evaluate(&self, features: ArrayView1<f64>, weights: &Array3<f64>) -> Result<f64> {
        let circuit = self.circuit(features, weights)?;
        expectation_pauli_z(&circuit, OBSERVABLE_QUBIT)
    }

    /// Score and its gradient with respect to the weights
    pub fn evaluate_with_gradient(
        &self,
        features: ArrayView1<f64>,
        weights: &Array3<f64>,
    ) -> Result<(f64, Array3<f64>)> {
        let circuit = self.circuit(features, weights)?;
        let (value, gradient) = adjoint_gradient(&circuit, OBSERVABLE_QUBIT, self.parameter_count())?;
        Ok((value, self.reshape(gradient)?))
    }

    /// Weight gradient by the parameter-shift rule
    pub fn parameter_shift_gradient(
        &self,
        features: ArrayView1<f64>,
        weights: &Array3<f64>,
    ) -> Result<Array3<f64>> {
        let circuit = self.circuit(features, weights)?;
        let gradient = parameter_shift_gradient(&circuit, OBSERVABLE_QUBIT, self.parameter_count())?;
        self.reshape(gradient)
    }

    fn reshape(&self, flat: Vec<f64>) -> Result<Array3<f64>> {
        Array3::from_shape_vec(self.weight_shape(), flat)
            .map_err(|e| Error::DimensionMismatch(e.to_string()))
    }

    /// Scores for every row of `features`
    pub fn evaluate_batch(&self, features: &Array2<f64>, weights: &Array3<f64>) -> Result<Array1<f64>> {
        let scores = (0..features.nrows())
            .into_par_iter()
            .map(|i| self.evaluate(features.row(i), weights))
            .collect::<Result<Vec<f64>>>()?;
        Ok(Array1::from_vec(scores))
    }

    /// Scores for every row and the weighted gradient sum
    /// `Σ_i coefficient(i, score_i) · ∇score_i`.
    ///
    /// Rows are cut into chunks of [`GRADIENT_CHUNK`]. Each chunk is folded in
    /// row order and the chunk sums are added in order, so the result is the
    /// same for any thread count and only one gradient per chunk is alive.
    pub fn evaluate_batch_with_weighted_gradient<F>(
        &self,
        features: &Array2<f64>,
        weights: &Array3<f64>,
        coefficient: F,
    ) -> Result<(Array1<f64>, Array3<f64>)>
    where
        F: Fn(usize, f64) -> f64 + Sync,
    {
        self.check_weights(weights)?;

        let rows = features.nrows();
        let chunk_count = (rows + GRADIENT_CHUNK - 1) / GRADIENT_CHUNK;

        let partials = (0..chunk_count)
            .into_par_iter()
            .map(|chunk| {
                let start = chunk * GRADIENT_CHUNK;
                let end = (start + GRADIENT_CHUNK).min(rows);

                let mut scores = Vec::with_capacity(end - start);
                let mut gradient = Array3::<f64>::zeros(weights.raw_dim());
                for i in start..end {
                    let (score, score_grad) = self.evaluate_with_gradient(features.row(i), weights)?;
                    gradient.scaled_add(coefficient(i, score), &score_grad);
                    scores.push(score);
                }
                Ok((scores, gradient))
            })
            .collect::<Result<Vec<(Vec<f64>, Array3<f64>)>>>()?;

        let mut scores = Vec::with_capacity(rows);
        let mut gradient = Array3::<f64>::zeros(weights.raw_dim());
        for (chunk_scores, chunk_gradient) in partials {
            scores.extend(chunk_scores);
            gradient += &chunk_gradient;
        }

        Ok((Array1::from_vec(scores), gradient))
    }
}
