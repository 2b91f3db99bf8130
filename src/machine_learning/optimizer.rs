//! Optimization algorithms for the circuit weights
//!
//! Optimizers are stateless rules. Their state is a separate value created by
//! [`Optimizer::init`] and threaded through [`Optimizer::update`], which
//! consumes the previous state and returns the next one; nothing else touches
//! it.

use ndarray::{Array3, Zip};
use serde::{Deserialize, Serialize};

/// Trait for first-order optimization algorithms
pub trait Optimizer {
    /// Opaque state carried between steps
    type State: Clone;

    /// Build the initial state around `parameters`
    fn init(&self, parameters: Array3<f64>) -> Self::State;

    /// Apply step `step` (zero-based) with `gradients`
    fn update(&self, step: usize, gradients: &Array3<f64>, state: Self::State) -> Self::State;

    /// Current parameters held by `state`
    fn params<'a>(&self, state: &'a Self::State) -> &'a Array3<f64>;
}

/// Gradient Descent optimizer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientDescent {
    learning_rate: f64,
}

impl GradientDescent {
    /// Creates a new Gradient Descent optimizer
    pub fn new(learning_rate: f64) -> Self {
        GradientDescent { learning_rate }
    }
}

impl Optimizer for GradientDescent {
    type State = Array3<f64>;

    fn init(&self, parameters: Array3<f64>) -> Self::State {
        parameters
    }

    fn update(&self, _step: usize, gradients: &Array3<f64>, mut state: Self::State) -> Self::State {
        state.scaled_add(-self.learning_rate, gradients);
        state
    }

    fn params<'a>(&self, state: &'a Self::State) -> &'a Array3<f64> {
        state
    }
}

/// Adaptive Moment Estimation (Adam) optimizer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Adam {
    learning_rate: f64,
    beta1: f64,
    beta2: f64,
    epsilon: f64,
}

/// Parameters plus first and second moment estimates
#[derive(Debug, Clone, PartialEq)]
pub struct AdamState {
    parameters: Array3<f64>,
    m: Array3<f64>,
    v: Array3<f64>,
}

impl Adam {
    /// Creates a new Adam optimizer
    pub fn new(learning_rate: f64, beta1: f64, beta2: f64, epsilon: f64) -> Self {
        Adam {
            learning_rate,
            beta1,
            beta2,
            epsilon,
        }
    }

    /// Adam with β₁ = 0.9, β₂ = 0.999, ε = 1e-8
    pub fn with_learning_rate(learning_rate: f64) -> Self {
        Adam::new(learning_rate, 0.9, 0.999, 1e-8)
    }
}

impl Default for Adam {
    fn default() -> Self {
        Adam::with_learning_rate(0.001)
    }
}

impl Optimizer for Adam {
    type State = AdamState;

    fn init(&self, parameters: Array3<f64>) -> Self::State {
        let shape = parameters.raw_dim();
        AdamState {
            parameters,
            m: Array3::zeros(shape.clone()),
            v: Array3::zeros(shape),
        }
    }

    fn update(&self, step: usize, gradients: &Array3<f64>, state: Self::State) -> Self::State {
        let AdamState {
            mut parameters,
            mut m,
            mut v,
        } = state;

        // 1-based step count; powf keeps every usize step in range
        let t = step as f64 + 1.0;
        let bias1 = 1.0 - self.beta1.powf(t);
        let bias2 = 1.0 - self.beta2.powf(t);

        Zip::from(&mut parameters)
            .and(&mut m)
            .and(&mut v)
            .and(gradients)
            .for_each(|x, m, v, &g| {
                // Update biased first moment estimate
                *m = (1.0 - self.beta1) * g + self.beta1 * *m;

                // Update biased second raw moment estimate
                *v = (1.0 - self.beta2) * g * g + self.beta2 * *v;

                let m_hat = *m / bias1;
                let v_hat = *v / bias2;

                *x -= self.learning_rate * m_hat / (v_hat.sqrt() + self.epsilon);
            });

        AdamState { parameters, m, v }
    }

    fn params<'a>(&self, state: &'a Self::State) -> &'a Array3<f64> {
        &state.parameters
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adam_first_step_moves_by_learning_rate() {
        // With bias correction the first step is lr * g / (|g| + eps) ≈ lr * sign(g)
        let adam = Adam::with_learning_rate(0.1);
        let state = adam.init(Array3::from_elem((1, 1, 3), 1.0));
        let grads = Array3::from_shape_vec((1, 1, 3), vec![2.0, -0.5, 0.0]).unwrap();
        let state = adam.update(0, &grads, state);
        let p = adam.params(&state);

        assert!((p[[0, 0, 0]] - 0.9).abs() < 1e-6);
        assert!((p[[0, 0, 1]] - 1.1).abs() < 1e-6);
        assert_eq!(p[[0, 0, 2]], 1.0);
    }

    #[test]
    fn test_adam_late_step_has_no_bias_correction() {
        // Far past i32::MAX both corrections are 1, so the first moments give
        // a step of lr * (1 - β₁) / sqrt(1 - β₂)
        let adam = Adam::with_learning_rate(0.01);
        let grads = Array3::from_elem((1, 1, 2), 1.0);
        let expected = -0.01 * 0.1 / (0.001_f64.sqrt() + 1e-8);

        for step in [i32::MAX as usize + 1, usize::MAX] {
            let state = adam.update(step, &grads, adam.init(Array3::zeros((1, 1, 2))));
            for &x in adam.params(&state).iter() {
                assert!(x.is_finite());
                assert!((x - expected).abs() < 1e-9, "step {}: {}", step, x);
            }
        }
    }

    #[test]
    fn test_gradient_descent_step() {
        let sgd = GradientDescent::new(0.5);
        let state = sgd.init(Array3::zeros((2, 1, 3)));
        let grads = Array3::from_elem((2, 1, 3), 2.0);
        let state = sgd.update(0, &grads, state);
        assert!(sgd.params(&state).iter().all(|&x| x == -1.0));
    }
}
