//! Full-batch training of the variational classifier
//!
//! One call to [`run`] trains a freshly initialized classifier for
//! `epoch_count` epochs. Each epoch computes the loss and its gradient on the
//! whole training split, the training accuracy with the same (pre-update)
//! weights, and then applies one optimizer step.

use ndarray::Array1;
use tracing::{debug, info, info_span, warn};

use crate::config::{ExperimentConfig, OptimizerKind, TestEvaluation};
use crate::error::{Error, Result};
use crate::machine_learning::core::{DifferentiableObjective, Objective};
use crate::machine_learning::dataset::DatasetLoader;
use crate::machine_learning::optimizer::{Adam, GradientDescent, Optimizer};
use crate::machine_learning::quantum::VariationalQuantumClassifier;

/// Per-epoch metrics of one training run
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingHistory {
    pub train_loss: Array1<f64>,
    pub train_accuracy: Array1<f64>,
    pub test_loss: Array1<f64>,
    pub test_accuracy: Array1<f64>,
    /// `linspace(0, epoch_count, epoch_count)`
    pub epochs: Array1<f64>,
}

impl TrainingHistory {
    /// Number of recorded epochs
    pub fn len(&self) -> usize {
        self.train_loss.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Training accuracy of the last epoch
    pub fn final_train_accuracy(&self) -> Result<f64> {
        self.train_accuracy.iter().last().copied().ok_or(Error::EmptyHistory)
    }

    /// Test accuracy of the last epoch
    pub fn final_test_accuracy(&self) -> Result<f64> {
        self.test_accuracy.iter().last().copied().ok_or(Error::EmptyHistory)
    }
}

/// Train with the optimizer named in `config`
pub fn run<L: DatasetLoader + ?Sized>(
    config: &ExperimentConfig,
    loader: &L,
) -> Result<TrainingHistory> {
    match config.optimizer {
        OptimizerKind::Adam => {
            run_with_optimizer(config, loader, &Adam::with_learning_rate(config.learning_rate))
        }
        OptimizerKind::GradientDescent => {
            run_with_optimizer(config, loader, &GradientDescent::new(config.learning_rate))
        }
    }
}

/// Train with an explicit optimizer; `config.optimizer` is ignored
pub fn run_with_optimizer<L, O>(
    config: &ExperimentConfig,
    loader: &L,
    optimizer: &O,
) -> Result<TrainingHistory>
where
    L: DatasetLoader + ?Sized,
    O: Optimizer,
{
    config.validate()?;

    let span = info_span!(
        "training",
        layers = config.layer_count,
        qubits = config.qubit_count
    );
    let _guard = span.enter();

    info!(
        epochs = config.epoch_count,
        train_size = config.train_size,
        test_size = config.test_size,
        seed = config.seed,
        "starting training run"
    );

    let data = loader.load(config.train_size, config.test_size, config.seed)?;
    if data.feature_count() > config.qubit_count {
        return Err(Error::DimensionMismatch(format!(
            "{} features cannot be embedded into {} qubits",
            data.feature_count(),
            config.qubit_count
        )));
    }

    let classifier = VariationalQuantumClassifier::new(config.qubit_count, config.layer_count)?;
    let train_loss_fn = classifier.loss(&data.train_features, &data.train_labels)?;
    let train_accuracy_fn = classifier.accuracy(&data.train_features, &data.train_labels)?;
    let test_loss_fn = classifier.loss(&data.test_features, &data.test_labels)?;
    let test_accuracy_fn = classifier.accuracy(&data.test_features, &data.test_labels)?;

    let epoch_count = config.epoch_count;
    let mut train_loss = Array1::<f64>::zeros(epoch_count);
    let mut train_accuracy = Array1::<f64>::zeros(epoch_count);
    let mut test_loss = Array1::<f64>::zeros(epoch_count);
    let mut test_accuracy = Array1::<f64>::zeros(epoch_count);

    let mut state = optimizer.init(classifier.evaluator().init_weights(config.seed));

    for epoch in 0..epoch_count {
        let weights = optimizer.params(&state);
        let (loss, gradient) = train_loss_fn.value_and_grad(weights)?;
        let accuracy = train_accuracy_fn.evaluate(weights)?;

        if config.test_evaluation == TestEvaluation::PerEpoch {
            test_loss[epoch] = test_loss_fn.evaluate(weights)?;
            test_accuracy[epoch] = test_accuracy_fn.evaluate(weights)?;
        }

        state = optimizer.update(epoch, &gradient, state);

        train_loss[epoch] = loss;
        train_accuracy[epoch] = accuracy;

        if !loss.is_finite() {
            warn!(epoch, loss, "training loss is not finite");
        }
        debug!(epoch, loss, accuracy, "epoch finished");
        if config.log_every > 0 && (epoch + 1) % config.log_every == 0 {
            info!(epoch = epoch + 1, loss, accuracy, "training progress");
        }
    }

    if config.test_evaluation == TestEvaluation::FinalParameters && epoch_count > 0 {
        // Same weights at every index, so one evaluation fills the whole curve
        let weights = optimizer.params(&state);
        test_loss.fill(test_loss_fn.evaluate(weights)?);
        test_accuracy.fill(test_accuracy_fn.evaluate(weights)?);
    }

    let history = TrainingHistory {
        train_loss,
        train_accuracy,
        test_loss,
        test_accuracy,
        epochs: Array1::linspace(0.0, epoch_count as f64, epoch_count),
    };

    if let (Ok(train), Ok(test)) = (history.final_train_accuracy(), history.final_test_accuracy()) {
        info!(train_accuracy = train, test_accuracy = test, "training run finished");
    }

    Ok(history)
}
