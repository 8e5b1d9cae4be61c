//! Model evaluation on held-out data
//!
//! The evaluator scores a trained model against a test set: it builds the
//! test×train Gram matrix with the same kernel used for training, predicts
//! every test row and compares the labels.
//!
//! ```rust
//! use ndarray::array;
//! use qksvm::api::evaluate;
//! use qksvm::data::Dataset;
//! use qksvm::gram::GramMatrix;
//! use qksvm::kernel::GaussianKernel;
//! use qksvm::{OptimizerConfig, SVMOptimizer};
//!
//! # fn main() -> qksvm::core::Result<()> {
//! let names = vec!["x".to_string()];
//! let train = Dataset::new(array![[-2.0], [-1.0], [1.0], [2.0]], array![0.0, 0.0, 1.0, 1.0], names.clone(), "y")?;
//! let test = Dataset::new(array![[-1.5], [1.5]], array![0.0, 1.0], names, "y")?;
//!
//! let kernel = GaussianKernel::default();
//! let gram = GramMatrix::compute(&kernel, train.features(), train.features())?;
//! let model = SVMOptimizer::new(OptimizerConfig::default()).train(&gram, &train.labels_vec())?;
//!
//! let evaluation = evaluate(&model, &kernel, &test, &train)?;
//! assert_eq!(evaluation.accuracy, 1.0);
//! # Ok(())
//! # }
//! ```

use crate::core::{Prediction, Result, SVMError, SVMModel};
use crate::data::Dataset;
use crate::gram::GramMatrix;
use crate::kernel::Kernel;
use crate::optimizer::TrainedSVM;
use log::info;

/// Outcome of scoring a model on a test set
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// Fraction of correctly classified test samples, in [0, 1]
    pub accuracy: f64,
    /// One prediction per test row, in test order
    pub predictions: Vec<Prediction>,
    pub metrics: EvaluationMetrics,
}

/// Score `model` on `test`
///
/// `train` must be the exact collection the model was fitted on, since the
/// Gram matrix columns are aligned with it.
pub fn evaluate<K: Kernel + ?Sized>(
    model: &TrainedSVM,
    kernel: &K,
    test: &Dataset,
    train: &Dataset,
) -> Result<Evaluation> {
    if test.is_empty() {
        return Err(SVMError::EmptyDataset);
    }

    let gram = GramMatrix::compute(kernel, test.features(), train.features())?;
    let predictions = model.predict(&gram)?;
    let labels = test.labels_vec();

    let accuracy = accuracy(&predictions, &labels)?;
    let metrics = EvaluationMetrics::from_predictions(&predictions, &labels, model.classes()[1]);

    info!(
        "Evaluated {} test samples: accuracy {:.4}, precision {:.4}, recall {:.4}, F1 {:.4}",
        labels.len(),
        accuracy,
        metrics.precision(),
        metrics.recall(),
        metrics.f1_score()
    );

    Ok(Evaluation {
        accuracy,
        predictions,
        metrics,
    })
}

/// Fraction of predictions whose label equals the true label
pub fn accuracy(predictions: &[Prediction], labels: &[f64]) -> Result<f64> {
    if predictions.len() != labels.len() {
        return Err(SVMError::DimensionMismatch {
            expected: labels.len(),
            actual: predictions.len(),
        });
    }
    if labels.is_empty() {
        return Err(SVMError::EmptyDataset);
    }

    let correct = predictions
        .iter()
        .zip(labels.iter())
        .filter(|(pred, &actual)| pred.label == actual)
        .count();

    Ok(correct as f64 / labels.len() as f64)
}

/// Detailed evaluation metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EvaluationMetrics {
    pub true_positives: usize,
    pub true_negatives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
}

impl EvaluationMetrics {
    pub fn new(tp: usize, tn: usize, fp: usize, fn_: usize) -> Self {
        Self {
            true_positives: tp,
            true_negatives: tn,
            false_positives: fp,
            false_negatives: fn_,
        }
    }

    /// Confusion counts with `positive_class` as the positive label
    pub fn from_predictions(predictions: &[Prediction], labels: &[f64], positive_class: f64) -> Self {
        let mut metrics = Self::default();

        for (pred, &actual) in predictions.iter().zip(labels.iter()) {
            match (pred.label == positive_class, actual == positive_class) {
                (true, true) => metrics.true_positives += 1,
                (false, false) => metrics.true_negatives += 1,
                (true, false) => metrics.false_positives += 1,
                (false, true) => metrics.false_negatives += 1,
            }
        }

        metrics
    }

    pub fn total(&self) -> usize {
        self.true_positives + self.true_negatives + self.false_positives + self.false_negatives
    }

    /// Calculate accuracy: (TP + TN) / (TP + TN + FP + FN)
    pub fn accuracy(&self) -> f64 {
        ratio(self.true_positives + self.true_negatives, self.total())
    }

    /// Calculate precision: TP / (TP + FP)
    pub fn precision(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_positives)
    }

    /// Calculate recall (sensitivity): TP / (TP + FN)
    pub fn recall(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_negatives)
    }

    /// Calculate F1 score: 2 * (precision * recall) / (precision + recall)
    pub fn f1_score(&self) -> f64 {
        let p = self.precision();
        let r = self.recall();
        if p + r == 0.0 {
            0.0
        } else {
            2.0 * (p * r) / (p + r)
        }
    }

    /// Calculate specificity: TN / (TN + FP)
    pub fn specificity(&self) -> f64 {
        ratio(self.true_negatives, self.true_negatives + self.false_positives)
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}
