//! Training on precomputed kernels
//!
//! This module turns a train×train Gram matrix plus labels in any binary
//! coding (0/1, -1/+1, ...) into a [`TrainedSVM`] that scores new samples from
//! their kernel values against the training collection.

use crate::core::{OptimizationResult, OptimizerConfig, Result, SVMError, SVMModel};
use crate::gram::GramMatrix;
use crate::solver::SMOSolver;
use log::info;

/// High-level SVM optimizer that maps labels, runs the solver and packages
/// the result as a model
pub struct SVMOptimizer {
    config: OptimizerConfig,
}

impl SVMOptimizer {
    /// Create a new SVM optimizer with the given configuration
    pub fn new(config: OptimizerConfig) -> Self {
        Self { config }
    }

    /// Fit on a square Gram matrix and one label per row
    ///
    /// Exactly two distinct label values must be present. The lower value
    /// becomes the negative class and the higher one the positive class.
    pub fn train(&self, gram: &GramMatrix, labels: &[f64]) -> Result<TrainedSVM> {
        if !gram.is_square() {
            return Err(SVMError::DimensionMismatch {
                expected: gram.nrows(),
                actual: gram.ncols(),
            });
        }
        if labels.len() != gram.nrows() {
            return Err(SVMError::DimensionMismatch {
                expected: gram.nrows(),
                actual: labels.len(),
            });
        }
        if labels.is_empty() {
            return Err(SVMError::EmptyDataset);
        }

        let classes = binary_classes(labels)?;
        let y: Vec<f64> = labels
            .iter()
            .map(|&label| if label == classes[1] { 1.0 } else { -1.0 })
            .collect();

        let solver = SMOSolver::new(self.config.clone());
        let result = solver.solve(gram, &y)?;

        info!(
            "Training finished after {} iterations with {} support vectors",
            result.iterations,
            result.support_vectors.len()
        );

        Ok(TrainedSVM::new(result, &y, classes))
    }

    /// Get the optimizer configuration
    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }
}

/// The two class values of `labels`, sorted ascending
fn binary_classes(labels: &[f64]) -> Result<[f64; 2]> {
    if let Some(bad) = labels.iter().find(|label| !label.is_finite()) {
        return Err(SVMError::InvalidLabel(format!("non-finite label {bad}")));
    }

    let mut classes: Vec<f64> = labels.to_vec();
    classes.sort_by(f64::total_cmp);
    classes.dedup();

    match classes.as_slice() {
        [negative, positive] => Ok([*negative, *positive]),
        [only] => Err(SVMError::InvalidDataset(format!(
            "training labels contain a single class ({only}); two are required"
        ))),
        many => Err(SVMError::InvalidLabel(format!(
            "binary classification requires two classes, found {}",
            many.len()
        ))),
    }
}

/// A trained SVM model that can make predictions from kernel values
#[derive(Debug, Clone)]
pub struct TrainedSVM {
    support_indices: Vec<usize>,
    dual_coef: Vec<f64>,
    bias: f64,
    classes: [f64; 2],
    n_train: usize,
    iterations: usize,
    converged: bool,
}

impl TrainedSVM {
    /// Create a new trained SVM model
    pub(crate) fn new(result: OptimizationResult, y: &[f64], classes: [f64; 2]) -> Self {
        let dual_coef = result
            .support_vectors
            .iter()
            .map(|&i| result.alpha[i] * y[i])
            .collect();

        Self {
            support_indices: result.support_vectors,
            dual_coef,
            bias: result.b,
            classes,
            n_train: y.len(),
            iterations: result.iterations,
            converged: result.converged,
        }
    }

    /// αᵢyᵢ for each support vector, in the order of `support_vector_indices`
    pub fn dual_coefficients(&self) -> &[f64] {
        &self.dual_coef
    }

    /// The (negative, positive) class values
    pub fn classes(&self) -> [f64; 2] {
        self.classes
    }

    /// Number of training samples the model was fitted on
    pub fn n_train(&self) -> usize {
        self.n_train
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// False when the solver stopped at the iteration cap
    pub fn converged(&self) -> bool {
        self.converged
    }
}

impl SVMModel for TrainedSVM {
    fn decision_function(&self, gram: &GramMatrix) -> Result<Vec<f64>> {
        if gram.ncols() != self.n_train {
            return Err(SVMError::DimensionMismatch {
                expected: self.n_train,
                actual: gram.ncols(),
            });
        }

        Ok((0..gram.nrows())
            .map(|row| {
                self.support_indices
                    .iter()
                    .zip(self.dual_coef.iter())
                    .map(|(&sv, &coef)| coef * gram.get(row, sv))
                    .sum::<f64>()
                    + self.bias
            })
            .collect())
    }

    fn label_for(&self, decision_value: f64) -> f64 {
        if decision_value > 0.0 {
            self.classes[1]
        } else {
            self.classes[0]
        }
    }

    fn support_vector_indices(&self) -> &[usize] {
        &self.support_indices
    }

    fn bias(&self) -> f64 {
        self.bias
    }
}
