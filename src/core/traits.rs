//! Core traits for SVM implementation

use crate::core::{Prediction, Result};
use crate::gram::GramMatrix;

/// Trained classifier operating on precomputed kernel values
///
/// Every method takes a Gram matrix whose rows are the samples to score and
/// whose columns are aligned with the full training collection.
pub trait SVMModel {
    /// Signed decision score for each row of `gram`
    fn decision_function(&self, gram: &GramMatrix) -> Result<Vec<f64>>;

    /// Map a decision score to a class label
    fn label_for(&self, decision_value: f64) -> f64;

    /// Predict every row of `gram`
    fn predict(&self, gram: &GramMatrix) -> Result<Vec<Prediction>> {
        Ok(self
            .decision_function(gram)?
            .into_iter()
            .map(|value| Prediction::new(self.label_for(value), value))
            .collect())
    }

    /// Indices of support vectors in the training collection
    fn support_vector_indices(&self) -> &[usize];

    /// Get the number of support vectors
    fn n_support_vectors(&self) -> usize {
        self.support_vector_indices().len()
    }

    /// Get the bias term
    fn bias(&self) -> f64;
}
