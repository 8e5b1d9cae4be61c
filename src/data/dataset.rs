//! Dense labeled dataset

use crate::core::{Result, SVMError};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

/// Feature matrix plus one label per row
///
/// Row `i` of `features` and entry `i` of `labels` together form one sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    features: Array2<f64>,
    labels: Array1<f64>,
    feature_names: Vec<String>,
    target_name: String,
}

impl Dataset {
    /// Create a dataset, checking that rows, labels and names line up
    pub fn new(
        features: Array2<f64>,
        labels: Array1<f64>,
        feature_names: Vec<String>,
        target_name: impl Into<String>,
    ) -> Result<Self> {
        if features.nrows() != labels.len() {
            return Err(SVMError::DimensionMismatch {
                expected: features.nrows(),
                actual: labels.len(),
            });
        }
        if features.ncols() != feature_names.len() {
            return Err(SVMError::DimensionMismatch {
                expected: features.ncols(),
                actual: feature_names.len(),
            });
        }
        Ok(Self {
            features,
            labels,
            feature_names,
            target_name: target_name.into(),
        })
    }

    /// Number of samples in the dataset
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Number of features (dimensionality)
    pub fn dim(&self) -> usize {
        self.features.ncols()
    }

    pub fn features(&self) -> ArrayView2<'_, f64> {
        self.features.view()
    }

    pub fn labels(&self) -> ArrayView1<'_, f64> {
        self.labels.view()
    }

    pub fn labels_vec(&self) -> Vec<f64> {
        self.labels.to_vec()
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn target_name(&self) -> &str {
        &self.target_name
    }

    /// New dataset holding the given rows, in the given order
    pub fn select(&self, indices: &[usize]) -> Self {
        Self {
            features: self.features.select(Axis(0), indices),
            labels: self.labels.select(Axis(0), indices),
            feature_names: self.feature_names.clone(),
            target_name: self.target_name.clone(),
        }
    }

    /// Same labels and names with a replacement feature matrix
    pub fn with_features(&self, features: Array2<f64>) -> Result<Self> {
        Self::new(
            features,
            self.labels.clone(),
            self.feature_names.clone(),
            self.target_name.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn names(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("feature{i}")).collect()
    }

    #[test]
    fn test_dataset_shape() {
        let ds = Dataset::new(array![[1.0, 2.0], [3.0, 4.0]], array![0.0, 1.0], names(2), "target")
            .unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.dim(), 2);
        assert!(!ds.is_empty());
        assert_eq!(ds.target_name(), "target");
    }

    #[test]
    fn test_dataset_rejects_mismatch() {
        assert!(Dataset::new(array![[1.0, 2.0]], array![0.0, 1.0], names(2), "t").is_err());
        assert!(Dataset::new(array![[1.0, 2.0]], array![0.0], names(3), "t").is_err());
    }

    #[test]
    fn test_select_rows() {
        let ds = Dataset::new(
            array![[1.0, 1.0], [2.0, 2.0], [3.0, 3.0]],
            array![0.0, 1.0, 0.0],
            names(2),
            "target",
        )
        .unwrap();
        let picked = ds.select(&[2, 0]);
        assert_eq!(picked.features(), array![[3.0, 3.0], [1.0, 1.0]]);
        assert_eq!(picked.labels(), array![0.0, 0.0]);
    }
}
