//! Utility functions for preprocessing and dataset inspection

use crate::core::{Result, SVMError};
use ndarray::{Array1, Array2, ArrayView2, Axis};

/// Feature scaling utilities
pub mod scaling {
    use super::*;

    /// Standard (Z-score) normalization: (x - mean) / std
    ///
    /// Statistics are the per-column mean and population standard deviation
    /// of the data passed to [`StandardScaler::fit`]. A constant column gets
    /// scale 1, so it is only centered.
    #[derive(Debug, Clone, PartialEq)]
    pub struct StandardScaler {
        means: Array1<f64>,
        scales: Array1<f64>,
    }

    impl StandardScaler {
        /// Compute scaling parameters from training data
        pub fn fit(features: ArrayView2<f64>) -> Result<Self> {
            if features.nrows() == 0 {
                return Err(SVMError::EmptyDataset);
            }

            let means = features
                .mean_axis(Axis(0))
                .ok_or(SVMError::EmptyDataset)?;
            let scales = features.std_axis(Axis(0), 0.0).mapv(|std| {
                if std < 1e-12 {
                    // Constant feature
                    1.0
                } else {
                    std
                }
            });

            Ok(Self { means, scales })
        }

        /// Transform rows using fitted parameters
        pub fn transform(&self, features: ArrayView2<f64>) -> Result<Array2<f64>> {
            if features.ncols() != self.means.len() {
                return Err(SVMError::DimensionMismatch {
                    expected: self.means.len(),
                    actual: features.ncols(),
                });
            }
            Ok((&features - &self.means) / &self.scales)
        }

        /// Convenience function: fit and transform in one step
        pub fn fit_transform(features: ArrayView2<f64>) -> Result<(Array2<f64>, Self)> {
            let scaler = Self::fit(features)?;
            let transformed = scaler.transform(features)?;
            Ok((transformed, scaler))
        }

        pub fn means(&self) -> &Array1<f64> {
            &self.means
        }

        /// Per-feature divisor (population std, or 1 for constant features)
        pub fn scales(&self) -> &Array1<f64> {
            &self.scales
        }
    }
}

/// Statistical utilities for datasets
pub mod stats {
    /// Count samples per class value, sorted by class
    pub fn class_counts(labels: &[f64]) -> Vec<(f64, usize)> {
        let mut sorted = labels.to_vec();
        sorted.sort_by(f64::total_cmp);

        let mut counts: Vec<(f64, usize)> = Vec::new();
        for label in sorted {
            match counts.last_mut() {
                Some((class, count)) if *class == label => *count += 1,
                _ => counts.push((label, 1)),
            }
        }
        counts
    }

    /// Per-column (min, max) over rows, or `None` for an empty matrix
    pub fn column_ranges(features: ndarray::ArrayView2<f64>) -> Option<Vec<(f64, f64)>> {
        if features.nrows() == 0 {
            return None;
        }
        Some(
            features
                .columns()
                .into_iter()
                .map(|column| {
                    column
                        .iter()
                        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                            (lo.min(v), hi.max(v))
                        })
                })
                .collect(),
        )
    }
}
