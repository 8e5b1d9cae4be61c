//! Kernel trait definition

use crate::core::{Result, SVMError};
use ndarray::ArrayView1;

/// Kernel function trait
///
/// A kernel maps two feature vectors of equal length to a similarity score.
/// Implementations are expected to be symmetric, K(x, y) == K(y, x), but
/// nothing here enforces positive semi-definiteness: the solver relies on
/// the kernel being valid.
pub trait Kernel {
    /// Compute kernel value K(x, y)
    fn compute(&self, x: ArrayView1<f64>, y: ArrayView1<f64>) -> Result<f64>;

    /// Short human-readable name used in logs
    fn name(&self) -> &str;
}

/// Fail unless both vectors have the same number of features
pub fn ensure_same_dim(x: &ArrayView1<f64>, y: &ArrayView1<f64>) -> Result<()> {
    if x.len() != y.len() {
        return Err(SVMError::DimensionMismatch {
            expected: x.len(),
            actual: y.len(),
        });
    }
    Ok(())
}
