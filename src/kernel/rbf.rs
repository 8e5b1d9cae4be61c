//! Gaussian (RBF) kernel implementation
//!
//! The Gaussian kernel is defined as: K(x, y) = exp(-γ * ||x - y||²)
//! where γ (gamma) is a hyperparameter that controls the kernel width.

use crate::core::{Result, SVMError};
use crate::kernel::traits::ensure_same_dim;
use crate::kernel::Kernel;
use ndarray::ArrayView1;

/// Default width used when no gamma is configured
pub const DEFAULT_GAMMA: f64 = 0.5;

/// Gaussian kernel: K(x, y) = exp(-γ * ||x - y||²)
///
/// This is the similarity substituted when the quantum kernel cannot encode
/// a dataset. The gamma parameter controls the "reach" of each training
/// example:
/// - High gamma: close points have high influence (potential overfitting)
/// - Low gamma: distant points have influence (potential underfitting)
#[derive(Debug, Clone, Copy)]
pub struct GaussianKernel {
    gamma: f64,
}

impl GaussianKernel {
    /// Create a new Gaussian kernel with specified gamma parameter
    ///
    /// # Errors
    /// Returns `InvalidParameter` if gamma is not a positive finite number
    pub fn new(gamma: f64) -> Result<Self> {
        if !(gamma.is_finite() && gamma > 0.0) {
            return Err(SVMError::InvalidParameter(format!(
                "Gamma must be positive, got: {gamma}"
            )));
        }
        Ok(Self { gamma })
    }

    /// Get the gamma parameter
    pub fn gamma(&self) -> f64 {
        self.gamma
    }
}

impl Default for GaussianKernel {
    fn default() -> Self {
        Self {
            gamma: DEFAULT_GAMMA,
        }
    }
}

impl Kernel for GaussianKernel {
    fn compute(&self, x: ArrayView1<f64>, y: ArrayView1<f64>) -> Result<f64> {
        ensure_same_dim(&x, &y)?;
        Ok((-self.gamma * squared_euclidean_distance(&x, &y)).exp())
    }

    fn name(&self) -> &str {
        "gaussian"
    }
}

/// ||x - y||² = Σᵢ (xᵢ - yᵢ)²
fn squared_euclidean_distance(x: &ArrayView1<f64>, y: &ArrayView1<f64>) -> f64 {
    x.iter()
        .zip(y.iter())
        .map(|(a, b)| {
            let diff = a - b;
            diff * diff
        })
        .sum()
}
