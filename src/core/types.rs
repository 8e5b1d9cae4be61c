//! Core type definitions for SVM

/// Prediction result containing label and decision value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// Predicted class label, expressed in the dataset's original coding
    pub label: f64,
    /// Raw decision function value
    pub decision_value: f64,
}

impl Prediction {
    /// Create a new prediction
    pub fn new(label: f64, decision_value: f64) -> Self {
        Self {
            label,
            decision_value,
        }
    }

    /// Get confidence as absolute value of decision value
    pub fn confidence(&self) -> f64 {
        self.decision_value.abs()
    }
}

/// Result of optimization process
#[derive(Debug, Clone)]
pub struct OptimizationResult {
    /// Lagrange multipliers (alpha values), one per training sample
    pub alpha: Vec<f64>,
    /// Bias term (b)
    pub b: f64,
    /// Indices of support vectors (where alpha > 0)
    pub support_vectors: Vec<usize>,
    /// Number of iterations performed
    pub iterations: usize,
    /// Final value of the minimized dual objective ½αᵀQα − eᵀα
    pub objective_value: f64,
    /// Whether the KKT tolerance was reached before the iteration cap
    pub converged: bool,
}

/// Configuration for optimizer
#[derive(Debug, Clone)]
pub struct OptimizerConfig {
    /// Regularization parameter (upper bound for alpha)
    pub c: f64,
    /// Tolerance for KKT conditions
    pub epsilon: f64,
    /// Maximum number of iterations
    pub max_iterations: usize,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            c: 1.0,
            epsilon: 0.001,
            max_iterations: 100_000,
        }
    }
}

impl OptimizerConfig {
    /// Check that every parameter is usable by the solver
    pub fn validate(&self) -> crate::core::Result<()> {
        if !(self.c.is_finite() && self.c > 0.0) {
            return Err(crate::core::SVMError::InvalidParameter(format!(
                "C must be positive, got: {}",
                self.c
            )));
        }
        if !(self.epsilon.is_finite() && self.epsilon > 0.0) {
            return Err(crate::core::SVMError::InvalidParameter(format!(
                "epsilon must be positive, got: {}",
                self.epsilon
            )));
        }
        if self.max_iterations == 0 {
            return Err(crate::core::SVMError::InvalidParameter(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
