//! Sequential Minimal Optimization (SMO) solver on a precomputed kernel
//!
//! Solves the C-SVC dual
//!
//! ```text
//! min_α  ½ αᵀQα − eᵀα    s.t.  yᵀα = 0,  0 ≤ αᵢ ≤ C
//! ```
//!
//! where Qᵢⱼ = yᵢ yⱼ Kᵢⱼ and K is the train×train Gram matrix. Each iteration
//! picks a maximal-violating pair using second-order information and solves
//! the two-variable subproblem analytically.

use crate::core::{OptimizationResult, OptimizerConfig, Result, SVMError};
use crate::gram::GramMatrix;
use log::{debug, warn};

/// Floor for the curvature of a two-variable subproblem
const TAU: f64 = 1e-12;

/// SMO solver for SVM optimization
pub struct SMOSolver {
    config: OptimizerConfig,
}

impl SMOSolver {
    /// Create a new SMO solver with the given configuration
    pub fn new(config: OptimizerConfig) -> Self {
        Self { config }
    }

    /// Solve the dual problem for `gram` and labels `y` in {-1, +1}
    pub fn solve(&self, gram: &GramMatrix, y: &[f64]) -> Result<OptimizationResult> {
        self.config.validate()?;

        if y.is_empty() {
            return Err(SVMError::EmptyDataset);
        }
        if !gram.is_square() {
            return Err(SVMError::DimensionMismatch {
                expected: gram.nrows(),
                actual: gram.ncols(),
            });
        }
        if gram.nrows() != y.len() {
            return Err(SVMError::DimensionMismatch {
                expected: gram.nrows(),
                actual: y.len(),
            });
        }
        if let Some(&bad) = y.iter().find(|&&label| label != 1.0 && label != -1.0) {
            return Err(SVMError::InvalidLabel(format!(
                "expected -1 or +1, got {bad}"
            )));
        }
        if gram.view().iter().any(|k| !k.is_finite()) {
            return Err(SVMError::OptimizationError(
                "kernel matrix contains non-finite entries".to_string(),
            ));
        }

        let n = y.len();
        let mut alpha = vec![0.0; n];
        // ∇f(α) = Qα − e, which is −1 everywhere at α = 0
        let mut gradient = vec![-1.0; n];

        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.config.max_iterations {
            let (i, j) = match self.select_working_set(gram, y, &alpha, &gradient) {
                Some(pair) => pair,
                None => {
                    converged = true;
                    break;
                }
            };

            let alpha_i_old = alpha[i];
            let alpha_j_old = alpha[j];
            self.update_pair(gram, y, &mut alpha, &gradient, i, j);

            let delta_i = alpha[i] - alpha_i_old;
            let delta_j = alpha[j] - alpha_j_old;
            for (t, g) in gradient.iter_mut().enumerate() {
                *g += y[t] * (y[i] * gram.get(t, i) * delta_i + y[j] * gram.get(t, j) * delta_j);
            }
            if gradient.iter().any(|g| !g.is_finite()) {
                return Err(SVMError::OptimizationError(format!(
                    "gradient diverged at iteration {}",
                    iterations + 1
                )));
            }

            iterations += 1;
        }

        if !converged {
            warn!(
                "SMO stopped after {} iterations without reaching tolerance {}",
                iterations, self.config.epsilon
            );
        }

        let b = -self.calculate_rho(y, &alpha, &gradient);
        let support_vectors: Vec<usize> = alpha
            .iter()
            .enumerate()
            .filter_map(|(i, &a)| if a > 0.0 { Some(i) } else { None })
            .collect();
        let objective_value = alpha
            .iter()
            .zip(gradient.iter())
            .map(|(a, g)| 0.5 * a * (g - 1.0))
            .sum();

        debug!(
            "SMO finished: iterations={}, support_vectors={}, objective={:.6}",
            iterations,
            support_vectors.len(),
            objective_value
        );

        Ok(OptimizationResult {
            alpha,
            b,
            support_vectors,
            iterations,
            objective_value,
            converged,
        })
    }

    /// Pick the pair (i, j) with the largest second-order gain
    ///
    /// Returns `None` once the maximal KKT violation drops below epsilon.
    fn select_working_set(
        &self,
        gram: &GramMatrix,
        y: &[f64],
        alpha: &[f64],
        gradient: &[f64],
    ) -> Option<(usize, usize)> {
        let c = self.config.c;

        let mut g_max = f64::NEG_INFINITY;
        let mut i_best = None;
        for t in 0..y.len() {
            let can_move_up = (y[t] > 0.0 && alpha[t] < c) || (y[t] < 0.0 && alpha[t] > 0.0);
            if can_move_up && -y[t] * gradient[t] >= g_max {
                g_max = -y[t] * gradient[t];
                i_best = Some(t);
            }
        }
        let i = i_best?;

        let mut g_max2 = f64::NEG_INFINITY;
        let mut j_best = None;
        let mut obj_diff_min = f64::INFINITY;
        let k_ii = gram.get(i, i);
        for t in 0..y.len() {
            let can_move_down = (y[t] > 0.0 && alpha[t] > 0.0) || (y[t] < 0.0 && alpha[t] < c);
            if !can_move_down {
                continue;
            }
            let y_grad = y[t] * gradient[t];
            g_max2 = g_max2.max(y_grad);

            let grad_diff = g_max + y_grad;
            if grad_diff > 0.0 {
                let quad = k_ii + gram.get(t, t) - 2.0 * gram.get(i, t);
                let obj_diff = -(grad_diff * grad_diff) / quad.max(TAU);
                if obj_diff <= obj_diff_min {
                    obj_diff_min = obj_diff;
                    j_best = Some(t);
                }
            }
        }

        if g_max + g_max2 < self.config.epsilon {
            return None;
        }
        j_best.map(|j| (i, j))
    }

    /// Solve the two-variable subproblem for (i, j) and clip to the box
    fn update_pair(
        &self,
        gram: &GramMatrix,
        y: &[f64],
        alpha: &mut [f64],
        gradient: &[f64],
        i: usize,
        j: usize,
    ) {
        let c = self.config.c;
        let quad = (gram.get(i, i) + gram.get(j, j) - 2.0 * gram.get(i, j)).max(TAU);

        if y[i] != y[j] {
            let delta = (-gradient[i] - gradient[j]) / quad;
            let diff = alpha[i] - alpha[j];
            alpha[i] += delta;
            alpha[j] += delta;

            if diff > 0.0 {
                if alpha[j] < 0.0 {
                    alpha[j] = 0.0;
                    alpha[i] = diff;
                }
            } else if alpha[i] < 0.0 {
                alpha[i] = 0.0;
                alpha[j] = -diff;
            }
            if diff > 0.0 {
                if alpha[i] > c {
                    alpha[i] = c;
                    alpha[j] = c - diff;
                }
            } else if alpha[j] > c {
                alpha[j] = c;
                alpha[i] = c + diff;
            }
        } else {
            let delta = (gradient[i] - gradient[j]) / quad;
            let sum = alpha[i] + alpha[j];
            alpha[i] -= delta;
            alpha[j] += delta;

            if sum > c {
                if alpha[i] > c {
                    alpha[i] = c;
                    alpha[j] = sum - c;
                }
            } else if alpha[j] < 0.0 {
                alpha[j] = 0.0;
                alpha[i] = sum;
            }
            if sum > c {
                if alpha[j] > c {
                    alpha[j] = c;
                    alpha[i] = sum - c;
                }
            } else if alpha[i] < 0.0 {
                alpha[i] = 0.0;
                alpha[j] = sum;
            }
        }
    }

    /// Offset ρ of the decision function Σ αᵢyᵢK(xᵢ, x) − ρ
    ///
    /// Averages over free support vectors; falls back to the middle of the
    /// feasible interval when every alpha sits at a bound.
    fn calculate_rho(&self, y: &[f64], alpha: &[f64], gradient: &[f64]) -> f64 {
        let c = self.config.c;
        let mut upper = f64::INFINITY;
        let mut lower = f64::NEG_INFINITY;
        let mut free_sum = 0.0;
        let mut n_free = 0usize;

        for t in 0..y.len() {
            let y_grad = y[t] * gradient[t];
            if alpha[t] >= c {
                if y[t] < 0.0 {
                    upper = upper.min(y_grad);
                } else {
                    lower = lower.max(y_grad);
                }
            } else if alpha[t] <= 0.0 {
                if y[t] > 0.0 {
                    upper = upper.min(y_grad);
                } else {
                    lower = lower.max(y_grad);
                }
            } else {
                n_free += 1;
                free_sum += y_grad;
            }
        }

        if n_free > 0 {
            free_sum / n_free as f64
        } else if upper.is_finite() && lower.is_finite() {
            (upper + lower) / 2.0
        } else if upper.is_finite() {
            upper
        } else if lower.is_finite() {
            lower
        } else {
            0.0
        }
    }
}
