//! Gram (kernel) matrix assembly
//!
//! A Gram matrix holds K(a_i, b_j) for every pair of rows drawn from two
//! sample collections. Rows follow the first collection and columns the
//! second; the train×train matrix used for fitting is the special case where
//! both collections are the training set.

use crate::core::{Result, SVMError};
use crate::kernel::Kernel;
use log::debug;
use ndarray::{Array2, ArrayView1, ArrayView2};

/// Immutable matrix of pairwise kernel values
#[derive(Debug, Clone, PartialEq)]
pub struct GramMatrix {
    values: Array2<f64>,
}

impl GramMatrix {
    /// Evaluate `kernel` on every pair (rows of `a`) × (rows of `b`)
    ///
    /// Fails with `DimensionMismatch` before any kernel call when the two
    /// collections have different feature counts. Kernel errors propagate
    /// unchanged and abort the build.
    pub fn compute<K: Kernel + ?Sized>(
        kernel: &K,
        a: ArrayView2<f64>,
        b: ArrayView2<f64>,
    ) -> Result<Self> {
        if a.ncols() != b.ncols() {
            return Err(SVMError::DimensionMismatch {
                expected: a.ncols(),
                actual: b.ncols(),
            });
        }

        let (n, m) = (a.nrows(), b.nrows());
        debug!(
            "Computing {}x{} Gram matrix with {} kernel",
            n,
            m,
            kernel.name()
        );

        let mut values = Array2::zeros((n, m));
        for (i, row) in a.outer_iter().enumerate() {
            for (j, col) in b.outer_iter().enumerate() {
                values[[i, j]] = kernel.compute(row, col)?;
            }
        }

        Ok(Self { values })
    }

    /// Wrap an already computed matrix
    pub fn from_array(values: Array2<f64>) -> Self {
        Self { values }
    }

    /// Number of rows (samples being scored)
    pub fn nrows(&self) -> usize {
        self.values.nrows()
    }

    /// Number of columns (reference samples)
    pub fn ncols(&self) -> usize {
        self.values.ncols()
    }

    pub fn is_square(&self) -> bool {
        self.nrows() == self.ncols()
    }

    /// Kernel value between row sample `i` and column sample `j`
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[[i, j]]
    }

    pub fn row(&self, i: usize) -> ArrayView1<'_, f64> {
        self.values.row(i)
    }

    pub fn view(&self) -> ArrayView2<'_, f64> {
        self.values.view()
    }

    /// Square and equal to its transpose within `tolerance`
    pub fn is_symmetric(&self, tolerance: f64) -> bool {
        if !self.is_square() {
            return false;
        }
        let n = self.nrows();
        (0..n).all(|i| (i + 1..n).all(|j| (self.get(i, j) - self.get(j, i)).abs() <= tolerance))
    }
}
