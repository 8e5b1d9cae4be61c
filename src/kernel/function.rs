//! Closure-backed kernel

use crate::core::Result;
use crate::kernel::Kernel;
use ndarray::ArrayView1;

/// Adapter turning any `(x, y) -> similarity` function into a [`Kernel`]
///
/// ```rust
/// use qksvm::kernel::{FnKernel, Kernel};
/// use ndarray::array;
///
/// let dot = FnKernel::new("dot", |x, y| Ok(x.dot(&y)));
/// let x = array![1.0, 2.0];
/// assert_eq!(dot.compute(x.view(), x.view()).unwrap(), 5.0);
/// ```
pub struct FnKernel<F> {
    name: String,
    function: F,
}

impl<F> FnKernel<F>
where
    F: Fn(ArrayView1<f64>, ArrayView1<f64>) -> Result<f64>,
{
    pub fn new(name: impl Into<String>, function: F) -> Self {
        Self {
            name: name.into(),
            function,
        }
    }
}

impl<F> Kernel for FnKernel<F>
where
    F: Fn(ArrayView1<f64>, ArrayView1<f64>) -> Result<f64>,
{
    fn compute(&self, x: ArrayView1<f64>, y: ArrayView1<f64>) -> Result<f64> {
        (self.function)(x, y)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
