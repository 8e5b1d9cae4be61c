//! Support vector classification on precomputed kernel matrices
//!
//! Samples are compared through an injected [`Kernel`](kernel::Kernel): a
//! Gaussian (RBF) similarity or a simulated quantum fidelity kernel. The
//! resulting Gram matrices feed an SMO solver that never sees raw features,
//! so any similarity function can be plugged in.
//!
//! [`pipeline::run`] ties loading, scaling, training, evaluation and
//! reporting together; the `qksvm` binary is a thin wrapper around it.

pub mod api;
pub mod core;
pub mod data;
pub mod gram;
pub mod kernel;
pub mod optimizer;
pub mod pipeline;
pub mod report;
pub mod solver;
pub mod utils;

// Re-export main types for convenience
pub use crate::api::{evaluate, Evaluation, EvaluationMetrics};
pub use crate::core::traits::*;
pub use crate::core::types::*;
pub use crate::core::{Result, SVMError};
pub use crate::data::{Dataset, DatasetKind, SyntheticConfig, TrainTestSplit};
pub use crate::gram::GramMatrix;
pub use crate::kernel::{FnKernel, GaussianKernel, Kernel, KernelChoice, QuantumKernel};
pub use crate::optimizer::{SVMOptimizer, TrainedSVM};
pub use crate::pipeline::{run, PipelineConfig, PipelineError, RunOutcome, RunSummary, Stage};

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
