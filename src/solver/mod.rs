//! SVM solver implementations
//!
//! This module implements Sequential Minimal Optimization (SMO) over a
//! precomputed kernel matrix.

pub mod smo;

pub use self::smo::*;
