//! Kernel functions for SVM

pub mod choice;
pub mod function;
pub mod quantum;
pub mod rbf;
pub mod traits;

pub use self::choice::*;
pub use self::function::*;
pub use self::quantum::*;
pub use self::rbf::*;
pub use self::traits::*;
