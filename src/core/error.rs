//! Error types for the kernel SVM pipeline

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SVMError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Data file not found at {}", .0.display())]
    MissingFile(PathBuf),

    #[error("Target column '{0}' not found in the data file")]
    MissingColumn(String),

    #[error("Unknown dataset kind: {0} (expected moons, circles or blobs)")]
    UnknownDatasetKind(String),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Kernel unavailable: {0}")]
    KernelUnavailable(String),

    #[error("Invalid label: {0}")]
    InvalidLabel(String),

    #[error("Invalid dataset: {0}")]
    InvalidDataset(String),

    #[error("Empty dataset")]
    EmptyDataset,

    #[error("Optimization failed: {0}")]
    OptimizationError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Plot rendering failed: {0}")]
    Plot(String),
}

pub type Result<T> = std::result::Result<T, SVMError>;
