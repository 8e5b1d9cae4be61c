//! qksvm Command Line Interface
//!
//! Generates synthetic datasets, or trains and evaluates a kernel SVM on a
//! CSV file and writes the metrics file and decision-boundary plot.

use clap::{Parser, ValueEnum};
use env_logger::Env;
use log::{error, info};
use qksvm::pipeline::{self, PipelineConfig, RunOutcome};
use qksvm::{DatasetKind, KernelChoice, OptimizerConfig};
use std::path::PathBuf;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const SERVER_POLL_INTERVAL: Duration = Duration::from_millis(200);

#[derive(Parser, Debug)]
#[command(name = "qksvm")]
#[command(about = "Kernel SVM classification with Gaussian or quantum kernels")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "qksvm contributors")]
struct Cli {
    /// Create a synthetic dataset at this path and exit
    #[arg(long, value_name = "FILE", help_heading = "Dummy data generation")]
    create_dummy_data: Option<PathBuf>,

    /// Shape of the synthetic dataset
    #[arg(long, value_enum, default_value = "moons", help_heading = "Dummy data generation")]
    dummy_type: CliDatasetKind,

    /// Number of synthetic samples
    #[arg(long, default_value = "200", help_heading = "Dummy data generation")]
    n_samples: usize,

    /// Standard deviation of the Gaussian noise added to synthetic samples
    #[arg(long, default_value = "0.25", help_heading = "Dummy data generation")]
    noise: f64,

    /// CSV file with a header row
    #[arg(long, alias = "data_path", value_name = "FILE")]
    data_path: Option<PathBuf>,

    /// Name of the label column
    #[arg(long, alias = "target_column", value_name = "NAME")]
    target_column: Option<String>,

    /// Write the decision-boundary plot (SVG, 2D data only)
    #[arg(long, value_name = "FILE")]
    output_plot: Option<PathBuf>,

    /// Write accuracy and support vector count
    #[arg(long, value_name = "FILE")]
    output_metrics: Option<PathBuf>,

    /// Fraction of samples held out for testing
    #[arg(long, default_value = "0.3")]
    test_size: f64,

    /// Seed for dataset generation and the train/test split
    #[arg(long, default_value = "42")]
    random_state: u64,

    /// Keep running after the workflow until interrupted
    #[arg(long)]
    server: bool,

    /// Kernel function
    #[arg(long, value_enum, default_value = "auto", help_heading = "Kernel and solver")]
    kernel: CliKernel,

    /// Gaussian kernel width
    #[arg(long, default_value = "0.5", help_heading = "Kernel and solver")]
    gamma: f64,

    /// Regularization parameter C
    #[arg(short = 'C', default_value = "1.0", help_heading = "Kernel and solver")]
    c: f64,

    /// Convergence tolerance
    #[arg(long, default_value = "0.001", help_heading = "Kernel and solver")]
    epsilon: f64,

    /// Maximum iterations
    #[arg(long, default_value = "100000", help_heading = "Kernel and solver")]
    max_iterations: usize,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum CliDatasetKind {
    /// Two interleaving half circles
    Moons,
    /// A small circle inside a large one
    Circles,
    /// Two Gaussian clusters
    Blobs,
}

impl From<CliDatasetKind> for DatasetKind {
    fn from(cli_kind: CliDatasetKind) -> Self {
        match cli_kind {
            CliDatasetKind::Moons => DatasetKind::Moons,
            CliDatasetKind::Circles => DatasetKind::Circles,
            CliDatasetKind::Blobs => DatasetKind::Blobs,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum CliKernel {
    /// Quantum kernel, Gaussian when the data cannot be encoded
    Auto,
    /// Quantum fidelity kernel only
    Quantum,
    /// Gaussian (RBF) kernel
    #[value(alias = "rbf")]
    Gaussian,
}

impl From<CliKernel> for KernelChoice {
    fn from(cli_kernel: CliKernel) -> Self {
        match cli_kernel {
            CliKernel::Auto => KernelChoice::Auto,
            CliKernel::Quantum => KernelChoice::Quantum,
            CliKernel::Gaussian => KernelChoice::Gaussian,
        }
    }
}

impl Cli {
    fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            create_dummy_data: self.create_dummy_data.clone(),
            dummy_kind: self.dummy_type.into(),
            n_samples: self.n_samples,
            noise: self.noise,
            data_path: self.data_path.clone(),
            target_column: self.target_column.clone(),
            test_size: self.test_size,
            seed: self.random_state,
            kernel: self.kernel.into(),
            gamma: self.gamma,
            optimizer: OptimizerConfig {
                c: self.c,
                epsilon: self.epsilon,
                max_iterations: self.max_iterations,
            },
            output_plot: self.output_plot.clone(),
            output_metrics: self.output_metrics.clone(),
            ..PipelineConfig::default()
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else {
        "warn"
    };

    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let config = cli.pipeline_config();
    match pipeline::run(&config) {
        Ok(outcome) => print_outcome(&outcome, &config),
        Err(e) => {
            error!("Error: {e}");
            process::exit(1);
        }
    }

    if cli.server {
        if let Err(e) = keep_alive() {
            error!("Error: {e}");
            process::exit(1);
        }
    }
}

fn print_outcome(outcome: &RunOutcome, config: &PipelineConfig) {
    match outcome {
        RunOutcome::Generated { path, n_samples } => {
            println!("Dummy dataset with {n_samples} samples written to {}", path.display());
        }
        RunOutcome::Evaluated(summary) => {
            println!("Accuracy on the test set: {:.4}", summary.accuracy);
            println!("Number of support vectors: {}", summary.n_support_vectors);
            if let (true, Some(path)) = (summary.metrics_written, &config.output_metrics) {
                println!("Metrics saved to {}", path.display());
            }
            if let (true, Some(path)) = (summary.plot_written, &config.output_plot) {
                println!("Decision boundary plot saved to {}", path.display());
            }
        }
    }
}

/// Block until Ctrl+C
fn keep_alive() -> Result<(), ctrlc::Error> {
    let running = Arc::new(AtomicBool::new(true));
    let flag = Arc::clone(&running);
    ctrlc::set_handler(move || flag.store(false, Ordering::SeqCst))?;

    info!("Server mode: waiting for Ctrl+C");
    while running.load(Ordering::SeqCst) {
        thread::sleep(SERVER_POLL_INTERVAL);
    }
    info!("Exiting server mode");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["qksvm"]).unwrap();
        let config = cli.pipeline_config();
        assert_eq!(config.test_size, 0.3);
        assert_eq!(config.seed, 42);
        assert_eq!(config.n_samples, 200);
        assert_eq!(config.kernel, KernelChoice::Auto);
        assert_eq!(config.optimizer.max_iterations, 100_000);
        assert!(config.mode().is_err());
    }

    #[test]
    fn test_underscore_alias_and_flags() {
        let cli = Cli::try_parse_from([
            "qksvm",
            "--data_path",
            "data.csv",
            "--target-column",
            "target",
            "--kernel",
            "rbf",
            "-C",
            "2.5",
            "-v",
        ])
        .unwrap();
        let config = cli.pipeline_config();
        assert_eq!(config.data_path, Some(PathBuf::from("data.csv")));
        assert_eq!(config.kernel, KernelChoice::Gaussian);
        assert_eq!(config.optimizer.c, 2.5);
        assert!(cli.verbose);
    }

    #[test]
    fn test_dummy_type_parsing() {
        let cli = Cli::try_parse_from([
            "qksvm",
            "--create-dummy-data",
            "d.csv",
            "--dummy-type",
            "circles",
        ])
        .unwrap();
        assert_eq!(cli.pipeline_config().dummy_kind, DatasetKind::Circles);
        assert!(Cli::try_parse_from(["qksvm", "--dummy-type", "spirals"]).is_err());
    }
}
