//! End-to-end run: load, preprocess, train, evaluate, report
//!
//! A run is a straight line through [`Stage`]s. Any failure stops the run and
//! is reported together with the stage it happened in. Output files are only
//! written in the final stage, and a report failure removes whatever that
//! stage already wrote, so a failed run leaves nothing behind.
//!
//! When a dummy dataset path is configured the run takes the one early exit:
//! it writes the synthetic CSV and returns without training.

use crate::api::{evaluate, Evaluation};
use crate::core::{OptimizerConfig, Result, SVMError, SVMModel};
use crate::data::{self, Dataset, DatasetKind, SyntheticConfig};
use crate::gram::GramMatrix;
use crate::kernel::{Kernel, KernelChoice, DEFAULT_GAMMA};
use crate::optimizer::{SVMOptimizer, TrainedSVM};
use crate::report::{self, DecisionPlot, Mesh, DEFAULT_PLOT_STEP, PLOT_MARGIN};
use crate::utils::scaling::StandardScaler;
use crate::utils::stats::class_counts;
use log::{info, warn};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Pipeline stage, used to attribute failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Configure,
    Generate,
    Load,
    Preprocess,
    Train,
    Evaluate,
    Report,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Configure => "configure",
            Stage::Generate => "generate",
            Stage::Load => "load",
            Stage::Preprocess => "preprocess",
            Stage::Train => "train",
            Stage::Evaluate => "evaluate",
            Stage::Report => "report",
        };
        f.write_str(name)
    }
}

/// An error together with the stage that produced it
#[derive(Debug, Error)]
#[error("{stage} stage failed: {source}")]
pub struct PipelineError {
    pub stage: Stage,
    pub source: SVMError,
}

impl PipelineError {
    pub fn new(stage: Stage, source: SVMError) -> Self {
        Self { stage, source }
    }
}

trait InStage<T> {
    fn in_stage(self, stage: Stage) -> std::result::Result<T, PipelineError>;
}

impl<T> InStage<T> for Result<T> {
    fn in_stage(self, stage: Stage) -> std::result::Result<T, PipelineError> {
        self.map_err(|source| PipelineError::new(stage, source))
    }
}

/// What a configured run will do
#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    /// Write a synthetic dataset and stop
    Generate { path: PathBuf },
    /// Train and evaluate on a CSV dataset
    Train {
        data_path: PathBuf,
        target_column: String,
    },
}

/// All inputs of a pipeline run
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub create_dummy_data: Option<PathBuf>,
    pub dummy_kind: DatasetKind,
    pub n_samples: usize,
    pub noise: f64,

    pub data_path: Option<PathBuf>,
    pub target_column: Option<String>,

    pub test_size: f64,
    /// Seeds both dataset generation and the train/test split
    pub seed: u64,

    pub kernel: KernelChoice,
    pub gamma: f64,
    pub optimizer: OptimizerConfig,

    pub output_plot: Option<PathBuf>,
    pub output_metrics: Option<PathBuf>,
    pub plot_step: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let synthetic = SyntheticConfig::default();
        Self {
            create_dummy_data: None,
            dummy_kind: synthetic.kind,
            n_samples: synthetic.n_samples,
            noise: synthetic.noise,
            data_path: None,
            target_column: None,
            test_size: 0.3,
            seed: synthetic.seed,
            kernel: KernelChoice::default(),
            gamma: DEFAULT_GAMMA,
            optimizer: OptimizerConfig::default(),
            output_plot: None,
            output_metrics: None,
            plot_step: DEFAULT_PLOT_STEP,
        }
    }
}

impl PipelineConfig {
    pub fn with_dummy_data(mut self, path: impl Into<PathBuf>, kind: DatasetKind) -> Self {
        self.create_dummy_data = Some(path.into());
        self.dummy_kind = kind;
        self
    }

    pub fn with_n_samples(mut self, n_samples: usize) -> Self {
        self.n_samples = n_samples;
        self
    }

    pub fn with_noise(mut self, noise: f64) -> Self {
        self.noise = noise;
        self
    }

    pub fn with_data(mut self, path: impl Into<PathBuf>, target_column: impl Into<String>) -> Self {
        self.data_path = Some(path.into());
        self.target_column = Some(target_column.into());
        self
    }

    pub fn with_test_size(mut self, test_size: f64) -> Self {
        self.test_size = test_size;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_kernel(mut self, kernel: KernelChoice) -> Self {
        self.kernel = kernel;
        self
    }

    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    pub fn with_optimizer(mut self, optimizer: OptimizerConfig) -> Self {
        self.optimizer = optimizer;
        self
    }

    pub fn with_output_plot(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_plot = Some(path.into());
        self
    }

    pub fn with_output_metrics(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_metrics = Some(path.into());
        self
    }

    pub fn with_plot_step(mut self, step: f64) -> Self {
        self.plot_step = step;
        self
    }

    /// Synthetic generator settings derived from this configuration
    pub fn synthetic(&self) -> SyntheticConfig {
        SyntheticConfig::new(self.dummy_kind, self.n_samples, self.noise, self.seed)
    }

    /// Decide the run mode; dummy generation takes precedence
    pub fn mode(&self) -> Result<Mode> {
        if let Some(path) = &self.create_dummy_data {
            return Ok(Mode::Generate { path: path.clone() });
        }
        match (&self.data_path, &self.target_column) {
            (Some(data_path), Some(target_column)) => Ok(Mode::Train {
                data_path: data_path.clone(),
                target_column: target_column.clone(),
            }),
            _ => Err(SVMError::Config(
                "either a dummy data path or both a data path and a target column are required"
                    .to_string(),
            )),
        }
    }
}

/// Results of a completed training run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub accuracy: f64,
    pub n_support_vectors: usize,
    pub evaluation: Evaluation,
    pub kernel: String,
    pub converged: bool,
    pub plot_written: bool,
    pub metrics_written: bool,
}

/// How a run ended
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// A synthetic dataset was written to this path
    Generated { path: PathBuf, n_samples: usize },
    Evaluated(RunSummary),
}

/// Execute one pipeline run
pub fn run(config: &PipelineConfig) -> std::result::Result<RunOutcome, PipelineError> {
    match config.mode().in_stage(Stage::Configure)? {
        Mode::Generate { path } => {
            let dataset = data::create_dummy_dataset(&path, &config.synthetic())
                .in_stage(Stage::Generate)?;
            Ok(RunOutcome::Generated {
                path,
                n_samples: dataset.len(),
            })
        }
        Mode::Train {
            data_path,
            target_column,
        } => train_and_evaluate(config, &data_path, &target_column).map(RunOutcome::Evaluated),
    }
}

/// Scaled training and test partitions
struct Prepared {
    train: Dataset,
    test: Dataset,
}

fn train_and_evaluate(
    config: &PipelineConfig,
    data_path: &Path,
    target_column: &str,
) -> std::result::Result<RunSummary, PipelineError> {
    info!("Loading data from '{}'", data_path.display());
    let dataset = data::load_csv(data_path, target_column).in_stage(Stage::Load)?;
    for (class, count) in class_counts(&dataset.labels_vec()) {
        info!("Class {class}: {count} samples");
    }

    let prepared = preprocess(&dataset, config).in_stage(Stage::Preprocess)?;

    let kernel = config
        .kernel
        .resolve(prepared.train.dim(), config.gamma)
        .in_stage(Stage::Train)?;
    let model = train(&prepared.train, kernel.as_ref(), &config.optimizer).in_stage(Stage::Train)?;

    let evaluation = evaluate(&model, kernel.as_ref(), &prepared.test, &prepared.train)
        .in_stage(Stage::Evaluate)?;
    info!("Test set accuracy: {:.4}", evaluation.accuracy);

    let (plot_written, metrics_written) =
        write_reports(config, &prepared, &model, kernel.as_ref(), &evaluation)
            .in_stage(Stage::Report)?;

    Ok(RunSummary {
        accuracy: evaluation.accuracy,
        n_support_vectors: model.n_support_vectors(),
        evaluation,
        kernel: kernel.name().to_string(),
        converged: model.converged(),
        plot_written,
        metrics_written,
    })
}

fn preprocess(dataset: &Dataset, config: &PipelineConfig) -> Result<Prepared> {
    let split = data::train_test_split(dataset, config.test_size, config.seed)?;
    info!(
        "Split into {} training and {} test samples",
        split.train.len(),
        split.test.len()
    );

    let scaler = StandardScaler::fit(split.train.features())?;
    let train = split
        .train
        .with_features(scaler.transform(split.train.features())?)?;
    let test = split
        .test
        .with_features(scaler.transform(split.test.features())?)?;
    Ok(Prepared { train, test })
}

fn train(train: &Dataset, kernel: &dyn Kernel, optimizer: &OptimizerConfig) -> Result<TrainedSVM> {
    info!(
        "Computing {}x{} training kernel matrix",
        train.len(),
        train.len()
    );
    let gram = GramMatrix::compute(kernel, train.features(), train.features())?;
    SVMOptimizer::new(optimizer.clone()).train(&gram, &train.labels_vec())
}

fn write_reports(
    config: &PipelineConfig,
    prepared: &Prepared,
    model: &TrainedSVM,
    kernel: &dyn Kernel,
    evaluation: &Evaluation,
) -> Result<(bool, bool)> {
    // Plot first: the metrics file is only written once the plot succeeded
    let mut plot_written = false;
    if let Some(path) = &config.output_plot {
        if prepared.train.dim() == 2 {
            let mesh = Mesh::covering(prepared.train.features(), PLOT_MARGIN, config.plot_step)?;
            info!("Scoring {} mesh points for the decision plot", mesh.len());
            let points = mesh.points();
            let gram = GramMatrix::compute(kernel, points.view(), prepared.train.features())?;
            let scores = model.decision_function(&gram)?;

            let plot = DecisionPlot {
                train: &prepared.train,
                test: &prepared.test,
                support_indices: model.support_vector_indices(),
                mesh: &mesh,
                scores: &scores,
                classes: model.classes(),
            };
            report::plot_decision_boundary(path, &plot)?;
            plot_written = true;
        } else {
            warn!(
                "Plotting is only supported for 2D data (got {} features); skipping '{}'",
                prepared.train.dim(),
                path.display()
            );
        }
    }

    let mut metrics_written = false;
    if let Some(path) = &config.output_metrics {
        if let Err(e) = report::write_metrics(path, evaluation.accuracy, model.n_support_vectors()) {
            if let (true, Some(plot_path)) = (plot_written, &config.output_plot) {
                discard(plot_path);
            }
            return Err(e);
        }
        metrics_written = true;
    }

    Ok((plot_written, metrics_written))
}

/// Remove an artifact of a run that failed afterwards
fn discard(path: &Path) {
    if let Err(e) = std::fs::remove_file(path) {
        warn!("Could not remove '{}': {e}", path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_mode_resolution() {
        let config = PipelineConfig::default();
        assert!(matches!(config.mode(), Err(SVMError::Config(_))));

        let config = PipelineConfig {
            data_path: Some("data.csv".into()),
            ..PipelineConfig::default()
        };
        assert!(matches!(config.mode(), Err(SVMError::Config(_))));

        let config = PipelineConfig::default().with_data("data.csv", "target");
        assert_eq!(
            config.mode().unwrap(),
            Mode::Train {
                data_path: "data.csv".into(),
                target_column: "target".to_string()
            }
        );

        let config = config.with_dummy_data("dummy.csv", DatasetKind::Circles);
        assert_eq!(
            config.mode().unwrap(),
            Mode::Generate {
                path: "dummy.csv".into()
            }
        );
    }

    #[test]
    fn test_error_names_stage() {
        let err = PipelineError::new(Stage::Load, SVMError::MissingColumn("label".to_string()));
        assert_eq!(
            err.to_string(),
            "load stage failed: Target column 'label' not found in the data file"
        );
    }

    #[test]
    fn test_generate_exits_early() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("dummy.csv");
        let config = PipelineConfig::default()
            .with_dummy_data(&path, DatasetKind::Blobs)
            .with_n_samples(30)
            .with_output_metrics(dir.path().join("metrics.txt"));

        match run(&config).unwrap() {
            RunOutcome::Generated { path: written, n_samples } => {
                assert_eq!(written, path);
                assert_eq!(n_samples, 30);
            }
            other => panic!("expected generation, got {other:?}"),
        }
        assert!(path.exists());
        assert!(!dir.path().join("metrics.txt").exists());
    }

    #[test]
    fn test_missing_file_fails_in_load_stage() {
        let config = PipelineConfig::default().with_data("/no/such/file.csv", "target");
        let err = run(&config).unwrap_err();
        assert_eq!(err.stage, Stage::Load);
        assert!(matches!(err.source, SVMError::MissingFile(_)));
    }

    #[test]
    fn test_bad_test_size_fails_in_preprocess_stage() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("data.csv");
        data::create_dummy_dataset(&path, &SyntheticConfig::default()).unwrap();

        let config = PipelineConfig::default()
            .with_data(&path, "target")
            .with_test_size(1.5);
        let err = run(&config).unwrap_err();
        assert_eq!(err.stage, Stage::Preprocess);
        assert!(matches!(err.source, SVMError::InvalidParameter(_)));
    }

    #[test]
    fn test_preprocess_scales_with_training_statistics() {
        let dataset = data::generate(&SyntheticConfig::new(DatasetKind::Blobs, 50, 0.5, 3)).unwrap();
        let config = PipelineConfig::default();
        let prepared = preprocess(&dataset, &config).unwrap();

        assert_eq!(prepared.train.len(), 35);
        assert_eq!(prepared.test.len(), 15);
        for column in prepared.train.features().columns() {
            approx::assert_abs_diff_eq!(column.mean().unwrap(), 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_failed_plot_leaves_no_metrics() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let data_path = dir.path().join("data.csv");
        let metrics_path = dir.path().join("metrics.txt");
        data::create_dummy_dataset(&data_path, &SyntheticConfig::default()).unwrap();

        let config = PipelineConfig::default()
            .with_data(&data_path, "target")
            .with_kernel(KernelChoice::Gaussian)
            .with_plot_step(0.2)
            .with_output_metrics(&metrics_path)
            .with_output_plot(dir.path().join("no_such_dir").join("plot.svg"));

        let err = run(&config).unwrap_err();
        assert_eq!(err.stage, Stage::Report);
        assert!(matches!(err.source, SVMError::Plot(_)));
        assert!(!metrics_path.exists());
    }

    #[test]
    fn test_failed_metrics_removes_plot() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let data_path = dir.path().join("data.csv");
        let plot_path = dir.path().join("plot.svg");
        data::create_dummy_dataset(&data_path, &SyntheticConfig::default()).unwrap();

        let config = PipelineConfig::default()
            .with_data(&data_path, "target")
            .with_kernel(KernelChoice::Gaussian)
            .with_plot_step(0.2)
            .with_output_plot(&plot_path)
            .with_output_metrics(dir.path().join("no_such_dir").join("metrics.txt"));

        let err = run(&config).unwrap_err();
        assert_eq!(err.stage, Stage::Report);
        assert!(!plot_path.exists());
    }

    #[test]
    fn test_train_mode_with_gaussian_kernel() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let data_path = dir.path().join("data.csv");
        let metrics_path = dir.path().join("metrics.txt");
        data::create_dummy_dataset(
            &data_path,
            &SyntheticConfig::new(DatasetKind::Blobs, 60, 0.1, 42),
        )
        .unwrap();

        let config = PipelineConfig::default()
            .with_data(&data_path, "target")
            .with_kernel(KernelChoice::Gaussian)
            .with_output_metrics(&metrics_path);

        let summary = match run(&config).unwrap() {
            RunOutcome::Evaluated(summary) => summary,
            other => panic!("expected evaluation, got {other:?}"),
        };
        assert!((0.0..=1.0).contains(&summary.accuracy));
        assert!(summary.n_support_vectors > 0);
        assert_eq!(summary.kernel, "gaussian");
        assert!(summary.metrics_written);
        assert!(!summary.plot_written);
        assert_eq!(summary.evaluation.predictions.len(), 18);

        let content = std::fs::read_to_string(&metrics_path).unwrap();
        assert!(content.starts_with(&format!("Test Set Accuracy: {:.4}", summary.accuracy)));
    }
}
