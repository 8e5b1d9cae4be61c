//! Synthetic two-class datasets
//!
//! Three 2D generators: interleaved half-moons, concentric circles and
//! Gaussian blobs. All randomness comes from one seeded `StdRng`, so a fixed
//! (kind, n_samples, noise, seed) always yields the same samples.

use crate::core::{Result, SVMError};
use crate::data::Dataset;
use log::info;
use ndarray::{Array1, Array2};
use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_distr::Normal;
use std::f64::consts::PI;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Inner circle radius relative to the outer one
const CIRCLE_FACTOR: f64 = 0.5;
/// Blob centers are drawn uniformly from this box in each coordinate
const BLOB_CENTER_BOX: (f64, f64) = (-10.0, 10.0);

/// Which generator to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DatasetKind {
    /// Two interleaving half circles
    #[default]
    Moons,
    /// A small circle inside a large one
    Circles,
    /// Two isotropic Gaussian clusters
    Blobs,
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DatasetKind::Moons => "moons",
            DatasetKind::Circles => "circles",
            DatasetKind::Blobs => "blobs",
        };
        f.write_str(name)
    }
}

impl FromStr for DatasetKind {
    type Err = SVMError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "moons" => Ok(DatasetKind::Moons),
            "circles" => Ok(DatasetKind::Circles),
            "blobs" => Ok(DatasetKind::Blobs),
            _ => Err(SVMError::UnknownDatasetKind(s.to_string())),
        }
    }
}

/// Parameters for one synthetic dataset
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticConfig {
    pub kind: DatasetKind,
    pub n_samples: usize,
    pub noise: f64,
    pub seed: u64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            kind: DatasetKind::Moons,
            n_samples: 200,
            noise: 0.25,
            seed: 42,
        }
    }
}

impl SyntheticConfig {
    pub fn new(kind: DatasetKind, n_samples: usize, noise: f64, seed: u64) -> Self {
        Self {
            kind,
            n_samples,
            noise,
            seed,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.n_samples < 2 {
            return Err(SVMError::InvalidParameter(format!(
                "synthetic datasets need at least 2 samples, got: {}",
                self.n_samples
            )));
        }
        if !(self.noise.is_finite() && self.noise >= 0.0) {
            return Err(SVMError::InvalidParameter(format!(
                "noise must be a non-negative number, got: {}",
                self.noise
            )));
        }
        Ok(())
    }
}

/// Generate a dataset with columns `feature1`, `feature2` and `target`
pub fn generate(config: &SyntheticConfig) -> Result<Dataset> {
    config.validate()?;
    let mut rng = StdRng::seed_from_u64(config.seed);

    let mut points = match config.kind {
        DatasetKind::Moons => moons(config.n_samples),
        DatasetKind::Circles => circles(config.n_samples),
        DatasetKind::Blobs => blobs(config.n_samples, config.noise, &mut rng)?,
    };
    points.shuffle(&mut rng);

    let noise = match config.kind {
        DatasetKind::Moons => config.noise,
        DatasetKind::Circles => config.noise / 2.0,
        DatasetKind::Blobs => 0.0,
    };
    if noise > 0.0 {
        let jitter = normal(0.0, noise)?;
        for point in points.iter_mut() {
            point.0 += jitter.sample(&mut rng);
            point.1 += jitter.sample(&mut rng);
        }
    }

    let n = points.len();
    let mut features = Array2::zeros((n, 2));
    let mut labels = Array1::zeros(n);
    for (i, &(x, y, label)) in points.iter().enumerate() {
        features[[i, 0]] = x;
        features[[i, 1]] = y;
        labels[i] = label;
    }

    Dataset::new(
        features,
        labels,
        vec!["feature1".to_string(), "feature2".to_string()],
        "target",
    )
}

/// Generate a dataset and write it as CSV to `path`
pub fn create_dummy_dataset<P: AsRef<Path>>(path: P, config: &SyntheticConfig) -> Result<Dataset> {
    let path = path.as_ref();
    info!(
        "Creating a '{}' dummy dataset with {} samples at '{}'",
        config.kind,
        config.n_samples,
        path.display()
    );
    let dataset = generate(config)?;
    crate::data::save_csv(&dataset, path)?;
    info!("Dummy dataset created successfully");
    Ok(dataset)
}

/// `count` evenly spaced values from `start` to `stop`
fn linspace(start: f64, stop: f64, count: usize, endpoint: bool) -> impl Iterator<Item = f64> {
    let divisions = if endpoint {
        count.saturating_sub(1).max(1)
    } else {
        count.max(1)
    };
    let step = (stop - start) / divisions as f64;
    (0..count).map(move |i| start + step * i as f64)
}

fn moons(n_samples: usize) -> Vec<(f64, f64, f64)> {
    let n_out = n_samples / 2;
    let n_in = n_samples - n_out;

    let outer = linspace(0.0, PI, n_out, true).map(|t| (t.cos(), t.sin(), 0.0));
    let inner = linspace(0.0, PI, n_in, true).map(|t| (1.0 - t.cos(), 1.0 - t.sin() - 0.5, 1.0));
    outer.chain(inner).collect()
}

fn circles(n_samples: usize) -> Vec<(f64, f64, f64)> {
    let n_out = n_samples / 2;
    let n_in = n_samples - n_out;

    let outer = linspace(0.0, 2.0 * PI, n_out, false).map(|t| (t.cos(), t.sin(), 0.0));
    let inner = linspace(0.0, 2.0 * PI, n_in, false)
        .map(|t| (CIRCLE_FACTOR * t.cos(), CIRCLE_FACTOR * t.sin(), 1.0));
    outer.chain(inner).collect()
}

fn blobs(n_samples: usize, noise: f64, rng: &mut StdRng) -> Result<Vec<(f64, f64, f64)>> {
    let (low, high) = BLOB_CENTER_BOX;
    let box_dist = Uniform::new(low, high);
    let centers: Vec<(f64, f64)> = (0..2)
        .map(|_| (box_dist.sample(rng), box_dist.sample(rng)))
        .collect();

    let spread = normal(0.0, 1.0 + noise)?;
    let mut points = Vec::with_capacity(n_samples);
    for (label, &(cx, cy)) in centers.iter().enumerate() {
        // Remainder goes to the first center
        let count = n_samples / 2 + usize::from(label < n_samples % 2);
        for _ in 0..count {
            points.push((
                cx + spread.sample(rng),
                cy + spread.sample(rng),
                label as f64,
            ));
        }
    }
    Ok(points)
}

fn normal(mean: f64, std_dev: f64) -> Result<Normal<f64>> {
    Normal::new(mean, std_dev).map_err(|e| SVMError::InvalidParameter(e.to_string()))
}
