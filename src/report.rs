//! Run artifacts: the metrics file and the decision-boundary plot

use crate::core::{Result, SVMError};
use crate::data::Dataset;
use crate::utils::stats::column_ranges;
use log::info;
use ndarray::{Array2, ArrayView2};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::fs;
use std::path::Path;

/// Default spacing of the decision mesh in standardized units
pub const DEFAULT_PLOT_STEP: f64 = 0.05;
/// Margin added around the training range on each side
pub const PLOT_MARGIN: f64 = 0.5;

const PLOT_SIZE: (u32, u32) = (800, 600);
const NEGATIVE_COLOR: RGBColor = RGBColor(33, 102, 172);
const POSITIVE_COLOR: RGBColor = RGBColor(178, 24, 43);
const BOUNDARY_COLOR: RGBColor = RGBColor(64, 64, 64);

/// Render the metrics file contents
pub fn format_metrics(accuracy: f64, n_support_vectors: usize) -> String {
    format!(
        "Test Set Accuracy: {accuracy:.4}\nNumber of Support Vectors: {n_support_vectors}\n"
    )
}

/// Write the two-line metrics file
pub fn write_metrics<P: AsRef<Path>>(path: P, accuracy: f64, n_support_vectors: usize) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, format_metrics(accuracy, n_support_vectors))?;
    info!("Metrics saved to {}", path.display());
    Ok(())
}

/// Regular 2D grid of points covering a feature range
#[derive(Debug, Clone)]
pub struct Mesh {
    xs: Vec<f64>,
    ys: Vec<f64>,
    step: f64,
}

impl Mesh {
    /// Grid over the per-column range of `features` widened by `margin`
    pub fn covering(features: ArrayView2<f64>, margin: f64, step: f64) -> Result<Self> {
        if !(step.is_finite() && step > 0.0) {
            return Err(SVMError::InvalidParameter(format!(
                "plot step must be positive, got: {step}"
            )));
        }
        if features.ncols() != 2 {
            return Err(SVMError::DimensionMismatch {
                expected: 2,
                actual: features.ncols(),
            });
        }
        let ranges = column_ranges(features).ok_or(SVMError::EmptyDataset)?;
        let (x_min, x_max) = ranges[0];
        let (y_min, y_max) = ranges[1];

        Ok(Self {
            xs: arange(x_min - margin, x_max + margin, step),
            ys: arange(y_min - margin, y_max + margin, step),
            step,
        })
    }

    /// Number of grid points
    pub fn len(&self) -> usize {
        self.xs.len() * self.ys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    /// All grid points as rows, x varying fastest
    pub fn points(&self) -> Array2<f64> {
        let nx = self.xs.len();
        Array2::from_shape_fn((self.len(), 2), |(i, j)| {
            if j == 0 {
                self.xs[i % nx]
            } else {
                self.ys[i / nx]
            }
        })
    }

    fn x_range(&self) -> std::ops::Range<f64> {
        bounds(&self.xs, self.step)
    }

    fn y_range(&self) -> std::ops::Range<f64> {
        bounds(&self.ys, self.step)
    }
}

/// Half-open `[start, stop)` with spacing `step`
fn arange(start: f64, stop: f64, step: f64) -> Vec<f64> {
    let count = ((stop - start) / step).ceil().max(1.0) as usize;
    (0..count).map(|i| start + step * i as f64).collect()
}

fn bounds(values: &[f64], step: f64) -> std::ops::Range<f64> {
    let first = values.first().copied().unwrap_or(0.0);
    let last = values.last().copied().unwrap_or(first);
    (first - step / 2.0)..(last + step / 2.0)
}

/// Everything drawn in a decision-boundary plot, in standardized space
pub struct DecisionPlot<'a> {
    pub train: &'a Dataset,
    pub test: &'a Dataset,
    /// Support vector rows of `train`
    pub support_indices: &'a [usize],
    pub mesh: &'a Mesh,
    /// Decision value per mesh point, in `Mesh::points` order
    pub scores: &'a [f64],
    /// (negative, positive) class values
    pub classes: [f64; 2],
}

/// Render the decision surface plus train, test and support points as SVG
pub fn plot_decision_boundary<P: AsRef<Path>>(path: P, plot: &DecisionPlot<'_>) -> Result<()> {
    let path = path.as_ref();
    if plot.train.dim() != 2 {
        return Err(SVMError::DimensionMismatch {
            expected: 2,
            actual: plot.train.dim(),
        });
    }
    if plot.scores.len() != plot.mesh.len() {
        return Err(SVMError::DimensionMismatch {
            expected: plot.mesh.len(),
            actual: plot.scores.len(),
        });
    }

    let root = SVGBackend::new(path, PLOT_SIZE).into_drawing_area();
    draw(&root, plot)?;
    root.present().map_err(plot_error)?;

    info!("Decision boundary plot saved to {}", path.display());
    Ok(())
}

fn draw(root: &DrawingArea<SVGBackend<'_>, Shift>, plot: &DecisionPlot<'_>) -> Result<()> {
    root.fill(&WHITE).map_err(plot_error)?;

    let mut chart = ChartBuilder::on(root)
        .margin(10)
        .build_cartesian_2d(plot.mesh.x_range(), plot.mesh.y_range())
        .map_err(plot_error)?;

    let max_abs = plot
        .scores
        .iter()
        .fold(0.0_f64, |acc, s| acc.max(s.abs()))
        .max(f64::EPSILON);
    let half = plot.mesh.step() / 2.0;
    let points = plot.mesh.points();

    chart
        .draw_series(points.outer_iter().zip(plot.scores.iter()).map(|(p, &score)| {
            Rectangle::new(
                [(p[0] - half, p[1] - half), (p[0] + half, p[1] + half)],
                shade(score / max_abs).filled(),
            )
        }))
        .map_err(plot_error)?;

    let class_color = |label: f64| {
        if label == plot.classes[1] {
            POSITIVE_COLOR
        } else {
            NEGATIVE_COLOR
        }
    };

    let train_x = plot.train.features();
    chart
        .draw_series(
            train_x
                .outer_iter()
                .zip(plot.train.labels().iter())
                .map(|(p, &label)| Circle::new((p[0], p[1]), 4, class_color(label).filled())),
        )
        .map_err(plot_error)?;

    let test_x = plot.test.features();
    chart
        .draw_series(test_x.outer_iter().zip(plot.test.labels().iter()).map(|(p, &label)| {
            EmptyElement::at((p[0], p[1]))
                + Rectangle::new([(-4, -4), (4, 4)], class_color(label).filled())
                + Rectangle::new([(-4, -4), (4, 4)], BLACK.stroke_width(1))
        }))
        .map_err(plot_error)?;

    chart
        .draw_series(
            plot.support_indices
                .iter()
                .filter(|&&i| i < train_x.nrows())
                .map(|&i| Circle::new((train_x[[i, 0]], train_x[[i, 1]]), 7, BLACK.stroke_width(1))),
        )
        .map_err(plot_error)?;

    Ok(())
}

/// Diverging palette: -1 is saturated blue, +1 saturated red, near 0 a grey band
fn shade(t: f64) -> RGBColor {
    let t = t.clamp(-1.0, 1.0);
    if t.abs() < 0.02 {
        return BOUNDARY_COLOR;
    }
    let target = if t < 0.0 { NEGATIVE_COLOR } else { POSITIVE_COLOR };
    let weight = 0.15 + 0.5 * t.abs();
    let mix = |c: u8| (255.0 - (255.0 - f64::from(c)) * weight).round() as u8;
    RGBColor(mix(target.0), mix(target.1), mix(target.2))
}

fn plot_error<E: std::error::Error + Send + Sync>(err: DrawingAreaErrorKind<E>) -> SVMError {
    SVMError::Plot(err.to_string())
}
