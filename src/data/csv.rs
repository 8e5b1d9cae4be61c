//! CSV format dataset loading and writing
//!
//! Files must start with a header row. One column, named by the caller, holds
//! the class label; every other column is a real-valued feature, kept in file
//! order. Labels may be numeric or boolean (`true`/`false`).

use crate::core::{Result, SVMError};
use crate::data::Dataset;
use log::info;
use ndarray::{Array1, Array2};
use std::io::{Read, Write};
use std::path::Path;

/// Load a dataset from a CSV file
pub fn load_csv<P: AsRef<Path>>(path: P, target_column: &str) -> Result<Dataset> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(SVMError::MissingFile(path.to_path_buf()));
    }

    let reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)?;
    let dataset = read_dataset(reader, target_column)?;

    info!(
        "Loaded {} samples with {} features from {}",
        dataset.len(),
        dataset.dim(),
        path.display()
    );
    Ok(dataset)
}

/// Load a dataset from any reader producing CSV text
pub fn load_csv_from_reader<R: Read>(reader: R, target_column: &str) -> Result<Dataset> {
    let reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    read_dataset(reader, target_column)
}

fn read_dataset<R: Read>(mut reader: csv::Reader<R>, target_column: &str) -> Result<Dataset> {
    let headers = reader.headers()?.clone();
    let target_idx = headers
        .iter()
        .position(|name| name == target_column)
        .ok_or_else(|| SVMError::MissingColumn(target_column.to_string()))?;

    let feature_names: Vec<String> = headers
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != target_idx)
        .map(|(_, name)| name.to_string())
        .collect();
    if feature_names.is_empty() {
        return Err(SVMError::InvalidDataset(
            "no feature columns besides the target".to_string(),
        ));
    }

    let mut values = Vec::new();
    let mut labels = Vec::new();
    for (row_idx, record) in reader.records().enumerate() {
        let record = record?;
        // Header is line 1, so data row 0 sits on line 2
        let line = row_idx + 2;

        for (col_idx, field) in record.iter().enumerate() {
            let column = headers.get(col_idx).unwrap_or("?");
            if col_idx == target_idx {
                labels.push(parse_label(field).ok_or_else(|| {
                    SVMError::ParseError(format!(
                        "line {line}, column '{column}': invalid label '{field}'"
                    ))
                })?);
            } else {
                values.push(field.parse::<f64>().map_err(|e| {
                    SVMError::ParseError(format!(
                        "line {line}, column '{column}': invalid number '{field}': {e}"
                    ))
                })?);
            }
        }
    }

    if labels.is_empty() {
        return Err(SVMError::EmptyDataset);
    }

    let n_rows = labels.len();
    let features = Array2::from_shape_vec((n_rows, feature_names.len()), values)
        .map_err(|e| SVMError::InvalidDataset(e.to_string()))?;

    Dataset::new(
        features,
        Array1::from(labels),
        feature_names,
        target_column,
    )
}

/// Numeric labels pass through; booleans map to 1/0
fn parse_label(field: &str) -> Option<f64> {
    if let Ok(value) = field.parse::<f64>() {
        return value.is_finite().then_some(value);
    }
    match field.to_ascii_lowercase().as_str() {
        "true" => Some(1.0),
        "false" => Some(0.0),
        _ => None,
    }
}

/// Write a dataset as CSV with the target as last column
///
/// Integral labels are written without a fractional part so that 0/1 classes
/// round-trip as `0`/`1`.
pub fn write_csv<W: Write>(dataset: &Dataset, writer: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);

    let mut header: Vec<&str> = dataset.feature_names().iter().map(String::as_str).collect();
    header.push(dataset.target_name());
    writer.write_record(&header)?;

    for (row, &label) in dataset.features().outer_iter().zip(dataset.labels().iter()) {
        let mut record: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        record.push(format_label(label));
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}

/// Write a dataset to a CSV file at `path`
pub fn save_csv<P: AsRef<Path>>(dataset: &Dataset, path: P) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_csv(dataset, std::io::BufWriter::new(file))
}

fn format_label(label: f64) -> String {
    if label.fract() == 0.0 {
        format!("{}", label as i64)
    } else {
        label.to_string()
    }
}
