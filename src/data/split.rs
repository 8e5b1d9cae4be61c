//! Reproducible train/test splitting

use crate::core::{Result, SVMError};
use crate::data::Dataset;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Disjoint training and held-out partitions of one dataset
#[derive(Debug, Clone)]
pub struct TrainTestSplit {
    pub train: Dataset,
    pub test: Dataset,
}

/// Shuffle with `seed` and hold out `ceil(test_size * n)` samples
///
/// The first `n_test` entries of the seeded permutation form the test set,
/// the remainder the training set. Both partitions must be non-empty.
pub fn train_test_split(dataset: &Dataset, test_size: f64, seed: u64) -> Result<TrainTestSplit> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(SVMError::InvalidParameter(format!(
            "test size must be between 0 and 1, got: {test_size}"
        )));
    }

    let n = dataset.len();
    let n_test = (test_size * n as f64).ceil() as usize;
    if n_test == 0 || n_test >= n {
        return Err(SVMError::InvalidDataset(format!(
            "cannot split {n} samples with test size {test_size} into non-empty train and test sets"
        )));
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let (test_idx, train_idx) = indices.split_at(n_test);
    Ok(TrainTestSplit {
        train: dataset.select(train_idx),
        test: dataset.select(test_idx),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, Array2};

    fn numbered(n: usize) -> Dataset {
        let features = Array2::from_shape_fn((n, 1), |(i, _)| i as f64);
        let labels = Array1::from_shape_fn(n, |i| (i % 2) as f64);
        Dataset::new(features, labels, vec!["id".to_string()], "target").unwrap()
    }

    #[test]
    fn test_split_sizes() {
        let split = train_test_split(&numbered(200), 0.3, 42).unwrap();
        assert_eq!(split.test.len(), 60);
        assert_eq!(split.train.len(), 140);

        let split = train_test_split(&numbered(10), 0.25, 1).unwrap();
        assert_eq!(split.test.len(), 3);
        assert_eq!(split.train.len(), 7);
    }

    #[test]
    fn test_split_is_disjoint_and_complete() {
        let split = train_test_split(&numbered(50), 0.3, 7).unwrap();
        let mut ids: Vec<usize> = split
            .train
            .features()
            .column(0)
            .iter()
            .chain(split.test.features().column(0).iter())
            .map(|&v| v as usize)
            .collect();
        ids.sort_unstable();
        assert_eq!(ids, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_split_is_reproducible() {
        let ds = numbered(40);
        let a = train_test_split(&ds, 0.3, 42).unwrap();
        let b = train_test_split(&ds, 0.3, 42).unwrap();
        let c = train_test_split(&ds, 0.3, 43).unwrap();

        assert_eq!(a.train, b.train);
        assert_eq!(a.test, b.test);
        assert_ne!(a.test, c.test);
    }

    #[test]
    fn test_split_keeps_rows_and_labels_together() {
        let split = train_test_split(&numbered(30), 0.5, 3).unwrap();
        for part in [&split.train, &split.test] {
            for (row, &label) in part.features().outer_iter().zip(part.labels().iter()) {
                assert_eq!((row[0] as usize % 2) as f64, label);
            }
        }
    }

    #[test]
    fn test_invalid_test_size() {
        let ds = numbered(10);
        assert!(matches!(
            train_test_split(&ds, 0.0, 1),
            Err(SVMError::InvalidParameter(_))
        ));
        assert!(train_test_split(&ds, 1.0, 1).is_err());
        assert!(train_test_split(&ds, f64::NAN, 1).is_err());
        assert!(matches!(
            train_test_split(&numbered(1), 0.5, 1),
            Err(SVMError::InvalidDataset(_))
        ));
    }
}
