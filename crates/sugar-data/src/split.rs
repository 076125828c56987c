//! Seeded train/test partitioning.

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, instrument};

use crate::dataset::Dataset;
use crate::DataError;

/// A dataset divided into disjoint training and held-out rows.
#[derive(Debug, Clone)]
pub struct Partition {
    /// Rows used for fitting.
    pub train: Dataset,
    /// Held-out rows used for scoring.
    pub test: Dataset,
}

/// Reproducible shuffled train/test split.
///
/// Rows are permuted with a ChaCha8 RNG seeded from `seed`; the first
/// `ceil(n_samples * test_fraction)` permuted rows form the test partition.
#[derive(Debug, Clone, Copy)]
pub struct TrainTestSplit {
    test_fraction: f64,
    seed: u64,
}

impl TrainTestSplit {
    /// Create a split holding out `test_fraction` of the rows (seed 42).
    ///
    /// # Errors
    ///
    /// Returns [`DataError::InvalidTestFraction`] unless `0.0 < test_fraction < 1.0`.
    pub fn new(test_fraction: f64) -> Result<Self, DataError> {
        if !(test_fraction > 0.0 && test_fraction < 1.0) {
            return Err(DataError::InvalidTestFraction {
                fraction: test_fraction,
            });
        }
        Ok(Self {
            test_fraction,
            seed: 42,
        })
    }

    /// Set the shuffle seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Return the held-out fraction.
    #[must_use]
    pub fn test_fraction(&self) -> f64 {
        self.test_fraction
    }

    /// Return the shuffle seed.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of rows held out from `n_samples`.
    #[must_use]
    pub fn n_test(&self, n_samples: usize) -> usize {
        (n_samples as f64 * self.test_fraction).ceil() as usize
    }

    /// Partition `dataset` into training and test rows.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::SplitTooSmall`] when either side would be empty.
    #[instrument(skip_all, fields(n_samples = dataset.n_samples(), seed = self.seed))]
    pub fn split(&self, dataset: &Dataset) -> Result<Partition, DataError> {
        let n_samples = dataset.n_samples();
        let n_test = self.n_test(n_samples);
        if n_test == 0 || n_test >= n_samples {
            return Err(DataError::SplitTooSmall { n_samples, n_test });
        }

        let mut order: Vec<usize> = (0..n_samples).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        order.shuffle(&mut rng);

        let (test_idx, train_idx) = order.split_at(n_test);
        debug!(n_train = train_idx.len(), n_test, "dataset partitioned");

        Ok(Partition {
            train: dataset.select(train_idx),
            test: dataset.select(test_idx),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(n: usize) -> Dataset {
        let features = (0..n).map(|i| vec![i as f64]).collect();
        let targets = (0..n).map(|i| i as f64).collect();
        Dataset::from_rows(vec!["i".to_string()], features, targets).unwrap()
    }

    fn ids(ds: &Dataset) -> Vec<usize> {
        ds.targets().iter().map(|&t| t as usize).collect()
    }

    #[test]
    fn sizes_round_test_up() {
        let part = TrainTestSplit::new(0.2).unwrap().split(&numbered(442)).unwrap();
        assert_eq!(part.test.n_samples(), 89);
        assert_eq!(part.train.n_samples(), 353);
    }

    #[test]
    fn partitions_are_disjoint_and_complete() {
        let part = TrainTestSplit::new(0.25).unwrap().split(&numbered(40)).unwrap();
        let mut all: Vec<usize> = ids(&part.train).into_iter().chain(ids(&part.test)).collect();
        all.sort_unstable();
        assert_eq!(all, (0..40).collect::<Vec<_>>());
    }

    #[test]
    fn rows_stay_aligned_with_targets() {
        let part = TrainTestSplit::new(0.3).unwrap().split(&numbered(20)).unwrap();
        for (row, &t) in part.test.features().iter().zip(part.test.targets()) {
            assert!((row[0] - t).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn same_seed_same_split() {
        let ds = numbered(100);
        let a = TrainTestSplit::new(0.2).unwrap().with_seed(42).split(&ds).unwrap();
        let b = TrainTestSplit::new(0.2).unwrap().with_seed(42).split(&ds).unwrap();
        assert_eq!(ids(&a.test), ids(&b.test));
        assert_eq!(ids(&a.train), ids(&b.train));
    }

    #[test]
    fn different_seed_different_split() {
        let ds = numbered(100);
        let a = TrainTestSplit::new(0.2).unwrap().with_seed(1).split(&ds).unwrap();
        let b = TrainTestSplit::new(0.2).unwrap().with_seed(2).split(&ds).unwrap();
        assert_ne!(ids(&a.test), ids(&b.test));
    }

    #[test]
    fn invalid_fraction_rejected() {
        for fraction in [0.0, 1.0, -0.1, f64::NAN] {
            assert!(matches!(
                TrainTestSplit::new(fraction),
                Err(DataError::InvalidTestFraction { .. })
            ));
        }
    }

    #[test]
    fn too_few_rows_rejected() {
        let err = TrainTestSplit::new(0.5).unwrap().split(&numbered(1)).unwrap_err();
        assert!(matches!(err, DataError::SplitTooSmall { n_samples: 1, n_test: 1 }));
    }
}
