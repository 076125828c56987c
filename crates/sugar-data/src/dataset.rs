//! In-memory tabular regression dataset.

use crate::DataError;

/// Rows of real-valued features with one continuous target each.
///
/// `features[i]` and `targets[i]` describe the same sample; every row has
/// `feature_names.len()` values.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    feature_names: Vec<String>,
    features: Vec<Vec<f64>>,
    targets: Vec<f64>,
}

impl Dataset {
    /// Build a dataset from row-major features and targets.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DataError::NoFeatureColumns`] | `feature_names` is empty |
    /// | [`DataError::TargetCountMismatch`] | `targets.len() != features.len()` |
    /// | [`DataError::InconsistentRowLength`] | a row's length differs from `feature_names.len()` |
    pub fn from_rows(
        feature_names: Vec<String>,
        features: Vec<Vec<f64>>,
        targets: Vec<f64>,
    ) -> Result<Self, DataError> {
        if feature_names.is_empty() {
            return Err(DataError::NoFeatureColumns {
                origin: "in-memory rows".to_string(),
            });
        }
        if features.len() != targets.len() {
            return Err(DataError::TargetCountMismatch {
                n_rows: features.len(),
                n_targets: targets.len(),
            });
        }
        if let Some((row_index, row)) = features
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != feature_names.len())
        {
            return Err(DataError::InconsistentRowLength {
                origin: "in-memory rows".to_string(),
                row_index,
                expected: feature_names.len(),
                got: row.len(),
            });
        }
        Ok(Self::new(feature_names, features, targets))
    }

    pub(crate) fn new(feature_names: Vec<String>, features: Vec<Vec<f64>>, targets: Vec<f64>) -> Self {
        Self {
            feature_names,
            features,
            targets,
        }
    }

    /// Copy the given rows, in the given order, into a new dataset.
    pub(crate) fn select(&self, indices: &[usize]) -> Self {
        Self {
            feature_names: self.feature_names.clone(),
            features: indices.iter().map(|&i| self.features[i].clone()).collect(),
            targets: indices.iter().map(|&i| self.targets[i]).collect(),
        }
    }

    /// Return the number of samples (rows).
    #[must_use]
    pub fn n_samples(&self) -> usize {
        self.features.len()
    }

    /// Return the number of feature columns.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    /// Return `(n_samples, n_features)`.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.n_samples(), self.n_features())
    }

    /// Return the feature column names in column order.
    #[must_use]
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Return the feature rows: `features()[sample][feature]`.
    #[must_use]
    pub fn features(&self) -> &[Vec<f64>] {
        &self.features
    }

    /// Return the targets, one per row.
    #[must_use]
    pub fn targets(&self) -> &[f64] {
        &self.targets
    }
}
