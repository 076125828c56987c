//! Prediction methods for the Random Forest ensemble.

use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::error::RfError;
use crate::forest::RandomForest;

impl RandomForest {
    /// Predict the response for a single sample.
    ///
    /// Returns the mean of the member trees' leaf values.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`RfError::PredictionFeatureMismatch`] | `sample.len() != n_features` |
    /// | [`RfError::NonFinitePredictionInput`] | any value is NaN or infinite |
    pub fn predict(&self, sample: &[f64]) -> Result<f64, RfError> {
        if sample.len() != self.n_features {
            return Err(RfError::PredictionFeatureMismatch {
                expected: self.n_features,
                got: sample.len(),
            });
        }
        if let Some(feature_index) = sample.iter().position(|v| !v.is_finite()) {
            return Err(RfError::NonFinitePredictionInput { feature_index });
        }

        let sum: f64 = self.trees.iter().map(|tree| tree.leaf_value(sample)).sum();
        Ok(sum / self.trees.len() as f64)
    }

    /// Predict responses for a batch of samples in parallel.
    ///
    /// Output order matches input order.
    ///
    /// # Errors
    ///
    /// Returns the first error [`RandomForest::predict`] would raise for any row.
    pub fn predict_batch(&self, features: &[Vec<f64>]) -> Result<Vec<f64>, RfError> {
        features
            .into_par_iter()
            .map(|sample| self.predict(sample))
            .collect()
    }

    /// Return the number of features this forest was trained on.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Return the number of trees in the ensemble.
    #[must_use]
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Return the feature names, in training column order.
    #[must_use]
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Borrow the member trees.
    #[must_use]
    pub fn trees(&self) -> &[crate::tree::DecisionTree] {
        &self.trees
    }
}
