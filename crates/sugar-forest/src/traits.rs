//! Learner abstraction: anything that fits a regressor, and anything fitted.

use crate::config::RandomForestConfig;
use crate::error::RfError;
use crate::forest::RandomForest;
use crate::metrics::r2_score;

/// A fitted regression model.
pub trait FittedModel {
    /// Predict one response per row.
    ///
    /// # Errors
    ///
    /// Returns an error when a row does not match the model's input shape.
    fn predict_rows(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>, RfError>;

    /// R² of this model's predictions against `targets`.
    ///
    /// # Errors
    ///
    /// Propagates prediction errors and [`RfError::ScoreLengthMismatch`].
    fn score(&self, rows: &[Vec<f64>], targets: &[f64]) -> Result<f64, RfError> {
        let predicted = self.predict_rows(rows)?;
        r2_score(targets, &predicted)
    }
}

/// A regression learner configuration.
pub trait Regressor {
    /// The model produced by [`Regressor::fit`].
    type Model: FittedModel;

    /// Fit a model to row-major `features` and their `targets`.
    ///
    /// # Errors
    ///
    /// Returns an error when the training data or configuration is invalid.
    fn fit(&self, features: &[Vec<f64>], targets: &[f64]) -> Result<Self::Model, RfError>;
}

impl FittedModel for RandomForest {
    fn predict_rows(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>, RfError> {
        self.predict_batch(rows)
    }
}

impl Regressor for RandomForestConfig {
    type Model = RandomForest;

    /// Columns are named `f0`, `f1`, ... in the fitted model.
    fn fit(&self, features: &[Vec<f64>], targets: &[f64]) -> Result<RandomForest, RfError> {
        let n_columns = features.first().map_or(0, Vec::len);
        let names: Vec<String> = (0..n_columns).map(|i| format!("f{i}")).collect();
        Ok(self.train(features, targets, &names)?.into_forest())
    }
}
