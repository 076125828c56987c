//! Ensemble hyperparameters.

use crate::error::RfError;
use crate::result::RandomForestResult;
use crate::split::SplitMethod;

/// Whether to score each row on the trees that never drew it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OobMode {
    /// Compute out-of-bag R² and MSE after growing the trees.
    Enabled,
    /// Skip the out-of-bag pass.
    Disabled,
}

/// Hyperparameters for a bagged regression forest.
///
/// Every tree draws a bootstrap sample the size of the training set and
/// considers every feature at each split. Start from
/// [`RandomForestConfig::new`] and override with the `with_*` methods:
///
/// | Parameter      | Default    |
/// |----------------|------------|
/// | `max_depth`    | `None`     |
/// | `split_method` | `Exact`    |
/// | `seed`         | 42         |
/// | `oob_mode`     | `Disabled` |
#[derive(Debug, Clone)]
pub struct RandomForestConfig {
    pub(crate) n_trees: usize,
    pub(crate) max_depth: Option<usize>,
    pub(crate) split_method: SplitMethod,
    pub(crate) seed: u64,
    pub(crate) oob_mode: OobMode,
}

impl RandomForestConfig {
    /// Start a config for an ensemble of `n_trees` trees.
    ///
    /// # Errors
    ///
    /// Returns [`RfError::InvalidTreeCount`] for an empty ensemble.
    pub fn new(n_trees: usize) -> Result<Self, RfError> {
        if n_trees == 0 {
            return Err(RfError::InvalidTreeCount { n_trees });
        }
        Ok(Self {
            n_trees,
            max_depth: None,
            split_method: SplitMethod::Exact,
            seed: 42,
            oob_mode: OobMode::Disabled,
        })
    }

    /// Cap every tree at `max_depth` levels; `None` grows until leaves are pure.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[must_use]
    pub fn with_split_method(mut self, split_method: SplitMethod) -> Self {
        self.split_method = split_method;
        self
    }

    /// Seed of the master stream that every per-tree seed is drawn from.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_oob_mode(mut self, oob_mode: OobMode) -> Self {
        self.oob_mode = oob_mode;
        self
    }

    #[must_use]
    pub fn n_trees(&self) -> usize {
        self.n_trees
    }

    #[must_use]
    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    #[must_use]
    pub fn split_method(&self) -> SplitMethod {
        self.split_method
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[must_use]
    pub fn oob_mode(&self) -> OobMode {
        self.oob_mode
    }

    /// Fit the forest on row-major `features`, one target and one column
    /// name per row and column respectively.
    ///
    /// # Errors
    ///
    /// | Variant                           | When                                            |
    /// |-----------------------------------|-------------------------------------------------|
    /// | [`RfError::EmptyDataset`]         | `features` is empty                             |
    /// | [`RfError::ZeroFeatures`]         | rows have zero feature columns                  |
    /// | [`RfError::TargetCountMismatch`]  | `targets.len() != features.len()`               |
    /// | [`RfError::FeatureCountMismatch`] | rows have inconsistent lengths                  |
    /// | [`RfError::FeatureNameMismatch`]  | `feature_names.len()` differs from column count |
    /// | [`RfError::NonFiniteValue`]       | a feature value is NaN or infinite              |
    /// | [`RfError::NonFiniteTarget`]      | a target is NaN or infinite                     |
    /// | [`RfError::InvalidMaxDepth`]      | `max_depth` is `Some(0)`                        |
    /// | [`RfError::OobEvaluationFailed`]  | OOB enabled but no row was left out of any tree |
    pub fn train(
        &self,
        features: &[Vec<f64>],
        targets: &[f64],
        feature_names: &[String],
    ) -> Result<RandomForestResult, RfError> {
        crate::forest::train(self, features, targets, feature_names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_ensemble_rejected() {
        assert!(matches!(
            RandomForestConfig::new(0),
            Err(RfError::InvalidTreeCount { n_trees: 0 })
        ));
    }

    #[test]
    fn defaults() {
        let config = RandomForestConfig::new(100).unwrap();
        assert_eq!(config.n_trees(), 100);
        assert_eq!(config.max_depth(), None);
        assert_eq!(config.split_method(), SplitMethod::Exact);
        assert_eq!(config.seed(), 42);
        assert_eq!(config.oob_mode(), OobMode::Disabled);
    }

    #[test]
    fn overrides_chain() {
        let config = RandomForestConfig::new(10)
            .unwrap()
            .with_max_depth(Some(4))
            .with_split_method(SplitMethod::ExtraTrees)
            .with_seed(7)
            .with_oob_mode(OobMode::Enabled);
        assert_eq!(config.max_depth(), Some(4));
        assert_eq!(config.split_method(), SplitMethod::ExtraTrees);
        assert_eq!(config.seed(), 7);
        assert_eq!(config.oob_mode(), OobMode::Enabled);
    }
}
