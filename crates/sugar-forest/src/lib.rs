//! Random Forest regression: train, score, predict, persist.
//!
//! Provides a hand-rolled Random Forest regressor with CART trees under the
//! squared-error criterion, exact or extra-trees split search, parallel
//! training via rayon, out-of-bag evaluation, feature importance, and
//! versioned model serialization.

mod config;
mod error;
mod forest;
mod importance;
mod metrics;
mod node;
mod oob;
mod predict;
mod result;
mod serialize;
mod split;
mod traits;
mod tree;

pub use config::{OobMode, RandomForestConfig};
pub use error::RfError;
pub use forest::RandomForest;
pub use importance::RankedFeature;
pub use metrics::{mean_absolute_error, mean_squared_error, r2_score};
pub use node::{FeatureIndex, Impurity, Node, NodeIndex};
pub use oob::OobScore;
pub use result::RandomForestResult;
pub use split::SplitMethod;
pub use traits::{FittedModel, Regressor};
pub use tree::{DecisionTree, DecisionTreeConfig};
