use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, instrument};

use crate::{
    RfError,
    node::{Node, NodeIndex},
    split::{SplitMethod, SplitParams, TargetStats, find_best_split},
};

/// Configuration for a single CART regression tree.
///
/// Construct via [`DecisionTreeConfig::new`], then chain `with_*` methods.
///
/// # Defaults
///
/// | Parameter           | Default               |
/// |---------------------|-----------------------|
/// | `split_method`      | `Exact`               |
/// | `max_depth`         | `None` (unlimited)    |
/// | `min_samples_split` | 2                     |
/// | `min_samples_leaf`  | 1                     |
/// | `seed`              | 42                    |
#[derive(Debug, Clone)]
pub struct DecisionTreeConfig {
    pub(crate) split_method: SplitMethod,
    pub(crate) max_depth: Option<usize>,
    pub(crate) min_samples_split: usize,
    pub(crate) min_samples_leaf: usize,
    pub(crate) seed: u64,
}

impl DecisionTreeConfig {
    /// Create a new config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            split_method: SplitMethod::Exact,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            seed: 42,
        }
    }

    /// Set the split-finding strategy.
    #[must_use]
    pub fn with_split_method(mut self, split_method: SplitMethod) -> Self {
        self.split_method = split_method;
        self
    }

    /// Set the maximum tree depth.
    ///
    /// `None` means grow until leaves are pure or stopping conditions are
    /// met. `Some(d)` limits depth to `d` levels (root is depth 0).
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the minimum number of samples required to attempt a split.
    #[must_use]
    pub fn with_min_samples_split(mut self, min_samples_split: usize) -> Self {
        self.min_samples_split = min_samples_split;
        self
    }

    /// Set the minimum number of samples required in each leaf after a split.
    #[must_use]
    pub fn with_min_samples_leaf(mut self, min_samples_leaf: usize) -> Self {
        self.min_samples_leaf = min_samples_leaf;
        self
    }

    /// Set the random seed for reproducibility.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Train a regression tree on the provided row-major dataset.
    ///
    /// `features[sample_idx][feature_idx]` is row-major; `targets[sample_idx]`
    /// is the continuous response.
    ///
    /// # Errors
    ///
    /// | Variant                             | When                                            |
    /// |-------------------------------------|-------------------------------------------------|
    /// | [`RfError::EmptyDataset`]           | `features` is empty                             |
    /// | [`RfError::ZeroFeatures`]           | rows have zero feature columns                  |
    /// | [`RfError::TargetCountMismatch`]    | `targets.len() != features.len()`               |
    /// | [`RfError::FeatureCountMismatch`]   | rows have inconsistent lengths                  |
    /// | [`RfError::NonFiniteValue`]         | any feature value is NaN or infinite            |
    /// | [`RfError::NonFiniteTarget`]        | any target is NaN or infinite                   |
    /// | [`RfError::InvalidMaxDepth`]        | `max_depth` is `Some(0)`                        |
    /// | [`RfError::InvalidMinSamplesSplit`] | `min_samples_split` < 2                         |
    /// | [`RfError::InvalidMinSamplesLeaf`]  | `min_samples_leaf` < 1                          |
    #[instrument(skip(self, features, targets), fields(n_samples = features.len()))]
    pub fn fit(&self, features: &[Vec<f64>], targets: &[f64]) -> Result<DecisionTree, RfError> {
        let n_features = validate_training_data(features, targets)?;
        self.validate()?;
        Ok(self.grow(features, targets, n_features))
    }

    pub(crate) fn validate(&self) -> Result<(), RfError> {
        if self.max_depth == Some(0) {
            return Err(RfError::InvalidMaxDepth { max_depth: 0 });
        }
        if self.min_samples_split < 2 {
            return Err(RfError::InvalidMinSamplesSplit {
                min_samples_split: self.min_samples_split,
            });
        }
        if self.min_samples_leaf < 1 {
            return Err(RfError::InvalidMinSamplesLeaf {
                min_samples_leaf: self.min_samples_leaf,
            });
        }
        Ok(())
    }

    /// Build the tree on data that has already passed validation.
    pub(crate) fn grow(
        &self,
        features: &[Vec<f64>],
        targets: &[f64],
        n_features: usize,
    ) -> DecisionTree {
        let params = SplitParams {
            method: self.split_method,
            min_samples_leaf: self.min_samples_leaf,
        };

        // Convert to column-major layout for the split search.
        let col_features: Vec<Vec<f64>> = (0..n_features)
            .map(|feat_idx| features.iter().map(|row| row[feat_idx]).collect())
            .collect();

        let sample_indices: Vec<usize> = (0..features.len()).collect();
        let mut builder = TreeBuilder {
            col_features: &col_features,
            targets,
            config: self,
            params,
            rng: ChaCha8Rng::seed_from_u64(self.seed),
            arena: Vec::new(),
        };
        let root = builder.build(&sample_indices, 0);

        debug!(
            root_index = root.index(),
            n_nodes = builder.arena.len(),
            "regression tree built"
        );

        DecisionTree {
            nodes: builder.arena,
            n_features,
        }
    }
}

impl Default for DecisionTreeConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate a row-major training set and return its feature count.
pub(crate) fn validate_training_data(
    features: &[Vec<f64>],
    targets: &[f64],
) -> Result<usize, RfError> {
    if features.is_empty() {
        return Err(RfError::EmptyDataset);
    }
    let n_features = features[0].len();
    if n_features == 0 {
        return Err(RfError::ZeroFeatures);
    }
    if targets.len() != features.len() {
        return Err(RfError::TargetCountMismatch {
            n_samples: features.len(),
            n_targets: targets.len(),
        });
    }
    for (sample_index, row) in features.iter().enumerate() {
        if row.len() != n_features {
            return Err(RfError::FeatureCountMismatch {
                expected: n_features,
                got: row.len(),
                sample_index,
            });
        }
        if let Some(feature_index) = row.iter().position(|v| !v.is_finite()) {
            return Err(RfError::NonFiniteValue {
                sample_index,
                feature_index,
            });
        }
    }
    if let Some(sample_index) = targets.iter().position(|t| !t.is_finite()) {
        return Err(RfError::NonFiniteTarget { sample_index });
    }
    Ok(n_features)
}

/// Recursive arena builder; owns the RNG so node order drives the random stream.
struct TreeBuilder<'a> {
    col_features: &'a [Vec<f64>],
    targets: &'a [f64],
    config: &'a DecisionTreeConfig,
    params: SplitParams,
    rng: ChaCha8Rng,
    arena: Vec<Node>,
}

impl TreeBuilder<'_> {
    fn build(&mut self, sample_indices: &[usize], depth: usize) -> NodeIndex {
        let stats = TargetStats::from_indices(self.targets, sample_indices);
        let impurity = stats.impurity();
        let n_samples = stats.n;

        let depth_exceeded = self.config.max_depth.is_some_and(|max_d| depth >= max_d);
        let too_few = n_samples < self.config.min_samples_split;
        let pure = impurity.value() <= f64::EPSILON;

        let split = if too_few || pure || depth_exceeded {
            None
        } else {
            find_best_split(
                self.col_features,
                self.targets,
                sample_indices,
                self.params,
                &mut self.rng,
            )
        };

        let Some(split) = split else {
            let idx = self.arena.len();
            self.arena.push(Node::Leaf {
                value: stats.mean(),
                impurity,
                n_samples,
            });
            return NodeIndex::new(idx);
        };

        // Reserve the parent slot so children get stable indices, then overwrite.
        let node_idx = self.arena.len();
        self.arena.push(Node::Leaf {
            value: stats.mean(),
            impurity,
            n_samples,
        });

        let left = self.build(&split.left_indices, depth + 1);
        let right = self.build(&split.right_indices, depth + 1);

        self.arena[node_idx] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
            impurity,
            n_samples,
            impurity_decrease: split.impurity_decrease,
        };

        NodeIndex::new(node_idx)
    }
}

/// A fitted CART regression tree.
///
/// Stored as an arena-based `Vec<Node>`; the root is always index 0.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct DecisionTree {
    pub(crate) nodes: Vec<Node>,
    pub(crate) n_features: usize,
}

impl DecisionTree {
    /// Predict the target for a single sample.
    ///
    /// Traverses from the root: at each `Split`, goes left when
    /// `sample[feature] <= threshold`, right otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`RfError::PredictionFeatureMismatch`] when `sample.len() != n_features`.
    pub fn predict(&self, sample: &[f64]) -> Result<f64, RfError> {
        if sample.len() != self.n_features {
            return Err(RfError::PredictionFeatureMismatch {
                expected: self.n_features,
                got: sample.len(),
            });
        }
        Ok(self.leaf_value(sample))
    }

    /// Check the arena invariants a decoded tree must satisfy before it can
    /// be traversed: a non-empty arena, children stored after their parent
    /// and inside the arena, feature indices below `n_features`, and finite
    /// thresholds and leaf values.
    pub(crate) fn check_structure(&self) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }
        let n_nodes = self.nodes.len();
        for (idx, node) in self.nodes.iter().enumerate() {
            match node {
                Node::Leaf { value, .. } => {
                    if !value.is_finite() {
                        return Err(format!("leaf {idx} has non-finite value {value}"));
                    }
                }
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    ..
                } => {
                    for child in [left.index(), right.index()] {
                        if child <= idx || child >= n_nodes {
                            return Err(format!(
                                "node {idx} points to child {child} outside ({idx}, {n_nodes})"
                            ));
                        }
                    }
                    if feature.index() >= self.n_features {
                        return Err(format!(
                            "node {idx} splits on feature {feature}, tree has {}",
                            self.n_features
                        ));
                    }
                    if threshold.is_nan() {
                        return Err(format!("node {idx} has a NaN threshold"));
                    }
                }
            }
        }
        Ok(())
    }

    /// Traverse without checking the sample length.
    pub(crate) fn leaf_value(&self, sample: &[f64]) -> f64 {
        let mut idx = 0usize;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { value, .. } => return *value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    ..
                } => {
                    idx = if sample[feature.index()] <= *threshold {
                        left.index()
                    } else {
                        right.index()
                    };
                }
            }
        }
    }

    /// Compute Mean Decrease in Impurity (MDI) feature importances.
    ///
    /// Sums `impurity_decrease` per feature over all split nodes and
    /// normalizes to 1.0. All zeros when the tree is a single leaf.
    #[must_use]
    pub fn feature_importances(&self) -> Vec<f64> {
        let mut totals = vec![0.0f64; self.n_features];
        for node in &self.nodes {
            if let Node::Split {
                feature,
                impurity_decrease,
                ..
            } = node
            {
                totals[feature.index()] += impurity_decrease;
            }
        }
        let sum: f64 = totals.iter().sum();
        if sum > 0.0 {
            totals.iter_mut().for_each(|v| *v /= sum);
        }
        totals
    }

    /// Return the nodes in arena order.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Return the total number of nodes in the tree (both splits and leaves).
    #[must_use]
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Return the number of leaf nodes.
    #[must_use]
    pub fn n_leaves(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Return the maximum depth of the tree (a lone root leaf has depth 0).
    #[must_use]
    pub fn depth(&self) -> usize {
        if self.nodes.is_empty() {
            return 0;
        }

        let mut max_depth = 0usize;
        let mut queue = std::collections::VecDeque::new();
        queue.push_back((0usize, 0usize));

        while let Some((node_idx, d)) = queue.pop_front() {
            match &self.nodes[node_idx] {
                Node::Leaf { .. } => max_depth = max_depth.max(d),
                Node::Split { left, right, .. } => {
                    queue.push_back((left.index(), d + 1));
                    queue.push_back((right.index(), d + 1));
                }
            }
        }

        max_depth
    }
}
