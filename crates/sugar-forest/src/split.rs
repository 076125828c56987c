use rand::Rng;
use rand::seq::SliceRandom;

use crate::node::{FeatureIndex, Impurity};

/// Strategy for choosing the split threshold on each candidate feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SplitMethod {
    /// Exhaustive CART search over every midpoint between sorted values.
    Exact,
    /// Extremely randomized trees: one uniform random threshold per feature.
    ExtraTrees,
}

/// Running sums for the squared-error criterion.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct TargetStats {
    pub(crate) n: usize,
    pub(crate) sum: f64,
    pub(crate) sum_sq: f64,
}

impl TargetStats {
    pub(crate) fn from_indices(targets: &[f64], sample_indices: &[usize]) -> Self {
        let mut stats = Self::default();
        for &si in sample_indices {
            stats.push(targets[si]);
        }
        stats
    }

    pub(crate) fn push(&mut self, y: f64) {
        self.n += 1;
        self.sum += y;
        self.sum_sq += y * y;
    }

    fn remove(&mut self, y: f64) {
        self.n -= 1;
        self.sum -= y;
        self.sum_sq -= y * y;
    }

    /// Sum of squared deviations from the mean, clamped at zero.
    pub(crate) fn sse(&self) -> f64 {
        if self.n == 0 {
            return 0.0;
        }
        (self.sum_sq - self.sum * self.sum / self.n as f64).max(0.0)
    }

    pub(crate) fn mean(&self) -> f64 {
        if self.n == 0 {
            0.0
        } else {
            self.sum / self.n as f64
        }
    }

    /// Mean squared error of predicting the mean.
    pub(crate) fn impurity(&self) -> Impurity {
        if self.n == 0 {
            return Impurity::new(0.0);
        }
        Impurity::new(self.sse() / self.n as f64)
    }
}

/// Result of finding the best split for a node.
#[derive(Debug, Clone)]
pub(crate) struct SplitResult {
    /// Feature used for the split.
    pub(crate) feature: FeatureIndex,
    /// Threshold value.
    pub(crate) threshold: f64,
    /// Reduction in total squared error from this split (MDI numerator).
    pub(crate) impurity_decrease: f64,
    /// Sample indices going to the left child.
    pub(crate) left_indices: Vec<usize>,
    /// Sample indices going to the right child.
    pub(crate) right_indices: Vec<usize>,
}

/// Candidate-split search parameters shared by every node of a tree.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SplitParams {
    pub(crate) method: SplitMethod,
    pub(crate) min_samples_leaf: usize,
}

/// Find the best squared-error split over every feature.
///
/// Features are visited in a freshly shuffled order, each evaluated
/// according to `params.method`; the split with the largest decrease in
/// total squared error wins. Ties keep the first candidate visited, so equal
/// splits on different features are broken by the RNG rather than by column
/// position.
///
/// Returns `None` when no valid split exists (all values identical,
/// or every split would violate `min_samples_leaf`).
///
/// # Column-major layout
///
/// `features` is column-major: `features[feature_idx][sample_idx]`.
/// `sample_indices` are indices into these inner Vecs.
pub(crate) fn find_best_split(
    features: &[Vec<f64>],
    targets: &[f64],
    sample_indices: &[usize],
    params: SplitParams,
    rng: &mut impl Rng,
) -> Option<SplitResult> {
    let n_features = features.len();
    let n_samples = sample_indices.len();

    if n_samples < 2 || n_features == 0 {
        return None;
    }

    let parent = TargetStats::from_indices(targets, sample_indices);
    let parent_sse = parent.sse();

    let mut feature_order: Vec<usize> = (0..n_features).collect();
    feature_order.shuffle(rng);

    let mut best_decrease = f64::NEG_INFINITY;
    let mut best: Option<(FeatureIndex, f64)> = None;

    for &feat_idx in &feature_order {
        let candidate = match params.method {
            SplitMethod::Exact => best_exact_threshold(
                &features[feat_idx],
                targets,
                sample_indices,
                parent,
                params.min_samples_leaf,
            ),
            SplitMethod::ExtraTrees => random_threshold(
                &features[feat_idx],
                targets,
                sample_indices,
                params.min_samples_leaf,
                rng,
            ),
        };

        if let Some((threshold, children_sse)) = candidate {
            let decrease = parent_sse - children_sse;
            if decrease > best_decrease {
                best_decrease = decrease;
                best = Some((FeatureIndex::new(feat_idx), threshold));
            }
        }
    }

    let (feature, threshold) = best?;

    let feat_col = &features[feature.index()];
    let (left_indices, right_indices): (Vec<usize>, Vec<usize>) = sample_indices
        .iter()
        .partition(|&&si| feat_col[si] <= threshold);

    Some(SplitResult {
        feature,
        threshold,
        impurity_decrease: best_decrease.max(0.0),
        left_indices,
        right_indices,
    })
}

/// Scan sorted values left to right and return `(threshold, children_sse)`
/// for the best boundary on this feature.
fn best_exact_threshold(
    feat_col: &[f64],
    targets: &[f64],
    sample_indices: &[usize],
    parent: TargetStats,
    min_samples_leaf: usize,
) -> Option<(f64, f64)> {
    let n_samples = sample_indices.len();
    let mut sorted: Vec<(f64, usize)> = sample_indices
        .iter()
        .map(|&si| (feat_col[si], si))
        .collect();
    sorted.sort_unstable_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

    let mut left = TargetStats::default();
    let mut right = parent;
    let mut best: Option<(f64, f64)> = None;

    for i in 0..(n_samples - 1) {
        let (val_i, si) = sorted[i];
        let y = targets[si];
        left.push(y);
        right.remove(y);

        let val_next = sorted[i + 1].0;
        if val_i == val_next {
            continue;
        }
        if left.n < min_samples_leaf || right.n < min_samples_leaf {
            continue;
        }

        let children_sse = left.sse() + right.sse();
        if best.is_none_or(|(_, sse)| children_sse < sse) {
            let mut threshold = (val_i + val_next) / 2.0;
            // Adjacent floats can round the midpoint up onto the right value.
            if threshold >= val_next {
                threshold = val_i;
            }
            best = Some((threshold, children_sse));
        }
    }

    best
}

/// Draw one threshold uniformly between the node's min and max value.
fn random_threshold(
    feat_col: &[f64],
    targets: &[f64],
    sample_indices: &[usize],
    min_samples_leaf: usize,
    rng: &mut impl Rng,
) -> Option<(f64, f64)> {
    let (lo, hi) = sample_indices
        .iter()
        .map(|&si| feat_col[si])
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if lo >= hi {
        return None;
    }

    let threshold = rng.gen_range(lo..hi);
    let mut left = TargetStats::default();
    let mut right = TargetStats::default();
    for &si in sample_indices {
        if feat_col[si] <= threshold {
            left.push(targets[si]);
        } else {
            right.push(targets[si]);
        }
    }
    if left.n < min_samples_leaf || right.n < min_samples_leaf {
        return None;
    }
    Some((threshold, left.sse() + right.sse()))
}
