//! Out-of-bag (OOB) evaluation for Random Forest regression.

use crate::error::RfError;
use crate::metrics::{mean_squared_error, r2_score};
use crate::tree::DecisionTree;

/// Out-of-bag evaluation result.
#[derive(Debug, Clone, serde::Serialize)]
pub struct OobScore {
    /// R² of the OOB predictions against the training targets.
    pub r2: f64,
    /// Mean squared error of the OOB predictions.
    pub mse: f64,
    /// Number of samples that had at least one OOB tree.
    pub n_oob_samples: usize,
}

/// Score each training row using only the trees that never saw it.
///
/// Rows left in every bootstrap are skipped.
pub(crate) fn compute_oob(
    trees: &[DecisionTree],
    features: &[Vec<f64>],
    targets: &[f64],
    oob_indices_per_tree: &[Vec<usize>],
) -> Result<OobScore, RfError> {
    let n_samples = features.len();
    let mut sums = vec![0.0f64; n_samples];
    let mut counts = vec![0usize; n_samples];

    for (tree, oob_indices) in trees.iter().zip(oob_indices_per_tree) {
        for &sample_idx in oob_indices {
            sums[sample_idx] += tree.predict(&features[sample_idx])?;
            counts[sample_idx] += 1;
        }
    }

    let (predicted, actual): (Vec<f64>, Vec<f64>) = (0..n_samples)
        .filter(|&i| counts[i] > 0)
        .map(|i| (sums[i] / counts[i] as f64, targets[i]))
        .unzip();

    if predicted.is_empty() {
        return Err(RfError::OobEvaluationFailed {
            reason: "no sample has any OOB tree".to_string(),
        });
    }

    Ok(OobScore {
        r2: r2_score(&actual, &predicted)?,
        mse: mean_squared_error(&actual, &predicted)?,
        n_oob_samples: predicted.len(),
    })
}
