//! Random Forest training with parallel tree construction.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use tracing::{debug, info, instrument};

use crate::config::{OobMode, RandomForestConfig};
use crate::error::RfError;
use crate::importance::aggregate_importances;
use crate::oob::compute_oob;
use crate::result::RandomForestResult;
use crate::tree::{DecisionTree, DecisionTreeConfig, validate_training_data};

/// A fitted Random Forest regressor.
///
/// Predictions are the arithmetic mean of the member trees' leaf values.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RandomForest {
    pub(crate) trees: Vec<DecisionTree>,
    pub(crate) n_features: usize,
    pub(crate) feature_names: Vec<String>,
}

/// Draw `n_samples` rows with replacement; return them and the rows never drawn.
fn bootstrap_sample(n_samples: usize, rng: &mut impl Rng) -> (Vec<usize>, Vec<usize>) {
    let mut in_bag = vec![false; n_samples];
    let mut bootstrap_indices = Vec::with_capacity(n_samples);
    for _ in 0..n_samples {
        let idx = rng.gen_range(0..n_samples);
        bootstrap_indices.push(idx);
        in_bag[idx] = true;
    }
    let oob_indices: Vec<usize> = (0..n_samples).filter(|&i| !in_bag[i]).collect();
    (bootstrap_indices, oob_indices)
}

/// Train the Random Forest ensemble.
#[instrument(skip_all, fields(n_trees = config.n_trees, n_samples = features.len()))]
pub(crate) fn train(
    config: &RandomForestConfig,
    features: &[Vec<f64>],
    targets: &[f64],
    feature_names: &[String],
) -> Result<RandomForestResult, RfError> {
    let n_features = validate_training_data(features, targets)?;
    let n_samples = features.len();

    if feature_names.len() != n_features {
        return Err(RfError::FeatureNameMismatch {
            n_features,
            n_names: feature_names.len(),
        });
    }

    let base_tree_config = DecisionTreeConfig::new()
        .with_split_method(config.split_method)
        .with_max_depth(config.max_depth);
    base_tree_config.validate()?;

    info!(
        n_trees = config.n_trees,
        n_samples,
        n_features,
        "training random forest"
    );

    // Per-tree seeds come from one master stream so thread scheduling cannot
    // change the result.
    let mut master_rng = ChaCha8Rng::seed_from_u64(config.seed);
    let tree_seeds: Vec<u64> = (0..config.n_trees).map(|_| master_rng.r#gen()).collect();

    let tree_results: Vec<(DecisionTree, Vec<usize>)> = tree_seeds
        .into_par_iter()
        .map(|seed| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let (bootstrap_indices, oob_indices) = bootstrap_sample(n_samples, &mut rng);

            let boot_features: Vec<Vec<f64>> = bootstrap_indices
                .iter()
                .map(|&i| features[i].clone())
                .collect();
            let boot_targets: Vec<f64> = bootstrap_indices.iter().map(|&i| targets[i]).collect();

            let tree = base_tree_config
                .clone()
                .with_seed(rng.r#gen())
                .grow(&boot_features, &boot_targets, n_features);

            (tree, oob_indices)
        })
        .collect();

    let (trees, oob_indices_per_tree): (Vec<DecisionTree>, Vec<Vec<usize>>) =
        tree_results.into_iter().unzip();

    let per_tree_importances: Vec<Vec<f64>> =
        trees.iter().map(DecisionTree::feature_importances).collect();
    let importances = aggregate_importances(&per_tree_importances, feature_names);

    debug!(n_trees_trained = trees.len(), "tree training complete");

    let oob_score = if config.oob_mode == OobMode::Enabled {
        Some(compute_oob(&trees, features, targets, &oob_indices_per_tree)?)
    } else {
        None
    };

    let forest = RandomForest {
        trees,
        n_features,
        feature_names: feature_names.to_vec(),
    };

    info!(
        oob_r2 = oob_score.as_ref().map(|s| s.r2),
        "random forest training complete"
    );

    Ok(RandomForestResult::new(forest, importances, oob_score))
}

#[cfg(test)]
mod tests {
    use crate::config::{OobMode, RandomForestConfig};
    use crate::metrics::r2_score;
    use crate::split::SplitMethod;

    /// Smooth 2-feature response: y = 3·x0 + 10·sin(x1), plus a noise column.
    fn make_regression_data() -> (Vec<Vec<f64>>, Vec<f64>, Vec<String>) {
        let mut features = Vec::new();
        let mut targets = Vec::new();
        for i in 0..120 {
            let x0 = f64::from(i % 12);
            let x1 = f64::from(i / 12) * 0.3;
            let noise = f64::from((i * 7) % 5);
            features.push(vec![x0, x1, noise]);
            targets.push(3.0 * x0 + 10.0 * x1.sin());
        }
        let names = vec!["x0".to_string(), "x1".to_string(), "noise".to_string()];
        (features, targets, names)
    }

    #[test]
    fn fits_training_data_closely() {
        let (features, targets, names) = make_regression_data();
        let result = RandomForestConfig::new(30)
            .unwrap()
            .with_seed(42)
            .train(&features, &targets, &names)
            .unwrap();

        let predictions = result.forest().predict_batch(&features).unwrap();
        let r2 = r2_score(&targets, &predictions).unwrap();
        assert!(r2 > 0.9, "training r2 = {r2}");
    }

    #[test]
    fn oob_score_computed() {
        let (features, targets, names) = make_regression_data();
        let result = RandomForestConfig::new(40)
            .unwrap()
            .with_oob_mode(OobMode::Enabled)
            .with_seed(42)
            .train(&features, &targets, &names)
            .unwrap();

        let oob = result.oob_score().expect("OOB should be computed");
        assert!(oob.r2 > 0.7, "oob r2 = {}", oob.r2);
        assert!(oob.n_oob_samples > 0);
    }

    #[test]
    fn noise_column_ranks_last() {
        let (features, targets, names) = make_regression_data();
        let result = RandomForestConfig::new(20)
            .unwrap()
            .with_seed(42)
            .train(&features, &targets, &names)
            .unwrap();

        let total: f64 = result.importances().iter().map(|f| f.importance).sum();
        assert!((total - 1.0).abs() < 1e-10, "total = {total}");
        assert_eq!(result.importances()[0].name, "x0");
        assert_eq!(result.importances()[2].name, "noise");
    }

    #[test]
    fn deterministic_with_same_seed() {
        let (features, targets, names) = make_regression_data();
        let config = RandomForestConfig::new(10).unwrap().with_seed(99);
        let preds1 = config
            .train(&features, &targets, &names)
            .unwrap()
            .forest()
            .predict_batch(&features)
            .unwrap();
        let preds2 = config
            .train(&features, &targets, &names)
            .unwrap()
            .forest()
            .predict_batch(&features)
            .unwrap();

        let bits1: Vec<u64> = preds1.iter().map(|p| p.to_bits()).collect();
        let bits2: Vec<u64> = preds2.iter().map(|p| p.to_bits()).collect();
        assert_eq!(bits1, bits2);
    }

    #[test]
    fn different_seeds_differ() {
        let (features, targets, names) = make_regression_data();
        let a = RandomForestConfig::new(5)
            .unwrap()
            .with_seed(1)
            .train(&features, &targets, &names)
            .unwrap();
        let b = RandomForestConfig::new(5)
            .unwrap()
            .with_seed(2)
            .train(&features, &targets, &names)
            .unwrap();
        let pa = a.forest().predict_batch(&features).unwrap();
        let pb = b.forest().predict_batch(&features).unwrap();
        assert_ne!(pa, pb);
    }

    #[test]
    fn empty_dataset_error() {
        let config = RandomForestConfig::new(10).unwrap();
        let err = config.train(&[], &[], &[]).unwrap_err();
        assert!(matches!(err, crate::RfError::EmptyDataset));
    }

    #[test]
    fn feature_name_mismatch_error() {
        let (features, targets, _) = make_regression_data();
        let err = RandomForestConfig::new(2)
            .unwrap()
            .train(&features, &targets, &["only".to_string()])
            .unwrap_err();
        assert!(matches!(
            err,
            crate::RfError::FeatureNameMismatch { n_features: 3, n_names: 1 }
        ));
    }

    #[test]
    fn invalid_tree_params_rejected_before_training() {
        let (features, targets, names) = make_regression_data();
        let err = RandomForestConfig::new(2)
            .unwrap()
            .with_max_depth(Some(0))
            .train(&features, &targets, &names)
            .unwrap_err();
        assert!(matches!(err, crate::RfError::InvalidMaxDepth { max_depth: 0 }));
    }

    #[test]
    fn extra_trees_fit_training_data() {
        let (features, targets, names) = make_regression_data();
        let result = RandomForestConfig::new(30)
            .unwrap()
            .with_split_method(SplitMethod::ExtraTrees)
            .with_seed(42)
            .train(&features, &targets, &names)
            .unwrap();

        let predictions = result.forest().predict_batch(&features).unwrap();
        let r2 = r2_score(&targets, &predictions).unwrap();
        assert!(r2 > 0.9, "extra-trees training r2 = {r2}");
    }

    #[test]
    fn bootstrap_draws_full_size_and_reports_unseen_rows() {
        use rand::SeedableRng;
        use rand_chacha::ChaCha8Rng;

        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let (drawn, unseen) = super::bootstrap_sample(50, &mut rng);
        assert_eq!(drawn.len(), 50);
        assert!(!unseen.is_empty());
        assert!(unseen.iter().all(|i| !drawn.contains(i)));
        let mut covered: Vec<usize> = drawn.iter().chain(&unseen).copied().collect();
        covered.sort_unstable();
        covered.dedup();
        assert_eq!(covered, (0..50).collect::<Vec<_>>());
    }
}
