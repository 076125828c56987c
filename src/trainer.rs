//! The offline training pipeline: load, partition, fit, score, save.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use sugar_data::{Dataset, DatasetReader, TrainTestSplit, progression};
use sugar_forest::{
    FittedModel, OobMode, RandomForestConfig, RankedFeature, SplitMethod, mean_absolute_error,
    mean_squared_error,
};
use tracing::{info, instrument};

use crate::TrainError;

/// Settings for one training run.
///
/// # Defaults
///
/// | Parameter       | Default          |
/// |-----------------|------------------|
/// | `data`          | embedded dataset |
/// | `seed`          | 42               |
/// | `n_trees`       | 100              |
/// | `test_fraction` | 0.2              |
/// | `max_depth`     | `None`           |
/// | `split_method`  | `Exact`          |
/// | `oob`           | `false`          |
#[derive(Debug, Clone)]
pub struct TrainOptions {
    model_path: PathBuf,
    data: Option<PathBuf>,
    seed: u64,
    n_trees: usize,
    test_fraction: f64,
    max_depth: Option<usize>,
    split_method: SplitMethod,
    oob: bool,
}

impl TrainOptions {
    /// Defaults, writing the artifact to `model_path`.
    pub fn new(model_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
            data: None,
            seed: 42,
            n_trees: 100,
            test_fraction: 0.2,
            max_depth: None,
            split_method: SplitMethod::Exact,
            oob: false,
        }
    }

    /// Train on a CSV file instead of the embedded dataset.
    #[must_use]
    pub fn with_data(mut self, data: Option<PathBuf>) -> Self {
        self.data = data;
        self
    }

    /// Seed for both the partition shuffle and the forest.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_n_trees(mut self, n_trees: usize) -> Self {
        self.n_trees = n_trees;
        self
    }

    #[must_use]
    pub fn with_test_fraction(mut self, test_fraction: f64) -> Self {
        self.test_fraction = test_fraction;
        self
    }

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

    /// Also compute the out-of-bag R² on the training partition.
    #[must_use]
    pub fn with_oob(mut self, oob: bool) -> Self {
        self.oob = oob;
        self
    }

    /// Return the artifact path.
    #[must_use]
    pub fn model_path(&self) -> &Path {
        &self.model_path
    }
}

/// Summary of a completed training run.
#[derive(Debug, Clone, Serialize)]
pub struct TrainReport {
    pub model_path: PathBuf,
    pub n_samples: usize,
    pub n_features: usize,
    pub n_train: usize,
    pub n_test: usize,
    pub seed: u64,
    pub n_trees: usize,
    pub test_r2: f64,
    pub test_mse: f64,
    pub test_mae: f64,
    pub oob_r2: Option<f64>,
    pub feature_importances: Vec<RankedFeature>,
}

fn load_dataset(data: Option<&Path>) -> Result<Dataset, TrainError> {
    let loaded = match data {
        Some(path) => DatasetReader::new().read_path(path),
        None => progression(),
    };
    loaded.map_err(|e| TrainError::LoadDataset { source: e })
}

/// Run the full pipeline, writing human-readable progress lines to `out`.
///
/// Overwrites any existing artifact at the configured path.
///
/// # Errors
///
/// Any failure is returned as a [`TrainError`]; nothing is written to the
/// artifact path unless fitting and scoring succeeded.
#[instrument(skip_all, fields(seed = options.seed, n_trees = options.n_trees))]
pub fn train(options: &TrainOptions, out: &mut impl Write) -> Result<TrainReport, TrainError> {
    let console = |e| TrainError::Console { source: e };

    let dataset = load_dataset(options.data.as_deref())?;
    let (n_samples, n_features) = dataset.shape();
    writeln!(out, "Dataset shape: ({n_samples}, {n_features})").map_err(console)?;

    let partition = TrainTestSplit::new(options.test_fraction)
        .map_err(|e| TrainError::Partition { source: e })?
        .with_seed(options.seed)
        .split(&dataset)
        .map_err(|e| TrainError::Partition { source: e })?;
    let (train, test) = (&partition.train, &partition.test);

    let oob_mode = if options.oob {
        OobMode::Enabled
    } else {
        OobMode::Disabled
    };
    let config = RandomForestConfig::new(options.n_trees)
        .map_err(|e| TrainError::Configure { source: e })?
        .with_seed(options.seed)
        .with_max_depth(options.max_depth)
        .with_split_method(options.split_method)
        .with_oob_mode(oob_mode);

    writeln!(
        out,
        "Training RandomForestRegressor ({} trees) on {} rows...",
        options.n_trees,
        train.n_samples()
    )
    .map_err(console)?;

    let result = config
        .train(train.features(), train.targets(), train.feature_names())
        .map_err(|e| TrainError::Fit { source: e })?;
    let forest = result.forest();

    let score = |e| TrainError::Score { source: e };
    let predicted = forest.predict_rows(test.features()).map_err(score)?;
    let test_r2 = forest.score(test.features(), test.targets()).map_err(score)?;
    let test_mse = mean_squared_error(test.targets(), &predicted).map_err(score)?;
    let test_mae = mean_absolute_error(test.targets(), &predicted).map_err(score)?;
    let oob_r2 = result.oob_score().map(|s| s.r2);

    writeln!(out, "R^2 on test set: {test_r2:.4}").map_err(console)?;
    if let Some(r2) = oob_r2 {
        writeln!(out, "Out-of-bag R^2: {r2:.4}").map_err(console)?;
    }

    forest
        .save(&options.model_path)
        .map_err(|e| TrainError::SaveModel { source: e })?;
    writeln!(out, "Model saved to: {}", options.model_path.display()).map_err(console)?;

    info!(test_r2, test_mse, test_mae, "training run complete");

    Ok(TrainReport {
        model_path: options.model_path.clone(),
        n_samples,
        n_features,
        n_train: train.n_samples(),
        n_test: test.n_samples(),
        seed: options.seed,
        n_trees: options.n_trees,
        test_r2,
        test_mse,
        test_mae,
        oob_r2,
        feature_importances: result.importances().to_vec(),
    })
}

/// Write `report` as pretty-printed JSON.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`TrainError::EncodeReport`] | JSON encoding failed |
/// | [`TrainError::WriteReport`] | file write failed |
#[instrument(skip(report), fields(path = %path.display()))]
pub fn write_report(path: &Path, report: &TrainReport) -> Result<(), TrainError> {
    let json =
        serde_json::to_string_pretty(report).map_err(|e| TrainError::EncodeReport { source: e })?;
    std::fs::write(path, json).map_err(|e| TrainError::WriteReport {
        path: path.to_path_buf(),
        source: e,
    })?;
    info!("training report written");
    Ok(())
}
