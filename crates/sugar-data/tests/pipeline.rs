//! End-to-end integration tests: CSV -> split -> forest -> score.

use std::path::Path;

use sugar_data::{DataError, DatasetReader, TrainTestSplit, progression};
use sugar_forest::{FittedModel, RandomForestConfig};

/// Path to the test fixture directory.
fn fixture_path(name: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn fixture_train_and_score() {
    let dataset = DatasetReader::new()
        .read_path(&fixture_path("small_60x3.csv"))
        .expect("fixture should parse");
    assert_eq!(dataset.shape(), (60, 3));

    let part = TrainTestSplit::new(0.25).unwrap().split(&dataset).unwrap();
    assert_eq!(part.test.n_samples(), 15);

    let forest = RandomForestConfig::new(50)
        .unwrap()
        .with_seed(42)
        .train(
            part.train.features(),
            part.train.targets(),
            part.train.feature_names(),
        )
        .unwrap()
        .into_forest();

    // bmi carries most of the signal; the fit should beat predicting the mean.
    let r2 = forest.score(part.test.features(), part.test.targets()).unwrap();
    assert!(r2 > 0.3, "held-out r2 = {r2}");
    assert_eq!(forest.feature_names(), ["age", "bmi", "bp"]);
}

#[test]
fn embedded_split_is_reproducible() {
    let dataset = progression().unwrap();
    let split = TrainTestSplit::new(0.2).unwrap().with_seed(42);
    let a = split.split(&dataset).unwrap();
    let b = split.split(&dataset).unwrap();

    assert_eq!(a.train.shape(), (353, 10));
    assert_eq!(a.test.shape(), (89, 10));
    assert_eq!(a.test.features(), b.test.features());
    assert_eq!(a.train.targets(), b.train.targets());
}

#[test]
fn reader_fixture_files_match_expected_errors() {
    let read = |name: &str| DatasetReader::new().read_path(&fixture_path(name));

    let result = read("empty.csv");
    assert!(
        matches!(result, Err(DataError::EmptyDataset { .. })),
        "empty.csv should give EmptyDataset, got: {result:?}"
    );

    let result = read("jagged.csv");
    assert!(
        matches!(result, Err(DataError::InconsistentRowLength { .. })),
        "jagged.csv should give InconsistentRowLength, got: {result:?}"
    );

    let result = read("nan.csv");
    assert!(
        matches!(result, Err(DataError::NonFiniteValue { .. })),
        "nan.csv should give NonFiniteValue, got: {result:?}"
    );

    let result = read("inf.csv");
    assert!(
        matches!(result, Err(DataError::NonFiniteValue { .. })),
        "inf.csv should give NonFiniteValue, got: {result:?}"
    );

    let result = read("no_target.csv");
    assert!(
        matches!(result, Err(DataError::MissingTargetColumn { .. })),
        "no_target.csv should give MissingTargetColumn, got: {result:?}"
    );

    let result = DatasetReader::new()
        .with_target_column("progression")
        .read_path(&fixture_path("no_target.csv"));
    assert!(result.is_ok(), "custom target column should parse: {result:?}");
}
