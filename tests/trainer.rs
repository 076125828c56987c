//! End-to-end trainer tests: embedded data -> model.bin -> service.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use sugar_api::{AppState, router};
use sugar_forest::{RandomForest, SplitMethod};
use sugar_insight::{TrainError, TrainOptions, train, write_report};
use tempfile::TempDir;
use tower::ServiceExt;

const SAMPLE: [f64; 10] = [0.038, 0.05, 0.06, 0.02, -0.04, -0.03, -0.04, -0.002, 0.02, -0.02];

fn run(options: &TrainOptions) -> (sugar_insight::TrainReport, String) {
    let mut out = Vec::new();
    let report = train(options, &mut out).unwrap();
    (report, String::from_utf8(out).unwrap())
}

#[test]
fn default_run_scores_and_saves() {
    let dir = TempDir::new().unwrap();
    let model_path = dir.path().join("model.bin");
    let (report, console) = run(&TrainOptions::new(&model_path));

    assert_eq!((report.n_samples, report.n_features), (442, 10));
    assert_eq!((report.n_train, report.n_test), (353, 89));
    assert!(
        (0.3..=0.55).contains(&report.test_r2),
        "test r2 {} outside the expected band",
        report.test_r2
    );
    assert!(report.test_mse > 0.0 && report.test_mae > 0.0);
    assert!(report.oob_r2.is_none());
    assert_eq!(report.feature_importances.len(), 10);
    assert!(model_path.exists());

    let lines: Vec<&str> = console.lines().collect();
    assert_eq!(lines[0], "Dataset shape: (442, 10)");
    assert!(lines[1].starts_with("Training RandomForestRegressor"));
    assert_eq!(lines[2], format!("R^2 on test set: {:.4}", report.test_r2));
    assert_eq!(lines[3], format!("Model saved to: {}", model_path.display()));
}

#[test]
fn same_seed_same_score_and_artifact() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("a.bin");
    let b = dir.path().join("b.bin");
    let (report_a, _) = run(&TrainOptions::new(&a));
    let (report_b, _) = run(&TrainOptions::new(&b));

    assert_eq!(report_a.test_r2.to_bits(), report_b.test_r2.to_bits());
    assert_eq!(std::fs::read(&a).unwrap(), std::fs::read(&b).unwrap());
}

#[test]
fn artifact_reproduces_in_memory_predictions() {
    let dir = TempDir::new().unwrap();
    let model_path = dir.path().join("model.bin");
    run(&TrainOptions::new(&model_path).with_n_trees(20));

    let first = RandomForest::load(&model_path).unwrap();
    let bytes = first.to_bytes().unwrap();
    assert_eq!(bytes, std::fs::read(&model_path).unwrap());

    let prediction = first.predict(&SAMPLE).unwrap();
    assert!(
        (50.0..=300.0).contains(&prediction),
        "sample prediction {prediction} outside the target range"
    );
}

#[test]
fn retraining_overwrites_artifact() {
    let dir = TempDir::new().unwrap();
    let model_path = dir.path().join("model.bin");
    run(&TrainOptions::new(&model_path).with_n_trees(5));
    run(&TrainOptions::new(&model_path).with_n_trees(7));
    assert_eq!(RandomForest::load(&model_path).unwrap().n_trees(), 7);
}

#[test]
fn oob_and_extra_trees_options() {
    let dir = TempDir::new().unwrap();
    let options = TrainOptions::new(dir.path().join("model.bin"))
        .with_n_trees(40)
        .with_oob(true)
        .with_split_method(SplitMethod::ExtraTrees)
        .with_max_depth(Some(8));
    let (report, console) = run(&options);

    let oob = report.oob_r2.expect("OOB requested");
    assert!(oob.is_finite() && oob < 1.0);
    assert!(console.contains("Out-of-bag R^2:"));
}

#[test]
fn report_is_written_as_json() {
    let dir = TempDir::new().unwrap();
    let (report, _) = run(&TrainOptions::new(dir.path().join("model.bin")).with_n_trees(10));
    let report_path = dir.path().join("report.json");
    write_report(&report_path, &report).unwrap();

    let content: Value =
        serde_json::from_str(&std::fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(content["n_samples"], 442);
    assert_eq!(content["n_trees"], 10);
    assert_eq!(content["seed"], 42);
    assert!(content["oob_r2"].is_null());
    let ranked = content["feature_importances"].as_array().unwrap();
    assert_eq!(ranked.len(), 10);
    assert_eq!(ranked[0]["rank"], 1);
}

#[test]
fn report_to_missing_directory_fails() {
    let dir = TempDir::new().unwrap();
    let (report, _) = run(&TrainOptions::new(dir.path().join("model.bin")).with_n_trees(2));
    let err = write_report(&dir.path().join("missing").join("r.json"), &report).unwrap_err();
    assert!(matches!(err, TrainError::WriteReport { .. }));
}

#[test]
fn custom_csv_dataset() {
    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("data.csv");
    let mut csv = String::from("a,b,target\n");
    for i in 0..40 {
        let a = f64::from(i) / 40.0;
        let b = f64::from(i % 3);
        csv.push_str(&format!("{a},{b},{}\n", 100.0 + 80.0 * a));
    }
    std::fs::write(&csv_path, csv).unwrap();

    let options = TrainOptions::new(dir.path().join("model.bin"))
        .with_data(Some(csv_path))
        .with_n_trees(20);
    let (report, _) = run(&options);
    assert_eq!((report.n_samples, report.n_features), (40, 2));
    assert!(report.test_r2 > 0.8, "test r2 {}", report.test_r2);
}

#[tokio::test]
async fn service_health_flips_after_training() {
    let dir = TempDir::new().unwrap();
    let model_path = dir.path().join("model.bin");

    let before = router(AppState::from_model_path(&model_path))
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let bytes = axum::body::to_bytes(before.into_body(), usize::MAX).await.unwrap();
    let value: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(value["model_loaded"], false);

    run(&TrainOptions::new(&model_path).with_n_trees(10));
    let app = router(AppState::from_model_path(&model_path));

    let health = app
        .clone()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let bytes = axum::body::to_bytes(health.into_body(), usize::MAX).await.unwrap();
    let value: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(value["status"], "ok");
    assert_eq!(value["model_loaded"], true);

    let after = app
        .oneshot(
            Request::post("/predict")
                .header("content-type", "application/json")
                .body(Body::from(serde_json::json!({ "features": SAMPLE }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(after.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(after.into_body(), usize::MAX).await.unwrap();
    let value: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(value["prediction"].as_array().unwrap().len(), 1);
}
