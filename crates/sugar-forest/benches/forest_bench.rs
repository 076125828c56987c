//! Criterion benchmarks for sugar-forest: Random Forest training and prediction.

use criterion::{Criterion, criterion_group, criterion_main};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use sugar_forest::{RandomForestConfig, SplitMethod};

fn make_regression(
    n_samples: usize,
    n_features: usize,
    seed: u64,
) -> (Vec<Vec<f64>>, Vec<f64>, Vec<String>) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut features = Vec::with_capacity(n_samples);
    let mut targets = Vec::with_capacity(n_samples);
    for _ in 0..n_samples {
        let row: Vec<f64> = (0..n_features).map(|_| rng.r#gen::<f64>()).collect();
        let y = 150.0 + 100.0 * row[0] - 60.0 * row[1] + 40.0 * row[2] * row[3]
            + rng.r#gen::<f64>() * 10.0;
        features.push(row);
        targets.push(y);
    }
    let names: Vec<String> = (0..n_features).map(|f| format!("f{f}")).collect();
    (features, targets, names)
}

fn bench_rf_train(c: &mut Criterion) {
    let (features, targets, names) = make_regression(442, 10, 42);
    let cfg = RandomForestConfig::new(100).unwrap().with_seed(42);

    c.bench_function("rf_train_442x10_100trees", |b| {
        b.iter(|| cfg.train(&features, &targets, &names).unwrap());
    });
}

fn bench_rf_train_extra_trees(c: &mut Criterion) {
    let (features, targets, names) = make_regression(442, 10, 42);
    let cfg = RandomForestConfig::new(100)
        .unwrap()
        .with_seed(42)
        .with_split_method(SplitMethod::ExtraTrees);

    c.bench_function("rf_train_extra_trees_442x10_100trees", |b| {
        b.iter(|| cfg.train(&features, &targets, &names).unwrap());
    });
}

fn bench_rf_predict_single(c: &mut Criterion) {
    let (features, targets, names) = make_regression(442, 10, 42);
    let forest = RandomForestConfig::new(100)
        .unwrap()
        .with_seed(42)
        .train(&features, &targets, &names)
        .unwrap()
        .into_forest();
    let sample = features[0].clone();

    c.bench_function("rf_predict_single_100trees", |b| {
        b.iter(|| forest.predict(&sample).unwrap());
    });
}

fn bench_rf_predict_batch(c: &mut Criterion) {
    let (features, targets, names) = make_regression(442, 10, 42);
    let forest = RandomForestConfig::new(100)
        .unwrap()
        .with_seed(42)
        .train(&features, &targets, &names)
        .unwrap()
        .into_forest();

    c.bench_function("rf_predict_batch_442x10_100trees", |b| {
        b.iter(|| forest.predict_batch(&features).unwrap());
    });
}

criterion_group!(
    benches,
    bench_rf_train,
    bench_rf_train_extra_trees,
    bench_rf_predict_single,
    bench_rf_predict_batch
);
criterion_main!(benches);
