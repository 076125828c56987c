use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use sugar_forest::SplitMethod;
use sugar_insight::{TrainOptions, default_model_path, init_logging, train, write_report};

#[derive(Parser)]
#[command(name = "sugar-train")]
#[command(about = "Fit the diabetes-progression random forest and write model.bin")]
#[command(version)]
struct Cli {
    /// Where to write the model artifact (defaults to model.bin next to this binary)
    #[arg(long)]
    model: Option<PathBuf>,

    /// Train on this CSV (same columns as the embedded data) instead of the embedded copy
    #[arg(long)]
    data: Option<PathBuf>,

    /// RNG seed for the train/test shuffle and the forest
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of trees in the Random Forest
    #[arg(long, default_value_t = 100)]
    n_trees: usize,

    /// Fraction of rows held out for scoring
    #[arg(long, default_value_t = 0.2)]
    test_fraction: f64,

    /// Maximum tree depth (unlimited if not set)
    #[arg(long)]
    max_depth: Option<usize>,

    /// Split-finding strategy: "exact" or "extra-trees"
    #[arg(long, default_value = "exact")]
    split_method: String,

    /// Also compute the out-of-bag R² on the training rows
    #[arg(long, default_value_t = false)]
    oob: bool,

    /// Write a JSON training report to this path
    #[arg(long)]
    report: Option<PathBuf>,

    /// Enable verbose (debug-level) logging
    #[arg(long)]
    verbose: bool,

    /// Suppress all logging except errors
    #[arg(long)]
    quiet: bool,

    /// Number of threads for parallel training (defaults to all cores)
    #[arg(long)]
    threads: Option<usize>,
}

fn parse_split_method(s: &str) -> Result<SplitMethod> {
    match s {
        "exact" => Ok(SplitMethod::Exact),
        "extra-trees" => Ok(SplitMethod::ExtraTrees),
        other => anyhow::bail!("unknown split method: {other} (expected exact or extra-trees)"),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure thread pool")?;
        info!(threads, "thread pool configured");
    }

    let model_path = match cli.model {
        Some(path) => path,
        None => default_model_path().context("cannot resolve default model path")?,
    };

    let options = TrainOptions::new(model_path)
        .with_data(cli.data)
        .with_seed(cli.seed)
        .with_n_trees(cli.n_trees)
        .with_test_fraction(cli.test_fraction)
        .with_max_depth(cli.max_depth)
        .with_split_method(parse_split_method(&cli.split_method)?)
        .with_oob(cli.oob);

    let report = train(&options, &mut std::io::stdout().lock()).context("training failed")?;

    if let Some(path) = &cli.report {
        write_report(path, &report)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
    }

    Ok(())
}
