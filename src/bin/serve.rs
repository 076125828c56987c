use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use sugar_api::AppState;
use sugar_insight::{default_model_path, init_logging};

#[derive(Parser)]
#[command(name = "sugar-serve")]
#[command(about = "Serve diabetes-progression predictions over HTTP")]
#[command(version)]
struct Cli {
    /// Model artifact to load (defaults to model.bin next to this binary)
    #[arg(long)]
    model: Option<PathBuf>,

    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    host: IpAddr,

    /// Port to bind
    #[arg(long, default_value_t = 8000)]
    port: u16,

    /// Enable verbose (debug-level) logging
    #[arg(long)]
    verbose: bool,

    /// Suppress all logging except errors
    #[arg(long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let model_path = match cli.model {
        Some(path) => path,
        None => default_model_path().context("cannot resolve default model path")?,
    };

    let state = AppState::from_model_path(&model_path);
    let addr = SocketAddr::new(cli.host, cli.port);

    sugar_api::serve(addr, state)
        .await
        .with_context(|| format!("server on {addr} failed"))?;
    Ok(())
}
