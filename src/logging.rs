use tracing_subscriber::EnvFilter;

/// Install the stderr fmt subscriber.
///
/// `--verbose` selects debug, `--quiet` error, otherwise info; a set
/// `RUST_LOG` wins over both.
pub fn init_logging(verbose: bool, quiet: bool) {
    let level = match (verbose, quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
