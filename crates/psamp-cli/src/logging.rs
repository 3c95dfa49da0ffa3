// crates/psamp-cli/src/logging.rs

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Verbosity-gated stderr logging. `RUST_LOG`, when set, wins.
pub fn init(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::WARN
    } else {
        match verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("psamp_core={level},psamp={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
