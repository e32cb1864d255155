//! dockergen CLI entry point.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use dockergen_cli::commands::{dispatch, Cli};

fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = dispatch(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
