//! CLI command definitions and dispatch.

mod generate;
mod sls;
mod version;

use clap::{Parser, Subcommand};

/// dockergen — Dockerfile generation from structured configuration.
#[derive(Parser)]
#[command(name = "dockergen", version, about)]
pub struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Subcommand)]
pub enum Command {
    /// Generate artifacts from a YAML or JSON configuration file
    Generate(generate::GenerateArgs),
    /// Generate artifacts for an SLS distribution from flags
    Sls(sls::SlsArgs),
    /// Show version information
    Version(version::VersionArgs),
}

/// Dispatch a parsed CLI to the appropriate command handler.
pub fn dispatch(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Generate(args) => generate::execute(args),
        Command::Sls(args) => sls::execute(args),
        Command::Version(args) => version::execute(args),
    }
}
