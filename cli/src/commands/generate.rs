//! `dockergen generate` command — Generate artifacts from a config file.
//!
//! The config format is taken from `--format`, or from the file extension
//! (`.json` is JSON, anything else is YAML).

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use dockergen_core::{ConfigFormat, GeneratorConfig};

use crate::output::{emit, OutputArgs};

#[derive(Args)]
pub struct GenerateArgs {
    /// Path to the YAML or JSON configuration file
    pub config: PathBuf,

    /// Config format (yaml or json); detected from the extension by default
    #[arg(long)]
    pub format: Option<ConfigFormat>,

    #[command(flatten)]
    pub output: OutputArgs,
}

pub fn execute(args: GenerateArgs) -> anyhow::Result<()> {
    let config = load_config(&args.config, args.format)?;
    let artifacts = config
        .generate()
        .with_context(|| format!("Failed to generate from {}", args.config.display()))?;
    emit(&artifacts, &args.output)
}

/// Read and parse a generator config file.
fn load_config(path: &Path, format: Option<ConfigFormat>) -> anyhow::Result<GeneratorConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config at {}", path.display()))?;

    let format = format.unwrap_or_else(|| {
        ConfigFormat::from_extension(path.extension().and_then(|ext| ext.to_str()))
    });
    tracing::debug!(path = %path.display(), ?format, "Loading config");

    GeneratorConfig::parse(&content, format)
        .with_context(|| format!("Invalid config at {}", path.display()))
}
