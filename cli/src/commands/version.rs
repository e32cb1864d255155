//! `dockergen version` command.

use clap::Args;

#[derive(Args)]
pub struct VersionArgs;

pub fn execute(_args: VersionArgs) -> anyhow::Result<()> {
    println!("dockergen version {}", dockergen_core::VERSION);
    Ok(())
}
