//! `dockergen sls` command — Generate artifacts for an SLS distribution.

use anyhow::anyhow;
use clap::Args;
use dockergen_core::preset::{SLS_DEFAULT_INSTALL_PATH, SLS_DEFAULT_PRODUCT_TYPE};
use dockergen_core::{GeneratorConfig, Labels, SlsOptions};

use crate::output::{emit, OutputArgs};

#[derive(Args)]
pub struct SlsArgs {
    /// Base image for the FROM instruction
    #[arg(long)]
    pub base_image: String,

    /// Product name (image title label)
    #[arg(long)]
    pub product_name: String,

    /// Product version (image version label)
    #[arg(long)]
    pub product_version: String,

    /// Product group (image vendor label)
    #[arg(long)]
    pub product_group: String,

    /// Distribution directory name inside the tarball
    #[arg(long)]
    pub dist_name: String,

    /// SLS tarball file name
    #[arg(long)]
    pub tarball_name: String,

    /// Directory the tarball is unpacked into
    #[arg(long, default_value = SLS_DEFAULT_INSTALL_PATH)]
    pub install_path: String,

    /// Value of the product-type label
    #[arg(long, default_value = SLS_DEFAULT_PRODUCT_TYPE)]
    pub product_type: String,

    /// Health check interval in seconds
    #[arg(long)]
    pub health_check_interval: Option<u32>,

    /// Health check timeout in seconds
    #[arg(long)]
    pub health_check_timeout: Option<u32>,

    /// Health check start period in seconds
    #[arg(long)]
    pub health_check_start_period: Option<u32>,

    /// Health check retries
    #[arg(long)]
    pub health_check_retries: Option<u32>,

    /// Use the hook-based init system
    #[arg(long)]
    pub hook_init: bool,

    /// Port to expose, can be repeated
    #[arg(long = "expose")]
    pub expose: Vec<u16>,

    /// Extra image label (KEY=VALUE), can be repeated
    #[arg(long = "label")]
    pub label: Vec<String>,

    #[command(flatten)]
    pub output: OutputArgs,
}

impl SlsArgs {
    fn to_options(&self) -> anyhow::Result<SlsOptions> {
        let mut options = SlsOptions::new(
            self.base_image.as_str(),
            self.product_name.as_str(),
            self.product_version.as_str(),
            self.product_group.as_str(),
            self.dist_name.as_str(),
            self.tarball_name.as_str(),
        );
        options.install_path = self.install_path.clone();
        options.product_type = self.product_type.clone();
        options.health_check_interval = self.health_check_interval;
        options.health_check_timeout = self.health_check_timeout;
        options.health_check_start_period = self.health_check_start_period;
        options.health_check_retries = self.health_check_retries;
        options.use_hook_init = self.hook_init;
        options.expose_ports = self.expose.clone();
        options.labels = parse_labels(&self.label)?;
        Ok(options)
    }
}

pub fn execute(args: SlsArgs) -> anyhow::Result<()> {
    let options = args.to_options()?;
    let artifacts = GeneratorConfig::Sls(options).generate()?;
    emit(&artifacts, &args.output)
}

/// Parse KEY=VALUE pairs into labels, keeping their order.
fn parse_labels(args: &[String]) -> anyhow::Result<Labels> {
    let mut labels = Labels::new();
    for arg in args {
        let (key, value) = arg
            .split_once('=')
            .ok_or_else(|| anyhow!("Invalid label (expected KEY=VALUE): {arg}"))?;
        labels.insert(key, value);
    }
    Ok(labels)
}
