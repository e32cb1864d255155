//! Pre-built Dockerfile layouts.
//!
//! # SLS distributions
//!
//! [`sls_dockerfile`] packages an SLS service tarball into an image:
//!
//! ```text
//! FROM <base-image>
//!
//! LABEL <oci title/version/vendor + product-type + extra labels>
//!
//! ADD <tarball> <install-path>/
//! WORKDIR <install-path>/<dist-name>
//!
//! RUN mkdir -p var/data/tmp var/log var/run var/conf var/state
//!
//! [hook init system: COPY entrypoint + hooks, RUN chmod/mkdir]
//! [EXPOSE <port> ...]
//! [HEALTHCHECK ... CMD service/monitoring/bin/check.sh || exit 1]
//! ENTRYPOINT ["service/bin/init.sh", "start"]
//! ```
//!
//! [`sls_dockerignore`] is the matching `.dockerignore`.

use serde::{Deserialize, Serialize};

use crate::builder::DockerfileBuilder;
use crate::dockerfile::Dockerfile;
use crate::dockerignore::generate_dockerignore;
use crate::error::Result;
use crate::instruction::{
    HealthCheck, DEFAULT_HEALTHCHECK_INTERVAL_SECS, DEFAULT_HEALTHCHECK_RETRIES,
    DEFAULT_HEALTHCHECK_START_PERIOD_SECS, DEFAULT_HEALTHCHECK_TIMEOUT_SECS,
};
use crate::labels::{Labels, OCI_TITLE, OCI_VENDOR, OCI_VERSION};

/// Default directory the SLS tarball is unpacked into.
pub const SLS_DEFAULT_INSTALL_PATH: &str = "/opt/services";
/// Default value of the product-type label.
pub const SLS_DEFAULT_PRODUCT_TYPE: &str = "helm.v1";
/// Label key carrying the SLS product type.
pub const SLS_PRODUCT_TYPE_LABEL: &str = "com.palantir.sls.product-type";
/// Command run by the generated `HEALTHCHECK`.
pub const SLS_HEALTH_CHECK_COMMAND: &str = "service/monitoring/bin/check.sh || exit 1";

const SLS_RUNTIME_DIRS_COMMAND: &str = "mkdir -p var/data/tmp var/log var/run var/conf var/state";
const SLS_HOOK_SETUP_COMMAND: &str = "chmod +x service/bin/entrypoint.sh && \\\n    \
mkdir -p hooks/pre-configure.d hooks/configure.d \\\n    \
hooks/pre-startup.d hooks/startup.d hooks/post-startup.d \\\n    \
hooks/pre-shutdown.d hooks/shutdown.d";
const SLS_DOCKERIGNORE_COMMENT: &str = "Ignore everything except the tarball and hook files";

/// Inputs for [`sls_dockerfile`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlsOptions {
    pub base_image: String,
    pub product_name: String,
    pub product_version: String,
    pub product_group: String,
    pub dist_name: String,
    pub tarball_name: String,
    #[serde(default = "default_install_path")]
    pub install_path: String,
    #[serde(default = "default_product_type")]
    pub product_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_check_interval: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_check_timeout: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_check_start_period: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_check_retries: Option<u32>,
    /// Use the hook-based entrypoint instead of `init.sh start`.
    #[serde(default)]
    pub use_hook_init: bool,
    #[serde(default)]
    pub expose_ports: Vec<u16>,
    /// Extra labels; these override the generated ones on collision.
    #[serde(default)]
    pub labels: Labels,
}

fn default_install_path() -> String {
    SLS_DEFAULT_INSTALL_PATH.to_string()
}

fn default_product_type() -> String {
    SLS_DEFAULT_PRODUCT_TYPE.to_string()
}

impl SlsOptions {
    pub fn new(
        base_image: impl Into<String>,
        product_name: impl Into<String>,
        product_version: impl Into<String>,
        product_group: impl Into<String>,
        dist_name: impl Into<String>,
        tarball_name: impl Into<String>,
    ) -> Self {
        Self {
            base_image: base_image.into(),
            product_name: product_name.into(),
            product_version: product_version.into(),
            product_group: product_group.into(),
            dist_name: dist_name.into(),
            tarball_name: tarball_name.into(),
            install_path: default_install_path(),
            product_type: default_product_type(),
            health_check_interval: None,
            health_check_timeout: None,
            health_check_start_period: None,
            health_check_retries: None,
            use_hook_init: false,
            expose_ports: Vec::new(),
            labels: Labels::new(),
        }
    }

    /// The health check to emit, if any of its parameters is configured.
    pub fn health_check(&self) -> Option<HealthCheck> {
        let configured = self.health_check_interval.is_some()
            || self.health_check_timeout.is_some()
            || self.health_check_start_period.is_some()
            || self.health_check_retries.is_some();
        if !configured {
            return None;
        }

        Some(
            HealthCheck::new(SLS_HEALTH_CHECK_COMMAND)
                .interval(
                    self.health_check_interval
                        .unwrap_or(DEFAULT_HEALTHCHECK_INTERVAL_SECS),
                )
                .timeout(
                    self.health_check_timeout
                        .unwrap_or(DEFAULT_HEALTHCHECK_TIMEOUT_SECS),
                )
                .start_period(
                    self.health_check_start_period
                        .unwrap_or(DEFAULT_HEALTHCHECK_START_PERIOD_SECS),
                )
                .retries(
                    self.health_check_retries
                        .unwrap_or(DEFAULT_HEALTHCHECK_RETRIES),
                ),
        )
    }

    fn image_labels(&self) -> Labels {
        let mut labels: Labels = [
            (OCI_TITLE, self.product_name.as_str()),
            (OCI_VERSION, self.product_version.as_str()),
            (OCI_VENDOR, self.product_group.as_str()),
            (SLS_PRODUCT_TYPE_LABEL, self.product_type.as_str()),
        ]
        .into_iter()
        .collect();
        labels.overlay(&self.labels);
        labels
    }
}

/// Generate a Dockerfile for an SLS distribution.
///
/// The recipe always opens a stage, so the only error [`DockerfileBuilder::build`]
/// can report does not occur here.
pub fn sls_dockerfile(options: &SlsOptions) -> Result<Dockerfile> {
    let workdir = format!("{}/{}", options.install_path, options.dist_name);

    let mut b = DockerfileBuilder::new();
    b.from_image(options.base_image.as_str()).blank();

    b.label(options.image_labels()).blank();

    b.add(
        options.tarball_name.as_str(),
        format!("{}/", options.install_path),
    );
    b.workdir(workdir).blank();

    b.run(SLS_RUNTIME_DIRS_COMMAND).blank();

    if options.use_hook_init {
        b.comment("Hook init system")
            .copy("hooks/entrypoint.sh", "service/bin/entrypoint.sh")
            .copy("hooks/hooks.sh", "service/lib/hooks.sh")
            .run(SLS_HOOK_SETUP_COMMAND)
            .blank();
    }

    for port in &options.expose_ports {
        b.expose(*port);
    }
    if !options.expose_ports.is_empty() {
        b.blank();
    }

    if let Some(check) = options.health_check() {
        b.healthcheck(check).blank();
    }

    if options.use_hook_init {
        b.entrypoint(["service/bin/entrypoint.sh"]);
    } else {
        b.entrypoint(["service/bin/init.sh", "start"]);
    }
    b.blank();

    tracing::debug!(
        product = %options.product_name,
        version = %options.product_version,
        hook_init = options.use_hook_init,
        ports = options.expose_ports.len(),
        "Assembled SLS Dockerfile"
    );
    b.build()
}

/// Generate a `.dockerignore` for SLS Docker builds.
pub fn sls_dockerignore() -> String {
    generate_dockerignore(["*.sls.tgz", "hooks/"], Some(SLS_DOCKERIGNORE_COMMENT))
}
