//! dockergen core - Dockerfile generation from structured data.
//!
//! Three levels of abstraction:
//!
//! 1. **Instructions** - individual Dockerfile instructions as values
//!    ([`Instruction`], [`BaseImage`], [`HealthCheck`])
//! 2. **Assembly** - [`Stage`]s collected into a [`Dockerfile`], usually via
//!    [`DockerfileBuilder`]
//! 3. **Presets** - one-call layouts for common patterns ([`sls_dockerfile`])
//!
//! Everything here is pure text generation: nothing is parsed, validated
//! against a container runtime, or written to disk.

pub mod builder;
pub mod config;
pub mod dockerfile;
pub mod dockerignore;
pub mod error;
pub mod instruction;
pub mod labels;
pub mod preset;
pub mod stage;

// Re-export common types
pub use builder::DockerfileBuilder;
pub use config::{Artifacts, ConfigFormat, CustomConfig, GeneratorConfig};
pub use dockerfile::Dockerfile;
pub use dockerignore::{generate_dockerignore, DockerignoreConfig};
pub use error::{DockergenError, Result};
pub use instruction::{BaseImage, HealthCheck, Instruction};
pub use labels::{oci_labels, Labels, OciLabels};
pub use preset::{sls_dockerfile, sls_dockerignore, SlsOptions};
pub use stage::Stage;

/// dockergen version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
