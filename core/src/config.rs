//! Generator configuration.
//!
//! A configuration file selects what to generate through its `kind` field:
//!
//! ```yaml
//! kind: sls
//! base_image: python:3.11-slim
//! product_name: my-service
//! product_version: 1.0.0
//! product_group: com.example
//! dist_name: my-service-1.0.0
//! tarball_name: my-service-1.0.0.sls.tgz
//! expose_ports: [8080]
//! ```
//!
//! ```yaml
//! kind: custom
//! strict: true
//! stages:
//!   - from: { image: "rust:1.75", alias: builder }
//!     instructions:
//!       - { type: run, command: cargo build --release }
//!   - from: { image: "debian:bookworm-slim" }
//!     instructions:
//!       - { type: copy, src: /target/release/app, dst: /usr/local/bin/, from_stage: builder }
//!       - { type: entrypoint, args: [app] }
//! dockerignore:
//!   allow_patterns: [src/, Cargo.toml, Cargo.lock]
//! ```

use serde::{Deserialize, Serialize};

use crate::dockerfile::Dockerfile;
use crate::dockerignore::DockerignoreConfig;
use crate::error::{DockergenError, Result};
use crate::preset::{sls_dockerfile, sls_dockerignore, SlsOptions};
use crate::stage::Stage;

/// Encoding of a configuration document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Json,
}

impl ConfigFormat {
    /// Pick the format from a file extension; anything but `json` is YAML.
    pub fn from_extension(extension: Option<&str>) -> Self {
        match extension {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Yaml,
        }
    }
}

impl std::str::FromStr for ConfigFormat {
    type Err = DockergenError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "yaml" | "yml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            _ => Err(DockergenError::ConfigError(format!(
                "unknown config format: '{}' (supported: yaml, json)",
                s
            ))),
        }
    }
}

/// A hand-written multi-stage Dockerfile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomConfig {
    pub stages: Vec<Stage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dockerignore: Option<DockerignoreConfig>,
    /// Reject `COPY --from` references that do not name an earlier stage.
    #[serde(default)]
    pub strict: bool,
}

/// What to generate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum GeneratorConfig {
    /// The SLS distribution preset
    Sls(SlsOptions),
    /// Explicit stages and instructions
    Custom(CustomConfig),
}

/// Generated text artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    pub dockerfile: String,
    pub dockerignore: Option<String>,
}

impl GeneratorConfig {
    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn parse(content: &str, format: ConfigFormat) -> Result<Self> {
        match format {
            ConfigFormat::Yaml => Self::from_yaml(content),
            ConfigFormat::Json => Self::from_json(content),
        }
    }

    /// Build the Dockerfile described by this configuration.
    pub fn dockerfile(&self) -> Result<Dockerfile> {
        match self {
            GeneratorConfig::Sls(options) => sls_dockerfile(options),
            GeneratorConfig::Custom(custom) => {
                let dockerfile = Dockerfile::new(custom.stages.clone())?;
                if custom.strict {
                    dockerfile.validate_stage_references()?;
                }
                Ok(dockerfile)
            }
        }
    }

    /// Render the Dockerfile and, where configured, the `.dockerignore`.
    pub fn generate(&self) -> Result<Artifacts> {
        let dockerfile = self.dockerfile()?.render();
        let dockerignore = match self {
            GeneratorConfig::Sls(_) => Some(sls_dockerignore()),
            GeneratorConfig::Custom(custom) => custom.dockerignore.as_ref().map(|c| c.render()),
        };

        tracing::debug!(
            bytes = dockerfile.len(),
            dockerignore = dockerignore.is_some(),
            "Generated artifacts"
        );
        Ok(Artifacts {
            dockerfile,
            dockerignore,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SLS_YAML: &str = r#"
kind: sls
base_image: python:3.11-slim
product_name: my-service
product_version: 1.0.0
product_group: com.example
dist_name: my-service-1.0.0
tarball_name: my-service-1.0.0.sls.tgz
expose_ports: [8080, 8443]
labels:
  team: platform
"#;

    const CUSTOM_YAML: &str = r#"
kind: custom
stages:
  - from: { image: "rust:1.75", alias: builder }
    instructions:
      - { type: run, command: cargo build --release }
  - from: { image: "debian:bookworm-slim" }
    instructions:
      - { type: copy, src: /target/release/app, dst: /usr/local/bin/, from_stage: builder }
      - { type: entrypoint, args: [app] }
dockerignore:
  allow_patterns: [src/, Cargo.toml]
"#;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ConfigFormat::from_extension(Some("json")), ConfigFormat::Json);
        assert_eq!(ConfigFormat::from_extension(Some("JSON")), ConfigFormat::Json);
        assert_eq!(ConfigFormat::from_extension(Some("yml")), ConfigFormat::Yaml);
        assert_eq!(ConfigFormat::from_extension(None), ConfigFormat::Yaml);
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("yaml".parse::<ConfigFormat>().unwrap(), ConfigFormat::Yaml);
        assert_eq!("json".parse::<ConfigFormat>().unwrap(), ConfigFormat::Json);
        assert!(matches!(
            "toml".parse::<ConfigFormat>(),
            Err(DockergenError::ConfigError(_))
        ));
    }

    #[test]
    fn test_sls_from_yaml() {
        let config = GeneratorConfig::from_yaml(SLS_YAML).unwrap();
        let artifacts = config.generate().unwrap();
        assert!(artifacts.dockerfile.contains("EXPOSE 8080\nEXPOSE 8443\n"));
        assert!(artifacts.dockerfile.contains(r#"team="platform""#));
        assert_eq!(artifacts.dockerignore, Some(sls_dockerignore()));
    }

    #[test]
    fn test_sls_from_json() {
        let json = r#"{
            "kind": "sls",
            "base_image": "python:3.11-slim",
            "product_name": "svc",
            "product_version": "1.0.0",
            "product_group": "com.example",
            "dist_name": "svc-1.0.0",
            "tarball_name": "svc-1.0.0.sls.tgz",
            "use_hook_init": true
        }"#;
        let config = GeneratorConfig::parse(json, ConfigFormat::Json).unwrap();
        let artifacts = config.generate().unwrap();
        assert!(artifacts
            .dockerfile
            .contains(r#"ENTRYPOINT ["service/bin/entrypoint.sh"]"#));
    }

    #[test]
    fn test_custom_from_yaml() {
        let config = GeneratorConfig::from_yaml(CUSTOM_YAML).unwrap();
        let artifacts = config.generate().unwrap();
        assert_eq!(
            artifacts.dockerfile,
            "FROM rust:1.75 AS builder\n\
             RUN cargo build --release\n\
             \n\
             FROM debian:bookworm-slim\n\
             COPY --from=builder /target/release/app /usr/local/bin/\n\
             ENTRYPOINT [\"app\"]\n"
        );
        assert_eq!(
            artifacts.dockerignore.as_deref(),
            Some("**\n!src/\n!Cargo.toml\n")
        );
    }

    #[test]
    fn test_custom_without_stages_fails() {
        let config = GeneratorConfig::from_yaml("kind: custom\nstages: []\n").unwrap();
        assert!(matches!(config.generate(), Err(DockergenError::NoStages)));
    }

    #[test]
    fn test_custom_strict_rejects_unknown_stage() {
        let yaml = r#"
kind: custom
strict: true
stages:
  - from: { image: alpine }
    instructions:
      - { type: copy, src: /a, dst: /b, from_stage: missing }
"#;
        let config = GeneratorConfig::from_yaml(yaml).unwrap();
        assert!(matches!(
            config.generate(),
            Err(DockergenError::UnresolvedStage { .. })
        ));
    }

    #[test]
    fn test_custom_permissive_by_default() {
        let yaml = r#"
kind: custom
stages:
  - from: { image: alpine }
    instructions:
      - { type: copy, src: /a, dst: /b, from_stage: missing }
"#;
        let config = GeneratorConfig::from_yaml(yaml).unwrap();
        assert!(config.generate().is_ok());
    }

    #[test]
    fn test_custom_embedded_from_starts_stage() {
        let yaml = r#"
kind: custom
strict: true
stages:
  - from: { image: alpine }
    instructions:
      - { type: from, image: "rust:1.75", alias: builder }
      - { type: run, command: cargo build }
  - from: { image: "debian:bookworm" }
    instructions:
      - { type: copy, src: /out, dst: /app, from_stage: builder }
"#;
        let config = GeneratorConfig::from_yaml(yaml).unwrap();
        let dockerfile = config.dockerfile().unwrap();
        assert_eq!(dockerfile.stages().len(), 3);
        assert!(dockerfile.stage("builder").is_some());
        assert_eq!(
            config.generate().unwrap().dockerfile,
            "FROM alpine\n\n\
             FROM rust:1.75 AS builder\n\
             RUN cargo build\n\n\
             FROM debian:bookworm\n\
             COPY --from=builder /out /app\n"
        );
    }

    #[test]
    fn test_unknown_kind_fails() {
        let err = GeneratorConfig::from_yaml("kind: helm\n").unwrap_err();
        assert!(matches!(err, DockergenError::SerializationError(_)));
    }

    #[test]
    fn test_missing_required_field_fails() {
        let err = GeneratorConfig::from_yaml("kind: sls\nbase_image: alpine\n").unwrap_err();
        assert!(err.to_string().contains("product_name"));
    }
}
