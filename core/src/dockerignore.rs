//! `.dockerignore` generation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::instruction::present;

/// Configuration for a `.dockerignore` file.
///
/// Rendered as: the optional `# <comment>` line, each deny pattern verbatim,
/// `**` when `ignore_all` is set, then each allow pattern as `!<pattern>`.
/// The output always ends with a newline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DockerignoreConfig {
    #[serde(default = "default_ignore_all")]
    pub ignore_all: bool,
    #[serde(default)]
    pub allow_patterns: Vec<String>,
    #[serde(default)]
    pub deny_patterns: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

fn default_ignore_all() -> bool {
    true
}

impl Default for DockerignoreConfig {
    fn default() -> Self {
        Self {
            ignore_all: true,
            allow_patterns: Vec::new(),
            deny_patterns: Vec::new(),
            comment: None,
        }
    }
}

impl DockerignoreConfig {
    pub fn render(&self) -> String {
        let mut lines: Vec<String> = Vec::new();
        if let Some(comment) = present(&self.comment) {
            lines.push(format!("# {}", comment));
        }
        lines.extend(self.deny_patterns.iter().cloned());
        if self.ignore_all {
            lines.push("**".to_string());
        }
        lines.extend(self.allow_patterns.iter().map(|p| format!("!{}", p)));
        lines.push(String::new());
        lines.join("\n")
    }
}

impl fmt::Display for DockerignoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// A `.dockerignore` that blocks everything except the `allow` patterns.
pub fn generate_dockerignore<I, S>(allow: I, comment: Option<&str>) -> String
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    DockerignoreConfig {
        ignore_all: true,
        allow_patterns: allow.into_iter().map(Into::into).collect(),
        deny_patterns: Vec::new(),
        comment: comment.map(str::to_string),
    }
    .render()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ignore_all() {
        assert_eq!(DockerignoreConfig::default().render(), "**\n");
    }

    #[test]
    fn test_allow_patterns() {
        let config = DockerignoreConfig {
            allow_patterns: vec!["*.tgz".to_string(), "hooks/".to_string()],
            ..Default::default()
        };
        assert_eq!(config.render(), "**\n!*.tgz\n!hooks/\n");
    }

    #[test]
    fn test_comment() {
        let config = DockerignoreConfig {
            comment: Some("Only allow tarballs".to_string()),
            ..Default::default()
        };
        assert_eq!(config.render(), "# Only allow tarballs\n**\n");
    }

    #[test]
    fn test_empty_comment_omitted() {
        let config = DockerignoreConfig {
            comment: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(config.render(), "**\n");
        assert_eq!(generate_dockerignore(["dist/"], Some("")), "**\n!dist/\n");
    }

    #[test]
    fn test_deny_patterns_without_ignore_all() {
        let config = DockerignoreConfig {
            ignore_all: false,
            deny_patterns: vec!["*.log".to_string(), "tmp/".to_string()],
            ..Default::default()
        };
        let result = config.render();
        assert_eq!(result, "*.log\ntmp/\n");
        assert!(!result.contains("**"));
    }

    #[test]
    fn test_full_ordering() {
        let config = DockerignoreConfig {
            ignore_all: true,
            allow_patterns: vec!["dist/".to_string()],
            deny_patterns: vec!["*.log".to_string()],
            comment: Some("Build context".to_string()),
        };
        assert_eq!(config.render(), "# Build context\n*.log\n**\n!dist/\n");
    }

    #[test]
    fn test_empty_without_ignore_all() {
        let config = DockerignoreConfig {
            ignore_all: false,
            ..Default::default()
        };
        assert_eq!(config.render(), "");
    }

    #[test]
    fn test_generate_basic() {
        assert_eq!(generate_dockerignore(["dist/"], None), "**\n!dist/\n");
    }

    #[test]
    fn test_generate_with_comment() {
        let result = generate_dockerignore(["app.py"], Some("Test"));
        assert_eq!(result, "# Test\n**\n!app.py\n");
    }

    #[test]
    fn test_deserialize_defaults() {
        let config: DockerignoreConfig = serde_yaml::from_str("allow_patterns: [\"*.whl\"]").unwrap();
        assert!(config.ignore_all);
        assert_eq!(config.render(), "**\n!*.whl\n");
    }
}
