//! Dockerfile instructions.
//!
//! Each [`Instruction`] is an immutable value that renders to exactly one
//! piece of Dockerfile text via [`Instruction::render`]. Rendering never
//! fails and never validates content: whatever the caller puts in a field is
//! written out verbatim.
//!
//! Exec-form arguments (`ENTRYPOINT`, `CMD`, `SHELL`, multi-path `VOLUME`) are
//! written as `["a", "b"]`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::labels::Labels;

/// Default `HEALTHCHECK --interval`, in seconds.
pub const DEFAULT_HEALTHCHECK_INTERVAL_SECS: u32 = 10;
/// Default `HEALTHCHECK --timeout`, in seconds.
pub const DEFAULT_HEALTHCHECK_TIMEOUT_SECS: u32 = 5;
/// Default `HEALTHCHECK --start-period`, in seconds.
pub const DEFAULT_HEALTHCHECK_START_PERIOD_SECS: u32 = 30;
/// Default `HEALTHCHECK --retries`.
pub const DEFAULT_HEALTHCHECK_RETRIES: u32 = 3;

/// Indentation of each `key="value"` line in a multi-line `LABEL`.
const LABEL_INDENT: &str = "      ";

/// `FROM [--platform=<platform>] <image> [AS <alias>]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseImage {
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
}

impl BaseImage {
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            alias: None,
            platform: None,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    pub fn render(&self) -> String {
        let mut parts = vec!["FROM".to_string()];
        if let Some(platform) = present(&self.platform) {
            parts.push(format!("--platform={}", platform));
        }
        parts.push(self.image.clone());
        if let Some(alias) = present(&self.alias) {
            parts.push(format!("AS {}", alias));
        }
        parts.join(" ")
    }
}

impl fmt::Display for BaseImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// `HEALTHCHECK` with explicit timing flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCheck {
    pub command: String,
    #[serde(default = "default_interval")]
    pub interval_seconds: u32,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
    #[serde(default = "default_start_period")]
    pub start_period_seconds: u32,
    #[serde(default = "default_retries")]
    pub retries: u32,
}

fn default_interval() -> u32 {
    DEFAULT_HEALTHCHECK_INTERVAL_SECS
}

fn default_timeout() -> u32 {
    DEFAULT_HEALTHCHECK_TIMEOUT_SECS
}

fn default_start_period() -> u32 {
    DEFAULT_HEALTHCHECK_START_PERIOD_SECS
}

fn default_retries() -> u32 {
    DEFAULT_HEALTHCHECK_RETRIES
}

impl HealthCheck {
    /// Health check running `command` with the default timings.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            interval_seconds: DEFAULT_HEALTHCHECK_INTERVAL_SECS,
            timeout_seconds: DEFAULT_HEALTHCHECK_TIMEOUT_SECS,
            start_period_seconds: DEFAULT_HEALTHCHECK_START_PERIOD_SECS,
            retries: DEFAULT_HEALTHCHECK_RETRIES,
        }
    }

    pub fn interval(mut self, seconds: u32) -> Self {
        self.interval_seconds = seconds;
        self
    }

    pub fn timeout(mut self, seconds: u32) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    pub fn start_period(mut self, seconds: u32) -> Self {
        self.start_period_seconds = seconds;
        self
    }

    pub fn retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    pub fn render(&self) -> String {
        format!(
            "HEALTHCHECK --interval={}s --timeout={}s --start-period={}s --retries={} \\\n  CMD {}",
            self.interval_seconds,
            self.timeout_seconds,
            self.start_period_seconds,
            self.retries,
            self.command
        )
    }
}

impl fmt::Display for HealthCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// A single Dockerfile instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Instruction {
    /// `# <text>`
    Comment { text: String },
    /// An empty line
    BlankLine,
    /// `FROM [--platform=<platform>] <image> [AS <alias>]`
    From(BaseImage),
    /// `RUN <command>` (shell form, passed through verbatim)
    Run { command: String },
    /// `COPY [--from=<stage>] [--chown=<owner>] <src> <dst>`
    Copy {
        src: String,
        dst: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        from_stage: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        chown: Option<String>,
    },
    /// `ADD [--chown=<owner>] <src> <dst>`
    Add {
        src: String,
        dst: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        chown: Option<String>,
    },
    /// `WORKDIR <path>`
    Workdir { path: String },
    /// `USER <user>[:<group>]`
    User {
        user: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        group: Option<String>,
    },
    /// `EXPOSE <port>[/<protocol>]`
    Expose {
        port: u16,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        protocol: Option<String>,
    },
    /// `ENTRYPOINT ["exec", "form"]`
    Entrypoint { args: Vec<String> },
    /// `CMD ["exec", "form"]`
    Cmd { args: Vec<String> },
    /// `ARG <name>[=<default>]`
    Arg {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default: Option<String>,
    },
    /// `ENV <key>="<value>"`
    Env { key: String, value: String },
    /// `LABEL <key>="<value>" ...`
    Label {
        #[serde(default)]
        labels: Labels,
    },
    /// `VOLUME <path>` or `VOLUME ["a", "b"]`
    Volume { paths: Vec<String> },
    /// `SHELL ["exec", "form"]`
    Shell { args: Vec<String> },
    /// `HEALTHCHECK --interval=... CMD <command>`
    HealthCheck(HealthCheck),
    /// `HEALTHCHECK NONE`, disabling a check inherited from the base image
    HealthCheckNone,
}

impl Instruction {
    pub fn comment(text: impl Into<String>) -> Self {
        Instruction::Comment { text: text.into() }
    }

    pub fn run(command: impl Into<String>) -> Self {
        Instruction::Run {
            command: command.into(),
        }
    }

    pub fn copy(src: impl Into<String>, dst: impl Into<String>) -> Self {
        Instruction::Copy {
            src: src.into(),
            dst: dst.into(),
            from_stage: None,
            chown: None,
        }
    }

    pub fn workdir(path: impl Into<String>) -> Self {
        Instruction::Workdir { path: path.into() }
    }

    pub fn env(key: impl Into<String>, value: impl Into<String>) -> Self {
        Instruction::Env {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn expose(port: u16) -> Self {
        Instruction::Expose {
            port,
            protocol: None,
        }
    }

    pub fn entrypoint<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Instruction::Entrypoint {
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    pub fn cmd<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Instruction::Cmd {
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// The instruction keyword, as it appears in the rendered text.
    ///
    /// Comments and blank lines have no keyword and return `"#"` and `""`.
    pub fn keyword(&self) -> &'static str {
        match self {
            Instruction::Comment { .. } => "#",
            Instruction::BlankLine => "",
            Instruction::From(_) => "FROM",
            Instruction::Run { .. } => "RUN",
            Instruction::Copy { .. } => "COPY",
            Instruction::Add { .. } => "ADD",
            Instruction::Workdir { .. } => "WORKDIR",
            Instruction::User { .. } => "USER",
            Instruction::Expose { .. } => "EXPOSE",
            Instruction::Entrypoint { .. } => "ENTRYPOINT",
            Instruction::Cmd { .. } => "CMD",
            Instruction::Arg { .. } => "ARG",
            Instruction::Env { .. } => "ENV",
            Instruction::Label { .. } => "LABEL",
            Instruction::Volume { .. } => "VOLUME",
            Instruction::Shell { .. } => "SHELL",
            Instruction::HealthCheck(_) | Instruction::HealthCheckNone => "HEALTHCHECK",
        }
    }

    /// Render the instruction to Dockerfile text.
    ///
    /// Multi-line instructions (`LABEL` with several entries, `HEALTHCHECK`)
    /// use `\` continuations and contain embedded newlines but no trailing one.
    pub fn render(&self) -> String {
        match self {
            Instruction::Comment { text } => format!("# {}", text),
            Instruction::BlankLine => String::new(),
            Instruction::From(base) => base.render(),
            Instruction::Run { command } => format!("RUN {}", command),
            Instruction::Copy {
                src,
                dst,
                from_stage,
                chown,
            } => {
                let mut parts = vec!["COPY".to_string()];
                if let Some(stage) = present(from_stage) {
                    parts.push(format!("--from={}", stage));
                }
                if let Some(owner) = present(chown) {
                    parts.push(format!("--chown={}", owner));
                }
                parts.push(src.clone());
                parts.push(dst.clone());
                parts.join(" ")
            }
            Instruction::Add { src, dst, chown } => {
                let mut parts = vec!["ADD".to_string()];
                if let Some(owner) = present(chown) {
                    parts.push(format!("--chown={}", owner));
                }
                parts.push(src.clone());
                parts.push(dst.clone());
                parts.join(" ")
            }
            Instruction::Workdir { path } => format!("WORKDIR {}", path),
            Instruction::User { user, group } => match group {
                Some(group) => format!("USER {}:{}", user, group),
                None => format!("USER {}", user),
            },
            Instruction::Expose { port, protocol } => match present(protocol) {
                Some(protocol) => format!("EXPOSE {}/{}", port, protocol),
                None => format!("EXPOSE {}", port),
            },
            Instruction::Entrypoint { args } => format!("ENTRYPOINT {}", exec_form(args)),
            Instruction::Cmd { args } => format!("CMD {}", exec_form(args)),
            Instruction::Arg { name, default } => match default {
                Some(default) => format!("ARG {}={}", name, default),
                None => format!("ARG {}", name),
            },
            Instruction::Env { key, value } => format!("ENV {}=\"{}\"", key, value),
            Instruction::Label { labels } => render_label(labels),
            Instruction::Volume { paths } => match paths.as_slice() {
                [single] => format!("VOLUME {}", single),
                _ => format!("VOLUME {}", exec_form(paths)),
            },
            Instruction::Shell { args } => format!("SHELL {}", exec_form(args)),
            Instruction::HealthCheck(check) => check.render(),
            Instruction::HealthCheckNone => "HEALTHCHECK NONE".to_string(),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<BaseImage> for Instruction {
    fn from(base: BaseImage) -> Self {
        Instruction::From(base)
    }
}

impl From<HealthCheck> for Instruction {
    fn from(check: HealthCheck) -> Self {
        Instruction::HealthCheck(check)
    }
}

impl From<Labels> for Instruction {
    fn from(labels: Labels) -> Self {
        Instruction::Label { labels }
    }
}

/// Value of an optional flag or suffix; an empty string counts as unset.
///
/// `USER` groups and `ARG` defaults are rendered as given and do not go
/// through this.
pub(crate) fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// `["a", "b", "c"]`
fn exec_form(args: &[String]) -> String {
    let quoted: Vec<String> = args.iter().map(|a| format!("\"{}\"", a)).collect();
    format!("[{}]", quoted.join(", "))
}

/// An empty label set renders to nothing; callers are expected to skip it.
fn render_label(labels: &Labels) -> String {
    let entries: Vec<String> = labels
        .iter()
        .map(|(key, value)| format!("{}=\"{}\"", key, value))
        .collect();

    match entries.as_slice() {
        [] => String::new(),
        [single] => format!("LABEL {}", single),
        _ => {
            let last = entries.len() - 1;
            let mut lines = vec!["LABEL \\".to_string()];
            for (i, entry) in entries.iter().enumerate() {
                let suffix = if i < last { " \\" } else { "" };
                lines.push(format!("{}{}{}", LABEL_INDENT, entry, suffix));
            }
            lines.join("\n")
        }
    }
}
