//! Fluent Dockerfile construction.
//!
//! # Usage
//!
//! ```
//! use dockergen_core::DockerfileBuilder;
//!
//! let df = DockerfileBuilder::new()
//!     .from_image("python:3.11-slim")
//!     .workdir("/app")
//!     .copy("requirements.txt", ".")
//!     .run("pip install --no-cache-dir -r requirements.txt")
//!     .copy(".", ".")
//!     .expose(8080)
//!     .cmd(["python", "app.py"])
//!     .build()
//!     .unwrap();
//!
//! assert!(df.render().starts_with("FROM python:3.11-slim\nWORKDIR /app\n"));
//! ```

use crate::dockerfile::Dockerfile;
use crate::error::Result;
use crate::instruction::{BaseImage, HealthCheck, Instruction};
use crate::labels::Labels;
use crate::stage::Stage;

/// Accumulates instructions into stages.
///
/// Every `from_*` call closes the stage in progress and opens a new one;
/// every other call appends to the open stage. [`build`](Self::build) closes
/// the last stage and hands back the finished [`Dockerfile`], leaving the
/// builder empty.
///
/// Instructions appended before the first `from_*` call are kept and become
/// part of the first stage.
#[derive(Debug, Default)]
pub struct DockerfileBuilder {
    stages: Vec<Stage>,
    current_from: Option<BaseImage>,
    current_instructions: Vec<Instruction>,
}

impl DockerfileBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the stage in progress to the finished list.
    ///
    /// No-op while no `FROM` is pending.
    fn flush_stage(&mut self) {
        let Some(from) = self.current_from.take() else {
            return;
        };
        let instructions = std::mem::take(&mut self.current_instructions);

        tracing::debug!(
            stage = self.stages.len(),
            image = %from.image,
            alias = from.alias.as_deref().unwrap_or(""),
            instructions = instructions.len(),
            "Stage complete"
        );
        self.stages.push(Stage::with_instructions(from, instructions));
    }

    fn push(&mut self, instruction: Instruction) -> &mut Self {
        tracing::trace!(instruction = instruction.keyword(), "Appending instruction");
        self.current_instructions.push(instruction);
        self
    }

    /// Start a new stage with `FROM <base>`.
    pub fn from_base(&mut self, base: BaseImage) -> &mut Self {
        self.flush_stage();
        self.current_from = Some(base);
        self
    }

    /// Start a new stage with `FROM <image>`.
    pub fn from_image(&mut self, image: impl Into<String>) -> &mut Self {
        self.from_base(BaseImage::new(image))
    }

    /// Start a new named stage with `FROM <image> AS <alias>`.
    pub fn from_image_as(&mut self, image: impl Into<String>, alias: impl Into<String>) -> &mut Self {
        self.from_base(BaseImage::new(image).with_alias(alias))
    }

    pub fn run(&mut self, command: impl Into<String>) -> &mut Self {
        self.push(Instruction::run(command))
    }

    pub fn copy(&mut self, src: impl Into<String>, dst: impl Into<String>) -> &mut Self {
        self.push(Instruction::copy(src, dst))
    }

    /// `COPY --from=<stage> <src> <dst>`
    pub fn copy_from(
        &mut self,
        stage: impl Into<String>,
        src: impl Into<String>,
        dst: impl Into<String>,
    ) -> &mut Self {
        self.push(Instruction::Copy {
            src: src.into(),
            dst: dst.into(),
            from_stage: Some(stage.into()),
            chown: None,
        })
    }

    /// `COPY --chown=<owner> <src> <dst>`
    pub fn copy_chown(
        &mut self,
        src: impl Into<String>,
        dst: impl Into<String>,
        owner: impl Into<String>,
    ) -> &mut Self {
        self.push(Instruction::Copy {
            src: src.into(),
            dst: dst.into(),
            from_stage: None,
            chown: Some(owner.into()),
        })
    }

    pub fn add(&mut self, src: impl Into<String>, dst: impl Into<String>) -> &mut Self {
        self.push(Instruction::Add {
            src: src.into(),
            dst: dst.into(),
            chown: None,
        })
    }

    /// `ADD --chown=<owner> <src> <dst>`
    pub fn add_chown(
        &mut self,
        src: impl Into<String>,
        dst: impl Into<String>,
        owner: impl Into<String>,
    ) -> &mut Self {
        self.push(Instruction::Add {
            src: src.into(),
            dst: dst.into(),
            chown: Some(owner.into()),
        })
    }

    pub fn workdir(&mut self, path: impl Into<String>) -> &mut Self {
        self.push(Instruction::workdir(path))
    }

    pub fn user(&mut self, user: impl Into<String>) -> &mut Self {
        self.push(Instruction::User {
            user: user.into(),
            group: None,
        })
    }

    /// `USER <user>:<group>`
    pub fn user_group(&mut self, user: impl Into<String>, group: impl Into<String>) -> &mut Self {
        self.push(Instruction::User {
            user: user.into(),
            group: Some(group.into()),
        })
    }

    pub fn expose(&mut self, port: u16) -> &mut Self {
        self.push(Instruction::expose(port))
    }

    /// `EXPOSE <port>/<protocol>`
    pub fn expose_protocol(&mut self, port: u16, protocol: impl Into<String>) -> &mut Self {
        self.push(Instruction::Expose {
            port,
            protocol: Some(protocol.into()),
        })
    }

    pub fn entrypoint<I, S>(&mut self, args: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push(Instruction::entrypoint(args))
    }

    pub fn cmd<I, S>(&mut self, args: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push(Instruction::cmd(args))
    }

    pub fn arg(&mut self, name: impl Into<String>) -> &mut Self {
        self.push(Instruction::Arg {
            name: name.into(),
            default: None,
        })
    }

    /// `ARG <name>=<default>`
    pub fn arg_default(&mut self, name: impl Into<String>, default: impl Into<String>) -> &mut Self {
        self.push(Instruction::Arg {
            name: name.into(),
            default: Some(default.into()),
        })
    }

    pub fn env(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.push(Instruction::env(key, value))
    }

    pub fn label(&mut self, labels: Labels) -> &mut Self {
        self.push(Instruction::Label { labels })
    }

    pub fn volume<I, S>(&mut self, paths: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push(Instruction::Volume {
            paths: paths.into_iter().map(Into::into).collect(),
        })
    }

    pub fn shell<I, S>(&mut self, args: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push(Instruction::Shell {
            args: args.into_iter().map(Into::into).collect(),
        })
    }

    pub fn healthcheck(&mut self, check: HealthCheck) -> &mut Self {
        self.push(Instruction::HealthCheck(check))
    }

    pub fn healthcheck_none(&mut self) -> &mut Self {
        self.push(Instruction::HealthCheckNone)
    }

    pub fn comment(&mut self, text: impl Into<String>) -> &mut Self {
        self.push(Instruction::comment(text))
    }

    pub fn blank(&mut self) -> &mut Self {
        self.push(Instruction::BlankLine)
    }

    /// Append a pre-built instruction.
    ///
    /// A `FROM` instruction starts a new stage, exactly like
    /// [`from_base`](Self::from_base).
    pub fn instruction(&mut self, instruction: Instruction) -> &mut Self {
        match instruction {
            Instruction::From(base) => self.from_base(base),
            other => self.push(other),
        }
    }

    /// Finalize and return the Dockerfile.
    ///
    /// Fails with [`DockergenError::NoStages`](crate::DockergenError::NoStages) if no stage was ever started.
    pub fn build(&mut self) -> Result<Dockerfile> {
        self.flush_stage();
        Dockerfile::new(std::mem::take(&mut self.stages))
    }
}
