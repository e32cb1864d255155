//! Multi-stage build support.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::instruction::{present, BaseImage, Instruction};

/// A single stage in a multi-stage Dockerfile.
///
/// A stage is anchored by exactly one `FROM`; the instructions that follow it
/// are rendered in order, one per line, and are never reordered or merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    from: BaseImage,
    #[serde(default)]
    instructions: Vec<Instruction>,
}

impl Stage {
    pub fn new(from: BaseImage) -> Self {
        Self {
            from,
            instructions: Vec::new(),
        }
    }

    pub fn with_instructions(from: BaseImage, instructions: Vec<Instruction>) -> Self {
        Self { from, instructions }
    }

    /// The stage name given by `FROM ... AS <alias>`, if any.
    pub fn alias(&self) -> Option<&str> {
        present(&self.from.alias)
    }

    pub fn base(&self) -> &BaseImage {
        &self.from
    }

    /// Instructions following the `FROM`.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Split at every embedded `Instruction::From`, so each resulting stage
    /// has exactly one leading `FROM`.
    pub(crate) fn split_embedded_froms(self) -> Vec<Stage> {
        let mut stages = Vec::new();
        let mut current = Stage::new(self.from);
        for instruction in self.instructions {
            match instruction {
                Instruction::From(base) => {
                    stages.push(std::mem::replace(&mut current, Stage::new(base)));
                }
                other => current.instructions.push(other),
            }
        }
        stages.push(current);
        stages
    }

    pub fn render(&self) -> String {
        let mut lines = Vec::with_capacity(self.instructions.len() + 1);
        lines.push(self.from.render());
        lines.extend(self.instructions.iter().map(Instruction::render));
        lines.join("\n")
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
