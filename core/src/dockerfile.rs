//! Complete Dockerfile documents.
//!
//! A [`Dockerfile`] is an ordered, non-empty list of [`Stage`]s. Rendering
//! separates consecutive stages with one blank line and always ends the file
//! with exactly one newline.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::error::{DockergenError, Result};
use crate::instruction::{present, Instruction};
use crate::stage::Stage;

/// An immutable representation of a complete Dockerfile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dockerfile {
    stages: Vec<Stage>,
}

impl Dockerfile {
    /// Assemble a Dockerfile from stages, in build order.
    ///
    /// A `FROM` found inside a stage's instruction list starts a new stage
    /// there. Returns [`DockergenError::NoStages`] when `stages` is empty.
    pub fn new(stages: Vec<Stage>) -> Result<Self> {
        if stages.is_empty() {
            return Err(DockergenError::NoStages);
        }
        let stages: Vec<Stage> = stages
            .into_iter()
            .flat_map(Stage::split_embedded_froms)
            .collect();
        Ok(Self { stages })
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Look up a stage by its `AS` alias.
    pub fn stage(&self, alias: &str) -> Option<&Stage> {
        self.stages.iter().find(|s| s.alias() == Some(alias))
    }

    pub fn render(&self) -> String {
        let rendered: Vec<String> = self.stages.iter().map(Stage::render).collect();
        let mut result = rendered.join("\n\n");
        let content_len = result.trim_end_matches('\n').len();
        result.truncate(content_len);
        result.push('\n');
        result
    }

    /// Check that every `COPY --from=<ref>` names an earlier stage.
    ///
    /// A reference resolves when it equals the alias of a preceding stage or
    /// the zero-based index of a preceding stage. References to external
    /// images are rejected. This check is never run implicitly; rendering
    /// accepts any reference.
    pub fn validate_stage_references(&self) -> Result<()> {
        let mut known: HashSet<String> = HashSet::new();

        for (index, stage) in self.stages.iter().enumerate() {
            for instruction in stage.instructions() {
                let Instruction::Copy { from_stage, .. } = instruction else {
                    continue;
                };
                if let Some(reference) = present(from_stage) {
                    if !known.contains(reference) {
                        return Err(DockergenError::UnresolvedStage {
                            stage_index: index,
                            reference: reference.to_string(),
                        });
                    }
                }
            }

            known.insert(index.to_string());
            if let Some(alias) = stage.alias() {
                known.insert(alias.to_string());
            }
        }

        tracing::debug!(stages = self.stages.len(), "Stage references resolved");
        Ok(())
    }
}

impl fmt::Display for Dockerfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<Stage> for Dockerfile {
    fn from(stage: Stage) -> Self {
        Self {
            stages: stage.split_embedded_froms(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruction::BaseImage;

    fn stage(image: &str, alias: Option<&str>, instructions: Vec<Instruction>) -> Stage {
        let mut base = BaseImage::new(image);
        if let Some(alias) = alias {
            base = base.with_alias(alias);
        }
        Stage::with_instructions(base, instructions)
    }

    fn copy_from(reference: &str) -> Instruction {
        Instruction::Copy {
            src: "/out".to_string(),
            dst: "/app".to_string(),
            from_stage: Some(reference.to_string()),
            chown: None,
        }
    }

    #[test]
    fn test_new_rejects_empty() {
        assert!(matches!(
            Dockerfile::new(Vec::new()),
            Err(DockergenError::NoStages)
        ));
    }

    #[test]
    fn test_single_stage_render() {
        let df = Dockerfile::from(stage(
            "python:3.11",
            None,
            vec![Instruction::run("echo hello")],
        ));
        assert_eq!(df.render(), "FROM python:3.11\nRUN echo hello\n");
    }

    #[test]
    fn test_multi_stage_render() {
        let df = Dockerfile::new(vec![
            stage("python:3.11", Some("builder"), Vec::new()),
            stage("python:3.11-slim", None, Vec::new()),
        ])
        .unwrap();
        assert_eq!(
            df.render(),
            "FROM python:3.11 AS builder\n\nFROM python:3.11-slim\n"
        );
    }

    #[test]
    fn test_stage_separators() {
        let df = Dockerfile::new(vec![
            stage("a", None, vec![Instruction::run("1")]),
            stage("b", None, vec![Instruction::run("2")]),
            stage("c", None, vec![Instruction::run("3")]),
        ])
        .unwrap();
        let rendered = df.render();
        let blank_lines = rendered.lines().filter(|l| l.is_empty()).count();
        assert_eq!(blank_lines, 2);
    }

    #[test]
    fn test_single_trailing_newline_after_blank() {
        let df = Dockerfile::from(stage(
            "alpine",
            None,
            vec![Instruction::run("true"), Instruction::BlankLine],
        ));
        let rendered = df.render();
        assert_eq!(rendered, "FROM alpine\nRUN true\n");
    }

    #[test]
    fn test_single_trailing_newline_after_many_blanks() {
        let df = Dockerfile::from(stage(
            "alpine",
            None,
            vec![Instruction::BlankLine, Instruction::BlankLine, Instruction::BlankLine],
        ));
        assert_eq!(df.render(), "FROM alpine\n");
    }

    #[test]
    fn test_inner_blank_lines_survive() {
        let df = Dockerfile::new(vec![
            stage("a", None, vec![Instruction::BlankLine]),
            stage("b", None, Vec::new()),
        ])
        .unwrap();
        assert_eq!(df.render(), "FROM a\n\n\nFROM b\n");
    }

    #[test]
    fn test_display_matches_render() {
        let df = Dockerfile::from(stage("alpine", None, Vec::new()));
        assert_eq!(df.to_string(), df.render());
    }

    #[test]
    fn test_stage_lookup() {
        let df = Dockerfile::new(vec![
            stage("node:18", Some("frontend"), Vec::new()),
            stage("nginx:alpine", None, Vec::new()),
        ])
        .unwrap();
        assert_eq!(
            df.stage("frontend").map(|s| s.base().image.as_str()),
            Some("node:18")
        );
        assert!(df.stage("backend").is_none());
    }

    #[test]
    fn test_validate_alias_reference() {
        let df = Dockerfile::new(vec![
            stage("rust:1.75", Some("builder"), Vec::new()),
            stage("debian:bookworm", None, vec![copy_from("builder")]),
        ])
        .unwrap();
        assert!(df.validate_stage_references().is_ok());
    }

    #[test]
    fn test_validate_index_reference() {
        let df = Dockerfile::new(vec![
            stage("rust:1.75", None, Vec::new()),
            stage("debian:bookworm", None, vec![copy_from("0")]),
        ])
        .unwrap();
        assert!(df.validate_stage_references().is_ok());
    }

    #[test]
    fn test_validate_forward_reference_fails() {
        let df = Dockerfile::new(vec![
            stage("debian:bookworm", None, vec![copy_from("builder")]),
            stage("rust:1.75", Some("builder"), Vec::new()),
        ])
        .unwrap();
        match df.validate_stage_references() {
            Err(DockergenError::UnresolvedStage {
                stage_index,
                reference,
            }) => {
                assert_eq!(stage_index, 0);
                assert_eq!(reference, "builder");
            }
            other => panic!("Expected UnresolvedStage, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_skips_empty_reference() {
        let df = Dockerfile::from(stage("alpine", None, vec![copy_from("")]));
        assert!(df.validate_stage_references().is_ok());
        assert!(df.render().contains("COPY /out /app"));
    }

    #[test]
    fn test_validate_self_reference_fails() {
        let df = Dockerfile::from(stage("rust:1.75", Some("builder"), vec![copy_from("builder")]));
        assert!(df.validate_stage_references().is_err());
    }

    #[test]
    fn test_embedded_from_starts_stage() {
        let df = Dockerfile::new(vec![
            stage(
                "alpine",
                None,
                vec![
                    Instruction::From(BaseImage::new("rust:1.75").with_alias("builder")),
                    Instruction::run("cargo build"),
                ],
            ),
            stage("debian:bookworm", None, vec![copy_from("builder")]),
        ])
        .unwrap();

        assert_eq!(df.stages().len(), 3);
        assert_eq!(df.stages()[1].alias(), Some("builder"));
        assert_eq!(
            df.render(),
            "FROM alpine\n\nFROM rust:1.75 AS builder\nRUN cargo build\n\n\
             FROM debian:bookworm\nCOPY --from=builder /out /app\n"
        );
        assert!(df.validate_stage_references().is_ok());
    }

    #[test]
    fn test_render_ignores_unresolved_reference() {
        let df = Dockerfile::from(stage("alpine", None, vec![copy_from("missing")]));
        assert!(df.render().contains("COPY --from=missing /out /app"));
    }
}
