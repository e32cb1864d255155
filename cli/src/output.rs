//! Writing generated artifacts.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use dockergen_core::Artifacts;

/// File name of the generated Dockerfile.
pub const DOCKERFILE_NAME: &str = "Dockerfile";
/// File name of the generated ignore file.
pub const DOCKERIGNORE_NAME: &str = ".dockerignore";

/// Where generated artifacts go.
#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Directory to write the Dockerfile and .dockerignore into
    #[arg(short = 'o', long = "output-dir", default_value = ".")]
    pub output_dir: PathBuf,

    /// Print the Dockerfile to stdout instead of writing files
    #[arg(long)]
    pub stdout: bool,
}

/// Write `artifacts` into `dir`, creating it if needed.
///
/// Returns the paths written, Dockerfile first.
pub fn write_artifacts(artifacts: &Artifacts, dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    let mut written = Vec::new();

    let dockerfile_path = dir.join(DOCKERFILE_NAME);
    std::fs::write(&dockerfile_path, &artifacts.dockerfile)
        .with_context(|| format!("Failed to write {}", dockerfile_path.display()))?;
    written.push(dockerfile_path);

    if let Some(dockerignore) = &artifacts.dockerignore {
        let dockerignore_path = dir.join(DOCKERIGNORE_NAME);
        std::fs::write(&dockerignore_path, dockerignore)
            .with_context(|| format!("Failed to write {}", dockerignore_path.display()))?;
        written.push(dockerignore_path);
    }

    for path in &written {
        tracing::debug!(path = %path.display(), "Wrote artifact");
    }
    Ok(written)
}

/// Print or write `artifacts` as requested by `output`.
pub fn emit(artifacts: &Artifacts, output: &OutputArgs) -> anyhow::Result<()> {
    if output.stdout {
        print!("{}", artifacts.dockerfile);
        return Ok(());
    }

    for path in write_artifacts(artifacts, &output.output_dir)? {
        println!("Wrote {}", path.display());
    }
    Ok(())
}
