use thiserror::Error;

/// dockergen error types
#[derive(Error, Debug)]
pub enum DockergenError {
    /// A Dockerfile was finalized without any FROM stage
    #[error("Dockerfile must have at least one FROM stage")]
    NoStages,

    /// A `COPY --from` reference does not name an earlier stage
    #[error("Stage {stage_index}: COPY --from={reference} does not refer to an earlier stage")]
    UnresolvedStage {
        stage_index: usize,
        reference: String,
    },

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<serde_json::Error> for DockergenError {
    fn from(err: serde_json::Error) -> Self {
        DockergenError::SerializationError(err.to_string())
    }
}

impl From<serde_yaml::Error> for DockergenError {
    fn from(err: serde_yaml::Error) -> Self {
        DockergenError::SerializationError(err.to_string())
    }
}

/// Result type alias for dockergen operations
pub type Result<T> = std::result::Result<T, DockergenError>;
