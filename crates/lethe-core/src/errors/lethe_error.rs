use super::{ConfigError, GraphError, IngestError, SimilarityError};

/// Top-level error for every fallible Lethe operation.
#[derive(Debug, thiserror::Error)]
pub enum LetheError {
    #[error("configuration error: {0}")]
    ConfigError(#[from] ConfigError),

    #[error("graph error: {0}")]
    GraphError(#[from] GraphError),

    #[error("ingest error: {0}")]
    IngestError(#[from] IngestError),

    #[error("similarity error: {0}")]
    SimilarityError(#[from] SimilarityError),

    #[error("config parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type LetheResult<T> = Result<T, LetheError>;
