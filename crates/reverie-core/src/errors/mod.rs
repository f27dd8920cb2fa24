//! Error hierarchy. Subsystem errors nest inside [`ReverieError`] via `From`.

mod model_error;
mod similarity_error;
mod storage_error;

pub use model_error::ModelError;
pub use similarity_error::SimilarityError;
pub use storage_error::StorageError;

/// Top-level error for every Reverie operation.
#[derive(Debug, thiserror::Error)]
pub enum ReverieError {
    #[error("observation not found: {id}")]
    ObservationNotFound { id: i64 },

    #[error("invalid observation type: {type_name}")]
    InvalidType { type_name: String },

    #[error("invalid memory tier: {tier}")]
    InvalidTier { tier: String },

    #[error("storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("similarity provider error: {0}")]
    SimilarityError(#[from] SimilarityError),

    #[error("confidence model error: {0}")]
    ModelError(#[from] ModelError),

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("concurrency error: {0}")]
    ConcurrencyError(String),
}

/// Convenience alias used throughout the workspace.
pub type ReverieResult<T> = Result<T, ReverieError>;
