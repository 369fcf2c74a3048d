//! # Domain Errors

use thiserror::Error;

/// Record batcher error types.
#[derive(Debug, Error)]
pub enum BatcherError {
    /// A batch could not be serialized.
    #[error("Failed to serialize batch: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Configuration rejected.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
