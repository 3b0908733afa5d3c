//! Error types for Artsync

use thiserror::Error;

/// Result type alias for Artsync operations
pub type Result<T> = std::result::Result<T, ArtsyncError>;

/// Main error type shared by the storage and logging layers
#[derive(Error, Debug)]
pub enum ArtsyncError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ArtsyncError {
    /// Create an invalid record error
    pub fn invalid_record(msg: impl Into<String>) -> Self {
        Self::InvalidRecord(msg.into())
    }
}
