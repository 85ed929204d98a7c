//! Media store error types.

use thiserror::Error;

/// Result type for media store operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors that can occur during media store operations.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Failed to configure media client: {0}")]
    ConfigError(String),

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Invalid response from media host: {0}")]
    InvalidResponse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl MediaError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn upload_failed(msg: impl Into<String>) -> Self {
        Self::UploadFailed(msg.into())
    }
}
