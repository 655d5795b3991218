//! Error types for Reel.

use thiserror::Error;

/// Main error type for Reel operations.
///
/// Per-frame conditions (stream exhausted, rejected format, gap in a track)
/// are not errors and never produce this type.
#[derive(Error, Debug)]
pub enum ReelError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Decoder error: {0}")]
    Decoder(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Timeline error: {0}")]
    Timeline(String),

    #[error("Audio error: {0}")]
    Audio(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for Reel operations.
pub type Result<T> = std::result::Result<T, ReelError>;
