//! Error types for Moonlit

use thiserror::Error;

/// General Moonlit error type
#[derive(Debug, Error)]
pub enum MoonlitError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, MoonlitError>;
