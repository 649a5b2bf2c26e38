//! AutoClaw error types

use thiserror::Error;

/// AutoClaw error type
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Session bootstrap error
    #[error("Bootstrap error: {0}")]
    Bootstrap(String),

    /// Memory backend error
    #[error("Memory error: {0}")]
    Memory(String),

    /// LLM provider error
    #[error("LLM error: {0}")]
    Llm(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for AutoClaw operations
pub type Result<T> = std::result::Result<T, Error>;
