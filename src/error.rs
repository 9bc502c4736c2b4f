// src/error.rs

use thiserror::Error;

/// Core error types for Slackstat
#[derive(Error, Debug)]
pub enum Error {
    /// The external package tool could not be spawned or exited non-zero
    #[error("External tool error: {0}")]
    ExternalTool(String),

    /// Tool output did not match the expected record format
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid or missing required argument or config value
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using Slackstat's Error type
pub type Result<T> = std::result::Result<T, Error>;
