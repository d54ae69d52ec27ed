//! Error types for nino
//!
//! Every failure is terminal for the process; nothing here is retried.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the nino client
#[derive(Error, Debug)]
pub enum NinoError {
    /// Missing or invalid flags, prompt sources, output destinations
    #[error("Configuration error: {0}")]
    Config(String),

    /// Server unreachable or refused the connection
    #[error("Connection error: {0}")]
    Connectivity(String),

    /// Server answered with a non-2xx status
    #[error("Received HTTP status {status}\nResponse body: {body}")]
    HttpStatus { status: u16, body: String },

    /// HTTP client errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Malformed or truncated response stream
    #[error("Failed to decode JSON response: {0}")]
    Decode(String),

    /// The continuation-token callback rejected the token
    #[error("Failed to handle context: {0}")]
    ContextHandler(Box<NinoError>),

    /// Context store errors
    #[error("Context persistence error: {0}")]
    Persistence(String),

    /// I/O errors tied to a specific file
    #[error("Error reading '{}': {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl NinoError {
    /// Wrap an I/O failure with the path it happened on
    pub fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        NinoError::File {
            path: path.into(),
            source,
        }
    }

    /// Whether the error happened before any request left the process
    pub fn is_config(&self) -> bool {
        matches!(self, NinoError::Config(_))
    }
}

/// Result type alias for nino operations
pub type Result<T> = std::result::Result<T, NinoError>;
