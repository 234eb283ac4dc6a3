//! Error types for the chat widget.

use thiserror::Error;

/// Widget error type.
#[derive(Error, Debug)]
pub enum WidgetError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading a local attachment failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Server answered with a non-success status and no usable body.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Body text returned by the server.
        message: String,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An inline image preview could not be produced.
    #[error("Preview error: {0}")]
    Preview(String),
}

impl From<config::ConfigError> for WidgetError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result type alias for widget operations.
pub type Result<T> = std::result::Result<T, WidgetError>;
