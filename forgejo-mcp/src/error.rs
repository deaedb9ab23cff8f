//! Unified error handling for the forgejo-mcp library
//!
//! Library code returns [`ForgeMcpError`] through the [`Result`] alias. Errors
//! that describe a bad tool call live in [`crate::mcp::dispatch`] instead, since
//! those are reported back to the calling agent rather than propagated.

use std::io;
use thiserror::Error;

use crate::config::ConfigError;

/// The main error type for the forgejo-mcp library
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ForgeMcpError {
    /// IO operation failed
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The HTTP request could not be sent or its body could not be read
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The Forgejo API answered with a non-success status
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the server
        status: u16,
        /// Message extracted from the response body
        message: String,
    },

    /// A base URL or request path could not be built
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Invalid configuration
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl ForgeMcpError {
    /// Build an API error from a status code and response body
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Whether the server reported that the target does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status: 404, .. })
    }
}

/// Result type alias for forgejo-mcp operations
pub type Result<T> = std::result::Result<T, ForgeMcpError>;
