//! Error types for Starling API calls.

use crate::safety::sanitize_reqwest_error;
use thiserror::Error;

/// Failure modes of a single API call.
#[derive(Error, Debug)]
pub enum StarlingApiError {
    /// Missing or unusable configuration (signing key material, base URL).
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The API answered with a non-success status.
    #[error("Starling API error: {status} {status_text} - {body}")]
    Api {
        status: u16,
        status_text: String,
        body: String,
    },

    /// A JSON response body could not be parsed.
    #[error("Failed to parse JSON response: {0}")]
    Parse(#[source] serde_json::Error),

    /// Network-level failure (connect, TLS, body read).
    #[error("HTTP transport error: {0}")]
    Transport(String),

    /// The request could not be built (bad URL, unserialisable body, signing failure).
    #[error("Request error: {0}")]
    Request(String),
}

impl From<reqwest::Error> for StarlingApiError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(sanitize_reqwest_error(&value))
    }
}

impl StarlingApiError {
    /// HTTP status of an [`StarlingApiError::Api`] failure.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type alias for API operations.
pub type Result<T> = std::result::Result<T, StarlingApiError>;
