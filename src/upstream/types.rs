//! Upstream error definitions.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur while talking to a third-party API.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Upstream answered with a non-success status.
    #[error("upstream returned {status}: {message}")]
    Status { status: StatusCode, message: String },

    /// Connection, TLS or timeout failure.
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Body could not be decoded into the expected shape.
    #[error("malformed response: {0}")]
    Decode(String),

    /// Body exceeded the configured size cap.
    #[error("response larger than {limit} bytes")]
    TooLarge { limit: u64 },

    /// Credential for this upstream is not configured.
    #[error("{0} API key not configured")]
    NotConfigured(&'static str),
}

impl UpstreamError {
    /// Status code reported by the upstream, if it answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            UpstreamError::Status { status, .. } => Some(*status),
            UpstreamError::Network(e) => e.status(),
            _ => None,
        }
    }
}

/// Result type for upstream operations.
pub type UpstreamResult<T> = Result<T, UpstreamError>;
