//! Error types for chorus-llm
//!
//! These never cross the adapter boundary: [`crate::ChatAdapter::chat`]
//! folds them into a [`crate::ChatOutcome::Failure`].

use thiserror::Error;

/// LLM error type
#[derive(Debug, Error)]
pub enum Error {
    /// Vendor has no credential or is unreachable
    #[error("provider not configured: {0}")]
    NotConfigured(String),

    /// Vendor returned an error response
    #[error("api error: {0}")]
    Api(String),

    /// Rate limit exceeded
    #[error("rate limit exceeded")]
    RateLimit,

    /// Response could not be understood
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Transport error
    #[error("network error: {0}")]
    Network(String),

    /// Timeout
    #[error("timeout after {0}ms")]
    Timeout(u64),
}

impl Error {
    /// Classify a reqwest error the way every HTTP adapter reports it.
    /// The URL is dropped because Gemini carries its key in the query string.
    pub(crate) fn from_transport(e: reqwest::Error, timeout_ms: u64) -> Self {
        if e.is_timeout() {
            Self::Timeout(timeout_ms)
        } else if e.is_connect() {
            Self::Network(format!("connection failed: {}", e.without_url()))
        } else {
            Self::Network(e.without_url().to_string())
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
