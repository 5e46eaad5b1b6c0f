//! Fetch Error Types
//!
//! Every panel of the dashboard is loaded independently, so every failure is
//! scoped to one request and classified here.

use thiserror::Error;

use crate::model::ValidationError;

/// Errors that can occur while fetching a dashboard resource
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    /// Connection could not be established or was dropped
    #[error("Network error: {0}")]
    Network(String),

    /// The request did not complete in time
    #[error("Request timeout")]
    Timeout,

    /// The API answered with a non-success status
    #[error("API error {status}: {message}")]
    Status { status: u16, message: String },

    /// Body did not match the expected schema or broke an invariant
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl FetchError {
    /// Short code for per-panel placeholders and structured logs
    pub fn code(&self) -> &'static str {
        match self {
            FetchError::Network(_) => "NETWORK_ERROR",
            FetchError::Timeout => "TIMEOUT",
            FetchError::Status { .. } => "API_ERROR",
            FetchError::MalformedResponse(_) => "MALFORMED_RESPONSE",
        }
    }

    /// Whether the failure happened before any response was read
    pub fn is_network(&self) -> bool {
        matches!(self, FetchError::Network(_) | FetchError::Timeout)
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else if e.is_decode() {
            FetchError::MalformedResponse(e.to_string())
        } else {
            FetchError::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::MalformedResponse(e.to_string())
    }
}

impl From<ValidationError> for FetchError {
    fn from(e: ValidationError) -> Self {
        FetchError::MalformedResponse(e.to_string())
    }
}

/// Result type for fetch operations
pub type FetchResult<T> = Result<T, FetchError>;
