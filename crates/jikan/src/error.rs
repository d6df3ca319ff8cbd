//! Request failures surfaced by the Jikan client.
//!
//! Cancellation is deliberately absent here: a cancelled call resolves to
//! [`Fetched::Cancelled`](crate::Fetched::Cancelled).

use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("timeout")]
    Timeout,

    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("Request failed with status {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("Failed to parse response: {0}")]
    Decode(String),

    #[error("Failed to build HTTP client: {0}")]
    Build(String),

    /// The task running the request died before answering
    #[error("Request task failed: {0}")]
    Aborted(String),
}

impl RequestError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            RequestError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for RequestError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RequestError::Timeout
        } else if err.is_decode() {
            RequestError::Decode(err.to_string())
        } else {
            RequestError::Network(err)
        }
    }
}

impl From<serde_json::Error> for RequestError {
    fn from(err: serde_json::Error) -> Self {
        RequestError::Decode(err.to_string())
    }
}
