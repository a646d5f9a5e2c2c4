pub use reqwest::StatusCode;
use thiserror::Error;

/// Everything that can go wrong talking to the backend.
///
/// The dashboard collapses `Transport` and `Server` into a single "something went wrong" flag,
/// but they stay apart here so logs say which one happened.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never completed: connection refused, reset, timed out, or the body could not
    /// be decoded.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("GET {endpoint} returned {status}")]
    Server {
        endpoint: String,
        status: StatusCode,
    },

    #[error("invalid base url `{url}`: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl ApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status(),
            ApiError::InvalidBaseUrl { .. } => None,
        }
    }
}
