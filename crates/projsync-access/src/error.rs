//! Error types for the access client.
//!
//! Expected remote answers (not-found, conflict, reserved-object rejection) are
//! not errors; they are reported through the outcome enums in
//! [`crate::outcome`]. Everything here is a genuine failure of one call.

use thiserror::Error;

pub type AccessResult<T> = Result<T, AccessError>;

#[derive(Debug, Error)]
pub enum AccessError {
    /// No response was received (connect failure, reset, timeout).
    #[error("transport error: {message}")]
    Transport { message: String, timed_out: bool },

    /// The remote answered with a status the caller has no policy for.
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),
}

impl AccessError {
    /// HTTP status attached to this failure, if the remote answered at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Response body captured for diagnostics.
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Status { body, .. } => Some(body),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport { timed_out: true, .. })
    }

    /// Whether a retry could plausibly succeed (network-level failures).
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::Status { status, .. } if *status >= 500)
    }
}

impl From<reqwest::Error> for AccessError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            return Self::Decode(e.to_string());
        }
        if e.is_builder() {
            return Self::InvalidConfig(e.to_string());
        }
        Self::Transport {
            timed_out: e.is_timeout(),
            message: e.to_string(),
        }
    }
}

impl From<serde_json::Error> for AccessError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}
