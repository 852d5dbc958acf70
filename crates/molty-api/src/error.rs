//! Error types for the game API client.

use molty_core::session::SessionError;
use reqwest::StatusCode;

use crate::normalize::NormalizeError;

/// Longest response body kept in an error message.
const MAX_BODY_IN_ERROR: usize = 200;

/// Errors that can occur while talking to the game API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The server answered 503: scheduled or ad-hoc maintenance.
    #[error("server under maintenance")]
    Maintenance,

    /// The server answered with a non-success status.
    #[error("API error {status}: {body}")]
    Status {
        /// HTTP status code.
        status: StatusCode,
        /// Truncated response body.
        body: String,
    },

    /// The request never produced a response (DNS, connect, timeout).
    #[error("request failed: {0}")]
    Transport(String),

    /// The response body was not the JSON we expected.
    #[error("undecodable response: {0}")]
    Decode(String),

    /// The envelope reported `success: false`.
    #[error("request rejected: {0}")]
    Rejected(String),

    /// The state response could not be normalised.
    #[error("malformed state: {source}")]
    Normalize {
        /// The underlying normalisation error.
        #[from]
        source: NormalizeError,
    },
}

impl ApiError {
    /// Classify a non-success status code.
    ///
    /// Returns `None` for 2xx statuses.
    pub fn from_status(status: StatusCode, body: &str) -> Option<Self> {
        if status.is_success() {
            return None;
        }
        if status == StatusCode::SERVICE_UNAVAILABLE {
            return Some(Self::Maintenance);
        }
        Some(Self::Status {
            status,
            body: truncate(body, MAX_BODY_IN_ERROR),
        })
    }

    /// Whether the same request may succeed if repeated right away.
    ///
    /// Transport failures, 429, and 5xx other than 503 are retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Status { status, .. } => {
                *status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
            }
            Self::Maintenance | Self::Decode(_) | Self::Rejected(_) | Self::Normalize { .. } => {
                false
            }
        }
    }

    /// Whether this is a client error other than rate limiting.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Status { status, .. }
            if status.is_client_error() && *status != StatusCode::TOO_MANY_REQUESTS)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return Self::Decode(err.to_string());
        }
        Self::Transport(err.to_string())
    }
}

impl From<ApiError> for SessionError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Maintenance => Self::Maintenance,
            ApiError::Transport(_) => Self::Transient(err.to_string()),
            ApiError::Status { .. } if err.is_retryable() => Self::Transient(err.to_string()),
            ApiError::Status { .. } | ApiError::Rejected(_) => Self::Fatal(err.to_string()),
            ApiError::Decode(_) | ApiError::Normalize { .. } => Self::Malformed(err.to_string()),
        }
    }
}

/// Cut `text` to at most `max` characters.
fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((end, _)) => format!("{}...", text.get(..end).unwrap_or(text)),
        None => text.to_owned(),
    }
}
