//! Error types for the connect crate.

use thiserror::Error;

use copydesk_core::errors::AuthError;

/// Result type alias for remote API operations.
pub type Result<T> = std::result::Result<T, ConnectError>;

/// Errors raised by the remote API access layer.
#[derive(Debug, Error)]
pub enum ConnectError {
    /// The API answered with a non-success status (other than a retried 429).
    #[error("API error ({status}): {message}")]
    Api {
        status: u16,
        message: String,
        /// Whether the condition is transient from a caller's point of view.
        /// Decided once from the status when the response is inspected; the
        /// client itself only retries 429 and transport failures.
        retryable: bool,
    },

    /// Rate-limit retry budget exhausted.
    #[error("rate limited: gave up after {attempts} attempts")]
    RateLimited { attempts: usize },

    /// Network-level failure after exhausting retries.
    #[error("transport error: {0}")]
    Transient(#[source] reqwest::Error),

    /// Credential or token failure.
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// A response body could not be decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The server response violated the API contract.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl ConnectError {
    /// Create an API error; retryability is classified here, once, from the
    /// status alone.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
            retryable: matches!(status, 408 | 429 | 500..=599),
        }
    }

    /// Create an invalid-response error.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse(message.into())
    }

    /// HTTP status if the server produced one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::RateLimited { .. } => Some(429),
            _ => None,
        }
    }

    /// Whether a caller could reasonably retry the whole operation later.
    pub fn retryable(&self) -> bool {
        match self {
            Self::Api { retryable, .. } => *retryable,
            Self::RateLimited { .. } | Self::Transient(_) => true,
            Self::Auth(_) | Self::Json(_) | Self::InvalidResponse(_) => false,
        }
    }
}
