//! Error types for Replicate API operations.

use thiserror::Error;

/// Errors that can occur during Replicate API operations.
#[derive(Debug, Error)]
pub enum ReplicateError {
    /// Configuration is missing or incomplete.
    #[error("Replicate configuration required: {0}")]
    ConfigMissing(String),

    /// An argument could not be interpreted (e.g. a malformed `owner/name`).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// API request failed with a non-success status.
    #[error("Replicate API error: {message}")]
    ApiError {
        message: String,
        status_code: Option<u16>,
    },

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The payload was malformed or did not match the expected shape.
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    /// Rate limited.
    #[error("Rate limited, retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },

    /// Pagination was stopped through its cancellation token.
    #[error("Pagination cancelled")]
    Cancelled,
}

impl ReplicateError {
    /// Returns true if the error came from decoding a payload.
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_))
    }

    /// Returns true if the error was surfaced by the fetch collaborator
    /// (transport, status, rate limiting or URL resolution).
    pub fn is_fetch(&self) -> bool {
        matches!(
            self,
            Self::HttpError(_) | Self::ApiError { .. } | Self::RateLimited { .. } | Self::UrlError(_)
        )
    }

    /// HTTP status code, when the error carries one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::ApiError { status_code, .. } => *status_code,
            Self::RateLimited { .. } => Some(429),
            Self::HttpError(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Result type alias for Replicate operations.
pub type Result<T> = core::result::Result<T, ReplicateError>;
