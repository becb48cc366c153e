//! # API Errors
//!
//! Failures talking to the stock and catalog services. A missing record is
//! not an error; lookups return `Ok(None)` for that.

use rocketshoes_core::ValidationError;
use thiserror::Error;

/// Stock/catalog lookup errors.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The HTTP request failed (connect, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status other than 404.
    #[error("Unexpected status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The response body could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),

    /// The payload decoded but carries an unusable value.
    #[error("Invalid payload: {0}")]
    InvalidPayload(#[from] ValidationError),

    /// The configured base URL is not usable.
    #[error("Invalid base URL '{0}'")]
    InvalidUrl(String),

    /// Raised on purpose by the in-memory fake.
    #[error("Service unavailable: {0}")]
    Unavailable(String),
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

/// Result type for lookups.
pub type ApiResult<T> = Result<T, ApiError>;
