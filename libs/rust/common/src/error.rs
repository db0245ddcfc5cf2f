//! Client-side error type.
//!
//! These errors describe failures to *talk* to the API under test. A response
//! that arrives but breaks its contract is not a `ClientError`; see the
//! `posts-contract` crate for violations.

use thiserror::Error;

/// Errors raised while configuring the client or exchanging a request.
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP transport failed (connect, timeout, body read)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Request payload could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Base URL could not be parsed
    #[error("Invalid base URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A setting had an unusable value
    #[error("Invalid configuration for {key}: {reason}")]
    InvalidConfig {
        /// Setting name
        key: String,
        /// Why the value was rejected
        reason: String,
    },
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            key: key.into(),
            reason: reason.into(),
        }
    }
}
