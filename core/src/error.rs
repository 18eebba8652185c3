//! Error types for the endpoint catalog.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers frequently distinguish
//! "the media does not exist" from other failures. The platform also answers
//! some requests with a 2xx status and `"status": "fail"` in the body; those
//! land in `Rejected`. Transport errors are boxed as-is so callers can
//! downcast to their executor's error type.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The request was dispatched without a bound `Secret`.
    #[error("request requires authentication but no secret was bound")]
    MissingCredential,

    /// Session cookies could not form a valid `Secret`.
    #[error("invalid secret: {0}")]
    InvalidSecret(String),

    /// The executor failed to complete the round-trip.
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The platform answered with `"status": "fail"`.
    #[error("request rejected: {message}")]
    Rejected { message: String },

    /// The response body did not match the expected shape.
    #[error("decoding failed: {0}")]
    Decoding(String),
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decoding(err.to_string())
    }
}
