//! Client error types

use pitch_auth::AuthError;
use pitch_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or request error
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Session failure (refresh rejected, no refresh token, storage)
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("authentication required: {0}")]
    Unauthorized(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("server error {status}: {message}")]
    ServerError { status: u16, message: String },

    /// `success: false` in a 2xx envelope
    #[error("request rejected: {message}")]
    Rejected { message: String, errors: Vec<String> },

    #[error("malformed response: {0}")]
    Malformed(String),
}

impl ClientError {
    /// Create error from HTTP status code
    #[must_use]
    pub fn from_status(status: reqwest::StatusCode, message: String) -> Self {
        match status.as_u16() {
            400 | 422 => Self::BadRequest(message),
            401 => Self::Unauthorized(message),
            403 => Self::Forbidden(message),
            404 => Self::NotFound(message),
            _ => Self::ServerError {
                status: status.as_u16(),
                message,
            },
        }
    }

    /// HTTP status behind this error, when there is one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized(_) => Some(401),
            Self::Forbidden(_) => Some(403),
            Self::NotFound(_) => Some(404),
            Self::BadRequest(_) => Some(400),
            Self::ServerError { status, .. } => Some(*status),
            Self::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

impl From<CoreError> for ClientError {
    fn from(error: CoreError) -> Self {
        match error {
            CoreError::Rejected { message, errors } => Self::Rejected { message, errors },
            CoreError::MissingData => Self::Malformed("response envelope has no data".into()),
            CoreError::Malformed(reason) => Self::Malformed(reason),
        }
    }
}
