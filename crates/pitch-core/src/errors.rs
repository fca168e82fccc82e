//! Cross-cutting error types for Pitchside.
//!
//! Transport and session errors live in `pitch-auth` and `pitch-client`.
//! This module covers what can go wrong while interpreting a backend payload.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoreError {
    /// The backend answered with `success: false`.
    #[error("backend rejected the request: {message}")]
    Rejected {
        message: String,
        errors: Vec<String>,
    },

    /// The envelope reported success but carried no `data`.
    #[error("response envelope has no data")]
    MissingData,

    /// The payload did not match the expected shape.
    #[error("malformed response: {0}")]
    Malformed(String),
}
