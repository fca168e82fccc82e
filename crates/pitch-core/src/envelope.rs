//! The uniform response envelope every backend endpoint returns.
//!
//! ```json
//! { "success": true, "message": "ok", "data": { ... }, "errors": null, "timestamp": "..." }
//! ```

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Option<Vec<String>>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl<T> ApiEnvelope<T> {
    /// Unwrap the payload, turning `success: false` into [`CoreError::Rejected`].
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Rejected` when the backend reports failure and
    /// `CoreError::MissingData` when it reports success without a payload.
    pub fn into_data(self) -> Result<T, CoreError> {
        self.check()?.data.ok_or(CoreError::MissingData)
    }

    /// Accept the envelope without requiring a payload (deletes, revokes).
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Rejected` when the backend reports failure.
    pub fn into_unit(self) -> Result<(), CoreError> {
        self.check().map(|_| ())
    }

    fn check(self) -> Result<Self, CoreError> {
        if self.success {
            return Ok(self);
        }
        Err(CoreError::Rejected {
            message: self
                .message
                .unwrap_or_else(|| "request was not successful".to_string()),
            errors: self.errors.unwrap_or_default(),
        })
    }
}

/// Parse a raw response body into an envelope of `T`.
///
/// # Errors
///
/// Returns `CoreError::Malformed` when the body is not a valid envelope or the
/// `data` field does not match `T`.
pub fn parse_envelope<T: DeserializeOwned>(body: &[u8]) -> Result<ApiEnvelope<T>, CoreError> {
    serde_json::from_slice(body).map_err(|e| CoreError::Malformed(e.to_string()))
}
