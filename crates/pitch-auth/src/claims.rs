//! Bearer token claim decoding and expiry evaluation.
//!
//! Signatures are not verified here; the backend does that on every request.
//! The client only needs `exp` to decide whether a token is still worth sending.

use std::time::Duration;

use base64::Engine as _;
use chrono::{DateTime, TimeDelta, Utc};
use serde::Deserialize;

use crate::error::AuthError;

/// Tokens expiring within this window are treated as already unusable.
pub const DEFAULT_EXPIRY_MARGIN: Duration = Duration::from_secs(30);

/// The subset of JWT claims the client reads.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenClaims {
    /// Subject (user id).
    #[serde(default)]
    pub sub: Option<String>,
    /// Expiry, Unix seconds.
    pub exp: i64,
    /// Issued-at, Unix seconds.
    #[serde(default)]
    pub iat: Option<i64>,
}

impl TokenClaims {
    /// # Errors
    ///
    /// Returns `AuthError::Decode` if `exp` is outside chrono's representable range.
    pub fn expires_at(&self) -> Result<DateTime<Utc>, AuthError> {
        DateTime::from_timestamp(self.exp, 0)
            .ok_or_else(|| AuthError::Decode("invalid exp timestamp".into()))
    }
}

/// Decode the payload segment of a `header.payload.signature` token.
///
/// # Errors
///
/// Returns `AuthError::Decode` if the token does not have three segments, the
/// payload is not base64url, the JSON does not parse, or `exp` is missing or
/// not an integer.
pub fn decode_claims(token: &str) -> Result<TokenClaims, AuthError> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err(AuthError::Decode("invalid JWT format".into()));
    }
    let payload = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(parts[1].trim_end_matches('='))
        .map_err(|e| AuthError::Decode(format!("base64 decode failed: {e}")))?;
    serde_json::from_slice(&payload)
        .map_err(|e| AuthError::Decode(format!("claims parse failed: {e}")))
}

/// Decode the `exp` claim of a bearer token.
///
/// # Errors
///
/// See [`decode_claims`].
pub fn decode_expiry(token: &str) -> Result<DateTime<Utc>, AuthError> {
    decode_claims(token)?.expires_at()
}

/// Whether `token` is expired or expires within `margin` of `now`.
///
/// Fail-closed: a token that cannot be decoded is reported as expiring.
#[must_use]
pub fn is_expiring_within(token: &str, margin: Duration, now: DateTime<Utc>) -> bool {
    let Ok(expires_at) = decode_expiry(token) else {
        return true;
    };
    let margin = TimeDelta::from_std(margin).unwrap_or(TimeDelta::MAX);
    now.checked_add_signed(margin)
        .is_none_or(|threshold| expires_at <= threshold)
}

/// [`is_expiring_within`] with the default 30 s margin against the wall clock.
#[must_use]
pub fn is_expiring_soon(token: &str) -> bool {
    is_expiring_within(token, DEFAULT_EXPIRY_MARGIN, Utc::now())
}

#[cfg(test)]
pub(crate) fn make_jwt_with_exp(exp: i64) -> String {
    let header = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256"}"#);
    let payload = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .encode(format!(r#"{{"sub":"user_42","exp":{exp}}}"#));
    let signature = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode("fake_sig");
    format!("{header}.{payload}.{signature}")
}
