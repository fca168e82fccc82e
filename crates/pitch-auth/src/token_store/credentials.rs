use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use pitch_config::SessionConfig;
use pitch_core::{CachedUser, CredentialPair};

use super::{TokenKind, TokenStore};
use crate::claims;
use crate::error::AuthError;

/// Store lifetimes for the three session entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreTtl {
    /// Used only when the access token's `exp` claim cannot be read.
    pub access_fallback: Duration,
    pub refresh: Duration,
    pub user: Duration,
}

impl Default for StoreTtl {
    fn default() -> Self {
        Self::from(&SessionConfig::default())
    }
}

impl From<&SessionConfig> for StoreTtl {
    fn from(config: &SessionConfig) -> Self {
        Self {
            access_fallback: config.access_token_ttl(),
            refresh: config.refresh_token_ttl(),
            user: config.user_ttl(),
        }
    }
}

fn expiry_after(now: DateTime<Utc>, ttl: Duration) -> DateTime<Utc> {
    TimeDelta::from_std(ttl)
        .ok()
        .and_then(|delta| now.checked_add_signed(delta))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Pair-level view over a [`TokenStore`].
#[derive(Clone)]
pub struct CredentialStore {
    inner: Arc<dyn TokenStore>,
    ttl: StoreTtl,
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl CredentialStore {
    #[must_use]
    pub fn new(inner: Arc<dyn TokenStore>, ttl: StoreTtl) -> Self {
        Self { inner, ttl }
    }

    #[must_use]
    pub fn access_token(&self) -> Option<String> {
        self.inner.get(TokenKind::AccessToken)
    }

    #[must_use]
    pub fn refresh_token(&self) -> Option<String> {
        self.inner.get(TokenKind::RefreshToken)
    }

    /// Both tokens, or `None` if either is missing.
    #[must_use]
    pub fn credentials(&self) -> Option<CredentialPair> {
        Some(CredentialPair::new(self.access_token()?, self.refresh_token()?))
    }

    /// Whether anything that identifies a session is still stored.
    #[must_use]
    pub fn has_session(&self) -> bool {
        self.access_token().is_some() || self.refresh_token().is_some()
    }

    /// Persist both tokens as a unit.
    ///
    /// The access token lives until its own `exp` (falling back to the
    /// configured TTL when it cannot be decoded). If either write fails the
    /// pair is cleared so no half-written session survives.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenStore` from the failing backend write.
    pub fn save_credentials(&self, pair: &CredentialPair) -> Result<(), AuthError> {
        let now = Utc::now();
        let access_expiry = claims::decode_expiry(&pair.access_token)
            .unwrap_or_else(|_| expiry_after(now, self.ttl.access_fallback));

        let written = self
            .inner
            .set(TokenKind::AccessToken, &pair.access_token, access_expiry)
            .and_then(|()| {
                self.inner.set(
                    TokenKind::RefreshToken,
                    &pair.refresh_token,
                    expiry_after(now, self.ttl.refresh),
                )
            });

        if let Err(error) = written {
            tracing::warn!(%error, "credential write failed; clearing partial pair");
            self.inner.clear(TokenKind::AccessToken);
            self.inner.clear(TokenKind::RefreshToken);
            return Err(error);
        }
        tracing::debug!(%access_expiry, "credentials stored");
        Ok(())
    }

    /// The cached user snapshot. An entry that no longer parses is dropped.
    #[must_use]
    pub fn cached_user(&self) -> Option<CachedUser> {
        let raw = self.inner.get(TokenKind::User)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(error) => {
                tracing::warn!(%error, "cached user is unreadable; discarding");
                self.inner.clear(TokenKind::User);
                None
            }
        }
    }

    /// # Errors
    ///
    /// Returns `AuthError::TokenStore` if the user cannot be serialized or written.
    pub fn save_user(&self, user: &CachedUser) -> Result<(), AuthError> {
        let raw = serde_json::to_string(user)
            .map_err(|e| AuthError::TokenStore(format!("serialize user: {e}")))?;
        self.inner
            .set(TokenKind::User, &raw, expiry_after(Utc::now(), self.ttl.user))
    }

    pub fn clear_user(&self) {
        self.inner.clear(TokenKind::User);
    }

    /// Remove all three entries.
    pub fn clear_session(&self) {
        self.inner.clear_all();
    }
}
