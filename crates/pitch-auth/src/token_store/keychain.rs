use chrono::{DateTime, Utc};

use super::{StoredEntry, TokenKind, TokenStore};
use crate::error::AuthError;

const DEFAULT_KEYRING_SERVICE: &str = "pitchside";

/// OS keychain store. Each kind is one credential; the expiry travels with
/// the value as JSON since keychains have no notion of expiry.
#[derive(Debug, Clone)]
pub struct KeyringStore {
    service: String,
}

impl Default for KeyringStore {
    /// Service name defaults to `"pitchside"`. Override via
    /// `PITCHSIDE_KEYRING_SERVICE` to keep test runs away from real credentials.
    fn default() -> Self {
        let service = std::env::var("PITCHSIDE_KEYRING_SERVICE")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_KEYRING_SERVICE.to_string());
        Self::new(service)
    }
}

impl KeyringStore {
    #[must_use]
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn entry(&self, kind: TokenKind) -> Option<::keyring::Entry> {
        match ::keyring::Entry::new(&self.service, kind.key()) {
            Ok(entry) => Some(entry),
            Err(error) => {
                tracing::warn!(%error, %kind, "keyring unavailable");
                None
            }
        }
    }
}

impl TokenStore for KeyringStore {
    fn get(&self, kind: TokenKind) -> Option<String> {
        let raw = self.entry(kind)?.get_password().ok()?;
        let entry: StoredEntry = serde_json::from_str(&raw).ok()?;
        entry.is_live(Utc::now()).then_some(entry.value)
    }

    fn set(
        &self,
        kind: TokenKind,
        value: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AuthError> {
        let entry = self
            .entry(kind)
            .ok_or_else(|| AuthError::TokenStore("keyring unavailable".into()))?;
        let raw = serde_json::to_string(&StoredEntry {
            value: value.to_string(),
            expires_at,
        })
        .map_err(|e| AuthError::TokenStore(format!("serialize {kind}: {e}")))?;
        entry
            .set_password(&raw)
            .map_err(|e| AuthError::TokenStore(format!("keyring store {kind}: {e}")))
    }

    fn clear(&self, kind: TokenKind) {
        // Missing credentials are not an error here.
        if let Some(entry) = self.entry(kind) {
            let _ = entry.delete_credential();
        }
    }
}
