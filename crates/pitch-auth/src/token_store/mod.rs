//! Durable client-side session storage.
//!
//! [`TokenStore`] is a dumb key/value port with per-entry expiries (cookie
//! semantics). [`CredentialStore`] layers the pair-level rules on top: both
//! tokens are written and cleared together, and the cached user never outlives
//! the tokens it belongs to.

mod credentials;
mod file;
mod keychain;
mod memory;

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use pitch_config::{PitchConfig, StoreBackend};
use serde::{Deserialize, Serialize};

use crate::error::AuthError;

pub use credentials::{CredentialStore, StoreTtl};
pub use file::FileStore;
pub use keychain::KeyringStore;
pub use memory::MemoryStore;

/// The three persisted entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    AccessToken,
    RefreshToken,
    User,
}

impl TokenKind {
    pub const ALL: [Self; 3] = [Self::AccessToken, Self::RefreshToken, Self::User];

    /// Storage key, shared with the browser dashboard's cookie names.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::AccessToken => "accessToken",
            Self::RefreshToken => "refreshToken",
            Self::User => "user",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A stored value with its expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredEntry {
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

impl StoredEntry {
    #[must_use]
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

/// Key/value storage port.
///
/// Implementations perform no validation. Reads never fail: a missing,
/// expired, or unreadable entry is simply absent. Clears are idempotent.
pub trait TokenStore: Send + Sync {
    fn get(&self, kind: TokenKind) -> Option<String>;

    /// Persist `value` until `expires_at`, silently replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenStore` if the backend cannot write.
    fn set(&self, kind: TokenKind, value: &str, expires_at: DateTime<Utc>)
    -> Result<(), AuthError>;

    fn clear(&self, kind: TokenKind);

    fn clear_all(&self) {
        for kind in TokenKind::ALL {
            self.clear(kind);
        }
    }
}

/// Build the backend selected by `[store]` in the configuration.
///
/// # Errors
///
/// Returns `AuthError::TokenStore` if the file backend has no usable path.
pub fn from_config(config: &PitchConfig) -> Result<Arc<dyn TokenStore>, AuthError> {
    let store: Arc<dyn TokenStore> = match config.store.backend {
        StoreBackend::File => {
            let path = config.store.jar_path().ok_or_else(|| {
                AuthError::TokenStore("home directory not found; set store.path".into())
            })?;
            Arc::new(FileStore::new(path))
        }
        StoreBackend::Keyring => Arc::new(KeyringStore::default()),
        StoreBackend::Memory => Arc::new(MemoryStore::new()),
    };
    tracing::debug!(backend = ?config.store.backend, "token store selected");
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_match_cookie_names() {
        let keys: Vec<&str> = TokenKind::ALL.iter().map(|k| k.key()).collect();
        assert_eq!(keys, ["accessToken", "refreshToken", "user"]);
    }

    #[test]
    fn entry_expires_at_boundary() {
        let now = Utc::now();
        let entry = StoredEntry {
            value: "v".into(),
            expires_at: now,
        };
        assert!(!entry.is_live(now));
        assert!(entry.is_live(now - chrono::TimeDelta::seconds(1)));
    }

    #[test]
    fn memory_backend_from_config() {
        let mut config = PitchConfig::default();
        config.store.backend = StoreBackend::Memory;
        let store = from_config(&config).expect("store");
        assert!(store.get(TokenKind::AccessToken).is_none());
    }
}
