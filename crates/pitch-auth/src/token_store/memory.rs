use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};

use super::{StoredEntry, TokenKind, TokenStore};
use crate::error::AuthError;

/// In-process store. Used by tests and for sessions that should not outlive the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<TokenKind, StoredEntry>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entries.
    #[must_use]
    pub fn len(&self) -> usize {
        let now = Utc::now();
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|entry| entry.is_live(now))
            .count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TokenStore for MemoryStore {
    fn get(&self, kind: TokenKind) -> Option<String> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(&kind)
            .filter(|entry| entry.is_live(Utc::now()))
            .map(|entry| entry.value.clone())
    }

    fn set(
        &self,
        kind: TokenKind,
        value: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AuthError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                kind,
                StoredEntry {
                    value: value.to_string(),
                    expires_at,
                },
            );
        Ok(())
    }

    fn clear(&self, kind: TokenKind) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&kind);
    }
}
