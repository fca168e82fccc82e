use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};

use super::{StoredEntry, TokenKind, TokenStore};
use crate::error::AuthError;

type Jar = BTreeMap<String, StoredEntry>;

/// JSON cookie jar on disk: `{ "accessToken": { "value": ..., "expires_at": ... }, ... }`.
///
/// The directory is created `0700` and the jar `0600` on Unix. Every write
/// replaces the jar through a sibling temp file and a rename.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_jar(&self) -> Jar {
        let Ok(raw) = fs::read_to_string(&self.path) else {
            return Jar::new();
        };
        if raw.trim().is_empty() {
            return Jar::new();
        }
        serde_json::from_str(&raw).unwrap_or_else(|error| {
            tracing::warn!(%error, path = %self.path.display(), "unreadable session jar; treating as empty");
            Jar::new()
        })
    }

    fn write_jar(&self, jar: &Jar) -> Result<(), AuthError> {
        if jar.is_empty() {
            return match fs::remove_file(&self.path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(AuthError::TokenStore(format!(
                    "failed to delete {}: {e}",
                    self.path.display()
                ))),
            };
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                AuthError::TokenStore(format!("mkdir {}: {e}", parent.display()))
            })?;
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                if let Err(e) = fs::set_permissions(parent, fs::Permissions::from_mode(0o700)) {
                    tracing::warn!("failed to chmod 0700 {}: {e}", parent.display());
                }
            }
        }

        let raw = serde_json::to_string_pretty(jar)
            .map_err(|e| AuthError::TokenStore(format!("serialize jar: {e}")))?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, raw)
            .map_err(|e| AuthError::TokenStore(format!("write {}: {e}", tmp.display())))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&tmp, fs::Permissions::from_mode(0o600))
                .map_err(|e| AuthError::TokenStore(format!("chmod {}: {e}", tmp.display())))?;
        }

        fs::rename(&tmp, &self.path).map_err(|e| {
            AuthError::TokenStore(format!("rename into {}: {e}", self.path.display()))
        })
    }

    fn update(&self, f: impl FnOnce(&mut Jar)) -> Result<(), AuthError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut jar = self.read_jar();
        let now = Utc::now();
        jar.retain(|_, entry| entry.is_live(now));
        f(&mut jar);
        self.write_jar(&jar)
    }
}

impl TokenStore for FileStore {
    fn get(&self, kind: TokenKind) -> Option<String> {
        self.read_jar()
            .remove(kind.key())
            .filter(|entry| entry.is_live(Utc::now()))
            .map(|entry| entry.value)
    }

    fn set(
        &self,
        kind: TokenKind,
        value: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AuthError> {
        self.update(|jar| {
            jar.insert(
                kind.key().to_string(),
                StoredEntry {
                    value: value.to_string(),
                    expires_at,
                },
            );
        })
    }

    fn clear(&self, kind: TokenKind) {
        if let Err(error) = self.update(|jar| {
            jar.remove(kind.key());
        }) {
            tracing::warn!(%error, %kind, "failed to clear session entry");
        }
    }

    fn clear_all(&self) {
        if let Err(error) = self.update(Jar::clear) {
            tracing::warn!(%error, "failed to clear session jar");
        }
    }
}
