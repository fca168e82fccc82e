//! Where the session (tokens + cached user) is persisted.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// JSON cookie jar on disk.
    #[default]
    File,
    /// OS keychain.
    Keyring,
    /// Process memory only; the session ends with the process.
    Memory,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,

    /// Cookie jar location for the file backend. Empty means `~/.pitchside/session.json`.
    #[serde(default)]
    pub path: String,
}

impl StoreConfig {
    /// Resolved cookie jar path, or `None` when no home directory exists.
    pub fn jar_path(&self) -> Option<PathBuf> {
        if !self.path.trim().is_empty() {
            return Some(PathBuf::from(self.path.trim()));
        }
        dirs::home_dir().map(|home| home.join(".pitchside").join("session.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_file_backend() {
        let config = StoreConfig::default();
        assert_eq!(config.backend, StoreBackend::File);
    }

    #[test]
    fn explicit_path_wins() {
        let config = StoreConfig {
            backend: StoreBackend::File,
            path: "/tmp/pitch/jar.json".into(),
        };
        assert_eq!(config.jar_path(), Some(PathBuf::from("/tmp/pitch/jar.json")));
    }

    #[test]
    fn default_path_is_under_home() {
        if let Some(path) = StoreConfig::default().jar_path() {
            assert!(path.ends_with(".pitchside/session.json"));
        }
    }
}
