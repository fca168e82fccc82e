use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of the authenticated principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[serde(alias = "Admin", alias = "ADMIN")]
    Admin,
    #[serde(alias = "Editor", alias = "EDITOR")]
    Editor,
    #[serde(alias = "User", alias = "USER")]
    User,
    #[serde(other)]
    Unknown,
}

impl UserRole {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Editor => "editor",
            Self::User => "user",
            Self::Unknown => "unknown",
        }
    }

    /// Whether this role may create, edit, or delete matches and events.
    #[must_use]
    pub const fn can_write(self) -> bool {
        matches!(self, Self::Admin | Self::Editor)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Denormalized snapshot of the authenticated principal.
///
/// Taken from the last login/refresh response and kept next to the tokens.
/// It is a cache: whenever the credential pair is cleared, so is this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedUser {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(default, alias = "fullName")]
    pub display_name: Option<String>,
    pub role: UserRole,
}

impl CachedUser {
    /// Name suitable for a greeting: display name when set, username otherwise.
    #[must_use]
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.username)
    }
}
