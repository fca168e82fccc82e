//! Session timing: expiry margin, refresh cooldown, and stored-entry lifetimes.

use std::time::Duration;

use serde::{Deserialize, Serialize};

const fn default_expiry_margin_secs() -> u64 {
    30
}

const fn default_refresh_cooldown_ms() -> u64 {
    5_000
}

/// One day.
const fn default_access_token_ttl_secs() -> u64 {
    86_400
}

/// Seven days.
const fn default_refresh_token_ttl_secs() -> u64 {
    604_800
}

const fn default_user_ttl_secs() -> u64 {
    604_800
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    /// A token expiring within this window is treated as unusable.
    #[serde(default = "default_expiry_margin_secs")]
    pub expiry_margin_secs: u64,

    /// Minimum gap between the starts of two refresh attempts.
    #[serde(default = "default_refresh_cooldown_ms")]
    pub refresh_cooldown_ms: u64,

    /// Store lifetime for an access token whose `exp` claim cannot be read.
    #[serde(default = "default_access_token_ttl_secs")]
    pub access_token_ttl_secs: u64,

    #[serde(default = "default_refresh_token_ttl_secs")]
    pub refresh_token_ttl_secs: u64,

    #[serde(default = "default_user_ttl_secs")]
    pub user_ttl_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            expiry_margin_secs: default_expiry_margin_secs(),
            refresh_cooldown_ms: default_refresh_cooldown_ms(),
            access_token_ttl_secs: default_access_token_ttl_secs(),
            refresh_token_ttl_secs: default_refresh_token_ttl_secs(),
            user_ttl_secs: default_user_ttl_secs(),
        }
    }
}

impl SessionConfig {
    pub const fn expiry_margin(&self) -> Duration {
        Duration::from_secs(self.expiry_margin_secs)
    }

    pub const fn refresh_cooldown(&self) -> Duration {
        Duration::from_millis(self.refresh_cooldown_ms)
    }

    pub const fn access_token_ttl(&self) -> Duration {
        Duration::from_secs(self.access_token_ttl_secs)
    }

    pub const fn refresh_token_ttl(&self) -> Duration {
        Duration::from_secs(self.refresh_token_ttl_secs)
    }

    pub const fn user_ttl(&self) -> Duration {
        Duration::from_secs(self.user_ttl_secs)
    }
}
