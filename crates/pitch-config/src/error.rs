//! Errors raised while loading or validating `pitchside` settings.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A config file or `PITCHSIDE_*` variable could not be read or merged.
    #[error("could not load pitchside settings: {0}")]
    Figment(#[from] figment::Error),

    /// A section the client cannot run without, such as `[api]`, is empty.
    #[error(
        "[{section}] is not set; add it to config.toml or export PITCHSIDE_{}__*",
        .section.to_uppercase()
    )]
    NotConfigured { section: String },

    /// A field such as `api.base_url` or `session.refresh_cooldown_ms` is out of range.
    #[error("invalid `{field}`: {reason}")]
    InvalidValue { field: String, reason: String },
}
