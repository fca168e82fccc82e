//! Integration tests for TOML configuration loading.
//!
//! Uses figment::Jail for sandboxed files and env vars.

use figment::{
    Figment, Jail,
    providers::{Env, Format, Serialized, Toml},
};
use pitch_config::{ConfigError, PitchConfig, StoreBackend};
use pretty_assertions::assert_eq;

fn layered(file: &str) -> Figment {
    Figment::from(Serialized::defaults(PitchConfig::default()))
        .merge(Toml::file(file))
        .merge(Env::prefixed("PITCHSIDE_").split("__"))
}

#[test]
fn loads_all_sections_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[api]
base_url = "https://admin.club.test/api/"
timeout_secs = 15
user_agent = "dashboard-ops"

[session]
expiry_margin_secs = 45
refresh_cooldown_ms = 2500

[store]
backend = "keyring"
"#,
        )?;

        let config = PitchConfig::from_figment(layered("config.toml")).expect("config loads");

        assert_eq!(config.api.base_url(), "https://admin.club.test/api");
        assert_eq!(config.api.timeout_secs, 15);
        assert_eq!(config.api.user_agent, "dashboard-ops");
        assert_eq!(config.session.expiry_margin_secs, 45);
        assert_eq!(config.session.refresh_cooldown_ms, 2500);
        assert_eq!(config.session.refresh_token_ttl_secs, 604_800);
        assert_eq!(config.store.backend, StoreBackend::Keyring);
        Ok(())
    });
}

#[test]
fn partial_toml_keeps_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[session]
refresh_cooldown_ms = 1000
"#,
        )?;

        let config = PitchConfig::from_figment(layered("config.toml")).expect("config loads");
        assert_eq!(config.session.refresh_cooldown_ms, 1000);
        assert_eq!(config.session.expiry_margin_secs, 30);
        assert_eq!(config.api.base_url(), "http://localhost:5000/api");
        assert_eq!(config.store.backend, StoreBackend::File);
        Ok(())
    });
}

#[test]
fn env_beats_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[api]
base_url = "https://from-toml.test"
"#,
        )?;
        jail.set_env("PITCHSIDE_API__BASE_URL", "https://from-env.test");
        jail.set_env("PITCHSIDE_STORE__BACKEND", "memory");

        let config = PitchConfig::from_figment(layered("config.toml")).expect("config loads");
        assert_eq!(config.api.base_url(), "https://from-env.test");
        assert_eq!(config.store.backend, StoreBackend::Memory);
        Ok(())
    });
}

#[test]
fn invalid_base_url_is_rejected() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[api]
base_url = "admin.club.test"
"#,
        )?;

        let result = PitchConfig::from_figment(layered("config.toml"));
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
        Ok(())
    });
}

#[test]
fn unknown_store_backend_is_a_figment_error() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[store]
backend = "cookies"
"#,
        )?;

        let result = PitchConfig::from_figment(layered("config.toml"));
        assert!(matches!(result, Err(ConfigError::Figment(_))));
        Ok(())
    });
}
