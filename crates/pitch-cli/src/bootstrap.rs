use anyhow::Context;

/// Load `.env` (if present) and the layered configuration.
pub fn load_config() -> anyhow::Result<pitch_config::PitchConfig> {
    let config = pitch_config::PitchConfig::load_with_dotenv()
        .context("failed to load pitchside configuration")?;
    tracing::debug!(
        api = config.api.base_url(),
        store = ?config.store.backend,
        "configuration loaded"
    );
    Ok(config)
}
