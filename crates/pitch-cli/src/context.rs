use std::sync::Arc;

use pitch_auth::{LogoutMode, SessionManager};
use pitch_client::ApiClient;
use pitch_config::PitchConfig;

use crate::cli::GlobalFlags;

/// Everything a command handler needs, built once per invocation.
pub struct AppContext {
    pub config: PitchConfig,
    pub session: Arc<SessionManager>,
    pub client: ApiClient,
}

impl AppContext {
    pub fn init(config: PitchConfig, flags: &GlobalFlags) -> anyhow::Result<Self> {
        let session = Arc::new(SessionManager::from_config(&config)?);
        let quiet = flags.quiet;
        session.on_logout(move |mode| {
            if mode == LogoutMode::Expired && !quiet {
                eprintln!("pitch: session expired, run `pitch auth login` to sign in again");
            }
        });
        let client = ApiClient::new(&config.api, Arc::clone(&session))?;
        Ok(Self {
            config,
            session,
            client,
        })
    }
}
