//! Shared wiring for the client integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use base64::Engine as _;
use pitch_auth::token_store::MemoryStore;
use pitch_auth::{HttpAuthApi, SessionManager};
use pitch_client::ApiClient;
use pitch_config::{PitchConfig, StoreBackend};
use pitch_core::CredentialPair;
use serde_json::{Value, json};
use wiremock::MockServer;

pub fn jwt(label: &str, exp_in_secs: i64) -> String {
    let enc = base64::engine::general_purpose::URL_SAFE_NO_PAD;
    let exp = chrono::Utc::now().timestamp() + exp_in_secs;
    format!(
        "{}.{}.{}",
        enc.encode(r#"{"alg":"HS256"}"#),
        enc.encode(format!(r#"{{"sub":"{label}","exp":{exp}}}"#)),
        enc.encode("sig")
    )
}

pub fn envelope(data: Value) -> Value {
    json!({ "success": true, "message": "ok", "data": data, "errors": null })
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

pub struct Harness {
    pub session: Arc<SessionManager>,
    pub client: ApiClient,
}

impl Harness {
    pub fn new(server: &MockServer) -> Self {
        let mut config = PitchConfig::default();
        config.api.base_url = format!("{}/api", server.uri());
        config.store.backend = StoreBackend::Memory;

        let api = Arc::new(HttpAuthApi::new(&config.api).expect("auth api"));
        let session = Arc::new(SessionManager::with_store(
            api,
            Arc::new(MemoryStore::new()),
            &config,
        ));
        let client = ApiClient::new(&config.api, session.clone()).expect("client");
        Self { session, client }
    }

    pub fn seed(&self, access: Option<&str>, refresh: &str) {
        let store = self.session.store();
        match access {
            Some(access) => store
                .save_credentials(&CredentialPair::new(access, refresh))
                .expect("seed pair"),
            // An access token that is already past its exp is dropped by the store.
            None => store
                .save_credentials(&CredentialPair::new(jwt("gone", -60), refresh))
                .expect("seed refresh"),
        }
        self.session.bootstrap();
    }
}
