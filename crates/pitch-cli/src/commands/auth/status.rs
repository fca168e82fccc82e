use pitch_auth::{SessionState, claims};
use pitch_core::CachedUser;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct AuthStatusResponse {
    authenticated: bool,
    state: &'static str,
    user: Option<CachedUser>,
    access_expires_at: Option<String>,
    access_expiring: bool,
    has_refresh_token: bool,
    api: String,
    note: Option<String>,
}

pub fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let store = ctx.session.store();
    let access = store.access_token();
    let state = ctx.session.state();

    let (label, user, note) = match state {
        SessionState::Anonymous => ("anonymous", None, Some("run `pitch auth login`".to_string())),
        SessionState::Restoring => (
            "restoring",
            None,
            Some("access token expired; the next request will refresh it".to_string()),
        ),
        SessionState::Authenticated { user } => ("authenticated", user, None),
    };

    let status = AuthStatusResponse {
        authenticated: access.is_some(),
        state: label,
        user,
        access_expires_at: access
            .as_deref()
            .and_then(|token| claims::decode_expiry(token).ok())
            .map(|at| at.to_rfc3339()),
        access_expiring: access
            .as_deref()
            .is_some_and(|token| ctx.session.is_expiring(token)),
        has_refresh_token: store.refresh_token().is_some(),
        api: ctx.config.api.base_url().to_string(),
        note,
    };

    output(&status, flags.format)
}
