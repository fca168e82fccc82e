use pitch_auth::{LogoutMode, claims};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct AuthRefreshResponse {
    refreshed: bool,
    access_expires_at: Option<String>,
}

pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let token = match ctx.session.refresh_token().await {
        Ok(token) => token,
        Err(error) if error.is_terminal() => {
            ctx.session.logout(LogoutMode::Expired).await;
            return Err(error.into());
        }
        Err(error) => return Err(error.into()),
    };

    output(
        &AuthRefreshResponse {
            refreshed: true,
            access_expires_at: claims::decode_expiry(&token).ok().map(|at| at.to_rfc3339()),
        },
        flags.format,
    )
}
