use pitch_auth::LogoutMode;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::AuthLogoutArgs;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct AuthLogoutResponse {
    cleared: bool,
    all_sessions: bool,
}

pub async fn handle(
    args: &AuthLogoutArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    if args.all {
        ctx.client.revoke_all_sessions().await?;
    } else {
        ctx.session.logout(LogoutMode::UserInitiated).await;
    }
    output(
        &AuthLogoutResponse {
            cleared: true,
            all_sessions: args.all,
        },
        flags.format,
    )
}
