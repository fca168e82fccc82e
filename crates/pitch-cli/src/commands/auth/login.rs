use anyhow::Context;
use pitch_auth::{AuthError, LoginRequest};
use pitch_core::CachedUser;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::AuthLoginArgs;
use crate::context::AppContext;
use crate::output::output;

const PASSWORD_ENV: &str = "PITCHSIDE_PASSWORD";

#[derive(Serialize)]
struct AuthLoginResponse {
    authenticated: bool,
    user: Option<CachedUser>,
}

pub async fn handle(
    args: &AuthLoginArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let password = match &args.password {
        Some(password) => password.clone(),
        None => std::env::var(PASSWORD_ENV)
            .with_context(|| format!("no password given: pass --password or set {PASSWORD_ENV}"))?,
    };

    let request = LoginRequest {
        username: args.username.clone(),
        password,
        two_factor_code: args.code.clone(),
    };

    let user = match ctx.session.login(&request).await {
        Ok(user) => user,
        Err(AuthError::TwoFactorRequired) => {
            anyhow::bail!("this account has two-factor authentication enabled: pass --code")
        }
        Err(error) => return Err(error).context("login failed"),
    };

    output(
        &AuthLoginResponse {
            authenticated: true,
            user,
        },
        flags.format,
    )
}
