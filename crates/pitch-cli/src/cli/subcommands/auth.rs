use clap::{Args, Subcommand};

/// Authentication commands.
#[derive(Clone, Debug, Subcommand)]
pub enum AuthCommands {
    /// Sign in with username and password.
    Login(AuthLoginArgs),
    /// Revoke the session and clear stored credentials.
    Logout(AuthLogoutArgs),
    /// Show the stored session.
    Status,
    /// Exchange the refresh token for a new pair now.
    Refresh,
}

#[derive(Clone, Debug, Args)]
pub struct AuthLoginArgs {
    #[arg(long, short = 'u')]
    pub username: String,
    /// Password (falls back to PITCHSIDE_PASSWORD).
    #[arg(long)]
    pub password: Option<String>,
    /// Two-factor code, when the account has 2FA enabled.
    #[arg(long)]
    pub code: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct AuthLogoutArgs {
    /// Revoke every session of this user, not just this one.
    #[arg(long)]
    pub all: bool,
}
