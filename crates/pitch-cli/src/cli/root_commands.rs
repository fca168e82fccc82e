use clap::Subcommand;

use crate::cli::subcommands::{
    AnalyticsCommands, AuthCommands, EventCommands, MatchCommands, ProfileCommands,
};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Sign in, sign out, and inspect the stored session.
    Auth {
        #[command(subcommand)]
        action: AuthCommands,
    },
    /// Football fixtures.
    Matches {
        #[command(subcommand)]
        action: MatchCommands,
    },
    /// Calendar events.
    Events {
        #[command(subcommand)]
        action: EventCommands,
    },
    /// Dashboard analytics.
    Analytics {
        #[command(subcommand)]
        action: AnalyticsCommands,
    },
    /// The signed-in user's profile.
    Profile {
        #[command(subcommand)]
        action: ProfileCommands,
    },
}
