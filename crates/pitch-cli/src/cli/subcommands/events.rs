use clap::{Args, Subcommand};

/// Calendar event commands.
#[derive(Clone, Debug, Subcommand)]
pub enum EventCommands {
    /// List calendar events.
    List(EventListArgs),
    /// Show one event.
    Get {
        id: i64,
    },
    /// Delete an event.
    Delete {
        id: i64,
    },
}

#[derive(Clone, Debug, Args)]
pub struct EventListArgs {
    /// Only events that have not ended yet.
    #[arg(long)]
    pub upcoming: bool,
}
