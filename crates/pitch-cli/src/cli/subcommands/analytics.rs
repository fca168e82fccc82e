use clap::Subcommand;

/// Analytics commands.
#[derive(Clone, Debug, Subcommand)]
pub enum AnalyticsCommands {
    /// Headline counters.
    Summary {
        /// Include the matches-per-month series.
        #[arg(long)]
        monthly: bool,
    },
}
