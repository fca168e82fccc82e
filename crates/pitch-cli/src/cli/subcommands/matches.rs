use clap::{Args, Subcommand};
use pitch_core::entities::MatchStatus;

/// Football match commands.
#[derive(Clone, Debug, Subcommand)]
pub enum MatchCommands {
    /// List fixtures.
    List(MatchListArgs),
    /// Show one fixture.
    Get {
        id: i64,
    },
    /// Delete a fixture.
    Delete {
        id: i64,
    },
}

#[derive(Clone, Debug, Args)]
pub struct MatchListArgs {
    /// Only fixtures in this state (scheduled, live, finished, postponed, cancelled).
    #[arg(long, value_parser = parse_status)]
    pub status: Option<MatchStatus>,
}

fn parse_status(raw: &str) -> Result<MatchStatus, String> {
    serde_json::from_value(serde_json::Value::String(raw.to_ascii_lowercase()))
        .map_err(|_| format!("unknown match status '{raw}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!(parse_status("Live"), Ok(MatchStatus::Live));
        assert!(parse_status("abandoned").is_err());
    }
}
