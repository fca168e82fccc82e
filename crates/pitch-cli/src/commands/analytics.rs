use pitch_core::entities::{AnalyticsSummary, MonthlyCount};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::AnalyticsCommands;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct SummaryResponse {
    #[serde(flatten)]
    summary: AnalyticsSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    matches_per_month: Option<Vec<MonthlyCount>>,
}

/// Handle `pitch analytics <subcommand>`.
pub async fn handle(
    action: &AnalyticsCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        AnalyticsCommands::Summary { monthly } => {
            let summary = ctx.client.analytics_summary().await?;
            let matches_per_month = if *monthly {
                Some(ctx.client.matches_per_month().await?)
            } else {
                None
            };
            output(
                &SummaryResponse {
                    summary,
                    matches_per_month,
                },
                flags.format,
            )
        }
    }
}
