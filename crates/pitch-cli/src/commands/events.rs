use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::EventCommands;
use crate::commands::apply_limit;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct DeletedResponse {
    id: i64,
    deleted: bool,
}

/// Handle `pitch events <subcommand>`.
pub async fn handle(
    action: &EventCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        EventCommands::List(args) => {
            let mut events = ctx.client.list_events().await?;
            if args.upcoming {
                let now = chrono::Utc::now();
                events.retain(|event| event.end_date.unwrap_or(event.start_date) >= now);
            }
            output(&apply_limit(events, flags.limit), flags.format)
        }
        EventCommands::Get { id } => output(&ctx.client.get_event(*id).await?, flags.format),
        EventCommands::Delete { id } => {
            ctx.client.delete_event(*id).await?;
            output(&DeletedResponse { id: *id, deleted: true }, flags.format)
        }
    }
}
