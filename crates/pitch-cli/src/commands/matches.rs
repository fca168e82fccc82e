use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::MatchCommands;
use crate::commands::apply_limit;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct DeletedResponse {
    id: i64,
    deleted: bool,
}

/// Handle `pitch matches <subcommand>`.
pub async fn handle(
    action: &MatchCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        MatchCommands::List(args) => {
            let mut fixtures = ctx.client.list_matches().await?;
            if let Some(status) = args.status {
                fixtures.retain(|fixture| fixture.status == status);
            }
            output(&apply_limit(fixtures, flags.limit), flags.format)
        }
        MatchCommands::Get { id } => output(&ctx.client.get_match(*id).await?, flags.format),
        MatchCommands::Delete { id } => {
            ctx.client.delete_match(*id).await?;
            output(&DeletedResponse { id: *id, deleted: true }, flags.format)
        }
    }
}
