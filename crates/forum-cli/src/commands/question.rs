use forum_core::voting::TargetRef;
use forum_db::updates::question::QuestionUpdate;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::QuestionCommands;
use crate::commands::vote;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct DeletedResponse<'a> {
    id: &'a str,
    deleted: bool,
}

/// Handle `forum question`.
pub async fn handle(
    action: &QuestionCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        QuestionCommands::Ask { title, body } => {
            let author = ctx.require_identity()?;
            let question = ctx.service.ask_question(&author.user_id, title, body).await?;
            output(&question, flags.format)
        }
        QuestionCommands::Get { id } => output(&ctx.service.get_question(id).await?, flags.format),
        QuestionCommands::List { sort, offset } => {
            let page = ctx
                .service
                .list_questions(*sort, ctx.limit(flags), *offset)
                .await?;
            output(&page, flags.format)
        }
        QuestionCommands::Edit { id, title, body } => {
            let editor = ctx.require_identity()?;
            let update = QuestionUpdate {
                title: title.clone(),
                body: body.clone(),
            };
            let question = ctx.service.edit_question(&editor.user_id, id, update).await?;
            output(&question, flags.format)
        }
        QuestionCommands::Delete { id } => {
            let editor = ctx.require_identity()?;
            ctx.service.delete_question(&editor.user_id, id).await?;
            output(&DeletedResponse { id, deleted: true }, flags.format)
        }
        QuestionCommands::Vote { id, polarity } => {
            vote::cast(&TargetRef::question(id.as_str()), *polarity, ctx, flags).await
        }
        QuestionCommands::Upvote { id } => {
            vote::upvote(TargetRef::question(id.as_str()), ctx, flags).await
        }
        QuestionCommands::Votes { id } => {
            vote::list(&TargetRef::question(id.as_str()), ctx, flags).await
        }
    }
}
