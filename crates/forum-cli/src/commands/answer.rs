use forum_core::voting::TargetRef;
use forum_db::updates::answer::AnswerUpdate;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::AnswerCommands;
use crate::commands::vote;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct DeletedResponse<'a> {
    id: &'a str,
    deleted: bool,
}

/// Handle `forum answer`.
pub async fn handle(
    action: &AnswerCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        AnswerCommands::Post { question_id, body } => {
            let author = ctx.require_identity()?;
            let answer = ctx
                .service
                .post_answer(&author.user_id, question_id, body)
                .await?;
            output(&answer, flags.format)
        }
        AnswerCommands::Get { id } => output(&ctx.service.get_answer(id).await?, flags.format),
        AnswerCommands::List {
            question_id,
            sort,
            offset,
        } => {
            let page = ctx
                .service
                .list_answers(question_id, *sort, ctx.limit(flags), *offset)
                .await?;
            output(&page, flags.format)
        }
        AnswerCommands::Edit { id, body } => {
            let editor = ctx.require_identity()?;
            let update = AnswerUpdate { body: body.clone() };
            let answer = ctx.service.edit_answer(&editor.user_id, id, update).await?;
            output(&answer, flags.format)
        }
        AnswerCommands::Delete { id } => {
            let editor = ctx.require_identity()?;
            ctx.service.delete_answer(&editor.user_id, id).await?;
            output(&DeletedResponse { id, deleted: true }, flags.format)
        }
        AnswerCommands::Vote { id, polarity } => {
            vote::cast(&TargetRef::answer(id.as_str()), *polarity, ctx, flags).await
        }
        AnswerCommands::Upvote { id } => {
            vote::upvote(TargetRef::answer(id.as_str()), ctx, flags).await
        }
        AnswerCommands::Votes { id } => {
            vote::list(&TargetRef::answer(id.as_str()), ctx, flags).await
        }
    }
}
