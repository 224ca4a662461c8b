//! Vote subcommands shared by `forum question` and `forum answer`.

use forum_core::responses::LegacyUpvoteResponse;
use forum_core::voting::TargetRef;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

pub async fn cast(
    target: &TargetRef,
    polarity: i64,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let outcome = ctx
        .service
        .cast_vote_as(ctx.identity.as_ref(), target, polarity)
        .await?;
    output(&outcome, flags.format)
}

pub async fn upvote(
    target: TargetRef,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let score = ctx.service.legacy_increment(&target).await?;
    output(&LegacyUpvoteResponse { target, score }, flags.format)
}

pub async fn list(
    target: &TargetRef,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let votes = ctx.service.list_votes(target).await?;
    output(&votes, flags.format)
}
