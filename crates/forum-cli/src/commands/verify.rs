use anyhow::bail;
use forum_core::voting::TargetRef;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::VerifyArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `forum verify`. Prints the report, then fails if the score drifted.
pub async fn handle(
    args: &VerifyArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let target = TargetRef::new(args.kind, args.id.as_str());
    let report = ctx.service.ledger_report(&target).await?;
    output(&report, flags.format)?;

    if !report.consistent {
        bail!(
            "score of {target} is {} but its ledger implies {}",
            report.score,
            report.ledger_sum + report.legacy_upvotes
        );
    }
    Ok(())
}
