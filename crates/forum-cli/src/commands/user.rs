use forum_db::updates::user::UserUpdate;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::UserCommands;
use crate::context::AppContext;
use crate::output::output;

/// Handle `forum user`.
pub async fn handle(
    action: &UserCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        UserCommands::Register { name, email, role } => {
            let user = ctx
                .service
                .register_user(name, email, role.as_deref())
                .await?;
            output(&user, flags.format)
        }
        UserCommands::Get { id, email } => {
            let user = match (id, email) {
                (_, Some(email)) => ctx.service.get_user_by_email(email).await?,
                (Some(id), None) => ctx.service.get_user(id).await?,
                (None, None) => anyhow::bail!("pass a user ID or --email"),
            };
            output(&user, flags.format)
        }
        UserCommands::Update { name, role } => {
            let me = ctx.require_identity()?;
            let update = UserUpdate {
                name: name.clone(),
                role: role.clone(),
            };
            let user = ctx.service.update_user(&me.user_id, update).await?;
            output(&user, flags.format)
        }
        UserCommands::Me => {
            let me = ctx.require_identity()?;
            output(&ctx.service.get_user(&me.user_id).await?, flags.format)
        }
    }
}
