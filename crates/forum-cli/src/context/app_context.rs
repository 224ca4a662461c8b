use std::path::Path;

use anyhow::Context;
use forum_config::ForumConfig;
use forum_core::identity::VoterIdentity;
use forum_db::service::ForumService;

use crate::cli::GlobalFlags;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub service: ForumService,
    pub config: ForumConfig,
    pub identity: Option<VoterIdentity>,
}

impl AppContext {
    /// Open the database and resolve the acting user.
    ///
    /// `--db` overrides `database.path`; `--as` overrides `auth.user_id`.
    pub async fn init(mut config: ForumConfig, flags: &GlobalFlags) -> anyhow::Result<Self> {
        if let Some(path) = &flags.db {
            config.database.path.clone_from(path);
        }
        config
            .database
            .validate()
            .context("invalid database configuration")?;

        if !config.database.is_in_memory()
            && let Some(parent) = Path::new(&config.database.path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create database directory {}", parent.display())
            })?;
        }

        let service = ForumService::from_config(&config.database)
            .await
            .with_context(|| format!("failed to open forum database {}", config.database.path))?;

        let identity = resolve_identity(flags.as_user.as_deref(), &config);
        if identity.is_none() {
            tracing::debug!("no acting user; write commands will be rejected");
        }

        Ok(Self {
            service,
            config,
            identity,
        })
    }

    /// The acting user, or an error naming how to provide one.
    pub fn require_identity(&self) -> anyhow::Result<&VoterIdentity> {
        self.identity.as_ref().context(
            "no acting user: pass --as <user-id> or set auth.user_id (FORUM_AUTH__USER_ID)",
        )
    }

    /// `--limit`, falling back to `general.default_limit`.
    pub fn limit(&self, flags: &GlobalFlags) -> u32 {
        flags.limit.unwrap_or(self.config.general.default_limit)
    }
}

fn resolve_identity(as_user: Option<&str>, config: &ForumConfig) -> Option<VoterIdentity> {
    VoterIdentity::from_optional(as_user)
        .or_else(|| VoterIdentity::from_optional(Some(&config.auth.user_id)))
}

#[cfg(test)]
mod tests {
    use forum_config::ForumConfig;
    use pretty_assertions::assert_eq;

    use super::resolve_identity;

    #[test]
    fn flag_overrides_config_user() {
        let mut config = ForumConfig::default();
        config.auth.user_id = "usr-config".into();

        let identity = resolve_identity(Some("usr-flag"), &config).unwrap();
        assert_eq!(identity.user_id, "usr-flag");

        let identity = resolve_identity(None, &config).unwrap();
        assert_eq!(identity.user_id, "usr-config");
    }

    #[test]
    fn blank_everywhere_is_anonymous() {
        let config = ForumConfig::default();
        assert!(resolve_identity(Some(" "), &config).is_none());
    }
}
