use forum_config::ForumConfig;

/// Emit warnings for likely mistyped env var keys that silently fell back to defaults.
pub fn warn_unconfigured(config: &ForumConfig) {
    for warning in collect_unconfigured_warnings(config, std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

fn collect_unconfigured_warnings<I>(config: &ForumConfig, env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let keys = env.into_iter().map(|(key, _)| key).collect::<Vec<_>>();
    let mut warnings = Vec::new();

    // A single underscore keeps the key at the top level, so figment ignores it.
    if !config.auth.is_configured() && has_single_underscore_key(&keys, "FORUM_AUTH") {
        warnings.push(
            "auth.user_id is empty while FORUM_AUTH* env vars exist. Use double underscores (example: FORUM_AUTH__USER_ID)."
                .to_string(),
        );
    }
    if has_single_underscore_key(&keys, "FORUM_DATABASE") {
        warnings.push(
            "FORUM_DATABASE* env var without a section separator is ignored. Use double underscores (example: FORUM_DATABASE__PATH)."
                .to_string(),
        );
    }

    warnings
}

fn has_single_underscore_key(keys: &[String], prefix: &str) -> bool {
    keys.iter()
        .any(|key| key.starts_with(prefix) && !key.starts_with(&format!("{prefix}__")))
}
