//! libSQL database configuration.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Default database path, relative to the working directory.
fn default_path() -> String {
    ".forum/forum.db".to_string()
}

/// Default busy timeout for write transactions, in milliseconds.
const fn default_busy_timeout_ms() -> u64 {
    5_000
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Path to the database file, or `":memory:"`.
    #[serde(default = "default_path")]
    pub path: String,

    /// How long a writer waits for the database write lock before failing.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

impl DatabaseConfig {
    pub fn is_in_memory(&self) -> bool {
        self.path == ":memory:"
    }

    /// Reject values the store cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.path.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "database.path".into(),
                reason: "must not be empty".into(),
            });
        }
        if self.busy_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "database.busy_timeout_ms".into(),
                reason: "must be greater than zero".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_file_backed() {
        let config = DatabaseConfig::default();
        assert_eq!(config.path, ".forum/forum.db");
        assert_eq!(config.busy_timeout_ms, 5_000);
        assert!(!config.is_in_memory());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_busy_timeout_is_rejected() {
        let config = DatabaseConfig {
            busy_timeout_ms: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field, .. }) if field == "database.busy_timeout_ms"
        ));
    }
}
