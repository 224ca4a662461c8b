//! Service layer: every repo method is implemented as `impl ForumService`.
//!
//! Read paths and single-statement CRUD writes use the primary connection.
//! Vote transitions take a dedicated write transaction from
//! [`ForumDb::begin_write`] so the ledger change and the score change commit
//! or roll back together.

use std::time::Duration;

use forum_config::DatabaseConfig;

use crate::ForumDb;
use crate::error::DatabaseError;

/// Entry point for all forum operations.
pub struct ForumService {
    db: ForumDb,
}

impl ForumService {
    /// Create a service over a local database file (or `":memory:"`).
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or migrated.
    pub async fn new_local(db_path: &str) -> Result<Self, DatabaseError> {
        let db = ForumDb::open_local(db_path).await?;
        Ok(Self { db })
    }

    /// Create a service from the `[database]` configuration section.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or migrated.
    pub async fn from_config(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let db = ForumDb::open_local_with_timeout(
            &config.path,
            Duration::from_millis(config.busy_timeout_ms),
        )
        .await?;
        Ok(Self { db })
    }

    /// Create from an existing `ForumDb` (for testing).
    #[must_use]
    pub const fn from_db(db: ForumDb) -> Self {
        Self { db }
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &ForumDb {
        &self.db
    }
}
