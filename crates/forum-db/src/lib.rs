//! # forum-db
//!
//! libSQL storage for the forum backend.
//!
//! Holds users, questions, answers, and the vote ledger, and implements the
//! voting engine that keeps each target's score in step with its ledger
//! entries. Every vote transition runs in one `BEGIN IMMEDIATE` transaction.
//!
//! Uses the `libsql` crate (C `SQLite` fork) in local mode: a database file,
//! or `":memory:"` for tests.

pub mod error;
pub mod helpers;
pub mod ledger;
mod migrations;
pub mod repos;
pub mod retry;
pub mod service;
pub mod updates;

#[cfg(test)]
mod test_support;

use std::time::Duration;

use error::DatabaseError;
use libsql::params::IntoParams;
use libsql::{Builder, TransactionBehavior};
use tokio::sync::{Mutex, MutexGuard};

const IN_MEMORY: &str = ":memory:";

/// Default time a writer waits for the database lock.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Central database handle.
///
/// Reads go through the primary connection via [`ForumDb::read`]. Every write
/// runs in an immediate transaction from [`ForumDb::begin_write`] (or
/// [`ForumDb::execute_write`] for a single statement), so concurrent requests
/// never share a transaction.
pub struct ForumDb {
    db: libsql::Database,
    conn: libsql::Connection,
    in_memory: bool,
    busy_timeout: Duration,
    /// An in-memory database has exactly one connection. Readers and writers
    /// take turns on it, so nobody sees or joins another caller's transaction.
    memory_turn: Mutex<()>,
}

/// The primary connection, held for the duration of a read.
pub struct ReadConn<'a> {
    conn: &'a libsql::Connection,
    _turn: Option<MutexGuard<'a, ()>>,
}

impl std::ops::Deref for ReadConn<'_> {
    type Target = libsql::Connection;

    fn deref(&self) -> &Self::Target {
        self.conn
    }
}

/// A write transaction plus whatever keeps it exclusive.
///
/// Dereferences to the transaction's connection. Must be finished with
/// [`WriteTx::commit`] or [`WriteTx::rollback`].
pub struct WriteTx<'a> {
    tx: libsql::Transaction,
    _turn: Option<MutexGuard<'a, ()>>,
}

impl WriteTx<'_> {
    /// Commit the transaction.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if `COMMIT` fails; the transaction is then rolled back
    /// by `SQLite`.
    pub async fn commit(self) -> Result<(), DatabaseError> {
        self.tx.commit().await?;
        Ok(())
    }

    /// Roll the transaction back, logging (not returning) a failed rollback.
    pub async fn rollback(self) {
        if let Err(error) = self.tx.rollback().await {
            tracing::warn!(%error, "rollback failed");
        }
    }
}

impl std::ops::Deref for WriteTx<'_> {
    type Target = libsql::Connection;

    fn deref(&self) -> &Self::Target {
        &self.tx
    }
}

impl ForumDb {
    /// Open a local database at the given path with the default busy timeout.
    ///
    /// Runs migrations automatically on first open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        Self::open_local_with_timeout(path, DEFAULT_BUSY_TIMEOUT).await
    }

    /// Open a local database with an explicit busy timeout for writers.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local_with_timeout(
        path: &str,
        busy_timeout: Duration,
    ) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;
        let in_memory = path == IN_MEMORY;

        configure_connection(&conn, busy_timeout).await?;
        if !in_memory {
            // WAL lets readers on the primary connection proceed while a
            // vote transaction holds the write lock.
            pragma(&conn, "PRAGMA journal_mode = WAL").await?;
        }

        let forum_db = Self {
            db,
            conn,
            in_memory,
            busy_timeout,
            memory_turn: Mutex::new(()),
        };
        forum_db.run_migrations().await?;
        tracing::info!(path, in_memory, "forum database opened");
        Ok(forum_db)
    }

    /// Access the primary libSQL connection for direct queries.
    ///
    /// Bypasses the in-memory turn; repositories use [`ForumDb::read`].
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Borrow the primary connection for a read. On an in-memory database this
    /// waits until no write transaction is open.
    pub async fn read(&self) -> ReadConn<'_> {
        let turn = if self.in_memory {
            Some(self.memory_turn.lock().await)
        } else {
            None
        };
        ReadConn {
            conn: &self.conn,
            _turn: turn,
        }
    }

    /// Start an immediate (write-locking) transaction on a dedicated connection.
    ///
    /// File databases hand out a fresh connection per transaction; `SQLite`'s
    /// write lock serializes them, bounded by the busy timeout. In-memory
    /// databases reuse the primary connection and hold its turn until the
    /// transaction finishes.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if no connection can be opened or the lock is not
    /// acquired within the busy timeout.
    pub async fn begin_write(&self) -> Result<WriteTx<'_>, DatabaseError> {
        let (conn, turn) = if self.in_memory {
            (self.conn.clone(), Some(self.memory_turn.lock().await))
        } else {
            let conn = self.db.connect()?;
            configure_connection(&conn, self.busy_timeout).await?;
            (conn, None)
        };

        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .await?;
        Ok(WriteTx { tx, _turn: turn })
    }

    /// Execute one write statement in its own immediate transaction.
    ///
    /// Returns the number of rows changed.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the transaction cannot start, the statement
    /// fails (the transaction is then rolled back), or `COMMIT` fails.
    pub async fn execute_write(
        &self,
        sql: &str,
        params: impl IntoParams,
    ) -> Result<u64, DatabaseError> {
        let tx = self.begin_write().await?;
        match tx.execute(sql, params).await {
            Ok(changed) => {
                tx.commit().await?;
                Ok(changed)
            }
            Err(e) => {
                tx.rollback().await;
                Err(e.into())
            }
        }
    }

    /// Generate a prefixed ID via libSQL. Returns e.g., `"qst-a3f8b2c1"`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or returns no rows.
    pub async fn generate_id(&self, prefix: &str) -> Result<String, DatabaseError> {
        let conn = self.read().await;
        helpers::generate_id(&conn, prefix).await
    }
}

/// Per-connection settings: foreign keys and the busy timeout.
async fn configure_connection(
    conn: &libsql::Connection,
    busy_timeout: Duration,
) -> Result<(), DatabaseError> {
    conn.execute("PRAGMA foreign_keys = ON", ())
        .await
        .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;
    pragma(
        conn,
        &format!("PRAGMA busy_timeout = {}", busy_timeout.as_millis()),
    )
    .await
}

/// Run a PRAGMA that reports its new value as a row.
async fn pragma(conn: &libsql::Connection, sql: &str) -> Result<(), DatabaseError> {
    let mut rows = conn
        .query(sql, ())
        .await
        .map_err(|e| DatabaseError::Migration(format!("{sql}: {e}")))?;
    while rows.next().await?.is_some() {}
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    async fn test_db() -> ForumDb {
        ForumDb::open_local(":memory:").await.unwrap()
    }

    #[tokio::test]
    async fn open_local_creates_schema() {
        let db = test_db().await;

        for table in ["users", "questions", "answers", "votes"] {
            let mut rows = db
                .conn()
                .query(
                    "SELECT name FROM sqlite_master WHERE type='table' AND name=?1",
                    [table],
                )
                .await
                .unwrap();
            let row = rows.next().await.unwrap();
            assert!(row.is_some(), "table '{table}' should exist");
        }
    }

    #[tokio::test]
    async fn idempotent_migrations() {
        let db = test_db().await;
        db.run_migrations().await.unwrap();
    }

    #[tokio::test]
    async fn generate_id_correct_format() {
        let db = test_db().await;
        let id = db.generate_id("vot").await.unwrap();
        assert!(id.starts_with("vot-"), "ID should start with 'vot-': {id}");
        assert_eq!(id.len(), 12, "ID should be 12 chars: {id}");
        assert!(id[4..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[tokio::test]
    async fn generate_id_all_prefixes_and_unique() {
        let db = test_db().await;
        let mut ids = HashSet::new();
        for prefix in forum_core::ids::ALL_PREFIXES {
            for _ in 0..25 {
                let id = db.generate_id(prefix).await.unwrap();
                assert!(id.starts_with(&format!("{prefix}-")));
                assert!(ids.insert(id.clone()), "Duplicate ID generated: {id}");
            }
        }
    }

    #[tokio::test]
    async fn votes_unique_per_voter_and_target() {
        let db = test_db().await;
        db.conn()
            .execute(
                "INSERT INTO users (id, name, email) VALUES ('usr-1', 'A', 'a@x')",
                (),
            )
            .await
            .unwrap();

        db.conn()
            .execute(
                "INSERT INTO votes (id, voter_id, target_kind, target_id, polarity) VALUES ('vot-1', 'usr-1', 'question', 'qst-1', 1)",
                (),
            )
            .await
            .unwrap();

        let result = db
            .conn()
            .execute(
                "INSERT INTO votes (id, voter_id, target_kind, target_id, polarity) VALUES ('vot-2', 'usr-1', 'question', 'qst-1', -1)",
                (),
            )
            .await;
        let error = result.expect_err("duplicate (voter, target) should be rejected");
        assert!(crate::retry::is_unique_violation(&error), "{error}");
    }

    #[tokio::test]
    async fn polarity_check_rejects_zero() {
        let db = test_db().await;
        db.conn()
            .execute(
                "INSERT INTO users (id, name, email) VALUES ('usr-1', 'A', 'a@x')",
                (),
            )
            .await
            .unwrap();

        let result = db
            .conn()
            .execute(
                "INSERT INTO votes (id, voter_id, target_kind, target_id, polarity) VALUES ('vot-1', 'usr-1', 'question', 'qst-1', 0)",
                (),
            )
            .await;
        let error = result.expect_err("polarity 0 should violate CHECK");
        assert!(!crate::retry::is_unique_violation(&error));
    }

    #[tokio::test]
    async fn rolled_back_write_leaves_no_trace() {
        let db = test_db().await;

        let tx = db.begin_write().await.unwrap();
        tx.execute(
            "INSERT INTO users (id, name, email) VALUES ('usr-1', 'A', 'a@x')",
            (),
        )
        .await
        .unwrap();
        tx.rollback().await;

        let mut rows = db
            .conn()
            .query("SELECT COUNT(*) FROM users", ())
            .await
            .unwrap();
        let count: i64 = rows.next().await.unwrap().unwrap().get(0).unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn in_memory_writes_wait_for_open_transaction() {
        let db = std::sync::Arc::new(test_db().await);

        let tx = db.begin_write().await.unwrap();
        let writer = {
            let db = std::sync::Arc::clone(&db);
            tokio::spawn(async move {
                db.execute_write(
                    "INSERT INTO users (id, name, email) VALUES ('usr-2', 'B', 'b@x')",
                    (),
                )
                .await
            })
        };
        let reader = tokio::time::timeout(Duration::from_millis(50), db.read()).await;
        assert!(reader.is_err(), "read must wait for the open transaction");
        tokio::task::yield_now().await;
        assert!(!writer.is_finished());

        tx.rollback().await;
        assert_eq!(writer.await.unwrap().unwrap(), 1);

        let conn = db.read().await;
        let mut rows = conn
            .query("SELECT name FROM users WHERE id = 'usr-2'", ())
            .await
            .unwrap();
        let name: String = rows.next().await.unwrap().unwrap().get(0).unwrap();
        assert_eq!(name, "B");
    }
}
