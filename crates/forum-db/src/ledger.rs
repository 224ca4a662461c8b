//! Vote ledger and score aggregate storage contracts.
//!
//! Free functions over a `libsql::Connection` so the voting engine can run
//! them inside its transaction (`WriteTx` derefs to a connection) and the
//! read paths can run them on the primary connection.
//!
//! - [`find_entry`]: the entry for one `(voter, target)` pair, if any.
//! - [`upsert_entry`]: create or rewrite that entry. A lost race on the
//!   uniqueness constraint surfaces as `DatabaseError::ConstraintViolation`.
//! - [`delete_entry`]: idempotent removal.
//! - [`apply_delta`]: `score = score + delta` in one statement, returning the
//!   new value. The score is never computed on the Rust side.

use chrono::Utc;
use forum_core::entities::Vote;
use forum_core::enums::Polarity;
use forum_core::ids::PREFIX_VOTE;
use forum_core::voting::TargetRef;

use crate::error::DatabaseError;
use crate::helpers::{generate_id, parse_datetime, parse_enum, parse_polarity};
use crate::retry::is_unique_violation;

pub(crate) const VOTE_COLS: &str =
    "id, voter_id, target_kind, target_id, polarity, created_at, updated_at";

pub(crate) fn row_to_vote(row: &libsql::Row) -> Result<Vote, DatabaseError> {
    Ok(Vote {
        id: row.get(0)?,
        voter_id: row.get(1)?,
        target_kind: parse_enum(&row.get::<String>(2)?)?,
        target_id: row.get(3)?,
        polarity: parse_polarity(row.get::<i64>(4)?)?,
        created_at: parse_datetime(&row.get::<String>(5)?)?,
        updated_at: parse_datetime(&row.get::<String>(6)?)?,
    })
}

/// Look up the ledger entry for `(voter_id, target)`.
pub async fn find_entry(
    conn: &libsql::Connection,
    voter_id: &str,
    target: &TargetRef,
) -> Result<Option<Vote>, DatabaseError> {
    let mut rows = conn
        .query(
            &format!(
                "SELECT {VOTE_COLS} FROM votes
                 WHERE voter_id = ?1 AND target_kind = ?2 AND target_id = ?3"
            ),
            libsql::params![voter_id, target.kind.as_str(), target.id.as_str()],
        )
        .await?;
    match rows.next().await? {
        Some(row) => Ok(Some(row_to_vote(&row)?)),
        None => Ok(None),
    }
}

/// Create the entry for `(voter_id, target)`, or rewrite `existing` to `polarity`.
///
/// Inserting relies on the `(voter, target)` unique index to detect a
/// competing writer. Rewriting checks the entry still exists; if it vanished
/// the caller's view is stale and this is reported the same way.
///
/// # Errors
///
/// `DatabaseError::ConstraintViolation` when another writer got there first,
/// any other `DatabaseError` for storage failures.
pub async fn upsert_entry(
    conn: &libsql::Connection,
    existing: Option<&Vote>,
    voter_id: &str,
    target: &TargetRef,
    polarity: Polarity,
) -> Result<Vote, DatabaseError> {
    let now = Utc::now();

    if let Some(entry) = existing {
        let changed = conn
            .execute(
                "UPDATE votes SET polarity = ?1, updated_at = ?2 WHERE id = ?3",
                libsql::params![polarity.value(), now.to_rfc3339(), entry.id.as_str()],
            )
            .await?;
        if changed == 0 {
            return Err(DatabaseError::ConstraintViolation(format!(
                "vote {} on {target} disappeared before it could be flipped",
                entry.id
            )));
        }
        return Ok(Vote {
            polarity,
            updated_at: now,
            ..entry.clone()
        });
    }

    let id = generate_id(conn, PREFIX_VOTE).await?;
    let inserted = conn
        .execute(
            &format!("INSERT INTO votes ({VOTE_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"),
            libsql::params![
                id.as_str(),
                voter_id,
                target.kind.as_str(),
                target.id.as_str(),
                polarity.value(),
                now.to_rfc3339(),
                now.to_rfc3339()
            ],
        )
        .await;

    match inserted {
        Ok(_) => Ok(Vote {
            id,
            voter_id: voter_id.to_string(),
            target_kind: target.kind,
            target_id: target.id.clone(),
            polarity,
            created_at: now,
            updated_at: now,
        }),
        Err(e) if is_unique_violation(&e) => Err(DatabaseError::ConstraintViolation(format!(
            "voter {voter_id} already has a vote on {target}: {e}"
        ))),
        Err(e) => Err(e.into()),
    }
}

/// Remove a ledger entry. Removing an entry that is already gone is not an
/// error; the return value says whether a row was actually deleted.
pub async fn delete_entry(conn: &libsql::Connection, entry: &Vote) -> Result<bool, DatabaseError> {
    let deleted = conn
        .execute("DELETE FROM votes WHERE id = ?1", [entry.id.as_str()])
        .await?;
    Ok(deleted > 0)
}

/// Atomically add `delta` to the target's score and return the new score.
///
/// Returns `None` when the target row does not exist.
pub async fn apply_delta(
    conn: &libsql::Connection,
    target: &TargetRef,
    delta: i64,
) -> Result<Option<i64>, DatabaseError> {
    let mut rows = conn
        .query(
            &format!(
                "UPDATE {} SET score = score + ?1 WHERE id = ?2 RETURNING score",
                target.kind.table()
            ),
            libsql::params![delta, target.id.as_str()],
        )
        .await?;
    match rows.next().await? {
        Some(row) => Ok(Some(row.get::<i64>(0)?)),
        None => Ok(None),
    }
}

/// Untracked `+1`: bumps the score and the legacy counter together.
///
/// Returns `None` when the target row does not exist.
pub async fn apply_legacy_increment(
    conn: &libsql::Connection,
    target: &TargetRef,
) -> Result<Option<i64>, DatabaseError> {
    let mut rows = conn
        .query(
            &format!(
                "UPDATE {} SET score = score + 1, legacy_upvotes = legacy_upvotes + 1
                 WHERE id = ?1 RETURNING score",
                target.kind.table()
            ),
            [target.id.as_str()],
        )
        .await?;
    match rows.next().await? {
        Some(row) => Ok(Some(row.get::<i64>(0)?)),
        None => Ok(None),
    }
}

/// Whether the target row exists.
pub async fn target_exists(
    conn: &libsql::Connection,
    target: &TargetRef,
) -> Result<bool, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("SELECT 1 FROM {} WHERE id = ?1", target.kind.table()),
            [target.id.as_str()],
        )
        .await?;
    Ok(rows.next().await?.is_some())
}

/// Whether the user row exists.
pub async fn user_exists(conn: &libsql::Connection, user_id: &str) -> Result<bool, DatabaseError> {
    let mut rows = conn
        .query("SELECT 1 FROM users WHERE id = ?1", [user_id])
        .await?;
    Ok(rows.next().await?.is_some())
}

/// Current `(score, legacy_upvotes)` of the target, or `None` if it does not exist.
pub async fn target_counters(
    conn: &libsql::Connection,
    target: &TargetRef,
) -> Result<Option<(i64, i64)>, DatabaseError> {
    let mut rows = conn
        .query(
            &format!(
                "SELECT score, legacy_upvotes FROM {} WHERE id = ?1",
                target.kind.table()
            ),
            [target.id.as_str()],
        )
        .await?;
    match rows.next().await? {
        Some(row) => Ok(Some((row.get::<i64>(0)?, row.get::<i64>(1)?))),
        None => Ok(None),
    }
}

/// `(Σ polarity, entry count)` over the target's ledger entries.
pub async fn ledger_totals(
    conn: &libsql::Connection,
    target: &TargetRef,
) -> Result<(i64, u32), DatabaseError> {
    let mut rows = conn
        .query(
            "SELECT COALESCE(SUM(polarity), 0), COUNT(*) FROM votes
             WHERE target_kind = ?1 AND target_id = ?2",
            libsql::params![target.kind.as_str(), target.id.as_str()],
        )
        .await?;
    let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
    Ok((row.get::<i64>(0)?, crate::helpers::get_count(&row, 1)?))
}
