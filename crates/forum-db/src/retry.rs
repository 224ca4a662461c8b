//! Write-conflict classification and the vote retry budget.
//!
//! A vote transition that loses a race on the `(voter, target)` uniqueness
//! constraint is replayed once against the state the winner left behind.
//! It never waits on the other writer beyond the connection's busy timeout.

/// Attempts per vote transition, including the first one.
pub const VOTE_ATTEMPTS: u32 = 2;

/// Detect a UNIQUE or PRIMARY KEY violation.
///
/// Matches on the message SQLite produces; the predicate is narrow so that
/// CHECK and FOREIGN KEY failures are not mistaken for write races.
pub fn is_unique_violation(e: &libsql::Error) -> bool {
    let msg = e.to_string();
    msg.contains("UNIQUE constraint failed") || msg.contains("PRIMARY KEY constraint failed")
}

/// Detect a writer that gave up waiting for the database lock.
pub fn is_busy(e: &libsql::Error) -> bool {
    let msg = e.to_string();
    msg.contains("database is locked") || msg.contains("database table is locked")
}
