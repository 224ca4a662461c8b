//! Database and voting error types for forum-db.

use forum_core::errors::CoreError;
use forum_core::voting::TargetRef;
use thiserror::Error;

/// Errors from database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A SQL query failed.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// Invalid state encountered (e.g., bad data in DB).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// A write collided with a row another writer created or changed first.
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// Domain-level failure (not found, unauthorized, validation).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Errors from casting a vote or applying a legacy increment.
///
/// Every variant is recoverable; none leaves the ledger or the score changed.
#[derive(Debug, Error)]
pub enum VoteError {
    /// Requested polarity was not +1 or -1. Rejected before any storage access.
    #[error("Invalid polarity {0}: expected +1 or -1")]
    InvalidPolarity(i64),

    /// No acting user could be resolved for the request.
    #[error("Not authenticated: no acting user")]
    Unauthenticated,

    #[error("Target not found: {0}")]
    TargetNotFound(TargetRef),

    #[error("Voter not found: {0}")]
    VoterNotFound(String),

    /// Concurrent writers kept colliding on the same (voter, target) pair.
    #[error("Vote conflict on {target} for voter {voter_id}; retry the request")]
    VoteConflict { target: TargetRef, voter_id: String },

    /// Any other storage failure. The transaction was rolled back.
    #[error("Storage error: {0}")]
    Storage(#[from] DatabaseError),
}

impl From<libsql::Error> for VoteError {
    fn from(error: libsql::Error) -> Self {
        Self::Storage(DatabaseError::LibSql(error))
    }
}
