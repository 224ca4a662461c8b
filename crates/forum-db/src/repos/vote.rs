//! Voting engine: toggle/switch transitions and the legacy increment.
//!
//! Each transition runs inside one immediate write transaction that checks the
//! target and voter, reads the voter's ledger entry, executes the planned
//! ledger mutation, and applies the score delta. A write that loses a race on
//! the `(voter, target)` pair is replayed once from a fresh read.

use forum_core::entities::Vote;
use forum_core::enums::{Polarity, VoteState};
use forum_core::errors::CoreError;
use forum_core::identity::VoterIdentity;
use forum_core::responses::{LedgerReport, VoteOutcome};
use forum_core::voting::{TargetRef, VoteAction};

use crate::error::{DatabaseError, VoteError};
use crate::ledger::{
    VOTE_COLS, apply_delta, apply_legacy_increment, delete_entry, find_entry, ledger_totals,
    row_to_vote, target_counters, target_exists, upsert_entry, user_exists,
};
use crate::retry::{VOTE_ATTEMPTS, is_busy};
use crate::service::ForumService;

impl ForumService {
    /// Cast `raw_polarity` (+1 or -1) on `target` as `voter_id`.
    ///
    /// Re-casting the current polarity removes the vote; casting the opposite
    /// polarity flips it. The returned outcome carries the committed score.
    ///
    /// # Errors
    ///
    /// `InvalidPolarity` before any storage access, `TargetNotFound` and
    /// `VoterNotFound` for missing rows, `VoteConflict` when the retry also
    /// collides, `Storage` for anything else. No error leaves a partial write.
    pub async fn cast_vote(
        &self,
        target: &TargetRef,
        voter_id: &str,
        raw_polarity: i64,
    ) -> Result<VoteOutcome, VoteError> {
        self.cast_vote_with(target, voter_id, raw_polarity, |_| async {})
            .await
    }

    /// `cast_vote`, calling `after_collision(attempt)` once a collided attempt
    /// has been rolled back and before the next one starts.
    pub(crate) async fn cast_vote_with<F, Fut>(
        &self,
        target: &TargetRef,
        voter_id: &str,
        raw_polarity: i64,
        mut after_collision: F,
    ) -> Result<VoteOutcome, VoteError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = ()>,
    {
        let requested = Polarity::try_from(raw_polarity)
            .map_err(|_| VoteError::InvalidPolarity(raw_polarity))?;

        for attempt in 1..=VOTE_ATTEMPTS {
            let tx = self
                .db()
                .begin_write()
                .await
                .map_err(|e| contention(e, target, voter_id))?;

            match transition(&tx, target, voter_id, requested).await {
                Ok(outcome) => {
                    tx.commit()
                        .await
                        .map_err(|e| contention(e, target, voter_id))?;
                    tracing::debug!(
                        %target,
                        voter_id,
                        from = %outcome.previous,
                        to = %outcome.state,
                        delta = outcome.delta,
                        score = outcome.score,
                        "vote applied"
                    );
                    return Ok(outcome);
                }
                Err(VoteError::Storage(DatabaseError::ConstraintViolation(reason))) => {
                    tx.rollback().await;
                    tracing::warn!(%target, voter_id, attempt, %reason, "vote write collided");
                    after_collision(attempt).await;
                }
                Err(e) => {
                    tx.rollback().await;
                    return Err(e);
                }
            }
        }

        tracing::warn!(%target, voter_id, "vote conflict persisted after retry");
        Err(VoteError::VoteConflict {
            target: target.clone(),
            voter_id: voter_id.to_string(),
        })
    }

    /// [`cast_vote`](Self::cast_vote) for the resolved acting user.
    ///
    /// # Errors
    ///
    /// `Unauthenticated` when no identity is present, otherwise as `cast_vote`.
    pub async fn cast_vote_as(
        &self,
        identity: Option<&VoterIdentity>,
        target: &TargetRef,
        raw_polarity: i64,
    ) -> Result<VoteOutcome, VoteError> {
        let voter = identity.ok_or(VoteError::Unauthenticated)?;
        self.cast_vote(target, &voter.user_id, raw_polarity).await
    }

    /// Untracked `+1`. Repeatable, no ledger entry, no voter.
    ///
    /// # Errors
    ///
    /// `TargetNotFound` for a missing target, `Storage` otherwise.
    pub async fn legacy_increment(&self, target: &TargetRef) -> Result<i64, VoteError> {
        let tx = self.db().begin_write().await?;
        match apply_legacy_increment(&tx, target).await {
            Ok(Some(score)) => {
                tx.commit().await?;
                tracing::debug!(%target, score, "legacy upvote applied");
                Ok(score)
            }
            Ok(None) => {
                tx.rollback().await;
                Err(VoteError::TargetNotFound(target.clone()))
            }
            Err(e) => {
                tx.rollback().await;
                Err(e.into())
            }
        }
    }

    /// The voter's current stance on the target.
    pub async fn vote_state(
        &self,
        voter_id: &str,
        target: &TargetRef,
    ) -> Result<VoteState, DatabaseError> {
        let entry = find_entry(&*self.db().read().await, voter_id, target).await?;
        Ok(VoteState::from_entry(entry.map(|v| v.polarity)))
    }

    /// Ledger entries on the target, oldest first.
    pub async fn list_votes(&self, target: &TargetRef) -> Result<Vec<Vote>, DatabaseError> {
        let conn = self.db().read().await;
        let mut rows = conn
            .query(
                &format!(
                    "SELECT {VOTE_COLS} FROM votes
                     WHERE target_kind = ?1 AND target_id = ?2
                     ORDER BY created_at ASC, rowid ASC"
                ),
                libsql::params![target.kind.as_str(), target.id.as_str()],
            )
            .await?;

        let mut votes = Vec::new();
        while let Some(row) = rows.next().await? {
            votes.push(row_to_vote(&row)?);
        }
        Ok(votes)
    }

    pub async fn target_score(&self, target: &TargetRef) -> Result<i64, DatabaseError> {
        target_counters(&*self.db().read().await, target)
            .await?
            .map(|(score, _)| score)
            .ok_or_else(|| not_found(target))
    }

    /// Sum of polarities over the target's ledger entries.
    pub async fn ledger_sum(&self, target: &TargetRef) -> Result<i64, DatabaseError> {
        Ok(ledger_totals(&*self.db().read().await, target).await?.0)
    }

    /// Compare the stored score with `Σ polarity + legacy_upvotes`.
    pub async fn ledger_report(&self, target: &TargetRef) -> Result<LedgerReport, DatabaseError> {
        let conn = self.db().read().await;
        let (score, legacy_upvotes) = target_counters(&conn, target)
            .await?
            .ok_or_else(|| not_found(target))?;
        let (ledger_sum, entries) = ledger_totals(&conn, target).await?;
        drop(conn);

        let consistent = score == ledger_sum + legacy_upvotes;
        if !consistent {
            tracing::warn!(%target, score, ledger_sum, legacy_upvotes, "score drifted from ledger");
        }

        Ok(LedgerReport {
            target: target.clone(),
            score,
            ledger_sum,
            legacy_upvotes,
            entries,
            consistent,
        })
    }
}

/// A write lock still held by another writer after the busy timeout is
/// contention the caller may retry, not a storage failure.
fn contention(error: DatabaseError, target: &TargetRef, voter_id: &str) -> VoteError {
    match error {
        DatabaseError::LibSql(ref inner) if is_busy(inner) => {
            tracing::warn!(%target, voter_id, "write lock not acquired within busy timeout");
            VoteError::VoteConflict {
                target: target.clone(),
                voter_id: voter_id.to_string(),
            }
        }
        other => other.into(),
    }
}

fn not_found(target: &TargetRef) -> DatabaseError {
    CoreError::NotFound {
        entity_type: target.kind.to_string(),
        id: target.id.clone(),
    }
    .into()
}

/// One attempt at a transition, inside the caller's transaction.
async fn transition(
    conn: &libsql::Connection,
    target: &TargetRef,
    voter_id: &str,
    requested: Polarity,
) -> Result<VoteOutcome, VoteError> {
    if !target_exists(conn, target).await? {
        return Err(VoteError::TargetNotFound(target.clone()));
    }
    if !user_exists(conn, voter_id).await? {
        return Err(VoteError::VoterNotFound(voter_id.to_string()));
    }

    let existing = find_entry(conn, voter_id, target).await?;
    let plan = VoteState::from_entry(existing.as_ref().map(|v| v.polarity)).plan(requested);

    match plan.action {
        VoteAction::Insert(polarity) => {
            upsert_entry(conn, None, voter_id, target, polarity).await?;
        }
        VoteAction::Flip(polarity) => {
            upsert_entry(conn, existing.as_ref(), voter_id, target, polarity).await?;
        }
        VoteAction::Delete => {
            let entry = existing.as_ref().ok_or_else(|| {
                DatabaseError::InvalidState(format!("no vote by {voter_id} on {target} to remove"))
            })?;
            if !delete_entry(conn, entry).await? {
                return Err(DatabaseError::ConstraintViolation(format!(
                    "vote {} on {target} was already removed",
                    entry.id
                ))
                .into());
            }
        }
    }

    let score = apply_delta(conn, target, plan.delta)
        .await?
        .ok_or_else(|| VoteError::TargetNotFound(target.clone()))?;

    Ok(VoteOutcome {
        target: target.clone(),
        voter_id: voter_id.to_string(),
        previous: plan.from,
        action: plan.action,
        state: plan.next,
        delta: plan.delta,
        score,
    })
}
