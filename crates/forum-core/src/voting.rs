//! Vote state machine.
//!
//! Given the current stance of a voter on a target and a requested polarity,
//! `VoteState::plan` decides the single ledger mutation to perform and the
//! score delta that accompanies it. No storage is touched here; `forum-db`
//! executes the plan inside one transaction.
//!
//! | current | requested | action        | next    | delta |
//! |---------|-----------|---------------|---------|-------|
//! | neutral | up        | insert(up)    | up      | +1    |
//! | neutral | down      | insert(down)  | down    | -1    |
//! | up      | up        | delete        | neutral | -1    |
//! | down    | down      | delete        | neutral | +1    |
//! | up      | down      | flip(down)    | down    | -2    |
//! | down    | up        | flip(up)      | up      | +2    |

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::enums::{Polarity, TargetKind, VoteState};

/// A votable entity: kind tag plus ID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct TargetRef {
    pub kind: TargetKind,
    pub id: String,
}

impl TargetRef {
    #[must_use]
    pub fn new(kind: TargetKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }

    #[must_use]
    pub fn question(id: impl Into<String>) -> Self {
        Self::new(TargetKind::Question, id)
    }

    #[must_use]
    pub fn answer(id: impl Into<String>) -> Self {
        Self::new(TargetKind::Answer, id)
    }
}

impl fmt::Display for TargetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.id)
    }
}

/// The ledger mutation a transition requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case", tag = "op", content = "polarity")]
pub enum VoteAction {
    /// No entry exists; create one.
    Insert(Polarity),
    /// Same polarity re-cast; remove the entry (toggle off).
    Delete,
    /// Opposite polarity cast; rewrite the existing entry.
    Flip(Polarity),
}

/// Outcome of planning one transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct VotePlan {
    pub from: VoteState,
    pub action: VoteAction,
    pub next: VoteState,
    /// Amount to add to the target's score, always `next - from`.
    pub delta: i64,
}

impl VoteState {
    /// Plan the transition for a requested polarity.
    #[must_use]
    pub const fn plan(self, requested: Polarity) -> VotePlan {
        let (action, next) = match (self.polarity(), requested) {
            (None, p) => (VoteAction::Insert(p), Self::from_entry(Some(p))),
            (Some(Polarity::Up), Polarity::Up) | (Some(Polarity::Down), Polarity::Down) => {
                (VoteAction::Delete, Self::Neutral)
            }
            (Some(_), p) => (VoteAction::Flip(p), Self::from_entry(Some(p))),
        };
        VotePlan {
            from: self,
            action,
            next,
            delta: next.value() - self.value(),
        }
    }
}
