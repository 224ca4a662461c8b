//! Target kinds, vote polarities, vote states, and list orderings.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.
//! `as_str()` returns the representation stored in SQL.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// TargetKind
// ---------------------------------------------------------------------------

/// The kind of entity a vote can reference.
///
/// Questions and answers share one ledger and one state machine; the kind tag
/// only selects which table carries the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    Question,
    Answer,
}

impl TargetKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Question => "question",
            Self::Answer => "answer",
        }
    }

    /// SQL table holding the score column for this kind.
    #[must_use]
    pub const fn table(self) -> &'static str {
        match self {
            Self::Question => "questions",
            Self::Answer => "answers",
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TargetKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "question" => Ok(Self::Question),
            "answer" => Ok(Self::Answer),
            other => Err(CoreError::Validation(format!(
                "unknown target kind '{other}' (expected 'question' or 'answer')"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Polarity
// ---------------------------------------------------------------------------

/// Direction of a stored vote. There is no neutral polarity: a neutral stance
/// is the absence of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    Up,
    Down,
}

impl Polarity {
    /// Signed weight of the vote (`+1` / `-1`), as stored in `votes.polarity`.
    #[must_use]
    pub const fn value(self) -> i64 {
        match self {
            Self::Up => 1,
            Self::Down => -1,
        }
    }

    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

impl TryFrom<i64> for Polarity {
    type Error = CoreError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Up),
            -1 => Ok(Self::Down),
            other => Err(CoreError::InvalidPolarity(other)),
        }
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// VoteState
// ---------------------------------------------------------------------------

/// State of one (voter, target) relationship.
///
/// ```text
/// neutral ──up──▶ up ──up──▶ neutral
///    │            │
///   down         down
///    ▼            ▼
///  down ──up──▶  up
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum VoteState {
    Neutral,
    Up,
    Down,
}

impl VoteState {
    /// State implied by an existing ledger entry (or its absence).
    #[must_use]
    pub const fn from_entry(polarity: Option<Polarity>) -> Self {
        match polarity {
            None => Self::Neutral,
            Some(Polarity::Up) => Self::Up,
            Some(Polarity::Down) => Self::Down,
        }
    }

    /// Polarity of the ledger entry backing this state, if any.
    #[must_use]
    pub const fn polarity(self) -> Option<Polarity> {
        match self {
            Self::Neutral => None,
            Self::Up => Some(Polarity::Up),
            Self::Down => Some(Polarity::Down),
        }
    }

    /// Contribution of this state to the target's score.
    #[must_use]
    pub const fn value(self) -> i64 {
        match self.polarity() {
            Some(p) => p.value(),
            None => 0,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Neutral => "neutral",
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

impl fmt::Display for VoteState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ListSort
// ---------------------------------------------------------------------------

/// Ordering for question and answer listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ListSort {
    #[default]
    Latest,
    Oldest,
    Score,
}

impl ListSort {
    /// `ORDER BY` clause body for this ordering. `rowid` breaks ties so pages
    /// stay stable when timestamps collide.
    #[must_use]
    pub const fn order_by(self) -> &'static str {
        match self {
            Self::Latest => "created_at DESC, rowid DESC",
            Self::Oldest => "created_at ASC, rowid ASC",
            Self::Score => "score DESC, created_at DESC, rowid DESC",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Latest => "latest",
            Self::Oldest => "oldest",
            Self::Score => "score",
        }
    }
}

impl fmt::Display for ListSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ListSort {
    type Err = CoreError;

    /// Unknown values fall back to `latest`, matching the listing endpoints'
    /// default branch. Only an empty string is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" => Err(CoreError::Validation("empty sort order".into())),
            "oldest" => Ok(Self::Oldest),
            "score" | "upvotes" => Ok(Self::Score),
            _ => Ok(Self::Latest),
        }
    }
}
