use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A question asked by a user. Votable.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Question {
    pub id: String,
    pub author_id: String,
    pub title: String,
    pub body: String,
    /// Denormalized sum of ledger polarities plus legacy increments.
    pub score: i64,
    /// Increments applied through the untracked legacy upvote path.
    pub legacy_upvotes: i64,
    pub answer_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
