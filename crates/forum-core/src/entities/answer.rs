use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// An answer posted to a question. Votable.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Answer {
    pub id: String,
    pub question_id: String,
    pub author_id: String,
    pub body: String,
    pub score: i64,
    pub legacy_upvotes: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
