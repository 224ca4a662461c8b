use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{Polarity, TargetKind};

/// One voter's current stance on one target (a vote ledger entry).
///
/// At most one exists per `(voter_id, target_kind, target_id)`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Vote {
    pub id: String,
    pub voter_id: String,
    pub target_kind: TargetKind,
    pub target_id: String,
    pub polarity: Polarity,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
