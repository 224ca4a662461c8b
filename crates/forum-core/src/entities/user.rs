use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A registered forum member. Also the voter referenced by ledger entries.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    /// Free-form role label, e.g. `"student"` or `"professor"`.
    pub role: Option<String>,
    pub created_at: DateTime<Utc>,
}
