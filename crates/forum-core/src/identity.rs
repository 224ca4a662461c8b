use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The user on whose behalf a request runs.
///
/// Produced by whatever authenticates the caller (config, CLI flag, HTTP
/// middleware) and consumed by the voting engine. Carries no auth logic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct VoterIdentity {
    pub user_id: String,
}

impl VoterIdentity {
    #[must_use]
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }

    /// Build an identity from a possibly empty user id (empty = anonymous).
    #[must_use]
    pub fn from_optional(user_id: Option<&str>) -> Option<Self> {
        user_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(Self::new)
    }
}
