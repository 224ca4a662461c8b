//! Acting-user configuration.
//!
//! Authentication itself lives outside this backend; whoever fronts it
//! resolves the caller and hands over a user ID here (or via `--as`).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuthConfig {
    /// User ID votes and edits are attributed to. Empty = anonymous.
    #[serde(default)]
    pub user_id: String,
}

impl AuthConfig {
    pub fn is_configured(&self) -> bool {
        !self.user_id.trim().is_empty()
    }
}
