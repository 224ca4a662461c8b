//! Cross-cutting error types for the forum backend.
//!
//! Domain-specific errors (`DatabaseError`, `VoteError`) are defined in
//! `forum-db`. The CLI converges everything into `anyhow`.

use thiserror::Error;

/// Errors that can be raised by any forum crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// The acting user is not allowed to modify the entity.
    #[error("Unauthorized: {user_id} does not own {entity_type} {id}")]
    Unauthorized {
        entity_type: String,
        id: String,
        user_id: String,
    },

    /// A vote polarity other than +1 or -1 was requested.
    #[error("Invalid polarity {0}: expected +1 or -1")]
    InvalidPolarity(i64),

    /// Data failed validation (format, constraints).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
