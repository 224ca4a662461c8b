//! Repository modules implementing forum operations.
//!
//! Each module adds methods to `ForumService` via `impl ForumService` blocks.

pub mod answer;
pub mod question;
pub mod user;
pub mod vote;
