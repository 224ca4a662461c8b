//! ID prefix constants.
//!
//! Every entity ID is `{prefix}-{8 hex chars}`, e.g. `"qst-a3f8b2c1"`. The random
//! part is generated by the store (see `ForumDb::generate_id`).

pub const PREFIX_USER: &str = "usr";
pub const PREFIX_QUESTION: &str = "qst";
pub const PREFIX_ANSWER: &str = "ans";
pub const PREFIX_VOTE: &str = "vot";

/// All prefixes, for exhaustive tests.
pub const ALL_PREFIXES: &[&str] = &[PREFIX_USER, PREFIX_QUESTION, PREFIX_ANSWER, PREFIX_VOTE];
