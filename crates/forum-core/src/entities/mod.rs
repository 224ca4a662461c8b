//! Entity structs for all forum domain objects.
//!
//! Each entity maps to a table in the libSQL database (see
//! `forum-db/migrations/001_initial.sql`). All structs derive `Serialize`,
//! `Deserialize`, and `JsonSchema` for JSON output and schema export.

mod answer;
mod question;
mod user;
mod vote;

pub use answer::Answer;
pub use question::Question;
pub use user::User;
pub use vote::Vote;
