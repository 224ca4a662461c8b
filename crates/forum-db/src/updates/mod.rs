//! Update builder types for entity edits.
//!
//! Each builder produces an update struct with `Option` fields. Only `Some`
//! fields generate SET clauses in the dynamic UPDATE SQL.

pub mod answer;
pub mod question;
pub mod user;
