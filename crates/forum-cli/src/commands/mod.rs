pub mod answer;
pub mod dispatch;
pub mod question;
pub mod schema;
pub mod user;
pub mod verify;
mod vote;
