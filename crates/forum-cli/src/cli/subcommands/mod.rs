mod answer;
mod question;
mod user;

pub use answer::AnswerCommands;
pub use question::QuestionCommands;
pub use user::UserCommands;
