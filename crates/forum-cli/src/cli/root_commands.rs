use clap::{Args, Subcommand};
use forum_core::enums::TargetKind;

use crate::cli::subcommands::{AnswerCommands, QuestionCommands, UserCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Users.
    User {
        #[command(subcommand)]
        action: UserCommands,
    },
    /// Questions and votes on them.
    Question {
        #[command(subcommand)]
        action: QuestionCommands,
    },
    /// Answers and votes on them.
    Answer {
        #[command(subcommand)]
        action: AnswerCommands,
    },
    /// Compare a target's score with its vote ledger.
    Verify(VerifyArgs),
    /// Print the JSON schema of a response type.
    Schema(SchemaArgs),
}

#[derive(Clone, Debug, Args)]
pub struct VerifyArgs {
    /// question or answer
    pub kind: TargetKind,
    pub id: String,
}

#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    /// Type name, e.g. `question` or `vote-outcome`.
    pub type_name: String,
}
