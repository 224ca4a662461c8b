use clap::Subcommand;
use forum_core::enums::ListSort;

/// Answer commands.
#[derive(Clone, Debug, Subcommand)]
pub enum AnswerCommands {
    /// Answer a question as the acting user.
    Post {
        question_id: String,
        #[arg(long)]
        body: String,
    },
    /// Get an answer by ID.
    Get { id: String },
    /// List answers to a question.
    List {
        question_id: String,
        /// latest, oldest, or score
        #[arg(long, default_value = "latest")]
        sort: ListSort,
        #[arg(long, default_value_t = 0)]
        offset: u32,
    },
    /// Edit an answer you posted.
    Edit {
        id: String,
        #[arg(long)]
        body: Option<String>,
    },
    /// Delete an answer you posted, with its votes.
    Delete { id: String },
    /// Cast +1 or -1. Repeating your current vote removes it.
    Vote {
        id: String,
        #[arg(allow_negative_numbers = true)]
        polarity: i64,
    },
    /// Untracked +1 (legacy endpoint).
    Upvote { id: String },
    /// List the votes recorded on an answer.
    Votes { id: String },
}
