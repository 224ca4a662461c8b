use clap::Subcommand;
use forum_core::enums::ListSort;

/// Question commands.
#[derive(Clone, Debug, Subcommand)]
pub enum QuestionCommands {
    /// Ask a question as the acting user.
    Ask {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        body: String,
    },
    /// Get a question by ID.
    Get { id: String },
    /// List questions.
    List {
        /// latest, oldest, or score
        #[arg(long, default_value = "latest")]
        sort: ListSort,
        #[arg(long, default_value_t = 0)]
        offset: u32,
    },
    /// Edit a question you asked.
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        body: Option<String>,
    },
    /// Delete a question you asked, with its answers and votes.
    Delete { id: String },
    /// Cast +1 or -1. Repeating your current vote removes it.
    Vote {
        id: String,
        #[arg(allow_negative_numbers = true)]
        polarity: i64,
    },
    /// Untracked +1 (legacy endpoint).
    Upvote { id: String },
    /// List the votes recorded on a question.
    Votes { id: String },
}
