use anyhow::bail;
use schemars::schema_for;

use forum_core::entities::{Answer, Question, User, Vote};
use forum_core::identity::VoterIdentity;
use forum_core::responses::{
    AnswerPage, LedgerReport, LegacyUpvoteResponse, QuestionPage, VoteOutcome,
};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SchemaArgs;
use crate::output::output;

const TYPE_NAMES: &[&str] = &[
    "user",
    "question",
    "answer",
    "vote",
    "vote-outcome",
    "legacy-upvote",
    "ledger-report",
    "question-page",
    "answer-page",
    "identity",
];

/// Handle `forum schema`.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let schema = match args.type_name.as_str() {
        "user" => schema_for!(User),
        "question" => schema_for!(Question),
        "answer" => schema_for!(Answer),
        "vote" => schema_for!(Vote),
        "vote-outcome" => schema_for!(VoteOutcome),
        "legacy-upvote" => schema_for!(LegacyUpvoteResponse),
        "ledger-report" => schema_for!(LedgerReport),
        "question-page" => schema_for!(QuestionPage),
        "answer-page" => schema_for!(AnswerPage),
        "identity" => schema_for!(VoterIdentity),
        other => bail!(
            "unknown schema type '{other}' (expected one of: {})",
            TYPE_NAMES.join(", ")
        ),
    };
    output(&schema, flags.format)
}
