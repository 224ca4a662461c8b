//! Response types returned as JSON by `forum` commands.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{Answer, Question};
use crate::enums::{ListSort, VoteState};
use crate::voting::{TargetRef, VoteAction};

/// Response from `forum question vote` / `forum answer vote`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct VoteOutcome {
    pub target: TargetRef,
    pub voter_id: String,
    pub previous: VoteState,
    pub action: VoteAction,
    pub state: VoteState,
    pub delta: i64,
    /// Score after the transition committed.
    pub score: i64,
}

/// Response from `forum question upvote` / `forum answer upvote`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct LegacyUpvoteResponse {
    pub target: TargetRef,
    pub score: i64,
}

/// Response from `forum verify`: score versus the ledger it is derived from.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct LedgerReport {
    pub target: TargetRef,
    pub score: i64,
    pub ledger_sum: i64,
    pub legacy_upvotes: i64,
    pub entries: u32,
    pub consistent: bool,
}

/// One page of questions.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct QuestionPage {
    pub sort: ListSort,
    pub offset: u32,
    pub limit: u32,
    pub total: u32,
    pub items: Vec<Question>,
}

/// One page of answers for a question.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AnswerPage {
    pub question_id: String,
    pub sort: ListSort,
    pub offset: u32,
    pub limit: u32,
    pub total: u32,
    pub items: Vec<Answer>,
}
