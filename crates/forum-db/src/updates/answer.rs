//! Answer update builder.

use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct AnswerUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

pub struct AnswerUpdateBuilder(AnswerUpdate);

impl AnswerUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(AnswerUpdate::default())
    }

    #[must_use]
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.0.body = Some(body.into());
        self
    }

    #[must_use]
    pub fn build(self) -> AnswerUpdate {
        self.0
    }
}

impl Default for AnswerUpdateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
