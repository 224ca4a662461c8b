//! Question update builder.

use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct QuestionUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl QuestionUpdate {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none() && self.body.is_none()
    }
}

pub struct QuestionUpdateBuilder(QuestionUpdate);

impl QuestionUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(QuestionUpdate::default())
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.0.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.0.body = Some(body.into());
        self
    }

    #[must_use]
    pub fn build(self) -> QuestionUpdate {
        self.0
    }
}

impl Default for QuestionUpdateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
