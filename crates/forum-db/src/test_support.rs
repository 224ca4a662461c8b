//! Shared test utilities for forum-db unit tests.

pub(crate) mod helpers {
    use forum_core::entities::{Answer, Question, User};

    use crate::ForumDb;
    use crate::service::ForumService;

    /// Create an in-memory ForumService.
    pub async fn test_service() -> ForumService {
        let db = ForumDb::open_local(":memory:").await.unwrap();
        ForumService::from_db(db)
    }

    /// Register a user whose email is derived from `name`.
    pub async fn test_user(svc: &ForumService, name: &str) -> User {
        svc.register_user(name, &format!("{name}@campus.test"), Some("student"))
            .await
            .unwrap()
    }

    /// Ask a question as `author`.
    pub async fn test_question(svc: &ForumService, author: &User, title: &str) -> Question {
        svc.ask_question(&author.id, title, "body")
            .await
            .unwrap()
    }

    /// Post an answer as `author`.
    pub async fn test_answer(svc: &ForumService, author: &User, question: &Question) -> Answer {
        svc.post_answer(&author.id, &question.id, "an answer")
            .await
            .unwrap()
    }
}
