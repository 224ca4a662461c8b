use chrono::Utc;

use forum_core::entities::Answer;
use forum_core::enums::ListSort;
use forum_core::errors::CoreError;
use forum_core::ids::PREFIX_ANSWER;
use forum_core::responses::AnswerPage;
use forum_core::voting::TargetRef;

use crate::error::DatabaseError;
use crate::helpers::{get_count, parse_datetime};
use crate::service::ForumService;
use crate::updates::answer::AnswerUpdate;

const SELECT_COLS: &str =
    "id, question_id, author_id, body, score, legacy_upvotes, created_at, updated_at";

fn row_to_answer(row: &libsql::Row) -> Result<Answer, DatabaseError> {
    Ok(Answer {
        id: row.get(0)?,
        question_id: row.get(1)?,
        author_id: row.get(2)?,
        body: row.get(3)?,
        score: row.get(4)?,
        legacy_upvotes: row.get(5)?,
        created_at: parse_datetime(&row.get::<String>(6)?)?,
        updated_at: parse_datetime(&row.get::<String>(7)?)?,
    })
}

impl ForumService {
    pub async fn post_answer(
        &self,
        author_id: &str,
        question_id: &str,
        body: &str,
    ) -> Result<Answer, DatabaseError> {
        if body.trim().is_empty() {
            return Err(CoreError::Validation("answer body must not be empty".into()).into());
        }
        self.require_user(author_id).await?;
        if !self.target_exists(&TargetRef::question(question_id)).await? {
            return Err(CoreError::NotFound {
                entity_type: "question".into(),
                id: question_id.to_string(),
            }
            .into());
        }

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_ANSWER).await?;

        self.db()
            .execute_write(
                "INSERT INTO answers (id, question_id, author_id, body, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                libsql::params![
                    id.as_str(),
                    question_id,
                    author_id,
                    body,
                    now.to_rfc3339(),
                    now.to_rfc3339()
                ],
            )
            .await?;

        tracing::debug!(answer_id = %id, question_id, author_id, "answer posted");
        Ok(Answer {
            id,
            question_id: question_id.to_string(),
            author_id: author_id.to_string(),
            body: body.to_string(),
            score: 0,
            legacy_upvotes: 0,
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn get_answer(&self, id: &str) -> Result<Answer, DatabaseError> {
        let conn = self.db().read().await;
        let mut rows = conn
            .query(&format!("SELECT {SELECT_COLS} FROM answers WHERE id = ?1"), [id])
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_answer(&row)
    }

    /// Answers for one question. An unknown question yields an empty page.
    pub async fn list_answers(
        &self,
        question_id: &str,
        sort: ListSort,
        limit: u32,
        offset: u32,
    ) -> Result<AnswerPage, DatabaseError> {
        let conn = self.db().read().await;
        let mut rows = conn
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM answers WHERE question_id = ?1
                     ORDER BY {} LIMIT ?2 OFFSET ?3",
                    sort.order_by()
                ),
                libsql::params![question_id, i64::from(limit), i64::from(offset)],
            )
            .await?;

        let mut items = Vec::new();
        while let Some(row) = rows.next().await? {
            items.push(row_to_answer(&row)?);
        }

        let mut rows = conn
            .query(
                "SELECT COUNT(*) FROM answers WHERE question_id = ?1",
                [question_id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;

        Ok(AnswerPage {
            question_id: question_id.to_string(),
            sort,
            offset,
            limit,
            total: get_count(&row, 0)?,
            items,
        })
    }

    pub async fn edit_answer(
        &self,
        user_id: &str,
        answer_id: &str,
        update: AnswerUpdate,
    ) -> Result<Answer, DatabaseError> {
        self.ensure_owner(&TargetRef::answer(answer_id), user_id)
            .await?;

        let Some(body) = update.body else {
            return self.get_answer(answer_id).await;
        };
        if body.trim().is_empty() {
            return Err(CoreError::Validation("answer body must not be empty".into()).into());
        }

        self.db()
            .execute_write(
                "UPDATE answers SET body = ?1, updated_at = ?2 WHERE id = ?3",
                libsql::params![body, Utc::now().to_rfc3339(), answer_id],
            )
            .await?;

        self.get_answer(answer_id).await
    }

    /// Delete an answer and its ledger entries. Only the author may delete.
    pub async fn delete_answer(&self, user_id: &str, answer_id: &str) -> Result<(), DatabaseError> {
        self.ensure_owner(&TargetRef::answer(answer_id), user_id)
            .await?;

        self.db()
            .execute_write("DELETE FROM answers WHERE id = ?1", [answer_id])
            .await?;

        tracing::debug!(answer_id, "answer deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{test_answer, test_question, test_service, test_user};
    use crate::updates::answer::AnswerUpdateBuilder;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn post_answer_roundtrip() {
        let svc = test_service().await;
        let ada = test_user(&svc, "ada").await;
        let q = test_question(&svc, &ada, "Borrowck").await;

        let a = svc
            .post_answer(&ada.id, &q.id, "Use a scope.")
            .await
            .unwrap();
        assert!(a.id.starts_with("ans-"));
        assert_eq!(a.score, 0);
        assert_eq!(svc.get_answer(&a.id).await.unwrap(), a);
    }

    #[tokio::test]
    async fn post_answer_requires_question() {
        let svc = test_service().await;
        let ada = test_user(&svc, "ada").await;

        let result = svc.post_answer(&ada.id, "qst-00000000", "hello").await;
        assert!(matches!(
            result,
            Err(DatabaseError::Core(CoreError::NotFound { ref entity_type, .. }))
                if entity_type == "question"
        ));
    }

    #[tokio::test]
    async fn list_answers_scoped_to_question() {
        let svc = test_service().await;
        let ada = test_user(&svc, "ada").await;
        let q1 = test_question(&svc, &ada, "one").await;
        let q2 = test_question(&svc, &ada, "two").await;
        let first = test_answer(&svc, &ada, &q1).await;
        let second = test_answer(&svc, &ada, &q1).await;
        test_answer(&svc, &ada, &q2).await;

        let page = svc
            .list_answers(&q1.id, ListSort::Oldest, 10, 0)
            .await
            .unwrap();
        assert_eq!(page.total, 2);
        let ids: Vec<_> = page.items.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec![first.id.as_str(), second.id.as_str()]);

        let empty = svc
            .list_answers("qst-00000000", ListSort::Latest, 10, 0)
            .await
            .unwrap();
        assert_eq!(empty.total, 0);
        assert!(empty.items.is_empty());
    }

    #[tokio::test]
    async fn edit_answer_owner_only() {
        let svc = test_service().await;
        let ada = test_user(&svc, "ada").await;
        let bob = test_user(&svc, "bob").await;
        let q = test_question(&svc, &ada, "q").await;
        let a = test_answer(&svc, &bob, &q).await;

        let result = svc
            .edit_answer(&ada.id, &a.id, AnswerUpdateBuilder::new().body("mine now").build())
            .await;
        assert!(matches!(
            result,
            Err(DatabaseError::Core(CoreError::Unauthorized { .. }))
        ));

        let edited = svc
            .edit_answer(&bob.id, &a.id, AnswerUpdateBuilder::new().body("revised").build())
            .await
            .unwrap();
        assert_eq!(edited.body, "revised");

        let unchanged = svc
            .edit_answer(&bob.id, &a.id, AnswerUpdate::default())
            .await
            .unwrap();
        assert_eq!(unchanged.body, "revised");
    }

    #[tokio::test]
    async fn delete_answer_removes_its_votes() {
        let svc = test_service().await;
        let ada = test_user(&svc, "ada").await;
        let bob = test_user(&svc, "bob").await;
        let q = test_question(&svc, &ada, "q").await;
        let a = test_answer(&svc, &bob, &q).await;

        svc.cast_vote(&TargetRef::answer(&a.id), &ada.id, 1)
            .await
            .unwrap();
        svc.cast_vote(&TargetRef::question(&q.id), &bob.id, 1)
            .await
            .unwrap();

        svc.delete_answer(&bob.id, &a.id).await.unwrap();

        assert!(
            svc.list_votes(&TargetRef::answer(&a.id))
                .await
                .unwrap()
                .is_empty()
        );
        assert_eq!(
            svc.list_votes(&TargetRef::question(&q.id))
                .await
                .unwrap()
                .len(),
            1
        );
    }
}
