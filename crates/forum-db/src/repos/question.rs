//! Question repository: ask, fetch, list, owner-checked edit and delete.

use chrono::Utc;

use forum_core::entities::Question;
use forum_core::enums::ListSort;
use forum_core::errors::CoreError;
use forum_core::ids::PREFIX_QUESTION;
use forum_core::responses::QuestionPage;
use forum_core::voting::TargetRef;

use crate::error::DatabaseError;
use crate::helpers::{get_count, parse_datetime};
use crate::service::ForumService;
use crate::updates::question::QuestionUpdate;

const SELECT_COLS: &str = "q.id, q.author_id, q.title, q.body, q.score, q.legacy_upvotes, \
     (SELECT COUNT(*) FROM answers a WHERE a.question_id = q.id), q.created_at, q.updated_at";

fn row_to_question(row: &libsql::Row) -> Result<Question, DatabaseError> {
    Ok(Question {
        id: row.get(0)?,
        author_id: row.get(1)?,
        title: row.get(2)?,
        body: row.get(3)?,
        score: row.get(4)?,
        legacy_upvotes: row.get(5)?,
        answer_count: get_count(row, 6)?,
        created_at: parse_datetime(&row.get::<String>(7)?)?,
        updated_at: parse_datetime(&row.get::<String>(8)?)?,
    })
}

impl ForumService {
    /// Create a question with score 0 and no ledger entries.
    pub async fn ask_question(
        &self,
        author_id: &str,
        title: &str,
        body: &str,
    ) -> Result<Question, DatabaseError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(CoreError::Validation("question title must not be empty".into()).into());
        }
        self.require_user(author_id).await?;

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_QUESTION).await?;

        self.db()
            .execute_write(
                "INSERT INTO questions (id, author_id, title, body, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                libsql::params![
                    id.as_str(),
                    author_id,
                    title,
                    body,
                    now.to_rfc3339(),
                    now.to_rfc3339()
                ],
            )
            .await?;

        tracing::debug!(question_id = %id, author_id, "question asked");
        Ok(Question {
            id,
            author_id: author_id.to_string(),
            title: title.to_string(),
            body: body.to_string(),
            score: 0,
            legacy_upvotes: 0,
            answer_count: 0,
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn get_question(&self, id: &str) -> Result<Question, DatabaseError> {
        let conn = self.db().read().await;
        let mut rows = conn
            .query(
                &format!("SELECT {SELECT_COLS} FROM questions q WHERE q.id = ?1"),
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_question(&row)
    }

    pub async fn list_questions(
        &self,
        sort: ListSort,
        limit: u32,
        offset: u32,
    ) -> Result<QuestionPage, DatabaseError> {
        let conn = self.db().read().await;
        let mut rows = conn
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM questions q ORDER BY {} LIMIT ?1 OFFSET ?2",
                    sort.order_by()
                ),
                libsql::params![i64::from(limit), i64::from(offset)],
            )
            .await?;

        let mut items = Vec::new();
        while let Some(row) = rows.next().await? {
            items.push(row_to_question(&row)?);
        }

        let mut rows = conn.query("SELECT COUNT(*) FROM questions", ()).await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        let total = get_count(&row, 0)?;

        Ok(QuestionPage {
            sort,
            offset,
            limit,
            total,
            items,
        })
    }

    /// Edit a question's title and/or body. Only the author may edit.
    /// Scores are not editable here.
    pub async fn edit_question(
        &self,
        user_id: &str,
        question_id: &str,
        update: QuestionUpdate,
    ) -> Result<Question, DatabaseError> {
        self.ensure_owner(&TargetRef::question(question_id), user_id)
            .await?;

        let mut sets = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        let mut idx = 1usize;

        if let Some(ref title) = update.title {
            if title.trim().is_empty() {
                return Err(
                    CoreError::Validation("question title must not be empty".into()).into(),
                );
            }
            sets.push(format!("title = ?{idx}"));
            params.push(title.trim().to_string().into());
            idx += 1;
        }
        if let Some(ref body) = update.body {
            sets.push(format!("body = ?{idx}"));
            params.push(body.clone().into());
            idx += 1;
        }

        if sets.is_empty() {
            return self.get_question(question_id).await;
        }

        sets.push(format!("updated_at = ?{idx}"));
        params.push(Utc::now().to_rfc3339().into());
        idx += 1;

        params.push(question_id.into());
        let sql = format!("UPDATE questions SET {} WHERE id = ?{idx}", sets.join(", "));
        self.db()
            .execute_write(&sql, libsql::params_from_iter(params))
            .await?;

        self.get_question(question_id).await
    }

    /// Delete a question, its answers, and every ledger entry on either.
    /// Only the author may delete.
    pub async fn delete_question(
        &self,
        user_id: &str,
        question_id: &str,
    ) -> Result<(), DatabaseError> {
        self.ensure_owner(&TargetRef::question(question_id), user_id)
            .await?;

        self.db()
            .execute_write("DELETE FROM questions WHERE id = ?1", [question_id])
            .await?;

        tracing::debug!(question_id, "question deleted");
        Ok(())
    }

    /// Owner of a votable target, or `CoreError::NotFound`.
    pub async fn target_owner(&self, target: &TargetRef) -> Result<String, DatabaseError> {
        let conn = self.db().read().await;
        let mut rows = conn
            .query(
                &format!("SELECT author_id FROM {} WHERE id = ?1", target.kind.table()),
                [target.id.as_str()],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(row.get::<String>(0)?),
            None => Err(CoreError::NotFound {
                entity_type: target.kind.to_string(),
                id: target.id.clone(),
            }
            .into()),
        }
    }

    /// Whether a votable target exists.
    pub async fn target_exists(&self, target: &TargetRef) -> Result<bool, DatabaseError> {
        crate::ledger::target_exists(&*self.db().read().await, target).await
    }

    pub(crate) async fn ensure_owner(
        &self,
        target: &TargetRef,
        user_id: &str,
    ) -> Result<(), DatabaseError> {
        let owner = self.target_owner(target).await?;
        if owner == user_id {
            return Ok(());
        }
        Err(CoreError::Unauthorized {
            entity_type: target.kind.to_string(),
            id: target.id.clone(),
            user_id: user_id.to_string(),
        }
        .into())
    }
}
