//! User repository: registration and lookup.

use chrono::Utc;

use forum_core::entities::User;
use forum_core::errors::CoreError;
use forum_core::ids::PREFIX_USER;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime};
use crate::retry::is_unique_violation;
use crate::service::ForumService;
use crate::updates::user::UserUpdate;

const SELECT_COLS: &str = "id, name, email, role, created_at";

fn row_to_user(row: &libsql::Row) -> Result<User, DatabaseError> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        role: get_opt_string(row, 3)?,
        created_at: parse_datetime(&row.get::<String>(4)?)?,
    })
}

impl ForumService {
    pub async fn register_user(
        &self,
        name: &str,
        email: &str,
        role: Option<&str>,
    ) -> Result<User, DatabaseError> {
        let name = name.trim();
        let email = email.trim().to_lowercase();
        if name.is_empty() {
            return Err(CoreError::Validation("user name must not be empty".into()).into());
        }
        if !email.contains('@') {
            return Err(CoreError::Validation(format!("'{email}' is not an email address")).into());
        }

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_USER).await?;

        let inserted = self
            .db()
            .execute_write(
                &format!("INSERT INTO users ({SELECT_COLS}) VALUES (?1, ?2, ?3, ?4, ?5)"),
                libsql::params![id.as_str(), name, email.as_str(), role, now.to_rfc3339()],
            )
            .await;

        match inserted {
            Ok(_) => {}
            Err(DatabaseError::LibSql(ref e)) if is_unique_violation(e) => {
                return Err(CoreError::Validation(format!(
                    "email '{email}' is already registered"
                ))
                .into());
            }
            Err(e) => return Err(e),
        }

        tracing::debug!(user_id = %id, "user registered");
        Ok(User {
            id,
            name: name.to_string(),
            email,
            role: role.map(String::from),
            created_at: now,
        })
    }

    pub async fn get_user(&self, id: &str) -> Result<User, DatabaseError> {
        let conn = self.db().read().await;
        let mut rows = conn
            .query(&format!("SELECT {SELECT_COLS} FROM users WHERE id = ?1"), [id])
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_user(&row)
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<User, DatabaseError> {
        let email = email.trim().to_lowercase();
        let conn = self.db().read().await;
        let mut rows = conn
            .query(
                &format!("SELECT {SELECT_COLS} FROM users WHERE email = ?1"),
                [email.as_str()],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_user(&row)
    }

    /// Change a user's name and/or role. Email is fixed at registration.
    pub async fn update_user(
        &self,
        user_id: &str,
        update: UserUpdate,
    ) -> Result<User, DatabaseError> {
        self.require_user(user_id).await?;

        let mut sets = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(name) = update.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(CoreError::Validation("user name must not be empty".into()).into());
            }
            params.push(name.to_string().into());
            sets.push(format!("name = ?{}", params.len()));
        }
        if let Some(role) = update.role {
            params.push(role.trim().to_string().into());
            sets.push(format!("role = ?{}", params.len()));
        }

        if !sets.is_empty() {
            params.push(user_id.into());
            let sql = format!(
                "UPDATE users SET {} WHERE id = ?{}",
                sets.join(", "),
                params.len()
            );
            self.db()
                .execute_write(&sql, libsql::params_from_iter(params))
                .await?;
            tracing::debug!(user_id, "user updated");
        }

        self.get_user(user_id).await
    }

    /// Fail with `CoreError::NotFound` unless the user exists.
    pub(crate) async fn require_user(&self, id: &str) -> Result<(), DatabaseError> {
        let exists = crate::ledger::user_exists(&*self.db().read().await, id).await?;
        if exists {
            Ok(())
        } else {
            Err(CoreError::NotFound {
                entity_type: "user".into(),
                id: id.to_string(),
            }
            .into())
        }
    }
}
