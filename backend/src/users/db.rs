//! User database operations

use crate::database::Database;
use crate::error::AppError;
use crate::users::models::{Role, UserRecord};
use chrono::Utc;
use tracing::debug;

const USER_COLUMNS: &str = "SELECT id, username, email, password_hash, role, created_at FROM users";

/// Columns written on insert and update
#[derive(Debug, Clone)]
pub struct UserFields {
    /// Login name
    pub username: String,
    /// Optional email
    pub email: Option<String>,
    /// bcrypt hash
    pub password_hash: String,
    /// Role
    pub role: Role,
}

impl From<&UserRecord> for UserFields {
    fn from(record: &UserRecord) -> Self {
        Self {
            username: record.username.clone(),
            email: record.email.clone(),
            password_hash: record.password_hash.clone(),
            role: record.role,
        }
    }
}

/// Turn a unique violation on `users` into a client-facing message
fn conflict(err: sqlx::Error) -> AppError {
    let on_email = err
        .as_database_error()
        .map(|db| db.is_unique_violation() && db.message().contains("users.email"))
        .unwrap_or(false);
    if on_email {
        AppError::BadRequest("Email already registered".to_string())
    } else {
        AppError::on_unique_violation(err, "Username already taken")
    }
}

impl Database {
    /// Insert a user
    pub async fn insert_user(&self, fields: &UserFields) -> Result<UserRecord, AppError> {
        let result = sqlx::query(
            "INSERT INTO users (username, email, password_hash, role, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&fields.username)
        .bind(&fields.email)
        .bind(&fields.password_hash)
        .bind(fields.role)
        .bind(Utc::now())
        .execute(self.pool())
        .await
        .map_err(conflict)?;

        let id = result.last_insert_rowid();
        debug!("Created user: {}", id);
        self.get_user(id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("User not found after creation")))
    }

    /// Get a user by ID
    pub async fn get_user(&self, id: i64) -> Result<Option<UserRecord>, AppError> {
        let user = sqlx::query_as::<_, UserRecord>(&format!("{} WHERE id = ?", USER_COLUMNS))
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(user)
    }

    /// Get a user by login name
    pub async fn find_user_by_username(&self, username: &str) -> Result<Option<UserRecord>, AppError> {
        let user = sqlx::query_as::<_, UserRecord>(&format!("{} WHERE username = ?", USER_COLUMNS))
            .bind(username)
            .fetch_optional(self.pool())
            .await?;
        Ok(user)
    }

    /// All users ordered by id
    pub async fn list_users(&self) -> Result<Vec<UserRecord>, AppError> {
        let users = sqlx::query_as::<_, UserRecord>(&format!("{} ORDER BY id ASC", USER_COLUMNS))
            .fetch_all(self.pool())
            .await?;
        Ok(users)
    }

    /// Overwrite a user's fields
    pub async fn update_user(&self, id: i64, fields: &UserFields) -> Result<Option<UserRecord>, AppError> {
        let result = sqlx::query(
            "UPDATE users SET username = ?, email = ?, password_hash = ?, role = ? WHERE id = ?",
        )
        .bind(&fields.username)
        .bind(&fields.email)
        .bind(&fields.password_hash)
        .bind(fields.role)
        .bind(id)
        .execute(self.pool())
        .await
        .map_err(conflict)?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_user(id).await
    }

    /// Delete a user; notes, posts and comments cascade
    pub async fn delete_user(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
