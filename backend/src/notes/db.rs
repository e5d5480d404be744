//! Note database operations

use crate::database::Database;
use crate::error::AppError;
use crate::notes::models::Note;
use chrono::Utc;
use tracing::debug;

const NOTE_COLUMNS: &str = "SELECT id, user_id, title, content, created_at, updated_at FROM notes";

impl Database {
    /// Notes of one user, newest first
    pub async fn list_notes(&self, user_id: i64) -> Result<Vec<Note>, AppError> {
        let notes = sqlx::query_as::<_, Note>(&format!(
            "{} WHERE user_id = ? ORDER BY created_at DESC, id DESC",
            NOTE_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(self.pool())
        .await?;
        Ok(notes)
    }

    /// Get a note by ID regardless of owner
    pub async fn get_note(&self, id: i64) -> Result<Option<Note>, AppError> {
        let note = sqlx::query_as::<_, Note>(&format!("{} WHERE id = ?", NOTE_COLUMNS))
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(note)
    }

    /// Insert a note
    pub async fn insert_note(
        &self,
        user_id: i64,
        title: &str,
        content: Option<&str>,
    ) -> Result<Note, AppError> {
        let now = Utc::now();
        let result = sqlx::query(
            "INSERT INTO notes (user_id, title, content, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(title)
        .bind(content)
        .bind(now)
        .bind(now)
        .execute(self.pool())
        .await?;

        let id = result.last_insert_rowid();
        debug!("Created note: {}", id);
        self.get_note(id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Note not found after creation")))
    }

    /// Overwrite title and content, bumping `updated_at`
    pub async fn update_note(
        &self,
        id: i64,
        title: &str,
        content: Option<&str>,
    ) -> Result<Option<Note>, AppError> {
        let result = sqlx::query("UPDATE notes SET title = ?, content = ?, updated_at = ? WHERE id = ?")
            .bind(title)
            .bind(content)
            .bind(Utc::now())
            .bind(id)
            .execute(self.pool())
            .await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_note(id).await
    }

    /// Delete a note
    pub async fn delete_note(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM notes WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
