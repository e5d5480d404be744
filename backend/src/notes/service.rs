//! Note use-cases; every operation is scoped to the requesting user

use crate::auth::{ensure_owner, Action};
use crate::database::Database;
use crate::error::AppError;
use crate::notes::models::{CreateNoteRequest, Note, UpdateNoteRequest, MAX_TITLE_LENGTH};
use tracing::info;

fn validate_title(title: &str) -> Result<String, AppError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::BadRequest("title should not be empty".to_string()));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(AppError::BadRequest(format!(
            "title must be shorter than or equal to {} characters",
            MAX_TITLE_LENGTH
        )));
    }
    Ok(title.to_string())
}

fn normalize_content(content: Option<String>) -> Option<String> {
    content.filter(|c| !c.trim().is_empty())
}

async fn find_note(db: &Database, id: i64) -> Result<Note, AppError> {
    db.get_note(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Note with ID {} not found", id)))
}

/// The requester's notes
pub async fn list_notes(db: &Database, user_id: i64) -> Result<Vec<Note>, AppError> {
    db.list_notes(user_id).await
}

/// Create a note owned by `user_id`
pub async fn create_note(
    db: &Database,
    user_id: i64,
    request: CreateNoteRequest,
) -> Result<Note, AppError> {
    let title = validate_title(&request.title)?;
    let content = normalize_content(request.content);
    let note = db.insert_note(user_id, &title, content.as_deref()).await?;
    info!(note_id = note.id, user_id, "Created note");
    Ok(note)
}

/// Get one of the requester's notes
pub async fn get_note(db: &Database, user_id: i64, id: i64) -> Result<Note, AppError> {
    let note = find_note(db, id).await?;
    ensure_owner(&note, user_id, Action::View)?;
    Ok(note)
}

/// Partially update one of the requester's notes
pub async fn update_note(
    db: &Database,
    user_id: i64,
    id: i64,
    request: UpdateNoteRequest,
) -> Result<Note, AppError> {
    let note = find_note(db, id).await?;
    ensure_owner(&note, user_id, Action::Update)?;

    let title = match request.title {
        Some(title) => validate_title(&title)?,
        None => note.title,
    };
    let content = match request.content {
        Some(content) => normalize_content(Some(content)),
        None => note.content,
    };

    db.update_note(id, &title, content.as_deref())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Note with ID {} not found", id)))
}

/// Delete one of the requester's notes
pub async fn delete_note(db: &Database, user_id: i64, id: i64) -> Result<(), AppError> {
    let note = find_note(db, id).await?;
    ensure_owner(&note, user_id, Action::Delete)?;
    db.delete_note(id).await?;
    info!(note_id = id, user_id, "Deleted note");
    Ok(())
}
