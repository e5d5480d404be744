//! Note API handlers; every route requires a bearer token

use crate::api::extract::{Json, Path};
use crate::api::utils::MessageResponse;
use crate::auth::AuthUser;
use crate::error::AppError;
use crate::notes::{service, CreateNoteRequest, Note, UpdateNoteRequest};
use crate::state::AppState;
use axum::{extract::State, http::StatusCode};

/// GET /notes
pub async fn list_notes(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<Note>>, AppError> {
    Ok(Json(service::list_notes(&state.db, user.id).await?))
}

/// POST /notes
pub async fn create_note(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<CreateNoteRequest>,
) -> Result<(StatusCode, Json<Note>), AppError> {
    let note = service::create_note(&state.db, user.id, request).await?;
    Ok((StatusCode::CREATED, Json(note)))
}

/// GET /notes/:id
pub async fn get_note(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Note>, AppError> {
    Ok(Json(service::get_note(&state.db, user.id, id).await?))
}

/// PATCH /notes/:id
pub async fn update_note(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(request): Json<UpdateNoteRequest>,
) -> Result<Json<Note>, AppError> {
    Ok(Json(
        service::update_note(&state.db, user.id, id, request).await?,
    ))
}

/// DELETE /notes/:id
pub async fn delete_note(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    service::delete_note(&state.db, user.id, id).await?;
    Ok(Json(MessageResponse::new("Note deleted successfully")))
}
