//! Book, author and category handlers
//!
//! Book create and update take `multipart/form-data` so a cover image can
//! travel with the text fields.

use crate::api::extract::{Json, Path};
use crate::api::utils::MessageResponse;
use crate::bookshelf::{service, Book, BookForm, Reference, ReferenceDetail, ReferenceKind};
use crate::error::AppError;
use crate::state::AppState;
use crate::uploads::CoverUpload;
use axum::extract::multipart::{Multipart, MultipartRejection};
use axum::{extract::State, http::StatusCode};
use serde::Deserialize;
use tracing::debug;

/// Body of author/category create and rename
#[derive(Debug, Deserialize)]
pub struct ReferenceRequest {
    /// Display name
    pub name: String,
}

/// Collect the text fields and the optional cover of a book form
///
/// A file part with neither a file name nor content (an untouched file
/// input) counts as no cover.
async fn read_book_form(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(BookForm, Option<CoverUpload>), AppError> {
    let mut multipart = multipart?;
    let mut form = BookForm::default();
    let mut cover = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "title" => form.title = Some(field.text().await?),
            "authorName" => form.author_name = Some(field.text().await?),
            "categoryName" => form.category_name = Some(field.text().await?),
            "yearPublished" => form.year_published = Some(field.text().await?),
            "cover" => {
                let file_name = field
                    .file_name()
                    .map(str::to_string)
                    .filter(|n| !n.is_empty());
                let data = field.bytes().await?;
                if file_name.is_some() || !data.is_empty() {
                    cover = Some(CoverUpload {
                        file_name,
                        data: data.to_vec(),
                    });
                }
            }
            other => debug!(field = %other, "Ignoring unknown form field"),
        }
    }

    Ok((form, cover))
}

/// GET /books
pub async fn list_books(State(state): State<AppState>) -> Result<Json<Vec<Book>>, AppError> {
    Ok(Json(state.db.list_books().await?))
}

/// POST /books
pub async fn create_book(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<Book>), AppError> {
    let (form, cover) = read_book_form(multipart).await?;
    let input = form.into_new_book()?;
    let book = service::create_book(&state.db, &state.uploads, input, cover).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// GET /books/:id
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Book>, AppError> {
    Ok(Json(service::get_book(&state.db, id).await?))
}

/// PUT /books/:id
pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Book>, AppError> {
    let (form, cover) = read_book_form(multipart).await?;
    let patch = form.into_patch()?;
    let book = service::update_book(&state.db, &state.uploads, id, patch, cover).await?;
    Ok(Json(book))
}

/// DELETE /books/:id
pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    service::delete_book(&state.db, &state.uploads, id).await?;
    Ok(Json(MessageResponse::new("Book deleted successfully")))
}

async fn list(state: &AppState, kind: ReferenceKind) -> Result<Json<Vec<Reference>>, AppError> {
    Ok(Json(state.db.list_references(kind).await?))
}

async fn create(
    state: &AppState,
    kind: ReferenceKind,
    request: ReferenceRequest,
) -> Result<(StatusCode, Json<Reference>), AppError> {
    let reference = service::create_reference(&state.db, kind, &request.name).await?;
    Ok((StatusCode::CREATED, Json(reference)))
}

async fn detail(state: &AppState, kind: ReferenceKind, id: i64) -> Result<Json<ReferenceDetail>, AppError> {
    Ok(Json(service::get_reference_detail(&state.db, kind, id).await?))
}

async fn rename(
    state: &AppState,
    kind: ReferenceKind,
    id: i64,
    request: ReferenceRequest,
) -> Result<Json<Reference>, AppError> {
    Ok(Json(
        service::rename_reference(&state.db, kind, id, &request.name).await?,
    ))
}

async fn remove(state: &AppState, kind: ReferenceKind, id: i64) -> Result<Json<MessageResponse>, AppError> {
    service::delete_reference(&state.db, kind, id).await?;
    Ok(Json(MessageResponse::new(format!(
        "{} deleted successfully",
        kind.label()
    ))))
}

/// GET /authors
pub async fn list_authors(State(state): State<AppState>) -> Result<Json<Vec<Reference>>, AppError> {
    list(&state, ReferenceKind::Author).await
}

/// POST /authors
pub async fn create_author(
    State(state): State<AppState>,
    Json(request): Json<ReferenceRequest>,
) -> Result<(StatusCode, Json<Reference>), AppError> {
    create(&state, ReferenceKind::Author, request).await
}

/// GET /authors/:id
pub async fn get_author(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ReferenceDetail>, AppError> {
    detail(&state, ReferenceKind::Author, id).await
}

/// PUT /authors/:id
pub async fn update_author(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<ReferenceRequest>,
) -> Result<Json<Reference>, AppError> {
    rename(&state, ReferenceKind::Author, id, request).await
}

/// DELETE /authors/:id
pub async fn delete_author(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    remove(&state, ReferenceKind::Author, id).await
}

/// GET /categories
pub async fn list_categories(State(state): State<AppState>) -> Result<Json<Vec<Reference>>, AppError> {
    list(&state, ReferenceKind::Category).await
}

/// POST /categories
pub async fn create_category(
    State(state): State<AppState>,
    Json(request): Json<ReferenceRequest>,
) -> Result<(StatusCode, Json<Reference>), AppError> {
    create(&state, ReferenceKind::Category, request).await
}

/// GET /categories/:id
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ReferenceDetail>, AppError> {
    detail(&state, ReferenceKind::Category, id).await
}

/// PUT /categories/:id
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<ReferenceRequest>,
) -> Result<Json<Reference>, AppError> {
    rename(&state, ReferenceKind::Category, id, request).await
}

/// DELETE /categories/:id
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    remove(&state, ReferenceKind::Category, id).await
}
