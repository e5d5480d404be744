//! Post and comment handlers

use crate::api::extract::{Json, Path, Query};
use crate::api::utils::MessageResponse;
use crate::auth::AuthUser;
use crate::blog::{
    service, Comment, CommentRequest, CreatePostRequest, PageQuery, Paginated, Post, PostDetail,
    UpdatePostRequest,
};
use crate::error::AppError;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode};

/// GET /posts?page=&limit=
pub async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Paginated<Post>>, AppError> {
    Ok(Json(service::list_posts(&state.db, query).await?))
}

/// POST /posts
pub async fn create_post(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<Post>), AppError> {
    let post = service::create_post(&state.db, user.id, request).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// GET /posts/:id
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<PostDetail>, AppError> {
    Ok(Json(service::get_post(&state.db, id).await?))
}

/// PATCH /posts/:id
pub async fn update_post(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(request): Json<UpdatePostRequest>,
) -> Result<Json<Post>, AppError> {
    Ok(Json(
        service::update_post(&state.db, user.id, id, request).await?,
    ))
}

/// DELETE /posts/:id
pub async fn delete_post(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    service::delete_post(&state.db, user.id, id).await?;
    Ok(Json(MessageResponse::new("Post successfully deleted")))
}

/// GET /posts/:postId/comments
pub async fn list_comments(
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
) -> Result<Json<Vec<Comment>>, AppError> {
    Ok(Json(service::list_comments(&state.db, post_id).await?))
}

/// POST /posts/:postId/comments
pub async fn create_comment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(post_id): Path<i64>,
    Json(request): Json<CommentRequest>,
) -> Result<(StatusCode, Json<Comment>), AppError> {
    let comment = service::create_comment(&state.db, user.id, post_id, request).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// PATCH /posts/:postId/comments/:id
pub async fn update_comment(
    State(state): State<AppState>,
    user: AuthUser,
    Path((post_id, id)): Path<(i64, i64)>,
    Json(request): Json<CommentRequest>,
) -> Result<Json<Comment>, AppError> {
    Ok(Json(
        service::update_comment(&state.db, user.id, post_id, id, request).await?,
    ))
}

/// DELETE /posts/:postId/comments/:id
pub async fn delete_comment(
    State(state): State<AppState>,
    user: AuthUser,
    Path((post_id, id)): Path<(i64, i64)>,
) -> Result<Json<MessageResponse>, AppError> {
    service::delete_comment(&state.db, user.id, post_id, id).await?;
    Ok(Json(MessageResponse::new("Comment successfully deleted")))
}
