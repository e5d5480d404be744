//! Registration, login and account handlers

use crate::api::extract::{Json, Path};
use crate::api::utils::MessageResponse;
use crate::auth::{service as auth_service, AuthUser, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
use crate::error::AppError;
use crate::state::AppState;
use crate::users::{service, UpdateUserRequest, User};
use axum::{extract::State, http::StatusCode};

/// POST /auth/register and POST /users/register
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let response = auth_service::register(&state.db, &state.config.auth, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    Ok(Json(
        auth_service::login(&state.db, &state.config.auth, request).await?,
    ))
}

/// GET /auth/profile
pub async fn profile(State(state): State<AppState>, user: AuthUser) -> Result<Json<User>, AppError> {
    Ok(Json(service::get_user(&state.db, user.id).await?))
}

/// GET /users
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, AppError> {
    Ok(Json(service::list_users(&state.db).await?))
}

/// GET /users/:id
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<User>, AppError> {
    Ok(Json(service::get_user(&state.db, id).await?))
}

/// PATCH /users/:id
pub async fn update_user(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<User>, AppError> {
    Ok(Json(
        service::update_user(&state.db, &state.config.auth, user.id, id, request).await?,
    ))
}

/// DELETE /users/:id
pub async fn delete_user(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    service::delete_user(&state.db, user.id, id).await?;
    Ok(Json(MessageResponse::new("User deleted successfully")))
}
