//! Task API handlers

use crate::api::extract::{Json, Path, Query};
use crate::error::AppError;
use crate::state::AppState;
use crate::tasks::{service, CreateTaskRequest, Task, TaskFilter, TaskStats, UpdateTaskRequest};
use axum::{extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

/// Query string of `GET /tasks/by-date`
#[derive(Debug, Deserialize)]
pub struct DateQuery {
    /// `YYYY-MM-DD`
    pub date: Option<String>,
}

/// Body of `GET /tasks/health`
#[derive(Debug, Serialize)]
pub struct TaskHealthResponse {
    /// Always `ok`
    pub status: String,
    /// Current time
    pub timestamp: String,
    /// Service name
    pub service: String,
    /// Crate version
    pub version: String,
}

/// GET /tasks
pub async fn list_tasks(
    State(state): State<AppState>,
    Query(filter): Query<TaskFilter>,
) -> Result<Json<Vec<Task>>, AppError> {
    Ok(Json(service::list_tasks(&state.db, filter).await?))
}

/// POST /tasks
pub async fn create_task(
    State(state): State<AppState>,
    Json(request): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<Task>), AppError> {
    let task = service::create_task(&state.db, request).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// GET /tasks/:id
pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Task>, AppError> {
    Ok(Json(service::get_task(&state.db, id).await?))
}

/// PATCH /tasks/:id
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateTaskRequest>,
) -> Result<Json<Task>, AppError> {
    Ok(Json(service::update_task(&state.db, id, request).await?))
}

/// DELETE /tasks/:id
pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    service::delete_task(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /tasks/active
pub async fn active_tasks(State(state): State<AppState>) -> Result<Json<Vec<Task>>, AppError> {
    Ok(Json(service::active_tasks(&state.db).await?))
}

/// GET /tasks/completed
pub async fn completed_tasks(State(state): State<AppState>) -> Result<Json<Vec<Task>>, AppError> {
    Ok(Json(service::completed_tasks(&state.db).await?))
}

/// GET /tasks/by-date?date=
pub async fn tasks_by_date(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> Result<Json<Vec<Task>>, AppError> {
    Ok(Json(
        service::tasks_by_date(&state.db, query.date.as_deref()).await?,
    ))
}

/// GET /tasks/by-priority/:priority
pub async fn tasks_by_priority(
    State(state): State<AppState>,
    Path(priority): Path<String>,
) -> Result<Json<Vec<Task>>, AppError> {
    Ok(Json(service::tasks_by_priority(&state.db, &priority).await?))
}

/// GET /tasks/stats
pub async fn task_stats(State(state): State<AppState>) -> Result<Json<TaskStats>, AppError> {
    Ok(Json(service::task_stats(&state.db).await?))
}

/// GET /tasks/health
pub async fn task_health() -> Json<TaskHealthResponse> {
    Json(TaskHealthResponse {
        status: "ok".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        service: "tasks".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
