//! Router assembly and cross-cutting middleware

use crate::api;
use crate::error::{AppError, ErrorReport};
use crate::state::AppState;
use axum::{
    extract::{DefaultBodyLimit, Request, State},
    http::{HeaderValue, Method, Uri},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::json;
use std::time::Instant;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

/// Room left next to the cover for the text fields of a book form
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

#[derive(Serialize)]
struct HelloResponse {
    message: String,
    status: String,
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    message: String,
}

/// Request ID middleware - adds unique ID to each request for tracing
async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let span = info_span!(
        "request",
        request_id = %request_id,
        method = %method,
        uri = %uri,
    );

    let mut response = next.run(request).instrument(span).await;

    let duration = start.elapsed();
    info!(
        request_id = %request_id,
        method = %method,
        uri = %uri,
        status = %response.status().as_u16(),
        duration_ms = duration.as_millis(),
        "Request completed"
    );

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert("x-request-id", value);
    }
    response
}

/// Rewrite every 4xx/5xx response into the JSON error envelope
///
/// Handler errors carry an [`ErrorReport`]; responses produced elsewhere
/// (panics, body limits, static files) fall back to the status reason.
async fn error_boundary(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let mut response = next.run(request).await;
    let status = response.status();
    if !status.is_client_error() && !status.is_server_error() {
        return response;
    }

    let reason = status.canonical_reason().unwrap_or("Error");
    let (message, detail) = match response.extensions_mut().remove::<ErrorReport>() {
        Some(report) => (report.message, report.detail),
        None if status.is_server_error() => ("Internal server error".to_string(), reason.to_string()),
        None => (reason.to_string(), reason.to_string()),
    };

    if status.is_server_error() {
        error!(status = status.as_u16(), method = %method, path = %path, error = %detail, "Request failed");
    } else {
        warn!(status = status.as_u16(), method = %method, path = %path, error = %detail, "Request rejected");
    }

    let body = Json(json!({
        "statusCode": status.as_u16(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "path": path,
        "method": method.as_str(),
        "message": message,
        "error": reason,
    }));
    (status, body).into_response()
}

async fn not_found(method: Method, uri: Uri) -> AppError {
    AppError::NotFound(format!("Cannot {} {}", method, uri.path()))
}

async fn hello_world() -> Json<HelloResponse> {
    Json(HelloResponse {
        message: "Hello from CRUD Hub!".to_string(),
        status: "ok".to_string(),
    })
}

async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>, AppError> {
    sqlx::query("SELECT 1").execute(state.db.pool()).await?;
    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        message: "Backend is healthy".to_string(),
    }))
}

/// Build the application router with every route and middleware layer
pub fn router(state: AppState) -> Router {
    let body_limit = state.uploads.max_bytes() + FORM_OVERHEAD_BYTES;
    let covers = ServeDir::new(state.uploads.dir());

    Router::new()
        // Health check and hello world
        .route("/", get(hello_world))
        .route("/api/health", get(health_check))
        // Tasks
        .route("/tasks", get(api::tasks::list_tasks).post(api::tasks::create_task))
        .route("/tasks/health", get(api::tasks::task_health))
        .route("/tasks/stats", get(api::tasks::task_stats))
        .route("/tasks/active", get(api::tasks::active_tasks))
        .route("/tasks/completed", get(api::tasks::completed_tasks))
        .route("/tasks/by-date", get(api::tasks::tasks_by_date))
        .route(
            "/tasks/by-priority/:priority",
            get(api::tasks::tasks_by_priority),
        )
        .route(
            "/tasks/:id",
            get(api::tasks::get_task)
                .patch(api::tasks::update_task)
                .delete(api::tasks::delete_task),
        )
        // Notes
        .route("/notes", get(api::notes::list_notes).post(api::notes::create_note))
        .route(
            "/notes/:id",
            get(api::notes::get_note)
                .patch(api::notes::update_note)
                .delete(api::notes::delete_note),
        )
        // Bookshelf
        .route("/books", get(api::books::list_books).post(api::books::create_book))
        .route(
            "/books/:id",
            get(api::books::get_book)
                .put(api::books::update_book)
                .delete(api::books::delete_book),
        )
        .route(
            "/authors",
            get(api::books::list_authors).post(api::books::create_author),
        )
        .route(
            "/authors/:id",
            get(api::books::get_author)
                .put(api::books::update_author)
                .delete(api::books::delete_author),
        )
        .route(
            "/categories",
            get(api::books::list_categories).post(api::books::create_category),
        )
        .route(
            "/categories/:id",
            get(api::books::get_category)
                .put(api::books::update_category)
                .delete(api::books::delete_category),
        )
        // Auth and users
        .route("/auth/register", post(api::auth::register))
        .route("/auth/login", post(api::auth::login))
        .route("/auth/profile", get(api::auth::profile))
        .route("/users", get(api::auth::list_users))
        .route("/users/register", post(api::auth::register))
        .route(
            "/users/:id",
            get(api::auth::get_user)
                .patch(api::auth::update_user)
                .delete(api::auth::delete_user),
        )
        // Blog
        .route("/posts", get(api::blog::list_posts).post(api::blog::create_post))
        .route(
            "/posts/:id",
            get(api::blog::get_post)
                .patch(api::blog::update_post)
                .delete(api::blog::delete_post),
        )
        .route(
            "/posts/:id/comments",
            get(api::blog::list_comments).post(api::blog::create_comment),
        )
        .route(
            "/posts/:id/comments/:comment_id",
            axum::routing::patch(api::blog::update_comment).delete(api::blog::delete_comment),
        )
        // Weather
        .route("/weather", get(api::weather::current_weather))
        .route("/weather/history", get(api::weather::weather_history))
        // Uploaded covers
        .nest_service("/uploads", covers)
        .fallback(not_found)
        // Middleware (innermost first; the boundary must see caught panics)
        .layer(CatchPanicLayer::new())
        .layer(middleware::from_fn(error_boundary))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .layer(CorsLayer::permissive()) // Allow CORS for development
        .with_state(state)
}
