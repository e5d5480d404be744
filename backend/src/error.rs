//! Error types and error handling for the application
//!
//! This module defines custom error types that can be converted to HTTP responses.
//! All errors implement `IntoResponse` to provide consistent error formatting;
//! the request path and method are added by the error boundary middleware in
//! [`crate::app`].

use axum::{
    extract::multipart::{MultipartError, MultipartRejection},
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error types
///
/// Each variant maps to exactly one HTTP status code.
#[derive(Error, Debug)]
pub enum AppError {
    /// Referenced entity does not exist
    #[error("{0}")]
    NotFound(String),

    /// Validation failure, malformed input or duplicate unique field
    #[error("{0}")]
    BadRequest(String),

    /// Missing or invalid credentials
    #[error("{0}")]
    Unauthorized(String),

    /// Requester is not allowed to touch the resource
    #[error("{0}")]
    Forbidden(String),

    /// Datastore failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A third-party service failed; the message is shown to the client
    #[error("{0}")]
    Upstream(String),

    /// Internal server error (catch-all for unexpected errors)
    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Status and client-facing message of an error response.
///
/// Attached to the response extensions so the error boundary can rebuild the
/// body with request context.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    /// HTTP status of the response
    pub status: StatusCode,
    /// Message shown to the client
    pub message: String,
    /// Full error text for the log (may include datastore detail)
    pub detail: String,
}

impl AppError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Database(_) | AppError::Upstream(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message safe to send to the client
    pub fn public_message(&self) -> String {
        match self {
            AppError::Database(_) | AppError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }

    /// Map a unique-constraint violation to `BadRequest(message)`, keeping
    /// any other datastore error as is.
    pub fn on_unique_violation(err: sqlx::Error, message: &str) -> Self {
        let unique = err
            .as_database_error()
            .map(|db| db.is_unique_violation())
            .unwrap_or(false);
        if unique {
            AppError::BadRequest(message.to_string())
        } else {
            AppError::Database(err)
        }
    }

    /// Map a foreign-key violation to `BadRequest(message)`
    pub fn on_foreign_key_violation(err: sqlx::Error, message: &str) -> Self {
        let fk = err
            .as_database_error()
            .map(|db| db.is_foreign_key_violation())
            .unwrap_or(false);
        if fk {
            AppError::BadRequest(message.to_string())
        } else {
            AppError::Database(err)
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let report = ErrorReport {
            status,
            message: self.public_message(),
            detail: self.to_string(),
        };

        let body = Json(json!({
            "statusCode": status.as_u16(),
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "message": report.message,
            "error": status.canonical_reason().unwrap_or("Error"),
        }));

        let mut response = (status, body).into_response();
        response.extensions_mut().insert(report);
        response
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(format!("Invalid ID format: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<MultipartRejection> for AppError {
    fn from(rejection: MultipartRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        AppError::BadRequest(format!("Malformed multipart body: {}", err.body_text()))
    }
}
