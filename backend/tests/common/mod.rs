//! Shared helpers for the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use crudhub_backend::app::router;
use crudhub_backend::config::{AuthConfig, Config, UploadConfig};
use crudhub_backend::database::Database;
use crudhub_backend::error::AppError;
use crudhub_backend::state::AppState;
use crudhub_backend::weather::{WeatherProvider, WeatherReport};
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

pub const BOUNDARY: &str = "crudhub-test-boundary";

/// Weather source answering for a single city
pub struct StubWeather;

#[async_trait]
impl WeatherProvider for StubWeather {
    async fn current(&self, city: &str) -> Result<WeatherReport, AppError> {
        if city.eq_ignore_ascii_case("london") {
            Ok(WeatherReport {
                city: "London".into(),
                temperature: 14.2,
                condition: "scattered clouds".into(),
            })
        } else {
            Err(AppError::NotFound("City not found.".into()))
        }
    }
}

/// A fully wired application on a throwaway database and upload dir
pub struct TestApp {
    pub state: AppState,
    pub router: Router,
    // Dropped last so files outlive the pool.
    pub dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            uploads: UploadConfig {
                dir: dir.path().join("uploads"),
                max_bytes: 1024,
            },
            auth: AuthConfig {
                bcrypt_cost: 4,
                ..AuthConfig::default()
            },
            ..Config::default()
        };
        let db_path = dir.path().join("app.db");
        let db = Database::connect(db_path.to_str().unwrap(), 2).await.unwrap();
        let state = AppState::new(db, config, Arc::new(StubWeather));
        let router = router(state.clone());
        Self { state, router, dir }
    }

    /// Send a request and decode the JSON body (Null when empty)
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, body)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(request(Method::GET, uri, token, None)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(request(Method::DELETE, uri, token, None)).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(request(Method::POST, uri, token, Some(body))).await
    }

    pub async fn patch(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(request(Method::PATCH, uri, token, Some(body))).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(request(Method::PUT, uri, token, Some(body))).await
    }

    /// Register `username` and log in, returning (user id, token)
    pub async fn signup(&self, username: &str) -> (i64, String) {
        let (status, body) = self
            .post(
                "/auth/register",
                None,
                json!({ "username": username, "password": "password123" }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        let id = body["user"]["id"].as_i64().unwrap();

        let (status, body) = self
            .post(
                "/auth/login",
                None,
                json!({ "username": username, "password": "password123" }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        (id, body["access_token"].as_str().unwrap().to_string())
    }
}

/// Build a request with an optional bearer token and JSON body
pub fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// A part of a multipart form
pub enum Part<'a> {
    Text(&'a str, &'a str),
    File(&'a str, &'a str, &'a [u8]),
}

/// Build a `multipart/form-data` request
pub fn multipart(method: Method, uri: &str, parts: &[Part<'_>]) -> Request<Body> {
    let mut body: Vec<u8> = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File(name, file_name, data) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n",
                        name, file_name
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(data);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method(method)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}
