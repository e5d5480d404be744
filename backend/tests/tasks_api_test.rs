//! Integration tests for the task routes

mod common;

use axum::extract::State;
use axum::http::StatusCode;
use common::TestApp;
use crudhub_backend::api::extract::{Json, Path, Query};
use crudhub_backend::api::tasks::{create_task, delete_task, get_task, list_tasks};
use crudhub_backend::tasks::{CreateTaskRequest, TaskFilter, TaskPriority};
use serde_json::json;

#[tokio::test]
async fn test_handlers_directly() {
    let app = TestApp::new().await;

    let (status, Json(task)) = create_task(
        State(app.state.clone()),
        Json(CreateTaskRequest {
            title: "Write report".into(),
            priority: Some("high".into()),
            ..Default::default()
        }),
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(task.priority, TaskPriority::High);

    let Json(fetched) = get_task(State(app.state.clone()), Path(task.id)).await.unwrap();
    assert_eq!(fetched, task);

    let Json(listed) = list_tasks(State(app.state.clone()), Query(TaskFilter::default()))
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);

    let status = delete_task(State(app.state.clone()), Path(task.id)).await.unwrap();
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(get_task(State(app.state.clone()), Path(task.id)).await.is_err());
}

#[tokio::test]
async fn test_task_lifecycle_over_http() {
    let app = TestApp::new().await;

    let (status, task) = app
        .post(
            "/tasks",
            None,
            json!({ "title": "Pay rent", "date": "2025-06-01", "time": "09:00" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", task);
    assert_eq!(task["priority"], "low");
    assert_eq!(task["completed"], false);
    let id = task["id"].as_i64().unwrap();

    let (status, updated) = app
        .patch(&format!("/tasks/{}", id), None, json!({ "completed": true }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["completed"], true);
    assert_eq!(updated["title"], "Pay rent");

    let (_, by_date) = app.get("/tasks/by-date?date=2025-06-01", None).await;
    assert_eq!(by_date.as_array().unwrap().len(), 1);

    let (_, completed) = app.get("/tasks/completed", None).await;
    assert_eq!(completed.as_array().unwrap().len(), 1);

    let (_, stats) = app.get("/tasks/stats", None).await;
    assert_eq!(stats, json!({ "total": 1, "completed": 1, "active": 0, "completionRate": 100 }));

    let (status, body) = app.delete(&format!("/tasks/{}", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());
}

#[tokio::test]
async fn test_filters_and_validation() {
    let app = TestApp::new().await;
    app.post("/tasks", None, json!({ "title": "a", "priority": "high" })).await;
    app.post("/tasks", None, json!({ "title": "b", "priority": "medium" })).await;
    app.post("/tasks", None, json!({ "title": "c", "priority": "high", "completed": true }))
        .await;

    let (_, open_high) = app.get("/tasks?completed=false&priority=high", None).await;
    let titles: Vec<_> = open_high
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(titles, vec!["a"]);

    let (_, active) = app.get("/tasks/active", None).await;
    assert_eq!(active[0]["title"], "a");
    assert_eq!(active[1]["title"], "b");

    let (_, highs) = app.get("/tasks/by-priority/high", None).await;
    assert_eq!(highs.as_array().unwrap().len(), 2);

    let (status, body) = app.get("/tasks/by-priority/urgent", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid priority: urgent");

    let (status, body) = app.get("/tasks/by-date?date=01-06-2025", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid date format. Use YYYY-MM-DD");

    let (status, body) = app.get("/tasks/404", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Task with ID 404 not found");
}

#[tokio::test]
async fn test_task_health() {
    let app = TestApp::new().await;
    let (status, body) = app.get("/tasks/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "tasks");
}
