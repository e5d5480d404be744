//! Integration tests for the bookshelf routes
//!
//! Books are created through multipart forms; authors and categories are
//! resolved by name behind the scenes.

mod common;

use axum::http::{Method, StatusCode};
use common::{multipart, Part, TestApp};
use serde_json::json;

fn dune_form<'a>() -> Vec<Part<'a>> {
    vec![
        Part::Text("title", "Dune"),
        Part::Text("authorName", "Frank Herbert"),
        Part::Text("categoryName", "Sci-Fi"),
        Part::Text("yearPublished", "1965"),
    ]
}

#[tokio::test]
async fn test_same_names_resolve_to_one_author_and_category() {
    let app = TestApp::new().await;

    for _ in 0..2 {
        let (status, body) = app.send(multipart(Method::POST, "/books", &dune_form())).await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        assert_eq!(body["author"]["name"], "Frank Herbert");
        assert_eq!(body["yearPublished"], 1965);
    }

    let (_, books) = app.get("/books", None).await;
    assert_eq!(books.as_array().unwrap().len(), 2);
    let (_, authors) = app.get("/authors", None).await;
    assert_eq!(authors.as_array().unwrap().len(), 1);
    let (_, categories) = app.get("/categories", None).await;
    assert_eq!(categories.as_array().unwrap().len(), 1);

    let author_id = authors[0]["id"].as_i64().unwrap();
    let (status, detail) = app.get(&format!("/authors/{}", author_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["books"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_cover_upload_is_served_and_removed() {
    let app = TestApp::new().await;
    let png = b"\x89PNG\r\n\x1a\nfake-image";

    let mut parts = dune_form();
    parts.push(Part::File("cover", "dune.PNG", png));
    let (status, book) = app.send(multipart(Method::POST, "/books", &parts)).await;
    assert_eq!(status, StatusCode::CREATED, "{}", book);

    let cover = book["cover"].as_str().unwrap().to_string();
    assert!(cover.starts_with("uploads/"));
    assert!(cover.ends_with(".png"));

    let file_name = cover.trim_start_matches("uploads/");
    let stored = app.state.uploads.dir().join(file_name);
    assert_eq!(std::fs::read(&stored).unwrap(), png);

    let (status, _) = app.get(&format!("/{}", cover), None).await;
    assert_eq!(status, StatusCode::OK);

    let id = book["id"].as_i64().unwrap();
    let (status, _) = app.delete(&format!("/books/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!stored.exists());
}

#[tokio::test]
async fn test_cover_validation() {
    let app = TestApp::new().await;

    let mut parts = dune_form();
    parts.push(Part::File("cover", "notes.txt", b"hello"));
    let (status, body) = app.send(multipart(Method::POST, "/books", &parts)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("Unsupported cover type"));

    let big = vec![0u8; 2048];
    let mut parts = dune_form();
    parts.push(Part::File("cover", "big.jpg", &big));
    let (status, _) = app.send(multipart(Method::POST, "/books", &parts)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, books) = app.get("/books", None).await;
    assert!(books.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_fields_and_bad_year() {
    let app = TestApp::new().await;

    let parts = vec![Part::Text("title", "Dune")];
    let (status, body) = app.send(multipart(Method::POST, "/books", &parts)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "authorName is required");

    let mut parts = dune_form();
    parts[3] = Part::Text("yearPublished", "nineteen");
    let (status, _) = app.send(multipart(Method::POST, "/books", &parts)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_book_form_must_be_multipart() {
    let app = TestApp::new().await;

    let (status, body) = app
        .post("/books", None, json!({"title": "Dune", "authorName": "Frank Herbert"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["path"], "/books");
    assert_eq!(body["error"], "Bad Request");

    let (_, books) = app.get("/books", None).await;
    assert!(books.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_partial_update_keeps_other_fields() {
    let app = TestApp::new().await;
    let (_, book) = app.send(multipart(Method::POST, "/books", &dune_form())).await;
    let id = book["id"].as_i64().unwrap();

    let parts = vec![
        Part::Text("title", ""),
        Part::Text("authorName", "F. Herbert"),
    ];
    let (status, updated) = app
        .send(multipart(Method::PUT, &format!("/books/{}", id), &parts))
        .await;
    assert_eq!(status, StatusCode::OK, "{}", updated);
    assert_eq!(updated["title"], "Dune");
    assert_eq!(updated["author"]["name"], "F. Herbert");
    assert_eq!(updated["category"]["name"], "Sci-Fi");

    // the previous author stays behind as an orphan
    let (_, authors) = app.get("/authors", None).await;
    assert_eq!(authors.as_array().unwrap().len(), 2);

    let (status, body) = app
        .send(multipart(Method::PUT, "/books/999", &parts))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Book with ID 999 not found");
}

#[tokio::test]
async fn test_reference_crud() {
    let app = TestApp::new().await;

    let (status, author) = app.post("/authors", None, json!({ "name": "Ursula K. Le Guin" })).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = author["id"].as_i64().unwrap();

    let (status, body) = app.post("/authors", None, json!({ "name": "Ursula K. Le Guin" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Author 'Ursula K. Le Guin' already exists");

    let (status, renamed) = app
        .put(&format!("/authors/{}", id), None, json!({ "name": "U. K. Le Guin" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(renamed["name"], "U. K. Le Guin");

    let (status, _) = app.delete(&format!("/authors/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.get(&format!("/authors/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_referenced_category_cannot_be_deleted() {
    let app = TestApp::new().await;
    let (_, book) = app.send(multipart(Method::POST, "/books", &dune_form())).await;
    let category_id = book["category"]["id"].as_i64().unwrap();

    let (status, body) = app.delete(&format!("/categories/{}", category_id), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Category is still referenced by books");

    let book_id = book["id"].as_i64().unwrap();
    app.delete(&format!("/books/{}", book_id), None).await;
    let (status, _) = app.delete(&format!("/categories/{}", category_id), None).await;
    assert_eq!(status, StatusCode::OK);
}
