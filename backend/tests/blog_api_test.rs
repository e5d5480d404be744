//! Integration tests for posts and comments

mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn test_pagination_envelope() {
    let app = TestApp::new().await;
    let (_, token) = app.signup("ada").await;
    for i in 0..12 {
        let (status, _) = app
            .post(
                "/posts",
                Some(&token),
                json!({ "title": format!("Post {}", i), "content": "..." }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, page) = app.get("/posts?page=2&limit=5", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["data"].as_array().unwrap().len(), 5);
    assert_eq!(
        page["meta"],
        json!({ "total": 12, "page": 2, "limit": 5, "totalPages": 3 })
    );

    let (_, first) = app.get("/posts", None).await;
    assert_eq!(first["meta"]["limit"], 10);
    assert_eq!(first["data"][0]["title"], "Post 11");
    assert_eq!(first["data"][0]["author"]["username"], "ada");

    for query in ["page=0", "limit=0", "limit=101", "page=abc"] {
        let (status, _) = app.get(&format!("/posts?{}", query), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", query);
    }
}

#[tokio::test]
async fn test_only_author_deletes_and_comments_cascade() {
    let app = TestApp::new().await;
    let (_, ada) = app.signup("ada").await;
    let (_, bob) = app.signup("bob").await;

    let (_, post) = app
        .post("/posts", Some(&ada), json!({ "title": "Hello", "content": "World" }))
        .await;
    let post_id = post["id"].as_i64().unwrap();

    let (status, comment) = app
        .post(
            &format!("/posts/{}/comments", post_id),
            Some(&bob),
            json!({ "content": "First!" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let comment_id = comment["id"].as_i64().unwrap();

    let (_, detail) = app.get(&format!("/posts/{}", post_id), None).await;
    assert_eq!(detail["comments"][0]["content"], "First!");
    assert_eq!(detail["comments"][0]["author"]["username"], "bob");

    let (status, body) = app.delete(&format!("/posts/{}", post_id), Some(&bob)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "You can only delete your own posts");
    let (status, _) = app.get(&format!("/posts/{}", post_id), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.delete(&format!("/posts/{}", post_id), Some(&ada)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Post successfully deleted");

    let (status, body) = app.get(&format!("/posts/{}/comments", post_id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Post not found");
    assert!(app.state.db.get_comment(comment_id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_comment_ownership_and_scope() {
    let app = TestApp::new().await;
    let (_, ada) = app.signup("ada").await;
    let (_, bob) = app.signup("bob").await;

    let (_, first) = app
        .post("/posts", Some(&ada), json!({ "title": "One", "content": "1" }))
        .await;
    let (_, second) = app
        .post("/posts", Some(&ada), json!({ "title": "Two", "content": "2" }))
        .await;
    let first_id = first["id"].as_i64().unwrap();
    let second_id = second["id"].as_i64().unwrap();

    let (_, comment) = app
        .post(
            &format!("/posts/{}/comments", first_id),
            Some(&bob),
            json!({ "content": "nice" }),
        )
        .await;
    let comment_id = comment["id"].as_i64().unwrap();

    let (status, _) = app
        .patch(
            &format!("/posts/{}/comments/{}", second_id, comment_id),
            Some(&bob),
            json!({ "content": "moved?" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app
        .patch(
            &format!("/posts/{}/comments/{}", first_id, comment_id),
            Some(&ada),
            json!({ "content": "hijack" }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "You can only update your own comments");

    let (status, edited) = app
        .patch(
            &format!("/posts/{}/comments/{}", first_id, comment_id),
            Some(&bob),
            json!({ "content": "very nice" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(edited["content"], "very nice");

    let (status, _) = app
        .post("/posts/999/comments", Some(&bob), json!({ "content": "hello?" }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .post("/posts", None, json!({ "title": "anon", "content": "x" }))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
