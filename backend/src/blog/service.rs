//! Blog use-cases

use crate::auth::{ensure_owner, Action};
use crate::blog::db::{fetch_comment, fetch_post, remove_comment, remove_post, store_comment, store_post};
use crate::blog::models::{
    Comment, CommentRequest, CreatePostRequest, PageMeta, PageQuery, Paginated, Post, PostDetail,
    UpdatePostRequest, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT, MAX_TITLE_LENGTH,
};
use crate::database::Database;
use crate::error::AppError;
use tracing::info;

fn post_not_found() -> AppError {
    AppError::NotFound("Post not found".to_string())
}

fn comment_not_found() -> AppError {
    AppError::NotFound("Comment not found".to_string())
}

fn required(value: &str, field: &str) -> Result<String, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::BadRequest(format!("{} should not be empty", field)));
    }
    Ok(value.to_string())
}

fn validate_title(title: &str) -> Result<String, AppError> {
    let title = required(title, "title")?;
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(AppError::BadRequest(format!(
            "title must be shorter than or equal to {} characters",
            MAX_TITLE_LENGTH
        )));
    }
    Ok(title)
}

/// Resolve page and limit, rejecting values below 1 or a limit above the max
pub fn page_bounds(query: PageQuery) -> Result<(i64, i64), AppError> {
    let page = query.page.unwrap_or(1);
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_LIMIT);
    if page < 1 {
        return Err(AppError::BadRequest("page must not be less than 1".to_string()));
    }
    if !(1..=MAX_PAGE_LIMIT).contains(&limit) {
        return Err(AppError::BadRequest(format!(
            "limit must be between 1 and {}",
            MAX_PAGE_LIMIT
        )));
    }
    Ok((page, limit))
}

/// One page of posts, newest first
pub async fn list_posts(db: &Database, query: PageQuery) -> Result<Paginated<Post>, AppError> {
    let (page, limit) = page_bounds(query)?;
    let offset = (page - 1).saturating_mul(limit);
    let data = db.list_posts(offset, limit).await?;
    let total = db.count_posts().await?;
    Ok(Paginated {
        data,
        meta: PageMeta::new(total, page, limit),
    })
}

/// Create a post
pub async fn create_post(db: &Database, author_id: i64, request: CreatePostRequest) -> Result<Post, AppError> {
    let title = validate_title(&request.title)?;
    let content = required(&request.content, "content")?;
    let post = db.insert_post(author_id, &title, &content).await?;
    info!(post_id = post.id, author_id, "Created post");
    Ok(post)
}

/// A post with its comments
pub async fn get_post(db: &Database, id: i64) -> Result<PostDetail, AppError> {
    let post = db.get_post(id).await?.ok_or_else(post_not_found)?;
    let comments = db.list_comments(id).await?;
    Ok(PostDetail { post, comments })
}

/// Partially update a post; author only
pub async fn update_post(
    db: &Database,
    requester_id: i64,
    id: i64,
    request: UpdatePostRequest,
) -> Result<Post, AppError> {
    let mut tx = db.begin_immediate().await?;
    let post = fetch_post(&mut *tx, id).await?.ok_or_else(post_not_found)?;
    ensure_owner(&post, requester_id, Action::Update)?;

    let title = match request.title {
        Some(title) => validate_title(&title)?,
        None => post.title,
    };
    let content = match request.content {
        Some(content) => required(&content, "content")?,
        None => post.content,
    };
    store_post(&mut tx, id, &title, &content).await?;
    let updated = fetch_post(&mut *tx, id).await?.ok_or_else(post_not_found)?;
    tx.commit().await?;

    info!(post_id = id, "Updated post");
    Ok(updated)
}

/// Delete a post and its comments; author only
pub async fn delete_post(db: &Database, requester_id: i64, id: i64) -> Result<(), AppError> {
    let mut tx = db.begin_immediate().await?;
    let post = fetch_post(&mut *tx, id).await?.ok_or_else(post_not_found)?;
    ensure_owner(&post, requester_id, Action::Delete)?;
    remove_post(&mut tx, id).await?;
    tx.commit().await?;

    info!(post_id = id, "Deleted post");
    Ok(())
}

/// Comments on an existing post
pub async fn list_comments(db: &Database, post_id: i64) -> Result<Vec<Comment>, AppError> {
    db.get_post(post_id).await?.ok_or_else(post_not_found)?;
    db.list_comments(post_id).await
}

/// Comment on an existing post
pub async fn create_comment(
    db: &Database,
    author_id: i64,
    post_id: i64,
    request: CommentRequest,
) -> Result<Comment, AppError> {
    let content = required(&request.content, "content")?;
    db.get_post(post_id).await?.ok_or_else(post_not_found)?;
    let comment = db.insert_comment(post_id, author_id, &content).await?;
    info!(comment_id = comment.id, post_id, "Created comment");
    Ok(comment)
}

/// Edit a comment on the given post; author only
pub async fn update_comment(
    db: &Database,
    requester_id: i64,
    post_id: i64,
    id: i64,
    request: CommentRequest,
) -> Result<Comment, AppError> {
    let content = required(&request.content, "content")?;

    let mut tx = db.begin_immediate().await?;
    let comment = fetch_comment(&mut *tx, id)
        .await?
        .filter(|c| c.post_id == post_id)
        .ok_or_else(comment_not_found)?;
    ensure_owner(&comment, requester_id, Action::Update)?;
    store_comment(&mut tx, id, &content).await?;
    let updated = fetch_comment(&mut *tx, id).await?.ok_or_else(comment_not_found)?;
    tx.commit().await?;

    Ok(updated)
}

/// Delete a comment on the given post; author only
pub async fn delete_comment(db: &Database, requester_id: i64, post_id: i64, id: i64) -> Result<(), AppError> {
    let mut tx = db.begin_immediate().await?;
    let comment = fetch_comment(&mut *tx, id)
        .await?
        .filter(|c| c.post_id == post_id)
        .ok_or_else(comment_not_found)?;
    ensure_owner(&comment, requester_id, Action::Delete)?;
    remove_comment(&mut tx, id).await?;
    tx.commit().await?;

    info!(comment_id = id, post_id, "Deleted comment");
    Ok(())
}
