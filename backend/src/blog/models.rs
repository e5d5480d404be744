//! Blog data models

use crate::auth::Owned;
use crate::users::UserSummary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Default page size
pub const DEFAULT_PAGE_LIMIT: i64 = 10;
/// Largest accepted page size
pub const MAX_PAGE_LIMIT: i64 = 100;
/// Longest accepted post title
pub const MAX_TITLE_LENGTH: usize = 200;

/// A post with its author
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Unique identifier
    pub id: i64,
    /// Title
    pub title: String,
    /// Body
    pub content: String,
    /// Author id
    pub author_id: i64,
    /// Author
    pub author: UserSummary,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

/// Flat row of a post joined with its author
#[derive(Debug, FromRow)]
pub(crate) struct PostRow {
    id: i64,
    title: String,
    content: String,
    author_id: i64,
    author_username: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            content: row.content,
            author_id: row.author_id,
            author: UserSummary {
                id: row.author_id,
                username: row.author_username,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl Owned for Post {
    const RESOURCE: &'static str = "posts";

    fn owner_id(&self) -> i64 {
        self.author_id
    }
}

/// A comment with its author
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Unique identifier
    pub id: i64,
    /// Body
    pub content: String,
    /// Post the comment belongs to
    pub post_id: i64,
    /// Author id
    pub author_id: i64,
    /// Author
    pub author: UserSummary,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
pub(crate) struct CommentRow {
    id: i64,
    content: String,
    post_id: i64,
    author_id: i64,
    author_username: String,
    created_at: DateTime<Utc>,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Self {
            id: row.id,
            content: row.content,
            post_id: row.post_id,
            author_id: row.author_id,
            author: UserSummary {
                id: row.author_id,
                username: row.author_username,
            },
            created_at: row.created_at,
        }
    }
}

impl Owned for Comment {
    const RESOURCE: &'static str = "comments";

    fn owner_id(&self) -> i64 {
        self.author_id
    }
}

/// A post with its comments, newest comment first
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostDetail {
    /// The post
    #[serde(flatten)]
    pub post: Post,
    /// Its comments
    pub comments: Vec<Comment>,
}

/// Body of `POST /posts`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatePostRequest {
    /// Title
    pub title: String,
    /// Body
    pub content: String,
}

/// Body of `PATCH /posts/:id`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePostRequest {
    /// New title
    pub title: Option<String>,
    /// New body
    pub content: Option<String>,
}

/// Body of comment create and update
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentRequest {
    /// Body
    pub content: String,
}

/// Query string of `GET /posts`
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    /// 1-based page number
    pub page: Option<i64>,
    /// Page size
    pub limit: Option<i64>,
}

/// Pagination metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    /// Number of items across all pages
    pub total: i64,
    /// Current page
    pub page: i64,
    /// Page size
    pub limit: i64,
    /// Number of pages
    pub total_pages: i64,
}

impl PageMeta {
    /// Metadata for `total` items split in pages of `limit`
    pub fn new(total: i64, page: i64, limit: i64) -> Self {
        Self {
            total,
            page,
            limit,
            total_pages: (total + limit - 1) / limit,
        }
    }
}

/// One page of items
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Paginated<T> {
    /// Items on this page
    pub data: Vec<T>,
    /// Pagination metadata
    pub meta: PageMeta,
}
