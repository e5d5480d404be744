//! Post and comment queries
//!
//! Reads always join the author's username. Writes that follow an ownership
//! check take a connection so they can share the caller's transaction.

use crate::blog::models::{Comment, CommentRow, Post, PostRow};
use crate::database::Database;
use crate::error::AppError;
use chrono::Utc;
use sqlx::{Executor, Sqlite, SqliteConnection};

const POST_SELECT: &str = "SELECT p.id, p.title, p.content, p.author_id, u.username AS author_username, \
     p.created_at, p.updated_at \
     FROM posts p JOIN users u ON u.id = p.author_id";

const COMMENT_SELECT: &str = "SELECT c.id, c.content, c.post_id, c.author_id, u.username AS author_username, \
     c.created_at \
     FROM comments c JOIN users u ON u.id = c.author_id";

/// Fetch one post
pub(crate) async fn fetch_post<'e, E>(executor: E, id: i64) -> Result<Option<Post>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query_as::<_, PostRow>(&format!("{} WHERE p.id = ?", POST_SELECT))
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(row.map(Post::from))
}

/// Fetch one comment
pub(crate) async fn fetch_comment<'e, E>(executor: E, id: i64) -> Result<Option<Comment>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query_as::<_, CommentRow>(&format!("{} WHERE c.id = ?", COMMENT_SELECT))
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(row.map(Comment::from))
}

/// Overwrite title and content, bumping `updated_at`
pub(crate) async fn store_post(
    conn: &mut SqliteConnection,
    id: i64,
    title: &str,
    content: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE posts SET title = ?, content = ?, updated_at = ? WHERE id = ?")
        .bind(title)
        .bind(content)
        .bind(Utc::now())
        .bind(id)
        .execute(conn)
        .await?;
    Ok(())
}

/// Delete a post; its comments cascade
pub(crate) async fn remove_post(conn: &mut SqliteConnection, id: i64) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM posts WHERE id = ?")
        .bind(id)
        .execute(conn)
        .await?;
    Ok(())
}

/// Overwrite a comment's content
pub(crate) async fn store_comment(
    conn: &mut SqliteConnection,
    id: i64,
    content: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE comments SET content = ? WHERE id = ?")
        .bind(content)
        .bind(id)
        .execute(conn)
        .await?;
    Ok(())
}

/// Delete a comment
pub(crate) async fn remove_comment(conn: &mut SqliteConnection, id: i64) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM comments WHERE id = ?")
        .bind(id)
        .execute(conn)
        .await?;
    Ok(())
}

impl Database {
    /// One page of posts, newest first
    pub async fn list_posts(&self, offset: i64, limit: i64) -> Result<Vec<Post>, AppError> {
        let rows = sqlx::query_as::<_, PostRow>(&format!(
            "{} ORDER BY p.created_at DESC, p.id DESC LIMIT ? OFFSET ?",
            POST_SELECT
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool())
        .await?;
        Ok(rows.into_iter().map(Post::from).collect())
    }

    /// Number of posts
    pub async fn count_posts(&self) -> Result<i64, AppError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM posts")
            .fetch_one(self.pool())
            .await?;
        Ok(count)
    }

    /// Get a post by ID
    pub async fn get_post(&self, id: i64) -> Result<Option<Post>, AppError> {
        Ok(fetch_post(self.pool(), id).await?)
    }

    /// Insert a post
    pub async fn insert_post(&self, author_id: i64, title: &str, content: &str) -> Result<Post, AppError> {
        let now = Utc::now();
        let result = sqlx::query(
            "INSERT INTO posts (title, content, author_id, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(title)
        .bind(content)
        .bind(author_id)
        .bind(now)
        .bind(now)
        .execute(self.pool())
        .await?;

        let id = result.last_insert_rowid();
        tracing::debug!("Created post: {}", id);
        self.get_post(id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Post not found after creation")))
    }

    /// Comments on a post, newest first
    pub async fn list_comments(&self, post_id: i64) -> Result<Vec<Comment>, AppError> {
        let rows = sqlx::query_as::<_, CommentRow>(&format!(
            "{} WHERE c.post_id = ? ORDER BY c.created_at DESC, c.id DESC",
            COMMENT_SELECT
        ))
        .bind(post_id)
        .fetch_all(self.pool())
        .await?;
        Ok(rows.into_iter().map(Comment::from).collect())
    }

    /// Get a comment by ID
    pub async fn get_comment(&self, id: i64) -> Result<Option<Comment>, AppError> {
        Ok(fetch_comment(self.pool(), id).await?)
    }

    /// Insert a comment
    pub async fn insert_comment(&self, post_id: i64, author_id: i64, content: &str) -> Result<Comment, AppError> {
        let result = sqlx::query(
            "INSERT INTO comments (content, post_id, author_id, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(content)
        .bind(post_id)
        .bind(author_id)
        .bind(Utc::now())
        .execute(self.pool())
        .await?;

        let id = result.last_insert_rowid();
        self.get_comment(id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Comment not found after creation")))
    }
}
