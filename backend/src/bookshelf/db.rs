//! Bookshelf database operations
//!
//! Queries for books, authors and categories. Book reads always join the
//! author and category rows.

use crate::bookshelf::models::{Book, BookRow, Reference, ReferenceKind};
use crate::database::Database;
use crate::error::AppError;
use sqlx::{Executor, Sqlite, SqliteConnection};
use tracing::debug;

const BOOK_SELECT: &str = "SELECT b.id, b.title, b.year_published, b.cover, \
     a.id AS author_id, a.name AS author_name, \
     c.id AS category_id, c.name AS category_name \
     FROM books b \
     JOIN authors a ON a.id = b.author_id \
     JOIN categories c ON c.id = b.category_id";

/// Fetch one book with its references
pub(crate) async fn fetch_book<'e, E>(executor: E, id: i64) -> Result<Option<Book>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query_as::<_, BookRow>(&format!("{} WHERE b.id = ?", BOOK_SELECT))
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(row.map(Book::from))
}

/// Insert a book row pointing at already resolved references
pub(crate) async fn insert_book(
    conn: &mut SqliteConnection,
    title: &str,
    year_published: i32,
    cover: Option<&str>,
    author_id: i64,
    category_id: i64,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO books (title, year_published, cover, author_id, category_id) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(title)
    .bind(year_published)
    .bind(cover)
    .bind(author_id)
    .bind(category_id)
    .execute(conn)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Overwrite every column of a book row
pub(crate) async fn store_book(conn: &mut SqliteConnection, book: &Book) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE books SET title = ?, year_published = ?, cover = ?, author_id = ?, category_id = ? WHERE id = ?",
    )
    .bind(&book.title)
    .bind(book.year_published)
    .bind(&book.cover)
    .bind(book.author.id)
    .bind(book.category.id)
    .bind(book.id)
    .execute(conn)
    .await?;
    Ok(())
}

impl Database {
    /// Get all books ordered by id
    pub async fn list_books(&self) -> Result<Vec<Book>, AppError> {
        let rows = sqlx::query_as::<_, BookRow>(&format!("{} ORDER BY b.id ASC", BOOK_SELECT))
            .fetch_all(self.pool())
            .await?;
        Ok(rows.into_iter().map(Book::from).collect())
    }

    /// Get a book by ID
    pub async fn get_book(&self, id: i64) -> Result<Option<Book>, AppError> {
        Ok(fetch_book(self.pool(), id).await?)
    }

    /// Books that reference the given author or category
    pub async fn books_referencing(
        &self,
        kind: ReferenceKind,
        reference_id: i64,
    ) -> Result<Vec<Book>, AppError> {
        let sql = format!(
            "{} WHERE b.{} = ? ORDER BY b.id ASC",
            BOOK_SELECT,
            kind.book_column()
        );
        let rows = sqlx::query_as::<_, BookRow>(&sql)
            .bind(reference_id)
            .fetch_all(self.pool())
            .await?;
        Ok(rows.into_iter().map(Book::from).collect())
    }

    /// Delete a book, returning whether a row was removed
    pub async fn delete_book(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM books WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;

        debug!("Deleted book: {}", id);
        Ok(result.rows_affected() > 0)
    }

    /// Count rows of an author/category collection
    pub async fn count_references(&self, kind: ReferenceKind) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {}", kind.table()))
            .fetch_one(self.pool())
            .await?;
        Ok(count)
    }

    /// List authors or categories ordered by name
    pub async fn list_references(&self, kind: ReferenceKind) -> Result<Vec<Reference>, AppError> {
        let rows = sqlx::query_as::<_, Reference>(&format!(
            "SELECT id, name FROM {} ORDER BY name ASC, id ASC",
            kind.table()
        ))
        .fetch_all(self.pool())
        .await?;
        Ok(rows)
    }

    /// Get an author or category by ID
    pub async fn get_reference(
        &self,
        kind: ReferenceKind,
        id: i64,
    ) -> Result<Option<Reference>, AppError> {
        let row = sqlx::query_as::<_, Reference>(&format!(
            "SELECT id, name FROM {} WHERE id = ?",
            kind.table()
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await?;
        Ok(row)
    }

    /// Insert an author or category; a duplicate name is a bad request
    pub async fn insert_reference(
        &self,
        kind: ReferenceKind,
        name: &str,
    ) -> Result<Reference, AppError> {
        let result = sqlx::query(&format!("INSERT INTO {} (name) VALUES (?)", kind.table()))
            .bind(name)
            .execute(self.pool())
            .await
            .map_err(|e| AppError::on_unique_violation(e, &duplicate_message(kind, name)))?;

        debug!("Created {}: {}", kind.table(), name);
        Ok(Reference {
            id: result.last_insert_rowid(),
            name: name.to_string(),
        })
    }

    /// Rename an author or category, returning `None` when the id is unknown
    pub async fn rename_reference(
        &self,
        kind: ReferenceKind,
        id: i64,
        name: &str,
    ) -> Result<Option<Reference>, AppError> {
        let result = sqlx::query(&format!("UPDATE {} SET name = ? WHERE id = ?", kind.table()))
            .bind(name)
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(|e| AppError::on_unique_violation(e, &duplicate_message(kind, name)))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Ok(Some(Reference {
            id,
            name: name.to_string(),
        }))
    }

    /// Delete an author or category. Fails while books still reference it.
    pub async fn delete_reference(&self, kind: ReferenceKind, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query(&format!("DELETE FROM {} WHERE id = ?", kind.table()))
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(|e| {
                AppError::on_foreign_key_violation(
                    e,
                    &format!("{} is still referenced by books", kind.label()),
                )
            })?;
        Ok(result.rows_affected() > 0)
    }
}

fn duplicate_message(kind: ReferenceKind, name: &str) -> String {
    format!("{} '{}' already exists", kind.label(), name)
}
