//! Bookshelf use-cases
//!
//! Book create and update resolve their author and category by name inside
//! the same transaction that writes the book. Authors and categories are
//! never removed as a side effect; rows no longer referenced by any book stay
//! listable and can be deleted explicitly.

use crate::bookshelf::db::{fetch_book, insert_book, store_book};
use crate::bookshelf::models::{Book, BookPatch, NewBook, Reference, ReferenceDetail, ReferenceKind};
use crate::bookshelf::resolver::resolve_reference;
use crate::database::Database;
use crate::error::AppError;
use crate::uploads::{CoverUpload, UploadStore};
use tracing::info;

fn book_not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Book with ID {} not found", id))
}

fn reference_not_found(kind: ReferenceKind) -> AppError {
    AppError::NotFound(format!("{} not found", kind.label()))
}

/// Get a book or fail with not-found
pub async fn get_book(db: &Database, id: i64) -> Result<Book, AppError> {
    db.get_book(id).await?.ok_or_else(|| book_not_found(id))
}

/// Create a book, resolving author and category by name
///
/// The cover (if any) is stored before the transaction and removed again when
/// the transaction fails.
pub async fn create_book(
    db: &Database,
    uploads: &UploadStore,
    input: NewBook,
    cover: Option<CoverUpload>,
) -> Result<Book, AppError> {
    let cover_path = match &cover {
        Some(upload) => Some(uploads.save(upload).await?),
        None => None,
    };

    match insert_with_references(db, &input, cover_path.as_deref()).await {
        Ok(book) => {
            info!(book_id = book.id, author_id = book.author.id, "Created book '{}'", book.title);
            Ok(book)
        }
        Err(e) => {
            if let Some(path) = &cover_path {
                uploads.remove(path).await;
            }
            Err(e)
        }
    }
}

async fn insert_with_references(
    db: &Database,
    input: &NewBook,
    cover: Option<&str>,
) -> Result<Book, AppError> {
    let mut tx = db.begin_immediate().await?;

    let author = resolve_reference(&mut tx, ReferenceKind::Author, &input.author_name).await?;
    let category = resolve_reference(&mut tx, ReferenceKind::Category, &input.category_name).await?;

    let id = insert_book(
        &mut tx,
        &input.title,
        input.year_published,
        cover,
        author.reference.id,
        category.reference.id,
    )
    .await?;

    let book = fetch_book(&mut *tx, id)
        .await?
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Book not found after creation")))?;

    tx.commit().await?;
    Ok(book)
}

/// Merge a partial update into an existing book
///
/// Fields absent from `patch` keep their stored value. A new cover replaces
/// the old one, whose file is then removed.
pub async fn update_book(
    db: &Database,
    uploads: &UploadStore,
    id: i64,
    patch: BookPatch,
    cover: Option<CoverUpload>,
) -> Result<Book, AppError> {
    // Fail fast before touching the upload directory
    let current = get_book(db, id).await?;
    if patch.is_empty() && cover.is_none() {
        return Ok(current);
    }

    let new_cover = match &cover {
        Some(upload) => Some(uploads.save(upload).await?),
        None => None,
    };

    match merge_book(db, id, &patch, new_cover.as_deref()).await {
        Ok((book, replaced_cover)) => {
            if let Some(old) = replaced_cover {
                uploads.remove(&old).await;
            }
            info!(book_id = id, "Updated book");
            Ok(book)
        }
        Err(e) => {
            if let Some(path) = &new_cover {
                uploads.remove(path).await;
            }
            Err(e)
        }
    }
}

/// Returns the updated book and the cover path it replaced, if any
async fn merge_book(
    db: &Database,
    id: i64,
    patch: &BookPatch,
    new_cover: Option<&str>,
) -> Result<(Book, Option<String>), AppError> {
    let mut tx = db.begin_immediate().await?;

    let mut book = fetch_book(&mut *tx, id)
        .await?
        .ok_or_else(|| book_not_found(id))?;

    if let Some(name) = &patch.author_name {
        book.author = resolve_reference(&mut tx, ReferenceKind::Author, name)
            .await?
            .reference;
    }
    if let Some(name) = &patch.category_name {
        book.category = resolve_reference(&mut tx, ReferenceKind::Category, name)
            .await?
            .reference;
    }
    if let Some(title) = &patch.title {
        book.title = title.clone();
    }
    if let Some(year) = patch.year_published {
        book.year_published = year;
    }

    let mut replaced = None;
    if let Some(path) = new_cover {
        replaced = book.cover.replace(path.to_string());
    }

    store_book(&mut tx, &book).await?;
    tx.commit().await?;

    Ok((book, replaced))
}

/// Delete a book and its cover file
pub async fn delete_book(db: &Database, uploads: &UploadStore, id: i64) -> Result<(), AppError> {
    let book = get_book(db, id).await?;
    if !db.delete_book(id).await? {
        return Err(book_not_found(id));
    }
    if let Some(cover) = &book.cover {
        uploads.remove(cover).await;
    }
    info!(book_id = id, "Deleted book");
    Ok(())
}

fn validated_name(kind: ReferenceKind, name: &str) -> Result<String, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest(format!(
            "{} name cannot be empty",
            kind.label()
        )));
    }
    Ok(name.to_string())
}

/// Create an author or category explicitly
pub async fn create_reference(
    db: &Database,
    kind: ReferenceKind,
    name: &str,
) -> Result<Reference, AppError> {
    let name = validated_name(kind, name)?;
    db.insert_reference(kind, &name).await
}

/// Get an author or category with the books referencing it
pub async fn get_reference_detail(
    db: &Database,
    kind: ReferenceKind,
    id: i64,
) -> Result<ReferenceDetail, AppError> {
    let reference = db
        .get_reference(kind, id)
        .await?
        .ok_or_else(|| reference_not_found(kind))?;
    let books = db.books_referencing(kind, id).await?;

    Ok(ReferenceDetail {
        id: reference.id,
        name: reference.name,
        books,
    })
}

/// Rename an author or category
pub async fn rename_reference(
    db: &Database,
    kind: ReferenceKind,
    id: i64,
    name: &str,
) -> Result<Reference, AppError> {
    let name = validated_name(kind, name)?;
    db.rename_reference(kind, id, &name)
        .await?
        .ok_or_else(|| reference_not_found(kind))
}

/// Delete an author or category that no book references
pub async fn delete_reference(db: &Database, kind: ReferenceKind, id: i64) -> Result<(), AppError> {
    if !db.delete_reference(kind, id).await? {
        return Err(reference_not_found(kind));
    }
    Ok(())
}
