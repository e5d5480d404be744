//! Bookshelf data models
//!
//! Defines books, the name-keyed references they point at, and the raw form
//! a book is created or updated from.

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Earliest accepted publication year
pub const MIN_YEAR: i32 = 1000;
/// Latest accepted publication year
pub const MAX_YEAR: i32 = 2100;

/// Which name-keyed collection a reference lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    /// Book authors
    Author,
    /// Book categories
    Category,
}

impl ReferenceKind {
    /// Backing table
    pub fn table(&self) -> &'static str {
        match self {
            ReferenceKind::Author => "authors",
            ReferenceKind::Category => "categories",
        }
    }

    /// Foreign key column on `books`
    pub fn book_column(&self) -> &'static str {
        match self {
            ReferenceKind::Author => "author_id",
            ReferenceKind::Category => "category_id",
        }
    }

    /// Human-readable name used in messages
    pub fn label(&self) -> &'static str {
        match self {
            ReferenceKind::Author => "Author",
            ReferenceKind::Category => "Category",
        }
    }
}

/// A row of `authors` or `categories`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Reference {
    /// Unique identifier
    pub id: i64,
    /// Unique display name
    pub name: String,
}

/// Book author
pub type Author = Reference;
/// Book category
pub type Category = Reference;

/// Author or category together with the books pointing at it
#[derive(Debug, Clone, Serialize)]
pub struct ReferenceDetail {
    /// Unique identifier
    pub id: i64,
    /// Unique display name
    pub name: String,
    /// Books referencing this row
    pub books: Vec<Book>,
}

/// A book with its resolved author and category
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Unique identifier
    pub id: i64,
    /// Title
    pub title: String,
    /// Year of publication
    pub year_published: i32,
    /// Public path of the cover image (`uploads/<file>`)
    pub cover: Option<String>,
    /// Author
    pub author: Author,
    /// Category
    pub category: Category,
}

/// Flat join row for [`Book`]
#[derive(Debug, FromRow)]
pub(crate) struct BookRow {
    pub id: i64,
    pub title: String,
    pub year_published: i32,
    pub cover: Option<String>,
    pub author_id: i64,
    pub author_name: String,
    pub category_id: i64,
    pub category_name: String,
}

impl From<BookRow> for Book {
    fn from(row: BookRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            year_published: row.year_published,
            cover: row.cover,
            author: Reference {
                id: row.author_id,
                name: row.author_name,
            },
            category: Reference {
                id: row.category_id,
                name: row.category_name,
            },
        }
    }
}

/// Validated input for creating a book
#[derive(Debug, Clone)]
pub struct NewBook {
    /// Title
    pub title: String,
    /// Author display name, resolved by name
    pub author_name: String,
    /// Category display name, resolved by name
    pub category_name: String,
    /// Year of publication
    pub year_published: i32,
}

/// Validated partial update; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct BookPatch {
    /// New title
    pub title: Option<String>,
    /// New author name
    pub author_name: Option<String>,
    /// New category name
    pub category_name: Option<String>,
    /// New publication year
    pub year_published: Option<i32>,
}

impl BookPatch {
    /// True when no scalar or reference field is set
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author_name.is_none()
            && self.category_name.is_none()
            && self.year_published.is_none()
    }
}

/// Text fields of a submitted book form
#[derive(Debug, Clone, Default)]
pub struct BookForm {
    /// Title
    pub title: Option<String>,
    /// Author display name
    pub author_name: Option<String>,
    /// Category display name
    pub category_name: Option<String>,
    /// Year of publication, still as text
    pub year_published: Option<String>,
}

impl BookForm {
    /// Validate a creation form: every field is required
    pub fn into_new_book(self) -> Result<NewBook, AppError> {
        let title = required(self.title, "title")?;
        let author_name = required(self.author_name, "authorName")?;
        let category_name = required(self.category_name, "categoryName")?;
        let year = required(self.year_published, "yearPublished")?;

        Ok(NewBook {
            title,
            author_name,
            category_name,
            year_published: parse_year(&year)?,
        })
    }

    /// Validate an update form: blank fields count as absent
    pub fn into_patch(self) -> Result<BookPatch, AppError> {
        let year_published = match present(self.year_published) {
            Some(year) => Some(parse_year(&year)?),
            None => None,
        };

        Ok(BookPatch {
            title: present(self.title),
            author_name: present(self.author_name),
            category_name: present(self.category_name),
            year_published,
        })
    }
}

fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(value: Option<String>, field: &str) -> Result<String, AppError> {
    present(value).ok_or_else(|| AppError::BadRequest(format!("{} is required", field)))
}

fn parse_year(raw: &str) -> Result<i32, AppError> {
    let year: i32 = raw
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest("yearPublished must be an integer".to_string()))?;
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(AppError::BadRequest(format!(
            "yearPublished must be between {} and {}",
            MIN_YEAR, MAX_YEAR
        )));
    }
    Ok(year)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dune_form() -> BookForm {
        BookForm {
            title: Some("Dune".into()),
            author_name: Some("Frank Herbert".into()),
            category_name: Some("Sci-Fi".into()),
            year_published: Some("1965".into()),
        }
    }

    #[test]
    fn test_new_book_from_complete_form() {
        let book = dune_form().into_new_book().unwrap();
        assert_eq!(book.title, "Dune");
        assert_eq!(book.author_name, "Frank Herbert");
        assert_eq!(book.year_published, 1965);
    }

    #[test]
    fn test_new_book_requires_author() {
        let form = BookForm {
            author_name: Some("   ".into()),
            ..dune_form()
        };
        let err = form.into_new_book().unwrap_err();
        assert_eq!(err.to_string(), "authorName is required");
    }

    #[test]
    fn test_year_out_of_range() {
        let form = BookForm {
            year_published: Some("999".into()),
            ..dune_form()
        };
        assert!(matches!(form.into_new_book(), Err(AppError::BadRequest(_))));

        let form = BookForm {
            year_published: Some("nineteen".into()),
            ..dune_form()
        };
        assert!(matches!(form.into_new_book(), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_patch_treats_blank_as_absent() {
        let form = BookForm {
            title: Some("Dune Messiah".into()),
            author_name: Some(String::new()),
            category_name: None,
            year_published: Some(" ".into()),
        };
        let patch = form.into_patch().unwrap();
        assert_eq!(patch.title.as_deref(), Some("Dune Messiah"));
        assert!(patch.author_name.is_none());
        assert!(patch.year_published.is_none());
        assert!(!patch.is_empty());
        assert!(BookPatch::default().is_empty());
    }

    #[test]
    fn test_book_serializes_camel_case() {
        let book = Book {
            id: 1,
            title: "Dune".into(),
            year_published: 1965,
            cover: None,
            author: Reference { id: 2, name: "Frank Herbert".into() },
            category: Reference { id: 3, name: "Sci-Fi".into() },
        };
        let json = serde_json::to_value(&book).unwrap();
        assert_eq!(json["yearPublished"], 1965);
        assert_eq!(json["author"]["name"], "Frank Herbert");
    }
}
