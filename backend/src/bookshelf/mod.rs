//! Bookshelf catalog
//!
//! Books reference exactly one author and one category. Authors and
//! categories are looked up by name and created on first use.

pub mod db;
pub mod models;
pub mod resolver;
pub mod service;

pub use models::{Author, Book, BookForm, BookPatch, Category, NewBook, Reference, ReferenceDetail, ReferenceKind};
pub use resolver::{resolve_reference, Resolved};
