//! Personal notes, each owned by one user

pub mod db;
pub mod models;
pub mod service;

pub use models::{CreateNoteRequest, Note, UpdateNoteRequest};
