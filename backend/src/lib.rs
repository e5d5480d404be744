//! CRUD Hub Backend Library
//!
//! One HTTP service hosting the bookshelf, todo list, notes, blog and weather
//! resources on a shared SQLite database. The binary is in `src/main.rs`.

pub mod api;
pub mod app;
pub mod auth;
pub mod blog;
pub mod bookshelf;
pub mod config;
pub mod database;
pub mod error;
pub mod notes;
/// Application state shared by every handler
pub mod state;
pub mod tasks;
pub mod uploads;
pub mod users;
pub mod weather;
