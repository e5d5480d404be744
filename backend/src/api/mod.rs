//! API module
//!
//! HTTP handlers grouped by resource family. Handlers only extract input,
//! call the matching service and pick a status code.

pub mod auth;
pub mod blog;
pub mod books;
pub mod extract;
pub mod notes;
pub mod tasks;
pub mod utils;
pub mod weather;
