//! User accounts
//!
//! Accounts are shared by every resource family that needs an owner (notes,
//! blog posts, comments) and by bookshelf login.

pub mod db;
pub mod models;
pub mod service;

pub use models::{Role, UpdateUserRequest, User, UserRecord, UserSummary};
