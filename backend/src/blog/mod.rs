//! Blog posts and their comments

pub mod db;
pub mod models;
pub mod service;

pub use models::{
    Comment, CommentRequest, CreatePostRequest, PageMeta, PageQuery, Paginated, Post, PostDetail,
    UpdatePostRequest,
};
