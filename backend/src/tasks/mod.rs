//! Todo list
//!
//! Tasks with priority, optional due date and a completion flag, plus
//! filtered views and completion statistics.

pub mod db;
pub mod models;
pub mod service;

pub use models::{CreateTaskRequest, Task, TaskFilter, TaskPriority, TaskStats, UpdateTaskRequest};
