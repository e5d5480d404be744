//! Task data models

use crate::error::AppError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

/// Longest accepted title
pub const MAX_TITLE_LENGTH: usize = 255;
/// Longest accepted description
pub const MAX_DESCRIPTION_LENGTH: usize = 1000;
/// Longest accepted time label
pub const MAX_TIME_LENGTH: usize = 50;

/// Task priority
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum TaskPriority {
    /// Default priority
    #[default]
    Low,
    /// Medium priority
    Medium,
    /// Highest priority
    High,
}

impl TaskPriority {
    /// Convert the priority to its string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskPriority {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(TaskPriority::Low),
            "medium" => Ok(TaskPriority::Medium),
            "high" => Ok(TaskPriority::High),
            _ => Err(AppError::BadRequest(format!("Invalid priority: {}", s))),
        }
    }
}

/// A todo item
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier
    pub id: i64,
    /// Title
    pub title: String,
    /// Optional longer description
    pub description: Option<String>,
    /// Optional time of day label (e.g. `14:30`)
    pub time: Option<String>,
    /// Optional due date
    pub date: Option<NaiveDate>,
    /// Priority
    pub priority: TaskPriority,
    /// Completion flag
    pub completed: bool,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /tasks`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTaskRequest {
    /// Title (required)
    pub title: String,
    /// Description
    pub description: Option<String>,
    /// Time of day label
    pub time: Option<String>,
    /// Due date, `YYYY-MM-DD`
    pub date: Option<String>,
    /// `low`, `medium` or `high`
    pub priority: Option<String>,
    /// Initial completion flag
    pub completed: Option<bool>,
}

/// Body of `PATCH /tasks/:id`
///
/// Absent fields are left unchanged; an empty string clears an optional text
/// field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTaskRequest {
    /// New title
    pub title: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New time label
    pub time: Option<String>,
    /// New due date
    pub date: Option<String>,
    /// New priority
    pub priority: Option<String>,
    /// New completion flag
    pub completed: Option<bool>,
}

/// Query string of `GET /tasks`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskFilter {
    /// Only tasks with this completion flag
    pub completed: Option<bool>,
    /// Only tasks with this priority
    pub priority: Option<String>,
    /// Only tasks due on this date
    pub date: Option<String>,
}

/// Completion statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    /// Number of tasks
    pub total: i64,
    /// Completed tasks
    pub completed: i64,
    /// Tasks not yet completed
    pub active: i64,
    /// Completed share in percent, rounded half up
    pub completion_rate: i64,
}

impl TaskStats {
    /// Derive the statistics from the two counts
    pub fn from_counts(total: i64, completed: i64) -> Self {
        let completion_rate = if total > 0 {
            // round(completed / total * 100) with halves rounding up
            (200 * completed + total) / (2 * total)
        } else {
            0
        };
        Self {
            total,
            completed,
            active: total - completed,
            completion_rate,
        }
    }
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
    let raw = raw.trim();
    let invalid = || AppError::BadRequest("Invalid date format. Use YYYY-MM-DD".to_string());
    if raw.len() != 10 {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| invalid())
}
