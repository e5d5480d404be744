//! Task database operations

use crate::database::Database;
use crate::error::AppError;
use crate::tasks::models::{Task, TaskPriority};
use chrono::{NaiveDate, Utc};
use sqlx::{QueryBuilder, Sqlite};
use tracing::debug;

const TASK_COLUMNS: &str =
    "SELECT id, title, description, time, date, priority, completed, created_at, updated_at FROM tasks";

/// Conjunctive filter on the task list
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskQuery {
    /// Completion flag
    pub completed: Option<bool>,
    /// Priority
    pub priority: Option<TaskPriority>,
    /// Due date
    pub date: Option<NaiveDate>,
}

/// Sort order of a task listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOrder {
    /// Newest first
    Newest,
    /// Most recently updated first
    RecentlyUpdated,
    /// High priority first, then oldest first
    PriorityThenOldest,
    /// By time of day label
    TimeOfDay,
}

impl TaskOrder {
    fn clause(&self) -> &'static str {
        match self {
            TaskOrder::Newest => " ORDER BY created_at DESC, id DESC",
            TaskOrder::RecentlyUpdated => " ORDER BY updated_at DESC, id DESC",
            TaskOrder::PriorityThenOldest => {
                " ORDER BY CASE priority WHEN 'high' THEN 3 WHEN 'medium' THEN 2 ELSE 1 END DESC, created_at ASC, id ASC"
            }
            TaskOrder::TimeOfDay => " ORDER BY time ASC, id ASC",
        }
    }
}

/// Columns written on insert and update
#[derive(Debug, Clone)]
pub struct TaskFields {
    /// Title
    pub title: String,
    /// Description
    pub description: Option<String>,
    /// Time label
    pub time: Option<String>,
    /// Due date
    pub date: Option<NaiveDate>,
    /// Priority
    pub priority: TaskPriority,
    /// Completion flag
    pub completed: bool,
}

impl From<&Task> for TaskFields {
    fn from(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            time: task.time.clone(),
            date: task.date,
            priority: task.priority,
            completed: task.completed,
        }
    }
}

impl Database {
    /// List tasks matching `query` in the given order
    pub async fn list_tasks(&self, query: TaskQuery, order: TaskOrder) -> Result<Vec<Task>, AppError> {
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(TASK_COLUMNS);
        builder.push(" WHERE 1 = 1");
        if let Some(completed) = query.completed {
            builder.push(" AND completed = ").push_bind(completed);
        }
        if let Some(priority) = query.priority {
            builder.push(" AND priority = ").push_bind(priority);
        }
        if let Some(date) = query.date {
            builder.push(" AND date = ").push_bind(date);
        }
        builder.push(order.clause());

        let tasks = builder.build_query_as::<Task>().fetch_all(self.pool()).await?;
        Ok(tasks)
    }

    /// Get a task by ID
    pub async fn get_task(&self, id: i64) -> Result<Option<Task>, AppError> {
        let task = sqlx::query_as::<_, Task>(&format!("{} WHERE id = ?", TASK_COLUMNS))
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(task)
    }

    /// Insert a task and return the stored row
    pub async fn insert_task(&self, fields: &TaskFields) -> Result<Task, AppError> {
        let now = Utc::now();
        let result = sqlx::query(
            "INSERT INTO tasks (title, description, time, date, priority, completed, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(&fields.time)
        .bind(fields.date)
        .bind(fields.priority)
        .bind(fields.completed)
        .bind(now)
        .bind(now)
        .execute(self.pool())
        .await?;

        let id = result.last_insert_rowid();
        debug!("Created task: {}", id);
        self.get_task(id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Task not found after creation")))
    }

    /// Overwrite a task's fields and bump `updated_at`
    pub async fn update_task(&self, id: i64, fields: &TaskFields) -> Result<Option<Task>, AppError> {
        let result = sqlx::query(
            "UPDATE tasks SET title = ?, description = ?, time = ?, date = ?, priority = ?, completed = ?, updated_at = ? \
             WHERE id = ?",
        )
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(&fields.time)
        .bind(fields.date)
        .bind(fields.priority)
        .bind(fields.completed)
        .bind(Utc::now())
        .bind(id)
        .execute(self.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        debug!("Updated task: {}", id);
        self.get_task(id).await
    }

    /// Delete a task, returning whether a row was removed
    pub async fn delete_task(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Total and completed task counts
    pub async fn count_tasks(&self) -> Result<(i64, i64), AppError> {
        let counts: (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), COALESCE(SUM(CASE WHEN completed THEN 1 ELSE 0 END), 0) FROM tasks",
        )
        .fetch_one(self.pool())
        .await?;
        Ok(counts)
    }
}
