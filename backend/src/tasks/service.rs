//! Task use-cases: validation, filtered views and statistics

use crate::database::Database;
use crate::error::AppError;
use crate::tasks::db::{TaskFields, TaskOrder, TaskQuery};
use crate::tasks::models::{
    parse_date, CreateTaskRequest, Task, TaskFilter, TaskPriority, TaskStats, UpdateTaskRequest,
    MAX_DESCRIPTION_LENGTH, MAX_TIME_LENGTH, MAX_TITLE_LENGTH,
};
use tracing::info;

fn task_not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Task with ID {} not found", id))
}

fn validate_title(title: &str) -> Result<String, AppError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::BadRequest("title should not be empty".to_string()));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(AppError::BadRequest(format!(
            "title must be shorter than or equal to {} characters",
            MAX_TITLE_LENGTH
        )));
    }
    Ok(title.to_string())
}

/// Validate optional free text; blank becomes `None`
fn optional_text(value: String, field: &str, max: usize) -> Result<Option<String>, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    if value.chars().count() > max {
        return Err(AppError::BadRequest(format!(
            "{} must be shorter than or equal to {} characters",
            field, max
        )));
    }
    Ok(Some(value.to_string()))
}

fn optional_date(value: Option<String>) -> Result<Option<chrono::NaiveDate>, AppError> {
    match value {
        Some(raw) if !raw.trim().is_empty() => Ok(Some(parse_date(&raw)?)),
        _ => Ok(None),
    }
}

/// Create a task
pub async fn create_task(db: &Database, request: CreateTaskRequest) -> Result<Task, AppError> {
    let fields = TaskFields {
        title: validate_title(&request.title)?,
        description: match request.description {
            Some(d) => optional_text(d, "description", MAX_DESCRIPTION_LENGTH)?,
            None => None,
        },
        time: match request.time {
            Some(t) => optional_text(t, "time", MAX_TIME_LENGTH)?,
            None => None,
        },
        date: optional_date(request.date)?,
        priority: match request.priority {
            Some(p) => p.parse()?,
            None => TaskPriority::default(),
        },
        completed: request.completed.unwrap_or(false),
    };

    let task = db.insert_task(&fields).await?;
    info!(task_id = task.id, priority = %task.priority, "Created task");
    Ok(task)
}

/// All tasks matching the filter, newest first
pub async fn list_tasks(db: &Database, filter: TaskFilter) -> Result<Vec<Task>, AppError> {
    let query = TaskQuery {
        completed: filter.completed,
        priority: match filter.priority {
            Some(p) if !p.trim().is_empty() => Some(p.parse()?),
            _ => None,
        },
        date: optional_date(filter.date)?,
    };
    db.list_tasks(query, TaskOrder::Newest).await
}

/// Get a task or fail with not-found
pub async fn get_task(db: &Database, id: i64) -> Result<Task, AppError> {
    db.get_task(id).await?.ok_or_else(|| task_not_found(id))
}

/// Merge a partial update into a task
pub async fn update_task(
    db: &Database,
    id: i64,
    request: UpdateTaskRequest,
) -> Result<Task, AppError> {
    let current = get_task(db, id).await?;
    let mut fields = TaskFields::from(&current);

    if let Some(title) = request.title {
        fields.title = validate_title(&title)?;
    }
    if let Some(description) = request.description {
        fields.description = optional_text(description, "description", MAX_DESCRIPTION_LENGTH)?;
    }
    if let Some(time) = request.time {
        fields.time = optional_text(time, "time", MAX_TIME_LENGTH)?;
    }
    if request.date.is_some() {
        fields.date = optional_date(request.date)?;
    }
    if let Some(priority) = request.priority {
        fields.priority = priority.parse()?;
    }
    if let Some(completed) = request.completed {
        fields.completed = completed;
    }

    db.update_task(id, &fields)
        .await?
        .ok_or_else(|| task_not_found(id))
}

/// Delete a task
pub async fn delete_task(db: &Database, id: i64) -> Result<(), AppError> {
    if !db.delete_task(id).await? {
        return Err(task_not_found(id));
    }
    info!(task_id = id, "Deleted task");
    Ok(())
}

/// Open tasks, highest priority first
pub async fn active_tasks(db: &Database) -> Result<Vec<Task>, AppError> {
    let query = TaskQuery {
        completed: Some(false),
        ..Default::default()
    };
    db.list_tasks(query, TaskOrder::PriorityThenOldest).await
}

/// Completed tasks, most recently updated first
pub async fn completed_tasks(db: &Database) -> Result<Vec<Task>, AppError> {
    let query = TaskQuery {
        completed: Some(true),
        ..Default::default()
    };
    db.list_tasks(query, TaskOrder::RecentlyUpdated).await
}

/// Tasks due on a date, by time of day
pub async fn tasks_by_date(db: &Database, date: Option<&str>) -> Result<Vec<Task>, AppError> {
    let date = parse_date(date.unwrap_or_default())?;
    let query = TaskQuery {
        date: Some(date),
        ..Default::default()
    };
    db.list_tasks(query, TaskOrder::TimeOfDay).await
}

/// Tasks of one priority, newest first
pub async fn tasks_by_priority(db: &Database, priority: &str) -> Result<Vec<Task>, AppError> {
    let query = TaskQuery {
        priority: Some(priority.parse()?),
        ..Default::default()
    };
    db.list_tasks(query, TaskOrder::Newest).await
}

/// Completion statistics over all tasks
pub async fn task_stats(db: &Database) -> Result<TaskStats, AppError> {
    let (total, completed) = db.count_tasks().await?;
    Ok(TaskStats::from_counts(total, completed))
}
