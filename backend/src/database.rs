//! Database connection and schema setup
//!
//! Owns the SQLite pool shared by every resource family. Entity queries live
//! next to their models (`bookshelf::db`, `tasks::db`, ...) as further
//! `impl Database` blocks.

use crate::error::AppError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// Migration scripts, applied in order at startup
const MIGRATIONS: &[(&str, &str)] = &[("001_init", include_str!("../migrations/001_init.sql"))];

/// How long a connection waits for the write lock before failing
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Database connection pool
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (creating if missing) the database and run migrations
    ///
    /// # Arguments
    /// * `db_path` - SQLite connection string (`sqlite:...`) or plain file path
    /// * `max_connections` - Pool size
    pub async fn connect(db_path: &str, max_connections: u32) -> Result<Self, AppError> {
        let file_path = db_path.strip_prefix("sqlite:").unwrap_or(db_path);
        let file_path = file_path.strip_prefix("//").unwrap_or(file_path);

        // Ensure parent directory exists
        if let Some(parent) = Path::new(file_path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    AppError::Internal(anyhow::anyhow!("Failed to create db directory: {}", e))
                })?;
            }
        }

        let connection_string = if db_path.starts_with("sqlite:") {
            db_path.to_string()
        } else {
            format!("sqlite:{}", db_path)
        };

        let options = SqliteConnectOptions::from_str(&connection_string)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid database path: {}", e)))?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(BUSY_TIMEOUT);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await
            .map_err(|e| {
                AppError::Internal(anyhow::anyhow!("Failed to connect to database: {}", e))
            })?;

        info!("Connected to SQLite database at: {}", db_path);

        let db = Self { pool };
        db.run_migrations().await?;

        Ok(db)
    }

    /// Run database migrations
    async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations...");

        for (name, migration_sql) in MIGRATIONS {
            for statement in split_statements(migration_sql) {
                sqlx::query(&statement)
                    .execute(&self.pool)
                    .await
                    .map_err(|e| {
                        AppError::Internal(anyhow::anyhow!(
                            "Migration {} failed: {} - Statement: {}",
                            name,
                            e,
                            statement.chars().take(100).collect::<String>()
                        ))
                    })?;
            }
            info!(migration = %name, "Migration applied");
        }

        info!("Database migrations completed successfully");
        Ok(())
    }

    /// Start a write transaction holding the database write lock
    ///
    /// A deferred transaction that reads before it writes cannot wait for the
    /// lock when another writer commits in between; SQLite fails it with
    /// `SQLITE_BUSY` instead. Taking the lock up front lets `busy_timeout`
    /// queue concurrent writers.
    pub async fn begin_immediate(&self) -> Result<Transaction<'static, Sqlite>, AppError> {
        Ok(self.pool.begin_with("BEGIN IMMEDIATE").await?)
    }

    /// Get the database pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Strip `--` comments and split a script into individual statements
fn split_statements(sql: &str) -> Vec<String> {
    let mut cleaned_sql = String::new();
    for line in sql.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with("--") {
            continue;
        }
        let without_comments = match trimmed.find("--") {
            Some(comment_pos) => &trimmed[..comment_pos],
            None => trimmed,
        };
        cleaned_sql.push_str(without_comments.trim());
        cleaned_sql.push(' ');
    }

    cleaned_sql
        .split(';')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::Database;
    use tempfile::TempDir;

    /// A database living in its own temporary directory
    pub(crate) struct TestDb {
        pub db: Database,
        // Dropped last so the file outlives the pool.
        pub dir: TempDir,
    }

    pub(crate) async fn test_db() -> TestDb {
        test_db_with_pool(2).await
    }

    pub(crate) async fn test_db_with_pool(max_connections: u32) -> TestDb {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.db");
        let db = Database::connect(path.to_str().unwrap(), max_connections)
            .await
            .unwrap();
        TestDb { db, dir }
    }
}
