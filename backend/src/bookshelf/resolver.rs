//! Find-or-create of authors and categories by display name
//!
//! The name column carries a UNIQUE constraint. Resolution inserts with
//! `ON CONFLICT(name) DO NOTHING` and re-selects, so two concurrent requests
//! for the same new name end up sharing one row instead of racing.

use crate::bookshelf::models::{Reference, ReferenceKind};
use crate::error::AppError;
use sqlx::SqliteConnection;
use tracing::debug;

/// Outcome of resolving a name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    /// The existing or freshly inserted row
    pub reference: Reference,
    /// Whether this call inserted the row
    pub created: bool,
}

/// Return the row named `name` in the collection of `kind`, creating it if it
/// does not exist yet.
///
/// The name is trimmed and matched exactly. Run this on the connection of the
/// transaction that will also write the referencing book.
pub async fn resolve_reference(
    conn: &mut SqliteConnection,
    kind: ReferenceKind,
    name: &str,
) -> Result<Resolved, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest(format!(
            "{} name cannot be empty",
            kind.label()
        )));
    }

    let inserted = sqlx::query(&format!(
        "INSERT INTO {} (name) VALUES (?) ON CONFLICT(name) DO NOTHING",
        kind.table()
    ))
    .bind(name)
    .execute(&mut *conn)
    .await?;

    let reference = sqlx::query_as::<_, Reference>(&format!(
        "SELECT id, name FROM {} WHERE name = ?",
        kind.table()
    ))
    .bind(name)
    .fetch_one(&mut *conn)
    .await?;

    let created = inserted.rows_affected() == 1;
    if created {
        debug!(kind = kind.table(), id = reference.id, "Created reference {}", name);
    }

    Ok(Resolved { reference, created })
}
