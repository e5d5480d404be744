//! Note data models

use crate::auth::Owned;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Longest accepted note title
pub const MAX_TITLE_LENGTH: usize = 200;

/// A note
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Unique identifier
    pub id: i64,
    /// Owner
    pub user_id: i64,
    /// Title
    pub title: String,
    /// Body text
    pub content: Option<String>,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

impl Owned for Note {
    const RESOURCE: &'static str = "notes";

    fn owner_id(&self) -> i64 {
        self.user_id
    }
}

/// Body of `POST /notes`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateNoteRequest {
    /// Title (required)
    pub title: String,
    /// Body text
    pub content: Option<String>,
}

/// Body of `PATCH /notes/:id`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateNoteRequest {
    /// New title
    pub title: Option<String>,
    /// New body; an empty string clears it
    pub content: Option<String>,
}
