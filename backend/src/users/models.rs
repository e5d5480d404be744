//! User data models

use crate::auth::ownership::Owned;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Account role carried in issued tokens
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    /// Regular account
    #[default]
    User,
    /// Administrator
    Admin,
}

/// Full `users` row, including the password hash
#[derive(Debug, Clone, FromRow)]
pub struct UserRecord {
    /// Unique identifier
    pub id: i64,
    /// Unique login name
    pub username: String,
    /// Optional unique email
    pub email: Option<String>,
    /// bcrypt hash
    pub password_hash: String,
    /// Role
    pub role: Role,
    /// Registration time
    pub created_at: DateTime<Utc>,
}

/// Public view of a user; never carries the password hash
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique identifier
    pub id: i64,
    /// Unique login name
    pub username: String,
    /// Optional email
    pub email: Option<String>,
    /// Role
    pub role: Role,
    /// Registration time
    pub created_at: DateTime<Utc>,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            username: record.username,
            email: record.email,
            role: record.role,
            created_at: record.created_at,
        }
    }
}

impl Owned for User {
    const RESOURCE: &'static str = "account";

    fn owner_id(&self) -> i64 {
        self.id
    }
}

/// Author shown next to posts and comments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct UserSummary {
    /// Unique identifier
    pub id: i64,
    /// Login name
    pub username: String,
}

/// Body of `PATCH /users/:id`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserRequest {
    /// New login name
    pub username: Option<String>,
    /// New email; an empty string removes it
    pub email: Option<String>,
    /// New password
    pub password: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_user_hides_hash() {
        let record = UserRecord {
            id: 1,
            username: "ada".into(),
            email: None,
            password_hash: "$2b$04$abc".into(),
            role: Role::Admin,
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(User::from(record)).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["role"], "admin");
    }
}
