//! The single rule deciding who may touch an owned resource

use crate::error::AppError;
use std::fmt;

/// Something that belongs to exactly one user
pub trait Owned {
    /// Name used in the refusal message, e.g. `posts`
    const RESOURCE: &'static str;

    /// Id of the owning user
    fn owner_id(&self) -> i64;
}

/// What the requester is trying to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Read
    View,
    /// Modify
    Update,
    /// Remove
    Delete,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            Action::View => "view",
            Action::Update => "update",
            Action::Delete => "delete",
        };
        f.write_str(verb)
    }
}

/// Allow the action only when `requester_id` owns `resource`
pub fn ensure_owner<T: Owned>(resource: &T, requester_id: i64, action: Action) -> Result<(), AppError> {
    if resource.owner_id() == requester_id {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "You can only {} your own {}",
            action,
            T::RESOURCE
        )))
    }
}
