//! Small response types shared by handlers

use serde::Serialize;

/// Plain confirmation body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageResponse {
    /// Human-readable message
    pub message: String,
}

impl MessageResponse {
    /// Wrap a message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
