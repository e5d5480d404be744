//! Authentication request and response bodies

use crate::users::{Role, User};
use serde::{Deserialize, Serialize};

/// Body of `POST /auth/register`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterRequest {
    /// Login name
    pub username: String,
    /// Plain-text password
    pub password: String,
    /// Optional email
    pub email: Option<String>,
}

/// Body of `POST /auth/login`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    /// Login name
    pub username: String,
    /// Plain-text password
    pub password: String,
}

/// Result of a successful registration
#[derive(Debug, Clone, Serialize)]
pub struct RegisterResponse {
    /// Confirmation text
    pub message: String,
    /// The new account
    pub user: User,
}

/// Result of a successful login
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    /// Signed bearer token
    pub access_token: String,
    /// Always `Bearer`
    pub token_type: String,
    /// Role of the account
    pub role: Role,
    /// The account
    pub user: User,
}
