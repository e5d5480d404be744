//! Registration and login

use crate::auth::models::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
use crate::auth::password::{hash_password, verify_password};
use crate::auth::token::issue_token;
use crate::config::AuthConfig;
use crate::database::Database;
use crate::error::AppError;
use crate::users::db::UserFields;
use crate::users::service::{validate_email, validate_password, validate_username};
use crate::users::{Role, User};
use tracing::{info, warn};

const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Create a regular account
pub async fn register(
    db: &Database,
    config: &AuthConfig,
    request: RegisterRequest,
) -> Result<RegisterResponse, AppError> {
    let username = validate_username(&request.username)?;
    validate_password(&request.password)?;
    let email = match request.email {
        Some(email) => validate_email(&email)?,
        None => None,
    };

    let fields = UserFields {
        username,
        email,
        password_hash: hash_password(&request.password, config.bcrypt_cost).await?,
        role: Role::User,
    };
    let user = db.insert_user(&fields).await?;
    info!(user_id = user.id, username = %user.username, "Registered user");

    Ok(RegisterResponse {
        message: "User registered successfully".to_string(),
        user: User::from(user),
    })
}

/// Check credentials and issue a token
///
/// Unknown usernames and wrong passwords produce the same error.
pub async fn login(
    db: &Database,
    config: &AuthConfig,
    request: LoginRequest,
) -> Result<LoginResponse, AppError> {
    let invalid = || AppError::Unauthorized(INVALID_CREDENTIALS.to_string());

    let Some(user) = db.find_user_by_username(request.username.trim()).await? else {
        warn!(username = %request.username, "Login attempt for unknown user");
        return Err(invalid());
    };
    if !verify_password(&request.password, &user.password_hash).await? {
        warn!(user_id = user.id, "Login attempt with wrong password");
        return Err(invalid());
    }

    let access_token = issue_token(&user, config)?;
    info!(user_id = user.id, "User logged in");
    Ok(LoginResponse {
        access_token,
        token_type: "Bearer".to_string(),
        role: user.role,
        user: User::from(user),
    })
}
