//! Account management

use crate::auth::password::hash_password;
use crate::auth::{ensure_owner, Action};
use crate::config::AuthConfig;
use crate::database::Database;
use crate::error::AppError;
use crate::users::db::UserFields;
use crate::users::models::{Role, UpdateUserRequest, User};
use tracing::info;

/// Shortest accepted password
pub const MIN_PASSWORD_LENGTH: usize = 6;
/// Longest accepted username
pub const MAX_USERNAME_LENGTH: usize = 50;

/// Trimmed, non-empty username
pub fn validate_username(username: &str) -> Result<String, AppError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(AppError::BadRequest("username should not be empty".to_string()));
    }
    if username.chars().count() > MAX_USERNAME_LENGTH {
        return Err(AppError::BadRequest(format!(
            "username must be shorter than or equal to {} characters",
            MAX_USERNAME_LENGTH
        )));
    }
    Ok(username.to_string())
}

/// Password length check
pub fn validate_password(password: &str) -> Result<(), AppError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AppError::BadRequest(format!(
            "password must be longer than or equal to {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }
    Ok(())
}

/// Blank means no email; anything else needs an `@` between two parts
pub fn validate_email(email: &str) -> Result<Option<String>, AppError> {
    let email = email.trim();
    if email.is_empty() {
        return Ok(None);
    }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => {
            Ok(Some(email.to_string()))
        }
        _ => Err(AppError::BadRequest("email must be an email".to_string())),
    }
}

fn user_not_found(id: i64) -> AppError {
    AppError::NotFound(format!("User with ID {} not found", id))
}

/// All accounts
pub async fn list_users(db: &Database) -> Result<Vec<User>, AppError> {
    let users = db.list_users().await?;
    Ok(users.into_iter().map(User::from).collect())
}

/// One account
pub async fn get_user(db: &Database, id: i64) -> Result<User, AppError> {
    db.get_user(id)
        .await?
        .map(User::from)
        .ok_or_else(|| user_not_found(id))
}

/// Update the requester's own account
pub async fn update_user(
    db: &Database,
    config: &AuthConfig,
    requester_id: i64,
    id: i64,
    request: UpdateUserRequest,
) -> Result<User, AppError> {
    let record = db.get_user(id).await?.ok_or_else(|| user_not_found(id))?;
    ensure_owner(&User::from(record.clone()), requester_id, Action::Update)?;

    let mut fields = UserFields::from(&record);
    if let Some(username) = request.username {
        fields.username = validate_username(&username)?;
    }
    if let Some(email) = request.email {
        fields.email = validate_email(&email)?;
    }
    if let Some(password) = request.password {
        validate_password(&password)?;
        fields.password_hash = hash_password(&password, config.bcrypt_cost).await?;
    }

    let updated = db
        .update_user(id, &fields)
        .await?
        .ok_or_else(|| user_not_found(id))?;
    info!(user_id = id, "Updated user");
    Ok(User::from(updated))
}

/// Delete the requester's own account along with everything it owns
pub async fn delete_user(db: &Database, requester_id: i64, id: i64) -> Result<(), AppError> {
    let user = get_user(db, id).await?;
    ensure_owner(&user, requester_id, Action::Delete)?;
    db.delete_user(id).await?;
    info!(user_id = id, "Deleted user");
    Ok(())
}

/// Create the configured admin account if it does not exist yet
///
/// Returns whether an account was created.
pub async fn seed_admin(db: &Database, config: &AuthConfig) -> Result<bool, AppError> {
    let (Some(username), Some(password)) = (&config.admin_username, &config.admin_password) else {
        return Ok(false);
    };
    if db.find_user_by_username(username).await?.is_some() {
        return Ok(false);
    }

    let fields = UserFields {
        username: validate_username(username)?,
        email: None,
        password_hash: hash_password(password, config.bcrypt_cost).await?,
        role: Role::Admin,
    };
    let admin = db.insert_user(&fields).await?;
    info!(user_id = admin.id, username = %admin.username, "Seeded admin account");
    Ok(true)
}
