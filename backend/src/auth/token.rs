//! HS256 bearer tokens

use crate::config::AuthConfig;
use crate::error::AppError;
use crate::users::{Role, UserRecord};
use anyhow::Context;
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Token claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: i64,
    /// Login name at issue time
    pub username: String,
    /// Role at issue time
    pub role: Role,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expiry (unix seconds)
    pub exp: i64,
}

impl Claims {
    /// Claims for `user`, valid for the configured lifetime
    pub fn for_user(user: &UserRecord, config: &AuthConfig) -> Self {
        let iat = Utc::now().timestamp();
        let lifetime = i64::try_from(config.jwt_expiry_secs).unwrap_or(i64::MAX);
        Self {
            sub: user.id,
            username: user.username.clone(),
            role: user.role,
            iat,
            exp: iat.saturating_add(lifetime),
        }
    }
}

/// Sign claims into a compact token
pub fn encode_token(claims: &Claims, secret: &str) -> Result<String, AppError> {
    let token = encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .context("Failed to sign token")?;
    Ok(token)
}

/// Verify signature and expiry, returning the claims
pub fn decode_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| {
        tracing::debug!("Rejected token: {}", e);
        AppError::Unauthorized("Invalid or expired token".to_string())
    })
}

/// Issue a token for `user`
pub fn issue_token(user: &UserRecord, config: &AuthConfig) -> Result<String, AppError> {
    encode_token(&Claims::for_user(user, config), &config.jwt_secret)
}
