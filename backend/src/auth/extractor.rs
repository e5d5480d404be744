//! Bearer token extractor

use crate::auth::token::decode_token;
use crate::error::AppError;
use crate::state::AppState;
use crate::users::Role;
use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

/// The authenticated caller
///
/// Rejects with 401 when the `Authorization: Bearer` header is missing, the
/// token does not verify, or the account has since been deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    /// User id
    pub id: i64,
    /// Current login name
    pub username: String,
    /// Current role
    pub role: Role,
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    let header = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = header.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .ok_or_else(|| AppError::Unauthorized("Missing bearer token".to_string()))?;
        let claims = decode_token(token, &state.config.auth.jwt_secret)?;

        let user = state
            .db
            .get_user(claims.sub)
            .await?
            .ok_or_else(|| AppError::Unauthorized("User no longer exists".to_string()))?;

        Ok(AuthUser {
            id: user.id,
            username: user.username,
            role: user.role,
        })
    }
}
