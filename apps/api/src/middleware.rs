// [apps/api/src/middleware.rs]
//! Bearer-token identity extraction (auth boundary).
//!
//! Replaces the original's unverified JWT payload decode with real HS256
//! signature verification via `attention_domain_auth::TokenService`.

use crate::error::ApiError;
use crate::state::AppState;
use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

/// An authenticated request's identity: the user id from a verified access
/// token's `sub` claim, plus the `is_staff` flag looked up from the account
/// row so staff-only endpoints can gate on it without a second round trip
/// from the handler.
#[derive(Debug, Clone, Copy)]
pub struct AuthedUser {
    pub user_id: i64,
    pub is_staff: bool,
}

impl AuthedUser {
    /// Returns `Ok(())` if this identity carries the staff capability,
    /// otherwise the `403` the status-update and admin endpoints require.
    pub fn require_staff(&self) -> Result<(), ApiError> {
        if self.is_staff {
            Ok(())
        } else {
            Err(ApiError::Forbidden)
        }
    }
}

/// Same identity, but absent `Authorization` header resolves to `None`
/// instead of `401` -- used by the upload handler, which accepts both
/// anonymous and identified reports (`Event.reporter_id: Option<i64>`).
#[derive(Debug, Clone, Copy)]
pub struct OptionalUser(pub Option<AuthedUser>);

async fn authenticate(parts: &Parts, state: &AppState) -> Result<Option<AuthedUser>, ApiError> {
    let Some(header) = parts.headers.get(axum::http::header::AUTHORIZATION) else {
        return Ok(None);
    };
    let header = header.to_str().map_err(|_| ApiError::Unauthorized)?;
    let Some(token) = header.strip_prefix("Bearer ") else {
        return Err(ApiError::Unauthorized);
    };

    let claims = state.tokens.verify_access_token(token)?;
    let user_id: i64 = claims.sub.parse().map_err(|_| ApiError::Unauthorized)?;
    let user = state.users.find_by_id(user_id).await?.ok_or(ApiError::Unauthorized)?;

    Ok(Some(AuthedUser { user_id: user.id, is_staff: user.is_staff }))
}

#[async_trait]
impl FromRequestParts<AppState> for AuthedUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        authenticate(parts, state).await?.ok_or(ApiError::Unauthorized)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for OptionalUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(OptionalUser(authenticate(parts, state).await?))
    }
}
