// [apps/api/src/handlers/auth.rs]
//! Registration, bearer-token issuance/refresh, and profile handlers.

use crate::error::ApiError;
use crate::middleware::AuthedUser;
use crate::state::AppState;
use attention_domain_auth::{hash_password, verify_password};
use attention_domain_models::UserProfile;
use attention_domain_models::UserProfileOut;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

const MIN_USERNAME_LEN: usize = 3;
const MIN_PASSWORD_LEN: usize = 8;

#[derive(Deserialize)]
pub struct RegisterRequest {
    email: String,
    password: String,
    username: Option<String>,
}

#[derive(Serialize)]
pub struct RegisterResponse {
    user_id: i64,
    username: String,
}

/// `POST /auth/register`. A username is derived from the email's local
/// part when omitted; both the supplied and derived form are held to the
/// same minimum length.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>) -> Result<Json<RegisterResponse>, ApiError> {
    if !body.email.contains('@') {
        return Err(ApiError::Validation("email must contain '@'".to_string()));
    }
    if body.password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::Validation(format!("password must be at least {MIN_PASSWORD_LEN} characters")));
    }
    let username = body.username.unwrap_or_else(|| {
        body.email.split('@').next().unwrap_or(&body.email).to_string()
    });
    if username.len() < MIN_USERNAME_LEN {
        return Err(ApiError::Validation(format!("username must be at least {MIN_USERNAME_LEN} characters")));
    }

    let digest = hash_password(&body.password)?;
    let user = state.users.create(&username, &body.email, &digest).await?;

    Ok(Json(RegisterResponse { user_id: user.id, username: user.username }))
}

#[derive(Deserialize)]
pub struct TokenPairRequest {
    username: String,
    password: String,
}

#[derive(Serialize)]
pub struct TokenPairResponse {
    access_token: String,
    refresh_token: String,
}

/// `POST /token/pair`.
pub async fn token_pair(
    State(state): State<AppState>,
    Json(body): Json<TokenPairRequest>) -> Result<Json<TokenPairResponse>, ApiError> {
    let user = state.users.find_by_username(&body.username).await?.ok_or(ApiError::Unauthorized)?;
    verify_password(&body.password, &user.password_digest)?;
    let pair = state.tokens.issue_pair(user.id)?;
    Ok(Json(TokenPairResponse { access_token: pair.access_token, refresh_token: pair.refresh_token }))
}

#[derive(Deserialize)]
pub struct TokenRefreshRequest {
    refresh_token: String,
}

#[derive(Serialize)]
pub struct TokenRefreshResponse {
    access_token: String,
}

/// `POST /token/refresh`: exchanges a valid refresh token for a new
/// access token without re-authenticating.
pub async fn token_refresh(
    State(state): State<AppState>,
    Json(body): Json<TokenRefreshRequest>) -> Result<Json<TokenRefreshResponse>, ApiError> {
    let claims = state.tokens.verify_refresh_token(&body.refresh_token)?;
    let user_id: i64 = claims.sub.parse().map_err(|_| ApiError::Unauthorized)?;
    let access_token = state.tokens.issue_access_token(user_id)?;
    Ok(Json(TokenRefreshResponse { access_token }))
}

/// `GET /auth/me`: identity plus the gamification fields inline.
pub async fn me(State(state): State<AppState>, user: AuthedUser) -> Result<Json<UserProfileOut>, ApiError> {
    let account = state.users.find_by_id(user.user_id).await?.ok_or(ApiError::Unauthorized)?;
    let profile = state
    .users
    .get_profile(user.user_id)
    .await?
    .unwrap_or_else(|| UserProfile::new(user.user_id));
    Ok(Json(profile.to_wire(account.username)))
}

#[derive(Deserialize)]
pub struct UpdateMeRequest {
    username: Option<String>,
}

/// `PATCH /auth/me`: the only mutable identity field is `username`;
/// gamification fields are pipeline/triage-effect-owned and read-only here.
pub async fn update_me(
    State(state): State<AppState>,
    user: AuthedUser,
    Json(body): Json<UpdateMeRequest>) -> Result<Json<UserProfileOut>, ApiError> {
    let mut account = state.users.find_by_id(user.user_id).await?.ok_or(ApiError::Unauthorized)?;
    if let Some(username) = body.username {
        if username.len() < MIN_USERNAME_LEN {
            return Err(ApiError::Validation(format!("username must be at least {MIN_USERNAME_LEN} characters")));
        }
        state.users.update_username(user.user_id, &username).await?;
        account.username = username;
    }

    let profile = state
    .users
    .get_profile(user.user_id)
    .await?
    .unwrap_or_else(|| UserProfile::new(user.user_id));
    Ok(Json(profile.to_wire(account.username)))
}
