// [apps/api/src/handlers/gamification.rs]
//! Leaderboard and badge-catalog read models.

use crate::error::ApiError;
use crate::state::AppState;
use attention_domain_gamification::BADGE_CATALOG;
use attention_domain_models::UserProfileOut;
use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

const DEFAULT_LEADERBOARD_LIMIT: u32 = 50;
const MAX_LEADERBOARD_LIMIT: u32 = 200;

#[derive(Deserialize)]
pub struct LeaderboardQuery {
    limit: Option<u32>,
}

/// `GET /leaderboard`, ordered `(reputation DESC, reports_verified DESC,
/// reports_submitted DESC)`.
pub async fn leaderboard(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>) -> Result<Json<Vec<UserProfileOut>>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_LEADERBOARD_LIMIT).min(MAX_LEADERBOARD_LIMIT);
    let entries = state.users.leaderboard(limit).await?;
    Ok(Json(entries.into_iter().map(|(profile, username)| profile.to_wire(username)).collect()))
}

/// `GET /badges`: the fixed catalog, including thresholds not yet unlocked
/// by anyone, so a dashboard can render locked badges too.
pub async fn badges() -> Json<&'static [attention_domain_gamification::BadgeCatalogEntry]> {
    Json(BADGE_CATALOG)
}
