// [apps/api/src/handlers/admin.rs]
//! Staff-only administration surface.

use crate::error::ApiError;
use crate::middleware::AuthedUser;
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Serialize)]
pub struct ReprocessResponse {
    job_id: Uuid,
}

/// `POST /admin/events/{id}/reprocess`: re-enqueues the reprocess path
/// for an already-enriched event, mirroring the original's manual
/// re-run admin action.
pub async fn reprocess(
    State(state): State<AppState>,
    user: AuthedUser,
    Path(event_id): Path<Uuid>) -> Result<Json<ReprocessResponse>, ApiError> {
    user.require_staff()?;
    state.events.get(event_id).await?.ok_or(ApiError::NotFound)?;
    let job_id = state.jobs.enqueue_reprocess(event_id).await?;
    Ok(Json(ReprocessResponse { job_id }))
}

#[derive(Deserialize)]
pub struct PipelineStatsQuery {
    window_hours: Option<i64>,
}

#[derive(Serialize)]
pub struct PipelineStatsResponse {
    window_hours: i64,
    failures_by_stage: HashMap<String, u64>,
}

const DEFAULT_WINDOW_HOURS: i64 = 24;

/// `GET /admin/stats/pipeline`: per-stage failure counts over a rolling
/// window, giving operators the same failure visibility the worker logs.
pub async fn pipeline_stats(
    State(state): State<AppState>,
    user: AuthedUser,
    Query(query): Query<PipelineStatsQuery>) -> Result<Json<PipelineStatsResponse>, ApiError> {
    user.require_staff()?;
    let window_hours = query.window_hours.unwrap_or(DEFAULT_WINDOW_HOURS);
    let counts = state.jobs.stage_failure_counts(Duration::hours(window_hours)).await?;
    Ok(Json(PipelineStatsResponse { window_hours, failures_by_stage: counts.into_iter().collect() }))
}
