// [apps/api/src/handlers/events.rs]
//! Event upload, listing, detail, and operator status-update handlers.

use crate::error::ApiError;
use crate::middleware::{AuthedUser, OptionalUser};
use crate::state::AppState;
use attention_core_geo::{BoundingBox, LatLon};
use attention_domain_models::{Category, Event, EventOut, FanOutMessage, MediaKind, Severity, Status};
use attention_infra_db::EventFilters;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

/// Hard cap applied to `limit` regardless of the requested value.
const MAX_LIST_LIMIT: u32 = 500;
const DEFAULT_LIST_LIMIT: u32 = 100;

#[derive(Serialize)]
pub struct UploadResponse {
    id: Uuid,
    status: String,
    message: String,
}

/// `POST /events/upload` -- multipart upload. Validates coordinates and
/// media content-type before any row is written.
pub async fn upload(
    State(state): State<AppState>,
    OptionalUser(reporter): OptionalUser,
    mut multipart: Multipart) -> Result<(StatusCode, Json<UploadResponse>), ApiError> {
    let mut latitude: Option<f64> = None;
    let mut longitude: Option<f64> = None;
    let mut description = String::new();
    let mut media_bytes: Option<Vec<u8>> = None;
    let mut media_content_type: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(|err| ApiError::Validation(err.to_string()))? {
        match field.name().unwrap_or_default() {
            "latitude" => {
                let text = field.text().await.map_err(|err| ApiError::Validation(err.to_string()))?;
                latitude = text.trim().parse().ok();
            }
            "longitude" => {
                let text = field.text().await.map_err(|err| ApiError::Validation(err.to_string()))?;
                longitude = text.trim().parse().ok();
            }
            "description" => {
                description = field.text().await.map_err(|err| ApiError::Validation(err.to_string()))?;
            }
            "media" => {
                media_content_type = field.content_type().map(str::to_string);
                media_bytes = Some(field.bytes().await.map_err(|err| ApiError::Validation(err.to_string()))?.to_vec());
            }
            _ => {}
        }
    }

    let latitude = latitude.ok_or_else(|| ApiError::Validation("latitude is required".to_string()))?;
    let longitude = longitude.ok_or_else(|| ApiError::Validation("longitude is required".to_string()))?;
    let location = LatLon::new(latitude, longitude).map_err(|err| ApiError::Validation(err.to_string()))?;

    let media_content_type =
        media_content_type.ok_or_else(|| ApiError::Validation("media is required".to_string()))?;
    let media_bytes = media_bytes.ok_or_else(|| ApiError::Validation("media is required".to_string()))?;
    let media_kind = MediaKind::from_content_type(&media_content_type)
        .ok_or_else(|| ApiError::Validation("media must be image/* or video/*".to_string()))?;

    let reporter_id = reporter.map(|user| user.user_id);
    let event = Event::new_skeleton(location, description, media_kind, reporter_id);
    state.events.insert(&event).await?;
    state.jobs.enqueue(event.id, Some(media_bytes), Some(media_content_type)).await?;

    if let Some(user_id) = reporter_id {
        if let Some(mut profile) = state.users.get_profile(user_id).await? {
            profile.reports_submitted += 1;
            attention_domain_gamification::on_submission(&mut profile);
            state.users.save_profile(&profile).await?;
        }
    }

    Ok((
        StatusCode::ACCEPTED,
        Json(UploadResponse { id: event.id, status: "processing".to_string(), message: "event accepted".to_string() })))
}

#[derive(Deserialize)]
pub struct ListQuery {
    bounds: Option<String>,
    status: Option<String>,
    severity: Option<String>,
    category: Option<String>,
    since: Option<String>,
    limit: Option<u32>,
    offset: Option<u32>,
}

#[derive(Serialize)]
pub struct ListResponse {
    events: Vec<EventOut>,
    total: u64,
    limit: u32,
    offset: u32,
}

/// `GET /events` -- filtered, paginated listing. Every filter value that
/// fails to parse is dropped rather than rejected.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>) -> Result<Json<ListResponse>, ApiError> {
    let filters = EventFilters {
        bounds: query.bounds.as_deref().and_then(|raw| BoundingBox::parse_csv(raw).ok()),
        statuses: query
            .status
            .as_deref()
            .map(|raw| raw.split(',').filter_map(Status::parse).collect())
            .unwrap_or_default(),
        severities: query
            .severity
            .as_deref()
            .map(|raw| {
                raw.split(',')
                    .filter_map(|part| part.trim().parse::<u8>().ok())
                    .filter_map(|value| Severity::try_from(value).ok())
                    .collect()
            })
            .unwrap_or_default(),
        categories: query
            .category
            .as_deref()
            .map(|raw| raw.split(',').map(Category::coerce).collect())
            .unwrap_or_default(),
        since: query.since.as_deref().and_then(|raw| {
            DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.with_timezone(&Utc))
        }),
    };

    let limit = query.limit.unwrap_or(DEFAULT_LIST_LIMIT).min(MAX_LIST_LIMIT);
    let offset = query.offset.unwrap_or(0);

    let (events, total) = state.events.list(&filters, limit, offset).await?;
    Ok(Json(ListResponse {
        events: events.iter().map(Event::to_wire).collect(),
        total,
        limit,
        offset,
    }))
}

/// `GET /events/{id}`.
pub async fn detail(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<EventOut>, ApiError> {
    let event = state.events.get(id).await?.ok_or(ApiError::NotFound)?;
    Ok(Json(event.to_wire()))
}

#[derive(Deserialize)]
pub struct StatusUpdateRequest {
    status: String,
}

/// `PATCH /events/{id}/status` -- operator-only triage command.
/// Writes only `status`/`reviewed_by`/`reviewed_at`, never the pipeline's
/// enrichment fields, fires the matching gamification hook, and publishes
/// a `status_change` fan-out message.
pub async fn update_status(
    State(state): State<AppState>,
    user: AuthedUser,
    Path(id): Path<Uuid>,
    Json(body): Json<StatusUpdateRequest>) -> Result<Json<EventOut>, ApiError> {
    user.require_staff()?;

    let new_status = Status::parse_operator_target(&body.status)
        .ok_or_else(|| ApiError::Validation(format!("unknown status: {}", body.status)))?;

    let mut event = state.events.get(id).await?.ok_or(ApiError::NotFound)?;
    let reviewed_at = Utc::now();
    state.events.update_status(id, new_status, user.user_id, reviewed_at).await?;
    event.status = new_status;
    event.reviewed_by = Some(user.user_id);
    event.reviewed_at = Some(reviewed_at);

    if let Some(reporter_id) = event.reporter_id {
        if let Some(mut profile) = state.users.get_profile(reporter_id).await? {
            match new_status {
                Status::Verified => {
                    attention_domain_gamification::on_verification(&mut profile, event.severity);
                }
                Status::FalseAlarm => {
                    attention_domain_gamification::on_rejection(&mut profile);
                }
                _ => {}
            }
            state.users.save_profile(&profile).await?;
        }
    }

    if let Err(err) = state.bus.publish(FanOutMessage::StatusChange { event: event.to_wire() }).await {
        warn!(error = %err, "failed to publish status_change message");
    }

    Ok(Json(event.to_wire()))
}
