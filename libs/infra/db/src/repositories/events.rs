// [libs/infra/db/src/repositories/events.rs]
use crate::errors::DbError;
use async_trait::async_trait;
use attention_core_geo::{BoundingBox, LatLon};
use attention_domain_models::{Category, Event, MediaKind, Severity, Status};
use chrono::{DateTime, Utc};
use libsql::{params, Connection, Row};
use uuid::Uuid;

/// Filters accepted by `GET /events`. Every field is optional;
/// absent/invalid filter values are treated the same -- dropped.
#[derive(Debug, Clone, Default)]
pub struct EventFilters {
    pub bounds: Option<BoundingBox>,
    pub statuses: Vec<Status>,
    pub severities: Vec<Severity>,
    pub categories: Vec<Category>,
    pub since: Option<DateTime<Utc>>,
}

/// Persistence for [`Event`] rows: the query/command layer's direct
/// dependency, and (via the `attention_domain_pipeline::EventRepository`
/// impl below) the pipeline's narrow load/save seam.
#[derive(Clone)]
pub struct EventRepository {
    conn: Connection,
}

impl EventRepository {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    pub async fn insert(&self, event: &Event) -> Result<(), DbError> {
        self.conn
            .execute(
                r#"INSERT INTO events (
                id, created_at, latitude, longitude, address, description,
                media_url, media_kind, thumbnail_url, transcription,
                category, subcategory, severity, ai_confidence, classification_reasoning,
                cluster_id, status, reviewed_by, reviewed_at, reporter_id
            ) VALUES (?,?,?,?,?,?,?,?,?,?,?,?,?,?,?,?,?,?,?,?)"#,
                params![
                    event.id.to_string(),
                    event.created_at.to_rfc3339(),
                    event.location.latitude,
                    event.location.longitude,
                    event.address.clone(),
                    event.description.clone(),
                    event.media_url.clone(),
                    event.media_kind.as_str(),
                    event.thumbnail_url.clone(),
                    event.transcription.clone(),
                    event.category.as_str(),
                    event.subcategory.clone(),
                    u8::from(event.severity) as i64,
                    event.ai_confidence,
                    event.classification_reasoning.clone(),
                    event.cluster_id.map(|id| id.to_string()),
                    event.status.as_str(),
                    event.reviewed_by,
                    event.reviewed_at.map(|ts| ts.to_rfc3339()),
                    event.reporter_id,
                ],
            )
            .await?;
        Ok(())
    }

    /// Last-writer-wins full-row update, used by the pipeline after each
    /// mutating stage and by `reprocess`.
    pub async fn update(&self, event: &Event) -> Result<(), DbError> {
        self.conn
            .execute(
                r#"UPDATE events SET
                address = ?, description = ?, media_url = ?, media_kind = ?,
                thumbnail_url = ?, transcription = ?, category = ?, subcategory = ?,
                severity = ?, ai_confidence = ?, classification_reasoning = ?,
                cluster_id = ?, status = ?, reviewed_by = ?, reviewed_at = ?
                WHERE id = ?"#,
                params![
                    event.address.clone(),
                    event.description.clone(),
                    event.media_url.clone(),
                    event.media_kind.as_str(),
                    event.thumbnail_url.clone(),
                    event.transcription.clone(),
                    event.category.as_str(),
                    event.subcategory.clone(),
                    u8::from(event.severity) as i64,
                    event.ai_confidence,
                    event.classification_reasoning.clone(),
                    event.cluster_id.map(|id| id.to_string()),
                    event.status.as_str(),
                    event.reviewed_by,
                    event.reviewed_at.map(|ts| ts.to_rfc3339()),
                    event.id.to_string(),
                ],
            )
            .await?;
        Ok(())
    }

    /// Operator-triage-only update: writes `status`, `reviewed_by`,
    /// `reviewed_at` exclusively, never touching pipeline-owned fields.
    pub async fn update_status(
        &self,
        id: Uuid,
        status: Status,
        reviewed_by: i64,
        reviewed_at: DateTime<Utc>,
    ) -> Result<(), DbError> {
        self.conn
            .execute(
                "UPDATE events SET status = ?, reviewed_by = ?, reviewed_at = ? WHERE id = ?",
                params![status.as_str(), reviewed_by, reviewed_at.to_rfc3339(), id.to_string()],
            )
            .await?;
        Ok(())
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Event>, DbError> {
        let mut rows = self.conn.query("SELECT * FROM events WHERE id = ?", params![id.to_string()]).await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_event(&row)?)),
            None => Ok(None),
        }
    }

    /// `GET /events` listing: filters compose as an intersection, newest-first,
    /// with `limit`/`offset` pagination.
    pub async fn list(&self, filters: &EventFilters, limit: u32, offset: u32) -> Result<(Vec<Event>, u64), DbError> {
        let all = self.filtered_rows(filters).await?;
        let total = all.len() as u64;
        let page = all.into_iter().skip(offset as usize).take(limit as usize).collect();
        Ok((page, total))
    }

    async fn filtered_rows(&self, filters: &EventFilters) -> Result<Vec<Event>, DbError> {
        let mut rows = self.conn.query("SELECT * FROM events ORDER BY created_at DESC", ()).await?;
        let mut events = Vec::new();
        while let Some(row) = rows.next().await? {
            let event = row_to_event(&row)?;
            if passes_filters(&event, filters) {
                events.push(event);
            }
        }
        Ok(events)
    }

    /// Counts grouped by status/category/severity for `/stats/summary`.
    pub async fn summary_counts(&self) -> Result<Vec<Event>, DbError> {
        self.filtered_rows(&EventFilters::default()).await
    }
}

fn passes_filters(event: &Event, filters: &EventFilters) -> bool {
    if let Some(bounds) = filters.bounds {
        if !bounds.contains(event.location) {
            return false;
        }
    }
    if !filters.statuses.is_empty() && !filters.statuses.contains(&event.status) {
        return false;
    }
    if !filters.severities.is_empty() && !filters.severities.contains(&event.severity) {
        return false;
    }
    if !filters.categories.is_empty() && !filters.categories.contains(&event.category) {
        return false;
    }
    if let Some(since) = filters.since {
        if event.created_at < since {
            return false;
        }
    }
    true
}

pub(crate) fn row_to_event(row: &Row) -> Result<Event, DbError> {
    let id: String = row.get(0)?;
    let created_at: String = row.get(1)?;
    let latitude: f64 = row.get(2)?;
    let longitude: f64 = row.get(3)?;
    let address: Option<String> = row.get(4)?;
    let description: String = row.get(5)?;
    let media_url: Option<String> = row.get(6)?;
    let media_kind: String = row.get(7)?;
    let thumbnail_url: Option<String> = row.get(8)?;
    let transcription: Option<String> = row.get(9)?;
    let category: String = row.get(10)?;
    let subcategory: String = row.get(11)?;
    let severity: i64 = row.get(12)?;
    let ai_confidence: Option<f64> = row.get(13)?;
    let classification_reasoning: Option<String> = row.get(14)?;
    let cluster_id: Option<String> = row.get(15)?;
    let status: String = row.get(16)?;
    let reviewed_by: Option<i64> = row.get(17)?;
    let reviewed_at: Option<String> = row.get(18)?;
    let reporter_id: Option<i64> = row.get(19)?;

    Ok(Event {
        id: Uuid::parse_str(&id).map_err(|e| DbError::Mapping(e.to_string()))?,
        created_at: DateTime::parse_from_rfc3339(&created_at)
            .map_err(|e| DbError::Mapping(e.to_string()))?
            .with_timezone(&Utc),
        location: LatLon::new(latitude, longitude).map_err(|e| DbError::Mapping(e.to_string()))?,
        address,
        description,
        media_url,
        media_kind: match media_kind.as_str() {
            "video" => MediaKind::Video,
            _ => MediaKind::Image,
        },
        thumbnail_url,
        transcription,
        category: Category::coerce(&category),
        subcategory,
        severity: Severity::clamp(severity),
        ai_confidence,
        classification_reasoning,
        cluster_id: cluster_id.map(|id| Uuid::parse_str(&id)).transpose().map_err(|e| DbError::Mapping(e.to_string()))?,
        status: Status::parse(&status).unwrap_or(Status::New),
        reviewed_by,
        reviewed_at: reviewed_at
            .map(|ts| DateTime::parse_from_rfc3339(&ts).map(|dt| dt.with_timezone(&Utc)))
            .transpose()
            .map_err(|e| DbError::Mapping(e.to_string()))?,
        reporter_id,
    })
}

#[async_trait]
impl attention_domain_pipeline::EventRepository for EventRepository {
    async fn load(&self, id: Uuid) -> Result<Event, attention_domain_pipeline::CapabilityError> {
        self.get(id)
            .await
            .map_err(|e| attention_domain_pipeline::CapabilityError::new(e.to_string()))?
            .ok_or_else(|| attention_domain_pipeline::CapabilityError::new("event not found"))
    }

    async fn save(&self, event: &Event) -> Result<(), attention_domain_pipeline::CapabilityError> {
        self.update(event).await.map_err(|e| attention_domain_pipeline::CapabilityError::new(e.to_string()))
    }
}
