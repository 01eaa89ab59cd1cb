// [libs/domain/models/src/event.rs]
use crate::enums::{Category, MediaKind, Severity, Status};
use attention_core_geo::LatLon;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use typeshare::typeshare;
use uuid::Uuid;

/// A single citizen-submitted incident report.
///
/// Pipeline-produced fields (`media_url`, `thumbnail_url`, `transcription`,
/// `category`, `subcategory`, `severity`, `ai_confidence`, `classification_reasoning`,
/// `cluster_id`) are owned exclusively by the pipeline orchestrator;
/// triage fields (`status`, `reviewed_by`, `reviewed_at`) are owned exclusively by
/// the operator status-update command. The two writer sets never overlap, so the
/// last-writer-wins policy never produces a true conflict.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub location: LatLon,
    pub address: Option<String>,
    pub description: String,

    pub media_url: Option<String>,
    pub media_kind: MediaKind,
    pub thumbnail_url: Option<String>,
    pub transcription: Option<String>,

    pub category: Category,
    pub subcategory: String,
    pub severity: Severity,
    pub ai_confidence: Option<f64>,
    pub classification_reasoning: Option<String>,

    pub cluster_id: Option<Uuid>,
    pub status: Status,
    pub reviewed_by: Option<i64>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub reporter_id: Option<i64>,
}

impl Event {
    /// Builds the `NEW` skeleton row written by the upload handler, before any
    /// pipeline stage has run. Severity starts at `Low` and category at
    /// `Unclassified` until the classify stage overwrites them.
    pub fn new_skeleton(
        location: LatLon,
        description: String,
        media_kind: MediaKind,
        reporter_id: Option<i64>) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            location,
            address: None,
            description,
            media_url: None,
            media_kind,
            thumbnail_url: None,
            transcription: None,
            category: Category::Unclassified,
            subcategory: String::new(),
            severity: Severity::Low,
            ai_confidence: None,
            classification_reasoning: None,
            cluster_id: None,
            status: Status::New,
            reviewed_by: None,
            reviewed_at: None,
            reporter_id,
        }
    }

    /// Projects this entity to its wire representation (`EventOut`).
    pub fn to_wire(&self) -> EventOut {
        EventOut {
            id: self.id,
            created_at: self.created_at,
            latitude: self.location.latitude,
            longitude: self.location.longitude,
            address: self.address.clone(),
            description: self.description.clone(),
            media_url: self.media_url.clone(),
            media_type: self.media_kind.as_str().to_string(),
            thumbnail_url: self.thumbnail_url.clone(),
            transcription: self.transcription.clone().unwrap_or_default(),
            category: self.category.as_str().to_string(),
            subcategory: self.subcategory.clone(),
            severity: self.severity.into(),
            ai_confidence: self.ai_confidence,
            cluster_id: self.cluster_id,
            status: self.status.as_str().to_string(),
            reviewed_by_id: self.reviewed_by,
            reviewed_at: self.reviewed_at,
        }
    }
}

/// Wire shape of an Event, matching `EventOut` exactly.
#[typeshare]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventOut {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    pub address: Option<String>,
    pub description: String,
    pub media_url: Option<String>,
    pub media_type: String,
    pub thumbnail_url: Option<String>,
    pub transcription: String,
    pub category: String,
    pub subcategory: String,
    #[typeshare(serialized_as = "number")]
    pub severity: u8,
    pub ai_confidence: Option<f64>,
    pub cluster_id: Option<Uuid>,
    pub status: String,
    pub reviewed_by_id: Option<i64>,
    pub reviewed_at: Option<DateTime<Utc>>,
}
