// [libs/domain/models/src/cluster.rs]
use crate::enums::Severity;
use attention_core_geo::LatLon;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use typeshare::typeshare;
use uuid::Uuid;

/// Default join radius applied to a freshly formed cluster's `radius_meters`.
pub const DEFAULT_CLUSTER_RADIUS_METERS: f64 = 100.0;

/// A set of spatially and temporally co-located events.
///
/// `EventCluster` owns only its aggregate fields; it holds no owning pointer
/// to member events — membership is a nullable `Event.cluster_id` foreign
/// key, queried in reverse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventCluster {
    pub id: Uuid,
    pub centroid: LatLon,
    pub radius_meters: f64,
    pub event_count: u32,
    pub first_event_at: DateTime<Utc>,
    pub last_event_at: DateTime<Utc>,
    pub computed_severity: Severity,
}

impl EventCluster {
    /// Forms a brand new cluster seeded by one event's location and severity.
    pub fn form(centroid: LatLon, now: DateTime<Utc>, event_count: u32, computed_severity: Severity) -> Self {
        Self {
            id: Uuid::new_v4(),
            centroid,
            radius_meters: DEFAULT_CLUSTER_RADIUS_METERS,
            event_count,
            first_event_at: now,
            last_event_at: now,
            computed_severity,
        }
    }

    /// Projects this aggregate to its wire representation (`ClusterOut`).
    pub fn to_wire(&self) -> ClusterOut {
        ClusterOut {
            id: self.id,
            latitude: self.centroid.latitude,
            longitude: self.centroid.longitude,
            event_count: self.event_count,
            computed_severity: self.computed_severity.into(),
            first_event_at: self.first_event_at,
            last_event_at: self.last_event_at,
        }
    }
}

/// Wire shape of an EventCluster, matching `ClusterOut`.
#[typeshare]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterOut {
    pub id: Uuid,
    pub latitude: f64,
    pub longitude: f64,
    pub event_count: u32,
    #[typeshare(serialized_as = "number")]
    pub computed_severity: u8,
    pub first_event_at: DateTime<Utc>,
    pub last_event_at: DateTime<Utc>,
}
