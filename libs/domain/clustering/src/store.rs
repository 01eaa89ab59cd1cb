// [libs/domain/clustering/src/store.rs]
use crate::errors::ClusteringError;
use async_trait::async_trait;
use attention_core_geo::LatLon;
use attention_domain_models::{EventCluster, Severity};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A candidate neighbor read from the event store, cheap enough to fetch in
/// bulk for the time window before the engine applies the exact geodesic
/// distance filter.
#[derive(Debug, Clone)]
pub struct CandidateEvent {
    pub event_id: Uuid,
    pub location: LatLon,
    pub cluster_id: Option<Uuid>,
    pub severity: Severity,
}

/// The persistence seam the clustering engine needs from the event/cluster
/// store: no owning pointer from cluster to events -- membership is
/// queried in reverse through this trait.
#[async_trait]
pub trait ClusterStore: Send + Sync {
    /// Events created at or after `since`, restricted to a cheap pre-filter
    /// radius so the engine doesn't have to haversine-scan the whole table;
    /// the engine still re-filters by exact distance.
    async fn candidates_in_window(
        &self,
        near: LatLon,
        since: DateTime<Utc>,
        max_radius_m: f64) -> Result<Vec<CandidateEvent>, ClusteringError>;

    async fn create_cluster(&self, cluster: &EventCluster) -> Result<(), ClusteringError>;
    async fn update_cluster(&self, cluster: &EventCluster) -> Result<(), ClusteringError>;
    async fn delete_cluster(&self, cluster_id: Uuid) -> Result<(), ClusteringError>;
    async fn get_cluster(&self, cluster_id: Uuid) -> Result<Option<EventCluster>, ClusteringError>;

    async fn set_event_cluster(&self, event_id: Uuid, cluster_id: Option<Uuid>) -> Result<(), ClusteringError>;
    async fn count_members(&self, cluster_id: Uuid) -> Result<u32, ClusteringError>;
    async fn member_locations_and_severities(
        &self,
        cluster_id: Uuid) -> Result<Vec<(LatLon, Severity)>, ClusteringError>;
}
