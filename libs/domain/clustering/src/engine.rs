// [libs/domain/clustering/src/engine.rs]
use crate::config::ClusteringConfig;
use crate::errors::ClusteringError;
use crate::store::{CandidateEvent, ClusterStore};
use async_trait::async_trait;
use attention_core_geo::{haversine_meters, LatLon};
use attention_domain_models::{Event, EventCluster, Severity};
use attention_domain_pipeline::CapabilityError;
use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

/// Online spatio-temporal clustering engine, bound to a live [`ClusterStore`].
/// Stateless beyond its configuration -- all membership state lives
/// in the store.
#[derive(Clone)]
pub struct ClusteringEngine {
    store: Arc<dyn ClusterStore>,
    config: ClusteringConfig,
}

impl ClusteringEngine {
    pub fn new(store: Arc<dyn ClusterStore>, config: ClusteringConfig) -> Self {
        Self { store, config }
    }

    /// `assign(E)` -- algorithm. Assigns `event` to an existing cluster
    /// or forms a new one, mutating `event.cluster_id` in place.
    #[instrument(skip(self, event), fields(event_id = %event.id))]
    pub async fn assign(&self, event: &mut Event) -> Result<(), ClusteringError> {
        let now = Utc::now();
        let since = now - Duration::minutes(self.config.recency_window_minutes);

        let candidates = self
            .store
            .candidates_in_window(event.location, since, self.config.join_radius_meters)
            .await?;

        let mut neighbors: Vec<(f64, CandidateEvent)> = candidates
            .into_iter()
            .filter(|candidate| candidate.event_id != event.id)
            .map(|candidate| (haversine_meters(candidate.location, event.location), candidate))
            .filter(|(distance, _)| *distance <= self.config.join_radius_meters)
            .collect();
        neighbors.sort_by(|a, b| a.0.partial_cmp(&b.0).expect("distances are finite"));

        if neighbors.is_empty() {
            return Ok(());
        }

        let existing_cluster = neighbors.iter().find_map(|(_, candidate)| candidate.cluster_id);
        match existing_cluster {
            Some(cluster_id) => self.add_to(event, cluster_id, now).await,
            None => {
                let members: Vec<CandidateEvent> = neighbors.into_iter().map(|(_, c)| c).collect();
                self.form_cluster(event, &members, now).await
            }
        }
    }

    async fn form_cluster(
        &self,
        event: &mut Event,
        members: &[CandidateEvent],
        now: chrono::DateTime<Utc>,
    ) -> Result<(), ClusteringError> {
        let event_count = 1 + members.len() as u32;
        let severity = escalate(event.severity, event_count, &self.config);
        let cluster = EventCluster::form(event.location, now, event_count, severity);

        self.store.create_cluster(&cluster).await?;
        self.store.set_event_cluster(event.id, Some(cluster.id)).await?;
        event.cluster_id = Some(cluster.id);

        for member in members {
            self.store.set_event_cluster(member.event_id, Some(cluster.id)).await?;
        }

        Ok(())
    }

    async fn add_to(
        &self,
        event: &mut Event,
        cluster_id: Uuid,
        now: chrono::DateTime<Utc>,
    ) -> Result<(), ClusteringError> {
        self.store.set_event_cluster(event.id, Some(cluster_id)).await?;
        event.cluster_id = Some(cluster_id);

        let event_count = self.store.count_members(cluster_id).await?;
        let mut cluster = self
            .store
            .get_cluster(cluster_id)
            .await?
            .ok_or(ClusteringError::ClusterNotFound)?;

        cluster.event_count = event_count;
        cluster.last_event_at = now;
        cluster.computed_severity = if event_count >= self.config.critical_threshold {
            Severity::Critical
        } else if event_count >= self.config.high_threshold {
            std::cmp::max(cluster.computed_severity, Severity::High)
        } else {
            cluster.computed_severity
        };

        self.store.update_cluster(&cluster).await
    }

    /// `recompute(C)` -- invoked after bulk member changes (admin tooling,
    /// reprocessing). Deletes the cluster if it has no members left;
    /// otherwise recomputes centroid and severity from live membership.
    #[instrument(skip(self))]
    pub async fn recompute(&self, cluster_id: Uuid) -> Result<(), ClusteringError> {
        let event_count = self.store.count_members(cluster_id).await?;
        if event_count == 0 {
            return self.store.delete_cluster(cluster_id).await;
        }

        let members = self.store.member_locations_and_severities(cluster_id).await?;
        let centroid = mean_centroid(members.iter().map(|(location, _)| *location));
        let max_severity = members
            .iter()
            .map(|(_, severity)| *severity)
            .max()
            .unwrap_or(Severity::Low);

        let mut cluster = self
            .store
            .get_cluster(cluster_id)
            .await?
            .ok_or(ClusteringError::ClusterNotFound)?;
        cluster.centroid = centroid;
        cluster.event_count = event_count;
        cluster.computed_severity = escalate(max_severity, event_count, &self.config);

        self.store.update_cluster(&cluster).await
    }
}

/// Applies the escalation rule to a baseline severity given a member
/// count: `>= C` escalates to Critical; `>= H` raises at least to High,
/// never lowering an already-higher severity; below `H` the baseline stands.
fn escalate(baseline: Severity, event_count: u32, config: &ClusteringConfig) -> Severity {
    if event_count >= config.critical_threshold {
        Severity::Critical
    } else if event_count >= config.high_threshold {
        std::cmp::max(baseline, Severity::High)
    } else {
        baseline
    }
}

/// Unweighted mean of a cluster's member coordinates.
fn mean_centroid(points: impl Iterator<Item = LatLon> + Clone) -> LatLon {
    let count = points.clone().count().max(1) as f64;
    let (lat_sum, lon_sum) = points.fold((0.0, 0.0), |(lat_acc, lon_acc), point| {
        (lat_acc + point.latitude, lon_acc + point.longitude)
    });
    LatLon::new(lat_sum / count, lon_sum / count).expect("mean of valid coordinates stays in range")
}

/// Narrow-seam adapter onto `attention-domain-pipeline`'s `ClusterAssigner`
/// capability so the orchestrator can hold a `ClusteringEngine` behind
/// `Arc<dyn ClusterAssigner>` without that crate depending back on this one.
#[async_trait]
impl attention_domain_pipeline::ClusterAssigner for ClusteringEngine {
    async fn assign(&self, event: &mut Event) -> Result<(), CapabilityError> {
        ClusteringEngine::assign(self, event).await.map_err(|err| CapabilityError::new(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escalate_raises_to_high_at_threshold() {
        let config = ClusteringConfig::default();
        assert_eq!(escalate(Severity::Low, 3, &config), Severity::High);
        assert_eq!(escalate(Severity::Critical, 3, &config), Severity::Critical);
    }

    #[test]
    fn escalate_raises_to_critical_at_threshold() {
        let config = ClusteringConfig::default();
        assert_eq!(escalate(Severity::Low, 5, &config), Severity::Critical);
    }

    #[test]
    fn escalate_below_threshold_keeps_baseline() {
        let config = ClusteringConfig::default();
        assert_eq!(escalate(Severity::Medium, 2, &config), Severity::Medium);
    }

    #[test]
    fn mean_centroid_averages_points() {
        let a = LatLon::new(52.0, 21.0).unwrap();
        let b = LatLon::new(52.2, 21.2).unwrap();
        let centroid = mean_centroid(vec![a, b].into_iter());
        assert!((centroid.latitude - 52.1).abs() < 1e-9);
        assert!((centroid.longitude - 21.1).abs() < 1e-9);
    }
}
