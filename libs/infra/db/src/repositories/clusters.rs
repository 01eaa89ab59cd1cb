// [libs/infra/db/src/repositories/clusters.rs]
use crate::errors::DbError;
use async_trait::async_trait;
use attention_core_geo::{haversine_meters, BoundingBox, LatLon};
use attention_domain_clustering::{CandidateEvent, ClusterStore, ClusteringError};
use attention_domain_models::{EventCluster, Severity};
use chrono::{DateTime, Utc};
use libsql::{params, Connection, Row};
use uuid::Uuid;

/// Persistence for [`EventCluster`] aggregates and the reverse-membership
/// queries the clustering engine needs.
#[derive(Clone)]
pub struct ClusterRepository {
    conn: Connection,
}

impl ClusterRepository {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<EventCluster>, DbError> {
        let mut rows = self.conn.query("SELECT * FROM clusters WHERE id = ?", params![id.to_string()]).await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_cluster(&row)?)),
            None => Ok(None),
        }
    }

    /// `GET /clusters` listing, optionally restricted to a map viewport.
    pub async fn list(&self, bounds: Option<BoundingBox>) -> Result<Vec<EventCluster>, DbError> {
        let mut rows = self.conn.query("SELECT * FROM clusters ORDER BY last_event_at DESC", ()).await?;
        let mut clusters = Vec::new();
        while let Some(row) = rows.next().await? {
            let cluster = row_to_cluster(&row)?;
            if bounds.map(|b| b.contains(cluster.centroid)).unwrap_or(true) {
                clusters.push(cluster);
            }
        }
        Ok(clusters)
    }
}

fn row_to_cluster(row: &Row) -> Result<EventCluster, DbError> {
    let id: String = row.get(0)?;
    let centroid_lat: f64 = row.get(1)?;
    let centroid_lon: f64 = row.get(2)?;
    let radius_meters: f64 = row.get(3)?;
    let event_count: i64 = row.get(4)?;
    let first_event_at: String = row.get(5)?;
    let last_event_at: String = row.get(6)?;
    let computed_severity: i64 = row.get(7)?;

    Ok(EventCluster {
        id: Uuid::parse_str(&id).map_err(|e| DbError::Mapping(e.to_string()))?,
        centroid: LatLon::new(centroid_lat, centroid_lon).map_err(|e| DbError::Mapping(e.to_string()))?,
        radius_meters,
        event_count: event_count as u32,
        first_event_at: parse_ts(&first_event_at)?,
        last_event_at: parse_ts(&last_event_at)?,
        computed_severity: Severity::clamp(computed_severity),
    })
}

fn parse_ts(raw: &str) -> Result<DateTime<Utc>, DbError> {
    DateTime::parse_from_rfc3339(raw).map(|dt| dt.with_timezone(&Utc)).map_err(|e| DbError::Mapping(e.to_string()))
}

#[async_trait]
impl ClusterStore for ClusterRepository {
    async fn candidates_in_window(
        &self,
        near: LatLon,
        since: DateTime<Utc>,
        max_radius_m: f64,
    ) -> Result<Vec<CandidateEvent>, ClusteringError> {
        let mut rows = self
            .conn
            .query(
                "SELECT id, latitude, longitude, cluster_id, severity FROM events WHERE created_at >= ?",
                params![since.to_rfc3339()],
            )
            .await
            .map_err(|e| ClusteringError::StoreFailure(e.to_string()))?;

        let mut candidates = Vec::new();
        loop {
            let row = rows.next().await.map_err(|e| ClusteringError::StoreFailure(e.to_string()))?;
            let Some(row) = row else { break };

            let id: String = row.get(0).map_err(|e| ClusteringError::StoreFailure(e.to_string()))?;
            let lat: f64 = row.get(1).map_err(|e| ClusteringError::StoreFailure(e.to_string()))?;
            let lon: f64 = row.get(2).map_err(|e| ClusteringError::StoreFailure(e.to_string()))?;
            let cluster_id: Option<String> = row.get(3).map_err(|e| ClusteringError::StoreFailure(e.to_string()))?;
            let severity: i64 = row.get(4).map_err(|e| ClusteringError::StoreFailure(e.to_string()))?;

            let Ok(location) = LatLon::new(lat, lon) else { continue };
            // Cheap pre-filter by a generous bounding box before the engine's
            // exact haversine re-check.
            if haversine_meters(location, near) > max_radius_m * 4.0 {
                continue;
            }

            candidates.push(CandidateEvent {
                event_id: Uuid::parse_str(&id).map_err(|e| ClusteringError::StoreFailure(e.to_string()))?,
                location,
                cluster_id: cluster_id
                    .map(|id| Uuid::parse_str(&id))
                    .transpose()
                    .map_err(|e| ClusteringError::StoreFailure(e.to_string()))?,
                severity: Severity::clamp(severity),
            });
        }
        Ok(candidates)
    }

    async fn create_cluster(&self, cluster: &EventCluster) -> Result<(), ClusteringError> {
        self.conn
            .execute(
                r#"INSERT INTO clusters (
                id, centroid_lat, centroid_lon, radius_meters, event_count,
                first_event_at, last_event_at, computed_severity
            ) VALUES (?,?,?,?,?,?,?,?)"#,
                params![
                    cluster.id.to_string(),
                    cluster.centroid.latitude,
                    cluster.centroid.longitude,
                    cluster.radius_meters,
                    cluster.event_count as i64,
                    cluster.first_event_at.to_rfc3339(),
                    cluster.last_event_at.to_rfc3339(),
                    u8::from(cluster.computed_severity) as i64,
                ],
            )
            .await
            .map_err(|e| ClusteringError::StoreFailure(e.to_string()))?;
        Ok(())
    }

    async fn update_cluster(&self, cluster: &EventCluster) -> Result<(), ClusteringError> {
        self.conn
            .execute(
                r#"UPDATE clusters SET
                centroid_lat = ?, centroid_lon = ?, event_count = ?,
                last_event_at = ?, computed_severity = ?
                WHERE id = ?"#,
                params![
                    cluster.centroid.latitude,
                    cluster.centroid.longitude,
                    cluster.event_count as i64,
                    cluster.last_event_at.to_rfc3339(),
                    u8::from(cluster.computed_severity) as i64,
                    cluster.id.to_string(),
                ],
            )
            .await
            .map_err(|e| ClusteringError::StoreFailure(e.to_string()))?;
        Ok(())
    }

    async fn delete_cluster(&self, cluster_id: Uuid) -> Result<(), ClusteringError> {
        self.conn
            .execute("DELETE FROM clusters WHERE id = ?", params![cluster_id.to_string()])
            .await
            .map_err(|e| ClusteringError::StoreFailure(e.to_string()))?;
        Ok(())
    }

    async fn get_cluster(&self, cluster_id: Uuid) -> Result<Option<EventCluster>, ClusteringError> {
        self.get(cluster_id).await.map_err(|e| ClusteringError::StoreFailure(e.to_string()))
    }

    async fn set_event_cluster(&self, event_id: Uuid, cluster_id: Option<Uuid>) -> Result<(), ClusteringError> {
        self.conn
            .execute(
                "UPDATE events SET cluster_id = ? WHERE id = ?",
                params![cluster_id.map(|id| id.to_string()), event_id.to_string()],
            )
            .await
            .map_err(|e| ClusteringError::StoreFailure(e.to_string()))?;
        Ok(())
    }

    async fn count_members(&self, cluster_id: Uuid) -> Result<u32, ClusteringError> {
        let mut rows = self
            .conn
            .query("SELECT COUNT(*) FROM events WHERE cluster_id = ?", params![cluster_id.to_string()])
            .await
            .map_err(|e| ClusteringError::StoreFailure(e.to_string()))?;
        let row = rows
            .next()
            .await
            .map_err(|e| ClusteringError::StoreFailure(e.to_string()))?
            .ok_or_else(|| ClusteringError::StoreFailure("count query returned no row".to_string()))?;
        let count: i64 = row.get(0).map_err(|e| ClusteringError::StoreFailure(e.to_string()))?;
        Ok(count as u32)
    }

    async fn member_locations_and_severities(&self, cluster_id: Uuid) -> Result<Vec<(LatLon, Severity)>, ClusteringError> {
        let mut rows = self
            .conn
            .query("SELECT latitude, longitude, severity FROM events WHERE cluster_id = ?", params![cluster_id.to_string()])
            .await
            .map_err(|e| ClusteringError::StoreFailure(e.to_string()))?;

        let mut members = Vec::new();
        loop {
            let row = rows.next().await.map_err(|e| ClusteringError::StoreFailure(e.to_string()))?;
            let Some(row) = row else { break };
            let lat: f64 = row.get(0).map_err(|e| ClusteringError::StoreFailure(e.to_string()))?;
            let lon: f64 = row.get(1).map_err(|e| ClusteringError::StoreFailure(e.to_string()))?;
            let severity: i64 = row.get(2).map_err(|e| ClusteringError::StoreFailure(e.to_string()))?;
            let Ok(location) = LatLon::new(lat, lon) else { continue };
            members.push((location, Severity::clamp(severity)));
        }
        Ok(members)
    }
}
