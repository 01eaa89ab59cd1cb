// [apps/api/src/handlers/clusters.rs]
//! Cluster listing.

use crate::error::ApiError;
use crate::state::AppState;
use attention_core_geo::BoundingBox;
use attention_domain_models::{ClusterOut, EventCluster};
use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

/// Clusters are only surfaced once they have more than one member; a
/// singleton is not yet a meaningful aggregate to a dashboard.
const MIN_DASHBOARD_EVENT_COUNT: u32 = 2;
const MAX_LIST_LIMIT: usize = 100;

#[derive(Deserialize)]
pub struct ListQuery {
    bounds: Option<String>,
}

/// `GET /clusters`: a bare array, matching `EventOut`'s own listing
/// shape rather than an object-wrapped body.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>) -> Result<Json<Vec<ClusterOut>>, ApiError> {
    let bounds = query.bounds.as_deref().and_then(|raw| BoundingBox::parse_csv(raw).ok());
    let clusters = state.clusters.list(bounds).await?;
    let clusters = clusters
        .into_iter()
        .filter(|cluster| cluster.event_count >= MIN_DASHBOARD_EVENT_COUNT)
        .take(MAX_LIST_LIMIT)
        .map(|cluster: EventCluster| cluster.to_wire())
        .collect();
    Ok(Json(clusters))
}
