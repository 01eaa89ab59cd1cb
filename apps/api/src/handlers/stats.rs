// [apps/api/src/handlers/stats.rs]
//! Summary statistics.

use crate::error::ApiError;
use crate::state::AppState;
use attention_domain_models::{Category, SummaryStats};
use axum::extract::State;
use axum::Json;
use std::collections::HashMap;

/// `GET /stats/summary`: event counts grouped by status, category, and
/// severity, plus the count of clusters currently surfaced on the dashboard.
pub async fn summary(State(state): State<AppState>) -> Result<Json<SummaryStats>, ApiError> {
    let events = state.events.summary_counts().await?;
    let clusters = state.clusters.list(None).await?;

    let mut events_by_status: HashMap<String, u64> = HashMap::new();
    let mut events_by_category: HashMap<String, u64> = HashMap::new();
    let mut events_by_severity: HashMap<String, u64> = HashMap::new();

    for event in &events {
        *events_by_status.entry(event.status.as_str().to_string()).or_insert(0) += 1;
        if event.category != Category::Unclassified {
            *events_by_category.entry(event.category.as_str().to_string()).or_insert(0) += 1;
        }
        *events_by_severity.entry((u8::from(event.severity)).to_string()).or_insert(0) += 1;
    }

    // Active clusters use the same `event_count > 1` threshold as the
    // `/clusters` listing -- a cluster that recomputed down to a
    // single member persists as a row but is not an "active" aggregate.
    let active_clusters = clusters.iter().filter(|cluster| cluster.event_count > 1).count() as u64;

    Ok(Json(SummaryStats {
        total_events: events.len() as u64,
        events_by_status,
        events_by_category,
        events_by_severity,
        active_clusters,
    }))
}
