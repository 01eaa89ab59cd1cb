// [libs/domain/models/src/stats.rs]
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use typeshare::typeshare;

/// Wire shape of `GET /stats/summary`.
#[typeshare]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryStats {
    #[typeshare(serialized_as = "number")]
    pub total_events: u64,
    pub events_by_status: HashMap<String, u64>,
    pub events_by_category: HashMap<String, u64>,
    pub events_by_severity: HashMap<String, u64>,
    #[typeshare(serialized_as = "number")]
    pub active_clusters: u64,
}
