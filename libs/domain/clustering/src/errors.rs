// [libs/domain/clustering/src/errors.rs]
use thiserror::Error;

/// Failures surfaced while assigning an event to a cluster.
#[derive(Error, Debug, Clone)]
pub enum ClusteringError {
    #[error("cluster store failure: {0}")]
    StoreFailure(String),

    #[error("cluster disappeared mid-assignment")]
    ClusterNotFound,
}
