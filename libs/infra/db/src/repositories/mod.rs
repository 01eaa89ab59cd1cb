// [libs/infra/db/src/repositories/mod.rs]
pub mod clusters;
pub mod events;
pub mod jobs;
pub mod users;

pub use clusters::ClusterRepository;
pub use events::{EventFilters, EventRepository};
pub use jobs::{JobKind, JobRepository, PipelineJob, JOB_BACKOFF, MAX_JOB_ATTEMPTS};
pub use users::UserRepository;
