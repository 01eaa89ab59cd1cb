// [apps/api/src/state.rs]
//! Shared application state for the `api` binary. There is no `SystemMode`/
//! maintenance-gate machinery here -- the query/command layer has no
//! readiness gate; the database connection either exists (it was required
//! to construct this state) or the process never started.

use crate::config::Config;
use attention_domain_auth::TokenService;
use attention_infra_bus::FanOutBus;
use attention_infra_db::{ClusterRepository, EventRepository, JobRepository, UserRepository};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub events: EventRepository,
    pub clusters: ClusterRepository,
    pub users: UserRepository,
    pub jobs: JobRepository,
    pub bus: Arc<FanOutBus>,
    pub tokens: Arc<TokenService>,
    pub config: Arc<Config>,
}
