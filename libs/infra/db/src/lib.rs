// [libs/infra/db/src/lib.rs]
/*!
 * APARATO: PERSISTENCE LAYER
 * RESPONSABILIDAD: Conexión libSQL/Turso, migraciones y repositorios.
 */

pub mod client;
pub mod errors;
pub mod repositories;
mod schema;

pub use client::DbClient;
pub use errors::DbError;
pub use repositories::{
    ClusterRepository, EventFilters, EventRepository, JobKind, JobRepository, PipelineJob,
    UserRepository, JOB_BACKOFF, MAX_JOB_ATTEMPTS,
};
