// [libs/domain/clustering/src/lib.rs]
/*!
 * APARATO: SPATIO-TEMPORAL CLUSTERING ENGINE
 * RESPONSABILIDAD: Asignación online de eventos a clusters con escalamiento de severidad.
 */

pub mod config;
pub mod engine;
pub mod errors;
pub mod store;

pub use config::ClusteringConfig;
pub use engine::ClusteringEngine;
pub use errors::ClusteringError;
pub use store::{CandidateEvent, ClusterStore};
