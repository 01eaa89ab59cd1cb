// [libs/domain/models/src/lib.rs]
/*!
 * =================================================================
 * APARATO: DOMAIN MODELS HUB (V1.0)
 * CLASIFICACIÓN: DOMAIN MODELS (ESTRATO L2)
 * RESPONSABILIDAD: DEFINICIÓN SOBERANA DE ENTIDADES Y DTOs DE ALAMBRE
 *
 * Single source of truth para Event, EventCluster, User y UserProfile,
 * así como los DTOs serializados que cruzan la frontera HTTP y el bus
 * de difusión. Compartido por apps/api, apps/worker y libs/infra/db.
 * =================================================================
 */

pub mod enums;
pub mod event;
pub mod cluster;
pub mod user;
pub mod bus;
pub mod stats;

pub use enums::{Category, MediaKind, Severity, Status};
pub use event::{Event, EventOut};
pub use cluster::{ClusterOut, EventCluster};
pub use user::{User, UserProfile, UserProfileOut};
pub use bus::FanOutMessage;
pub use stats::SummaryStats;
