// [libs/domain/gamification/src/lib.rs]
/*!
 * APARATO: GAMIFICATION EFFECT ENGINE
 * RESPONSABILIDAD: Conversión de transiciones de triage en reputación y badges.
 */

pub mod badge;
pub mod hooks;

pub use badge::{BadgeCatalogEntry, BADGE_CATALOG};
pub use hooks::{on_rejection, on_submission, on_verification};
