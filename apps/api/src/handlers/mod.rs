// [apps/api/src/handlers/mod.rs]
pub mod admin;
pub mod auth;
pub mod clusters;
pub mod events;
pub mod gamification;
pub mod stats;
pub mod stream;
