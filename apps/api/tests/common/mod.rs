// [apps/api/tests/common/mod.rs]
//! Shared black-box test harness: an in-memory `AppState` wired the same
//! way `main.rs` wires the real one, minus `Config::from_env()` and any
//! real Redis/Turso dependency.

use attention_api::prelude::{AppState, Config};
use attention_domain_auth::TokenService;
use attention_infra_bus::FanOutBus;
use attention_infra_db::{ClusterRepository, DbClient, EventRepository, JobRepository, UserRepository};
use std::sync::Arc;

/// A wired `AppState` plus the `DbClient` it was built from, so tests can
/// open their own connection for fixture setup the public API doesn't cover
/// (seeding rows with controlled timestamps, promoting a user to staff).
pub struct TestEnv {
    pub state: AppState,
    pub db: DbClient,
}

pub async fn build() -> TestEnv {
    let db = DbClient::connect(":memory:", None).await.expect("in-memory schema applies cleanly");

    let events = EventRepository::new(db.connection().unwrap());
    let clusters = ClusterRepository::new(db.connection().unwrap());
    let users = UserRepository::new(db.connection().unwrap());
    let jobs = JobRepository::new(db.connection().unwrap());

    let tokens = Arc::new(TokenService::new("test-signing-secret", 30, 7));
    let bus = Arc::new(FanOutBus::local_only());

    let config = Arc::new(Config {
        database_url: ":memory:".to_string(),
        turso_auth_token: None,
        port: 0,
        bus_redis_url: String::new(),
        jwt_signing_secret: "test-signing-secret".to_string(),
        jwt_access_token_ttl_minutes: 30,
        jwt_refresh_token_ttl_days: 7,
        upload_max_bytes: 52_428_800,
        cors_allowed_origins: "*".to_string(),
    });

    let state = AppState { events, clusters, users, jobs, bus, tokens, config };
    TestEnv { state, db }
}

/// Promotes an already-registered user to staff. There is no public API for
/// this -- `UserRepository::create` always starts an account at
/// `is_staff = 0` -- so the test reaches past the repository layer directly.
pub async fn promote_to_staff(db: &DbClient, user_id: i64) {
    db.connection()
        .unwrap()
        .execute("UPDATE users SET is_staff = 1 WHERE id = ?", libsql::params![user_id])
        .await
        .expect("promote to staff");
}

/// Builds a `multipart/form-data` body carrying a fixed boundary, one text
/// field per `(name, value)` pair, and one `media` file field with the
/// given bytes/content-type.
pub fn multipart_body(fields: &[(&str, &str)], media_bytes: &[u8], media_content_type: &str) -> Vec<u8> {
    const BOUNDARY: &str = "test-boundary-attention-map";
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes());
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        b"Content-Disposition: form-data; name=\"media\"; filename=\"upload.bin\"\r\n",
    );
    body.extend_from_slice(format!("Content-Type: {media_content_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(media_bytes);
    body.extend_from_slice(b"\r\n");
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn multipart_content_type() -> String {
    "multipart/form-data; boundary=test-boundary-attention-map".to_string()
}

/// A minimal valid 1x1 PNG, used as upload fixture media across scenarios.
pub const ONE_PIXEL_PNG: &[u8] = &[
    0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x48, 0x44, 0x52,
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1f, 0x15, 0xc4,
    0x89, 0x00, 0x00, 0x00, 0x0a, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9c, 0x63, 0x00, 0x01, 0x00, 0x00,
    0x05, 0x00, 0x01, 0x0d, 0x0a, 0x2d, 0xb4, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4e, 0x44, 0xae,
    0x42, 0x60, 0x82,
];
