// [apps/api/src/config.rs]
//! Centralized environment loading for the `api` binary.
//! Every recognized variable is read exactly once, here, at startup.

/// Resolved configuration for the `api` binary.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub turso_auth_token: Option<String>,
    pub port: u16,
    pub bus_redis_url: String,
    pub jwt_signing_secret: String,
    pub jwt_access_token_ttl_minutes: i64,
    pub jwt_refresh_token_ttl_days: i64,
    pub upload_max_bytes: usize,
    pub cors_allowed_origins: String,
}

impl Config {
    /// Loads configuration from the process environment. Variables with no
    /// safe default (`DATABASE_URL`, `JWT_SIGNING_SECRET`) panic via
    /// `.expect(...)` if absent; everything else falls back to its documented
    /// default.
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            turso_auth_token: std::env::var("TURSO_AUTH_TOKEN").ok(),
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            bus_redis_url: std::env::var("BUS_REDIS_URL")
                .unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string()),
            jwt_signing_secret: std::env::var("JWT_SIGNING_SECRET")
                .expect("JWT_SIGNING_SECRET must be set"),
            jwt_access_token_ttl_minutes: std::env::var("JWT_ACCESS_TOKEN_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            jwt_refresh_token_ttl_days: std::env::var("JWT_REFRESH_TOKEN_TTL_DAYS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(7),
            upload_max_bytes: std::env::var("UPLOAD_MAX_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(52_428_800),
            cors_allowed_origins: std::env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "*".to_string()),
        }
    }
}
