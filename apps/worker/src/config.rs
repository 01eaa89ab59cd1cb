// [apps/worker/src/config.rs]
//! Centralized environment loading for the `worker` binary.
//! Every recognized variable is read exactly once, here, at startup.

use attention_infra_media_tools::MediaToolsConfig;
use attention_infra_object_store::ObjectStoreConfig;

/// Resolved configuration for the `worker` binary.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub turso_auth_token: Option<String>,
    pub bus_redis_url: String,

    pub object_store_endpoint: Option<String>,
    pub object_store_access_key: Option<String>,
    pub object_store_secret_key: Option<String>,
    pub object_store_bucket: String,
    pub object_store_use_tls: bool,

    pub openrouter_api_key: Option<String>,
    pub openrouter_model: String,
    pub groq_api_key: Option<String>,
    pub groq_transcription_model: String,

    pub ffmpeg_path: String,
    pub ffprobe_path: String,
    pub thumbnail_width: u32,
    pub thumbnail_quality: u32,

    pub cluster_join_radius_meters: f64,
    pub cluster_recency_window_minutes: i64,
    pub cluster_high_threshold: u32,
    pub cluster_critical_threshold: u32,

    pub pipeline_max_retries: i64,
    pub pipeline_retry_backoff_seconds: i64,
    /// The bound on concurrently in-flight pipeline jobs this process will
    /// run. Defaults to the host's CPU count, the same heuristic the
    /// original worker pool used for its thread count.
    pub worker_concurrency: usize,
    /// How long the poller sleeps after finding the queue empty before
    /// checking again.
    pub poll_interval_millis: u64,
}

impl Config {
    /// Loads configuration from the process environment. Variables with no
    /// safe default (`DATABASE_URL`) panic via `.expect(...)` if absent;
    /// everything else falls back to its documented default.
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            turso_auth_token: std::env::var("TURSO_AUTH_TOKEN").ok(),
            bus_redis_url: std::env::var("BUS_REDIS_URL")
                .unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string()),

            object_store_endpoint: std::env::var("OBJECT_STORE_ENDPOINT").ok(),
            object_store_access_key: std::env::var("OBJECT_STORE_ACCESS_KEY").ok(),
            object_store_secret_key: std::env::var("OBJECT_STORE_SECRET_KEY").ok(),
            object_store_bucket: std::env::var("OBJECT_STORE_BUCKET")
                .unwrap_or_else(|_| "attention-map-media".to_string()),
            object_store_use_tls: std::env::var("OBJECT_STORE_USE_TLS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),

            openrouter_api_key: std::env::var("OPENROUTER_API_KEY").ok(),
            openrouter_model: std::env::var("OPENROUTER_MODEL")
                .unwrap_or_else(|_| "anthropic/claude-3-haiku".to_string()),
            groq_api_key: std::env::var("GROQ_API_KEY").ok(),
            groq_transcription_model: std::env::var("GROQ_TRANSCRIPTION_MODEL")
                .unwrap_or_else(|_| "whisper-large-v3".to_string()),

            ffmpeg_path: std::env::var("FFMPEG_PATH").unwrap_or_else(|_| "ffmpeg".to_string()),
            ffprobe_path: std::env::var("FFPROBE_PATH").unwrap_or_else(|_| "ffprobe".to_string()),
            thumbnail_width: std::env::var("THUMBNAIL_WIDTH")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(640),
            thumbnail_quality: std::env::var("THUMBNAIL_QUALITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(85),

            cluster_join_radius_meters: std::env::var("CLUSTER_JOIN_RADIUS_METERS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(100.0),
            cluster_recency_window_minutes: std::env::var("CLUSTER_RECENCY_WINDOW_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            cluster_high_threshold: std::env::var("CLUSTER_HIGH_THRESHOLD")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3),
            cluster_critical_threshold: std::env::var("CLUSTER_CRITICAL_THRESHOLD")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),

            pipeline_max_retries: std::env::var("PIPELINE_MAX_RETRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3),
            pipeline_retry_backoff_seconds: std::env::var("PIPELINE_RETRY_BACKOFF_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
            worker_concurrency: std::env::var("PIPELINE_WORKER_CONCURRENCY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(|| num_cpus::get().max(1)),
            poll_interval_millis: std::env::var("PIPELINE_POLL_INTERVAL_MILLIS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1_000),
        }
    }

    pub fn object_store_config(&self) -> Option<ObjectStoreConfig> {
        Some(ObjectStoreConfig {
            endpoint: self.object_store_endpoint.clone()?,
            access_key: self.object_store_access_key.clone()?,
            secret_key: self.object_store_secret_key.clone()?,
            bucket: self.object_store_bucket.clone(),
            use_tls: self.object_store_use_tls,
        })
    }

    pub fn media_tools_config(&self) -> MediaToolsConfig {
        MediaToolsConfig {
            ffmpeg_path: self.ffmpeg_path.clone(),
            ffprobe_path: self.ffprobe_path.clone(),
            thumbnail_width: self.thumbnail_width,
            thumbnail_quality: self.thumbnail_quality,
        }
    }

    pub fn clustering_config(&self) -> attention_domain_clustering::ClusteringConfig {
        attention_domain_clustering::ClusteringConfig {
            join_radius_meters: self.cluster_join_radius_meters,
            recency_window_minutes: self.cluster_recency_window_minutes,
            high_threshold: self.cluster_high_threshold,
            critical_threshold: self.cluster_critical_threshold,
        }
    }
}
