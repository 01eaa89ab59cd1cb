// [libs/infra/db/src/schema.rs]
use crate::errors::DbError;
use libsql::Connection;
use tracing::{debug, instrument};

/// Idempotent `CREATE TABLE IF NOT EXISTS` + index statements for the whole
/// schema. Applied once per freshly opened [`crate::client::DbClient`]; safe
/// to re-run against an already-migrated database.
const STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL UNIQUE,
        email TEXT NOT NULL UNIQUE,
        password_digest TEXT NOT NULL,
        is_staff INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS user_profiles (
        user_id INTEGER PRIMARY KEY REFERENCES users(id),
        reports_submitted INTEGER NOT NULL DEFAULT 0,
        reports_verified INTEGER NOT NULL DEFAULT 0,
        reputation_score INTEGER NOT NULL DEFAULT 0,
        badges TEXT NOT NULL DEFAULT '[]'
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS clusters (
        id TEXT PRIMARY KEY,
        centroid_lat REAL NOT NULL,
        centroid_lon REAL NOT NULL,
        radius_meters REAL NOT NULL,
        event_count INTEGER NOT NULL,
        first_event_at TEXT NOT NULL,
        last_event_at TEXT NOT NULL,
        computed_severity INTEGER NOT NULL
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS events (
        id TEXT PRIMARY KEY,
        created_at TEXT NOT NULL,
        latitude REAL NOT NULL,
        longitude REAL NOT NULL,
        address TEXT,
        description TEXT NOT NULL,
        media_url TEXT,
        media_kind TEXT NOT NULL,
        thumbnail_url TEXT,
        transcription TEXT,
        category TEXT NOT NULL,
        subcategory TEXT NOT NULL DEFAULT '',
        severity INTEGER NOT NULL,
        ai_confidence REAL,
        classification_reasoning TEXT,
        cluster_id TEXT REFERENCES clusters(id),
        status TEXT NOT NULL,
        reviewed_by INTEGER REFERENCES users(id),
        reviewed_at TEXT,
        reporter_id INTEGER REFERENCES users(id)
    );
    "#,
    "CREATE INDEX IF NOT EXISTS idx_events_created_at ON events(created_at DESC);",
    "CREATE INDEX IF NOT EXISTS idx_events_status ON events(status);",
    "CREATE INDEX IF NOT EXISTS idx_events_category ON events(category);",
    "CREATE INDEX IF NOT EXISTS idx_events_severity ON events(severity);",
    "CREATE INDEX IF NOT EXISTS idx_events_cluster_id ON events(cluster_id);",
    "CREATE INDEX IF NOT EXISTS idx_events_location ON events(latitude, longitude);",
    r#"
    CREATE TABLE IF NOT EXISTS pipeline_jobs (
        id TEXT PRIMARY KEY,
        event_id TEXT NOT NULL,
        kind TEXT NOT NULL,
        media_bytes BLOB,
        media_content_type TEXT,
        status TEXT NOT NULL DEFAULT 'queued',
        attempts INTEGER NOT NULL DEFAULT 0,
        next_attempt_at TEXT NOT NULL,
        created_at TEXT NOT NULL,
        last_error TEXT
    );
    "#,
    "CREATE INDEX IF NOT EXISTS idx_pipeline_jobs_status ON pipeline_jobs(status, next_attempt_at);",
    r#"
    CREATE TABLE IF NOT EXISTS pipeline_stage_failures (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        event_id TEXT NOT NULL,
        stage TEXT NOT NULL,
        message TEXT NOT NULL,
        occurred_at TEXT NOT NULL
    );
    "#,
    "CREATE INDEX IF NOT EXISTS idx_pipeline_stage_failures_occurred_at ON pipeline_stage_failures(occurred_at);",
];

#[instrument(skip(conn))]
pub(crate) async fn apply_schema(conn: &Connection) -> Result<(), DbError> {
    for statement in STATEMENTS {
        debug!(statement = %statement.lines().next().unwrap_or(""), "applying schema statement");
        conn.execute(statement, ()).await?;
    }
    Ok(())
}
