// [libs/infra/db/src/repositories/jobs.rs]
use crate::errors::DbError;
use chrono::{Duration, Utc};
use libsql::{params, Connection, Row};
use uuid::Uuid;

/// Maximum top-level retry attempts for a pipeline job (retried up to 3
/// times with a >= 60s backoff).
pub const MAX_JOB_ATTEMPTS: i64 = 3;
/// Minimum backoff applied between attempts.
pub const JOB_BACKOFF: Duration = Duration::seconds(60);

/// A durable work-queue entry: one pipeline invocation for one event, with
/// its raw media bytes inlined so a crashed worker loses no in-flight upload.
#[derive(Debug, Clone)]
pub struct PipelineJob {
    pub id: Uuid,
    pub event_id: Uuid,
    pub kind: JobKind,
    pub media_bytes: Option<Vec<u8>>,
    pub media_content_type: Option<String>,
    pub attempts: i64,
}

/// Which orchestrator entry point a job drives (reprocess skips stages
/// 1-3). Stored as the `pipeline_jobs.kind` text column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobKind {
    Process,
    Reprocess,
}

impl JobKind {
    fn as_str(self) -> &'static str {
        match self {
            JobKind::Process => "process",
            JobKind::Reprocess => "reprocess",
        }
    }

    fn parse(raw: &str) -> Result<Self, DbError> {
        match raw {
            "process" => Ok(JobKind::Process),
            "reprocess" => Ok(JobKind::Reprocess),
            other => Err(DbError::Mapping(format!("unknown pipeline job kind: {other}"))),
        }
    }
}

/// Persistence for the `pipeline_jobs` work queue.
#[derive(Clone)]
pub struct JobRepository {
    conn: Connection,
    max_attempts: i64,
    backoff: Duration,
}

impl JobRepository {
    /// Uses the process-path defaults (`MAX_JOB_ATTEMPTS`, `JOB_BACKOFF`).
    /// The API binary only ever enqueues through this repository, never
    /// retries a job, so it has no reason to override either value.
    pub fn new(conn: Connection) -> Self {
        Self { conn, max_attempts: MAX_JOB_ATTEMPTS, backoff: JOB_BACKOFF }
    }

    /// Overrides the retry ceiling/backoff from `PIPELINE_MAX_RETRIES` /
    /// `PIPELINE_RETRY_BACKOFF_SECONDS`; used by the `worker` binary, the
    /// only consumer of [`JobRepository::mark_failed`].
    pub fn with_retry_config(conn: Connection, max_attempts: i64, backoff: Duration) -> Self {
        Self { conn, max_attempts, backoff }
    }

    /// Enqueues a freshly submitted job, immediately eligible for claim.
    pub async fn enqueue(
        &self,
        event_id: Uuid,
        media_bytes: Option<Vec<u8>>,
        media_content_type: Option<String>,
    ) -> Result<Uuid, DbError> {
        let id = Uuid::new_v4();
        let now = Utc::now();
        self.conn
            .execute(
                r#"INSERT INTO pipeline_jobs (
                id, event_id, kind, media_bytes, media_content_type,
                status, attempts, next_attempt_at, created_at
            ) VALUES (?,?,'process',?,?,'queued',0,?,?)"#,
                params![id.to_string(), event_id.to_string(), media_bytes, media_content_type, now.to_rfc3339(), now.to_rfc3339()],
            )
            .await?;
        Ok(id)
    }

    /// Re-enqueues the reprocess path for an already-enriched event (the
    /// admin reprocess endpoint).
    pub async fn enqueue_reprocess(&self, event_id: Uuid) -> Result<Uuid, DbError> {
        let id = Uuid::new_v4();
        let now = Utc::now();
        self.conn
            .execute(
                r#"INSERT INTO pipeline_jobs (
                id, event_id, kind, status, attempts, next_attempt_at, created_at
            ) VALUES (?,?,'reprocess','queued',0,?,?)"#,
                params![id.to_string(), event_id.to_string(), now.to_rfc3339(), now.to_rfc3339()],
            )
            .await?;
        Ok(id)
    }

    /// Atomically claims the oldest eligible job (queued, or failed and
    /// past its backoff deadline) for a worker, marking it `running`.
    pub async fn claim_next(&self) -> Result<Option<PipelineJob>, DbError> {
        let tx = self.conn.transaction().await.map_err(|e| DbError::Transaction(e.to_string()))?;

        let mut rows = tx
            .query(
                r#"SELECT id, event_id, kind, media_bytes, media_content_type, attempts FROM pipeline_jobs
                WHERE status IN ('queued', 'retrying') AND next_attempt_at <= ?
                ORDER BY next_attempt_at ASC LIMIT 1"#,
                params![Utc::now().to_rfc3339()],
            )
            .await?;

        let Some(row) = rows.next().await? else {
            tx.commit().await.map_err(|e| DbError::Transaction(e.to_string()))?;
            return Ok(None);
        };
        let job = row_to_job(&row)?;
        drop(rows);

        tx.execute("UPDATE pipeline_jobs SET status = 'running' WHERE id = ?", params![job.id.to_string()]).await?;
        tx.commit().await.map_err(|e| DbError::Transaction(e.to_string()))?;

        Ok(Some(job))
    }

    pub async fn mark_succeeded(&self, job_id: Uuid) -> Result<(), DbError> {
        self.conn
            .execute("UPDATE pipeline_jobs SET status = 'succeeded', media_bytes = NULL WHERE id = ?", params![job_id.to_string()])
            .await?;
        Ok(())
    }

    /// Records a top-level job failure. Schedules a retry `>= 60s` out if
    /// attempts remain, otherwise marks the job permanently `failed`.
    pub async fn mark_failed(&self, job_id: Uuid, attempts: i64, error: &str) -> Result<(), DbError> {
        let next_attempts = attempts + 1;
        if next_attempts >= self.max_attempts {
            self.conn
                .execute(
                    "UPDATE pipeline_jobs SET status = 'failed', attempts = ?, last_error = ? WHERE id = ?",
                    params![next_attempts, error, job_id.to_string()],
                )
                .await?;
        } else {
            let next_attempt_at = Utc::now() + self.backoff;
            self.conn
                .execute(
                    "UPDATE pipeline_jobs SET status = 'retrying', attempts = ?, next_attempt_at = ?, last_error = ? WHERE id = ?",
                    params![next_attempts, next_attempt_at.to_rfc3339(), error, job_id.to_string()],
                )
                .await?;
        }
        Ok(())
    }

    /// Appends a per-stage failure for the admin `/admin/stats/pipeline`
    /// rolling-window report.
    pub async fn record_stage_failure(&self, event_id: Uuid, stage: &str, message: &str) -> Result<(), DbError> {
        self.conn
            .execute(
                "INSERT INTO pipeline_stage_failures (event_id, stage, message, occurred_at) VALUES (?,?,?,?)",
                params![event_id.to_string(), stage, message, Utc::now().to_rfc3339()],
            )
            .await?;
        Ok(())
    }

    /// Per-stage failure counts within `window`, newest window only.
    pub async fn stage_failure_counts(&self, window: Duration) -> Result<Vec<(String, u64)>, DbError> {
        let since = (Utc::now() - window).to_rfc3339();
        let mut rows = self
            .conn
            .query("SELECT stage, COUNT(*) FROM pipeline_stage_failures WHERE occurred_at >= ? GROUP BY stage", params![since])
            .await?;
        let mut counts = Vec::new();
        while let Some(row) = rows.next().await? {
            let stage: String = row.get(0)?;
            let count: i64 = row.get(1)?;
            counts.push((stage, count as u64));
        }
        Ok(counts)
    }
}

fn row_to_job(row: &Row) -> Result<PipelineJob, DbError> {
    let id: String = row.get(0)?;
    let event_id: String = row.get(1)?;
    let kind: String = row.get(2)?;
    let media_bytes: Option<Vec<u8>> = row.get(3)?;
    let media_content_type: Option<String> = row.get(4)?;
    let attempts: i64 = row.get(5)?;

    Ok(PipelineJob {
        id: Uuid::parse_str(&id).map_err(|e| DbError::Mapping(e.to_string()))?,
        event_id: Uuid::parse_str(&event_id).map_err(|e| DbError::Mapping(e.to_string()))?,
        kind: JobKind::parse(&kind)?,
        media_bytes,
        media_content_type,
        attempts,
    })
}
