// [apps/worker/src/worker.rs]
//! The work-queue consumer.
//!
//! Polls `pipeline_jobs` for the oldest eligible row and drives it through
//! `PipelineOrchestrator::process`/`reprocess`. Per-stage failures are
//! recorded for the admin rolling-window report  without affecting the
//! job's own outcome; only a `fatal` [`Report`] (event row missing,
//! enrichment could not be persisted) is retried at the job level, up to
//! `PIPELINE_MAX_RETRIES` with a `>= PIPELINE_RETRY_BACKOFF_SECONDS` backoff
//!. Multiple jobs run in parallel, bounded by a semaphore sized from
//! `PIPELINE_WORKER_CONCURRENCY`; each individual job's stages remain
//! strictly sequential inside the orchestrator.

use attention_domain_pipeline::{MediaInput, PipelineOrchestrator};
use attention_infra_db::{JobKind, JobRepository, PipelineJob};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::{debug, error, info, instrument, warn};

/// Drives the claim-dispatch-report loop until `shutdown` is flipped.
pub struct JobDispatcher {
    jobs: JobRepository,
    orchestrator: PipelineOrchestrator,
    concurrency: Arc<Semaphore>,
    total_permits: u32,
    poll_interval: Duration,
}

impl JobDispatcher {
    pub fn new(jobs: JobRepository, orchestrator: PipelineOrchestrator, concurrency: usize, poll_interval: Duration) -> Self {
        let total_permits = concurrency.max(1) as u32;
        Self {
            jobs,
            orchestrator,
            concurrency: Arc::new(Semaphore::new(total_permits as usize)),
            total_permits,
            poll_interval,
        }
    }

    /// Runs forever (until `shutdown` is set), claiming and dispatching jobs.
    /// Each claimed job is spawned onto its own task so a slow classification
    /// or transcription call on one job never stalls the queue for others
    /// ("multiple jobs run in parallel").
    pub async fn run(&self, shutdown: Arc<AtomicBool>) {
        info!(concurrency = self.total_permits, "pipeline worker loop starting");

        while !shutdown.load(Ordering::SeqCst) {
            match self.jobs.claim_next().await {
                Ok(Some(job)) => self.dispatch(job),
                Ok(None) => tokio::time::sleep(self.poll_interval).await,
                Err(err) => {
                    error!(error = %err, "failed to poll pipeline_jobs, backing off");
                    tokio::time::sleep(self.poll_interval).await;
                }
            }
        }

        info!("pipeline worker loop shutting down, draining in-flight jobs");
        // Acquiring every permit blocks until all spawned tasks have
        // released theirs, i.e. until the in-flight jobs finish.
        let _ = self.concurrency.acquire_many(self.total_permits).await;
    }

    fn dispatch(&self, job: PipelineJob) {
        let permit = Arc::clone(&self.concurrency);
        let jobs = self.jobs.clone();
        let orchestrator = self.orchestrator.clone();

        tokio::spawn(async move {
            let Ok(_permit) = permit.acquire_owned().await else {
                return;
            };
            run_job(&jobs, &orchestrator, job).await;
        });
    }
}

#[instrument(skip(jobs, orchestrator, job), fields(job_id = %job.id, event_id = %job.event_id, kind = ?job.kind))]
async fn run_job(jobs: &JobRepository, orchestrator: &PipelineOrchestrator, job: PipelineJob) {
    let report = match job.kind {
        JobKind::Process => {
            let media = match (job.media_bytes.clone(), job.media_content_type.clone()) {
                (Some(bytes), Some(content_type)) => Some(MediaInput { bytes, content_type }),
                _ => None,
            };
            orchestrator.process(job.event_id, media).await
        }
        JobKind::Reprocess => orchestrator.reprocess(job.event_id).await,
    };

    for stage_error in &report.errors {
        if let Err(err) = jobs.record_stage_failure(job.event_id, stage_error.stage.as_str(), &stage_error.message).await {
            warn!(error = %err, "failed to record stage failure for admin visibility");
        }
    }

    if report.fatal {
        let message = report
            .errors
            .last()
            .map(|e| e.message.clone())
            .unwrap_or_else(|| "pipeline job failed with no recorded error".to_string());
        warn!(attempts = job.attempts, error = %message, "pipeline job failed at the top level, scheduling retry");
        if let Err(err) = jobs.mark_failed(job.id, job.attempts, &message).await {
            error!(error = %err, "failed to record job failure");
        }
        return;
    }

    debug!(
        completed = report.completed_stages.len(),
        stage_errors = report.errors.len(),
        "pipeline job completed"
    );
    if let Err(err) = jobs.mark_succeeded(job.id).await {
        error!(error = %err, "failed to mark job succeeded");
    }
}
