// [libs/domain/pipeline/src/report.rs]
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One named step in the per-event enrichment sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    StoreMedia,
    ExtractKeyframe,
    Transcribe,
    Classify,
    Cluster,
    Broadcast,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::StoreMedia => "store_media",
            Stage::ExtractKeyframe => "extract_keyframe",
            Stage::Transcribe => "transcribe",
            Stage::Classify => "classify",
            Stage::Cluster => "cluster",
            Stage::Broadcast => "broadcast",
        }
    }
}

/// One stage's failure, recorded without aborting the remaining stages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageError {
    pub stage: Stage,
    pub message: String,
}

/// The outcome of one `process`/`reprocess` invocation.
///
/// `fatal` distinguishes a top-level, job-retriable failure (event row
/// missing, enrichment could not be persisted) from an ordinary per-stage
/// failure recorded in `errors` without aborting the remaining stages.
/// The work-queue consumer retries the whole job only when
/// `fatal` is set; every other outcome is a permanent `succeeded`, however
/// many `errors` entries it carries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub event_id: Uuid,
    pub completed_stages: Vec<Stage>,
    pub errors: Vec<StageError>,
    pub fatal: bool,
}

impl Report {
    pub fn new(event_id: Uuid) -> Self {
        Self {
            event_id,
            completed_stages: Vec::new(),
            errors: Vec::new(),
            fatal: false,
        }
    }

    pub(crate) fn complete(&mut self, stage: Stage) {
        self.completed_stages.push(stage);
    }

    /// Records a job-fatal failure. Only called from [`PipelineOrchestrator`]
    /// paths that return immediately afterward.
    pub(crate) fn fail(&mut self, stage: Stage, message: impl Into<String>) {
        self.errors.push(StageError { stage, message: message.into() });
        self.fatal = true;
    }
}
