// [libs/domain/pipeline/src/capabilities.rs]
use crate::report::StageError;
use async_trait::async_trait;
use attention_domain_models::{Category, Event, FanOutMessage, Severity};
use thiserror::Error;
use uuid::Uuid;

/// A capability call failed. Every variant here is caught at the stage
/// boundary and converted to a [`StageError`] entry -- it never propagates
/// past the orchestrator.
#[derive(Error, Debug, Clone)]
#[error("{0}")]
pub struct CapabilityError(pub String);

impl CapabilityError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Uploads/retrieves binary media to an S3-compatible blob store (Object
/// Store Adapter). Absent credentials are not a startup error -- the caller
/// wires in [`NoopObjectStore`] instead, which always fails, so the
/// `store_media` stage records an error and skips the stages that depend on it.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Uploads `bytes` under `key` and returns a stable, fetchable URL.
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<String, CapabilityError>;
}

/// Extracts a representative still image (JPEG bytes) from a video blob via
/// a subprocess to a media tool (Keyframe Extractor).
#[async_trait]
pub trait KeyframeExtractor: Send + Sync {
    async fn extract_keyframe(&self, video_bytes: &[u8]) -> Result<Vec<u8>, CapabilityError>;
}

/// Extracts the audio track from a video blob and submits it to a remote
/// speech-to-text endpoint (Audio Transcriber).
#[async_trait]
pub trait AudioTranscriber: Send + Sync {
    async fn transcribe(&self, video_bytes: &[u8]) -> Result<String, CapabilityError>;
}

/// A structured classification returned by a classifier implementation.
#[derive(Debug, Clone)]
pub struct Classification {
    pub category: Category,
    pub subcategory: String,
    pub severity: Severity,
    pub confidence: Option<f64>,
    pub reasoning: String,
}

/// Submits combined user-description + transcription text to a remote LLM
/// endpoint and parses a structured classification (Classifier).
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, combined_text: &str) -> Result<Classification, CapabilityError>;
}

/// Assigns a freshly enriched event to an existing or new cluster.
/// Implemented by `attention-domain-clustering`'s engine bound to a live
/// store; the pipeline orchestrator only needs this narrow seam.
#[async_trait]
pub trait ClusterAssigner: Send + Sync {
    async fn assign(&self, event: &mut Event) -> Result<(), CapabilityError>;
}

/// Publishes a fan-out message. `publish` is fire-and-forget: failures
/// are logged by the implementation and surfaced to the orchestrator only so
/// it can record a [`StageError`], never so it aborts the job.
#[async_trait]
pub trait FanOutPublisher: Send + Sync {
    async fn publish(&self, message: FanOutMessage) -> Result<(), CapabilityError>;
}

/// Loads and persists [`Event`] rows. The pipeline is the sole writer of
/// pipeline-produced fields for the duration of a job.
#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn load(&self, id: Uuid) -> Result<Event, CapabilityError>;
    async fn save(&self, event: &Event) -> Result<(), CapabilityError>;
}

/// Converts a caught capability failure plus its stage name into a
/// [`StageError`] for the job report.
pub(crate) fn as_stage_error(stage: crate::report::Stage, err: CapabilityError) -> StageError {
    StageError { stage, message: err.0 }
}
