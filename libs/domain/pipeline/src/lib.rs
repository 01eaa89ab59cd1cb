// [libs/domain/pipeline/src/lib.rs]
/*!
 * APARATO: ENRICHMENT PIPELINE ORCHESTRATOR
 * RESPONSABILIDAD: Capability interfaces + deterministic, failure-tolerant per-event processing.
 */

pub mod capabilities;
pub mod orchestrator;
pub mod report;

pub use capabilities::{
    AudioTranscriber, CapabilityError, Classification, Classifier, ClusterAssigner, EventRepository,
    FanOutPublisher, KeyframeExtractor, ObjectStore,
};
pub use orchestrator::{MediaInput, PipelineOrchestrator};
pub use report::{Report, Stage, StageError};
