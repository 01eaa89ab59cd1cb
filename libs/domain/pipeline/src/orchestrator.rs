// [libs/domain/pipeline/src/orchestrator.rs]
use crate::capabilities::{
    as_stage_error, AudioTranscriber, Classifier, ClusterAssigner, EventRepository, FanOutPublisher,
    KeyframeExtractor, ObjectStore,
};
use crate::report::{Report, Stage};
use attention_domain_models::{Category, FanOutMessage, MediaKind, Severity};
use std::sync::Arc;
use tracing::{instrument, warn};
use uuid::Uuid;

/// Raw media bytes carried alongside an upload, handed to the pipeline by the
/// work-queue consumer. Absent on the `reprocess` path.
#[derive(Clone)]
pub struct MediaInput {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Drives one Event through the enrichment sequence. Holds one
/// `Arc<dyn Capability>` reference per concern rather than a class
/// hierarchy; each capability may be a no-op implementation when its
/// backing credentials are absent.
#[derive(Clone)]
pub struct PipelineOrchestrator {
    events: Arc<dyn EventRepository>,
    object_store: Arc<dyn ObjectStore>,
    keyframe_extractor: Arc<dyn KeyframeExtractor>,
    audio_transcriber: Arc<dyn AudioTranscriber>,
    classifier: Arc<dyn Classifier>,
    cluster_assigner: Arc<dyn ClusterAssigner>,
    fan_out: Arc<dyn FanOutPublisher>,
}

impl PipelineOrchestrator {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        events: Arc<dyn EventRepository>,
        object_store: Arc<dyn ObjectStore>,
        keyframe_extractor: Arc<dyn KeyframeExtractor>,
        audio_transcriber: Arc<dyn AudioTranscriber>,
        classifier: Arc<dyn Classifier>,
        cluster_assigner: Arc<dyn ClusterAssigner>,
        fan_out: Arc<dyn FanOutPublisher>) -> Self {
        Self {
            events,
            object_store,
            keyframe_extractor,
            audio_transcriber,
            classifier,
            cluster_assigner,
            fan_out,
        }
    }

    /// `process(event_id, media)` -- the full algorithm. `media` is
    /// `None` on the reprocess path, which skips stages 1-3 and starts at
    /// `classify`.
    #[instrument(skip(self, media), fields(event_id = %event_id))]
    pub async fn process(&self, event_id: Uuid, media: Option<MediaInput>) -> Report {
        let mut report = Report::new(event_id);

        let mut event = match self.events.load(event_id).await {
            Ok(event) => event,
            Err(err) => {
                // Pipeline-fatal: the caller (work queue) retries at the job level.
                report.fail(Stage::StoreMedia, format!("event not found: {err}"));
                return report;
            }
        };

        let mut media_stored = false;
        if let Some(media) = media.clone() {
            let key = format!("events/{event_id}/media");
            match self.object_store.put(&key, media.bytes.clone(), &media.content_type).await {
                Ok(url) => {
                    event.media_url = Some(url);
                    report.complete(Stage::StoreMedia);
                    media_stored = true;
                }
                Err(err) => report.errors.push(as_stage_error(Stage::StoreMedia, err)),
            }
        }

        if media_stored && event.media_kind == MediaKind::Video {
            if let Some(media) = media.clone() {
                match self.keyframe_extractor.extract_keyframe(&media.bytes).await {
                    Ok(jpeg_bytes) => {
                        let key = format!("events/{event_id}/media_thumb.jpg");
                        match self.object_store.put(&key, jpeg_bytes, "image/jpeg").await {
                            Ok(url) => {
                                event.thumbnail_url = Some(url);
                                report.complete(Stage::ExtractKeyframe);
                            }
                            Err(err) => report.errors.push(as_stage_error(Stage::ExtractKeyframe, err)),
                        }
                    }
                    Err(err) => report.errors.push(as_stage_error(Stage::ExtractKeyframe, err)),
                }

                match self.audio_transcriber.transcribe(&media.bytes).await {
                    Ok(text) => {
                        event.transcription = Some(text);
                        report.complete(Stage::Transcribe);
                    }
                    Err(err) => report.errors.push(as_stage_error(Stage::Transcribe, err)),
                }
            }
        }

        let combined_text = combine_classifier_input(&event.description, event.transcription.as_deref());
        match self.classifier.classify(&combined_text).await {
            Ok(classification) => {
                event.category = classification.category;
                event.subcategory = classification.subcategory;
                event.severity = classification.severity;
                event.ai_confidence = classification.confidence;
                event.classification_reasoning = Some(classification.reasoning);
                report.complete(Stage::Classify);
            }
            Err(err) => {
                warn!(event_id = %event_id, "classifier unavailable, applying sentinel classification: {err}");
                event.category = Category::Informational;
                event.severity = Severity::Low;
                event.ai_confidence = None;
                event.classification_reasoning =
                Some(format!("classification unavailable, default applied: {err}"));
                report.errors.push(as_stage_error(Stage::Classify, err));
            }
        }

        if let Err(err) = self.events.save(&event).await {
            report.fail(Stage::Cluster, format!("failed to persist enrichment: {err}"));
            return report;
        }

        match self.cluster_assigner.assign(&mut event).await {
            Ok(()) => report.complete(Stage::Cluster),
            Err(err) => report.errors.push(as_stage_error(Stage::Cluster, err)),
        }

        if let Err(err) = self.events.save(&event).await {
            report.fail(Stage::Broadcast, format!("failed to persist cluster assignment: {err}"));
            return report;
        }

        let message = FanOutMessage::NewEvent { event: event.to_wire() };
        match self.fan_out.publish(message).await {
            Ok(()) => report.complete(Stage::Broadcast),
            Err(err) => report.errors.push(as_stage_error(Stage::Broadcast, err)),
        }

        report
    }

    /// `reprocess(event_id)` -- `process` with no media, starting at `classify`.
    /// Useful after a manual description edit.
    pub async fn reprocess(&self, event_id: Uuid) -> Report {
        self.process(event_id, None).await
    }
}

/// Assembles the classifier's combined prompt input, including only non-empty
/// parts before classification.
fn combine_classifier_input(description: &str, transcription: Option<&str>) -> String {
    let mut parts = Vec::new();
    if !description.trim().is_empty() {
        parts.push(format!("User description: {description}"));
    }
    if let Some(transcription) = transcription {
        if !transcription.trim().is_empty() {
            parts.push(format!("Audio transcription: {transcription}"));
        }
    }
    parts.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combines_only_non_empty_parts() {
        assert_eq!(combine_classifier_input("", None), "");
        assert_eq!(
            combine_classifier_input("Fire at the corner", None),
            "User description: Fire at the corner"
        );
        assert_eq!(
            combine_classifier_input("", Some("someone shouting")),
            "Audio transcription: someone shouting"
        );
        assert_eq!(
            combine_classifier_input("Fire", Some("smoke visible")),
            "User description: Fire\n\nAudio transcription: smoke visible"
        );
    }
}
