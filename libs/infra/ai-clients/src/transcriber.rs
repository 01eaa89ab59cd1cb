// [libs/infra/ai-clients/src/transcriber.rs]
use async_trait::async_trait;
use attention_domain_pipeline::{AudioTranscriber, CapabilityError};
use attention_infra_media_tools::{extract_audio_mp3, MediaToolsConfig};
use serde::Deserialize;
use std::time::Duration;
use tracing::{instrument, warn};

/// Recommended timeout for the transcription call itself ("30 s for
/// transcription extraction" covers the ffmpeg leg; the network call gets
/// its own budget here).
const TRANSCRIBE_TIMEOUT: Duration = Duration::from_secs(30);

/// Extracts the audio track from a video blob (via `attention-infra-media-tools`)
/// and submits it to Groq's Whisper endpoint, returning the transcribed text
/// (Audio Transcriber).
pub struct GroqTranscriber {
    http: reqwest::Client,
    api_key: String,
    model: String,
    media_tools: MediaToolsConfig,
}

impl GroqTranscriber {
    const BASE_URL: &'static str = "https://api.groq.com/openai/v1/audio/transcriptions";

    pub fn new(api_key: String, model: String, media_tools: MediaToolsConfig) -> Self {
        Self { http: reqwest::Client::new(), api_key, model, media_tools }
    }
}

#[derive(Deserialize)]
struct TranscriptionResponse {
    text: String,
}

#[async_trait]
impl AudioTranscriber for GroqTranscriber {
    #[instrument(skip(self, video_bytes), fields(bytes = video_bytes.len()))]
    async fn transcribe(&self, video_bytes: &[u8]) -> Result<String, CapabilityError> {
        let audio_bytes = extract_audio_mp3(video_bytes, &self.media_tools)
            .await
            .map_err(|err| CapabilityError::new(format!("audio extraction failed: {err}")))?;

        let part = reqwest::multipart::Part::bytes(audio_bytes)
            .file_name("audio.mp3")
            .mime_str("audio/mpeg")
            .map_err(|err| CapabilityError::new(format!("malformed audio part: {err}")))?;
        let form = reqwest::multipart::Form::new()
            .text("model", self.model.clone())
            .text("response_format", "json")
            .part("file", part);

        let response = tokio::time::timeout(
            TRANSCRIBE_TIMEOUT,
            self.http.post(Self::BASE_URL).bearer_auth(&self.api_key).multipart(form).send(),
        )
        .await
        .map_err(|_| CapabilityError::new("transcription request timed out"))?
        .map_err(|err| CapabilityError::new(format!("transcription request failed: {err}")))?;

        if !response.status().is_success() {
            return Err(CapabilityError::new(format!("transcription endpoint returned {}", response.status())));
        }

        let body: TranscriptionResponse = response
            .json()
            .await
            .map_err(|err| CapabilityError::new(format!("malformed transcription response: {err}")))?;

        Ok(body.text.trim().to_string())
    }
}

/// Selected when `GROQ_API_KEY` is absent. Always returns an error so
/// the `transcribe` stage records it and continues, leaving the event's
/// transcription field unset.
pub struct NoopTranscriber;

#[async_trait]
impl AudioTranscriber for NoopTranscriber {
    async fn transcribe(&self, _video_bytes: &[u8]) -> Result<String, CapabilityError> {
        warn!("transcription service not configured (no API key)");
        Err(CapabilityError::new("transcription service not configured"))
    }
}
