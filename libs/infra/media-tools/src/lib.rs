// [libs/infra/media-tools/src/lib.rs]
/*!
 * APARATO: MEDIA TOOLS
 * RESPONSABILIDAD: Invocación de ffmpeg/ffprobe como subprocesos para extracción
 * de keyframes y demuxing de audio (timeouts).
 */

use async_trait::async_trait;
use attention_domain_pipeline::{CapabilityError, KeyframeExtractor};
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, instrument, warn};

/// Recommended timeout for keyframe extraction ("60 s for keyframe").
const KEYFRAME_TIMEOUT: Duration = Duration::from_secs(60);
/// Recommended timeout for audio extraction ahead of transcription
/// ("30 s for transcription extraction").
const AUDIO_EXTRACTION_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Error, Debug)]
pub enum MediaToolError {
    #[error("media tool unavailable: {0}")]
    Unavailable(String),

    #[error("media tool subprocess failed: {0}")]
    SubprocessFailed(String),

    #[error("media tool timed out after {0:?}")]
    TimedOut(Duration),
}

/// `ffmpeg`/`ffprobe` paths and thumbnail parameters, read from
/// `FFMPEG_PATH`, `FFPROBE_PATH`, `THUMBNAIL_WIDTH`, `THUMBNAIL_QUALITY`.
#[derive(Debug, Clone)]
pub struct MediaToolsConfig {
    pub ffmpeg_path: String,
    pub ffprobe_path: String,
    pub thumbnail_width: u32,
    pub thumbnail_quality: u32,
}

impl Default for MediaToolsConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: "ffmpeg".to_string(),
            ffprobe_path: "ffprobe".to_string(),
            thumbnail_width: 640,
            thumbnail_quality: 85,
        }
    }
}

/// Extracts a representative still frame from a video blob by shelling out
/// to `ffmpeg` (Keyframe Extractor). Mirrors the source's
/// `KeyframeService.extract_keyframe`: seeks to 10% of duration (capped at
/// 1 second) when no explicit timestamp is given, scales to
/// `thumbnail_width`, and maps `thumbnail_quality` (0-100, higher is better)
/// onto ffmpeg's inverted `-q:v` scale (2-31, lower is better).
pub struct FfmpegKeyframeExtractor {
    config: MediaToolsConfig,
}

impl FfmpegKeyframeExtractor {
    /// Probes `ffmpeg -version`; returns `None` if the binary is missing or
    /// refuses to run, signalling the caller to fall back to
    /// [`NoopKeyframeExtractor`] (runtime-object polymorphism).
    pub async fn detect(config: MediaToolsConfig) -> Option<Self> {
        let available = Command::new(&config.ffmpeg_path)
            .arg("-version")
            .output()
            .await
            .map(|output| output.status.success())
            .unwrap_or(false);
        if available {
            Some(Self { config })
        } else {
            warn!(path = %config.ffmpeg_path, "ffmpeg not available, keyframe extraction disabled");
            None
        }
    }

    async fn video_duration_seconds(&self, input_path: &std::path::Path) -> Option<f64> {
        let output = Command::new(&self.config.ffprobe_path)
            .args([
                "-v",
                "error",
                "-show_entries",
                "format=duration",
                "-of",
                "default=noprint_wrappers=1:nokey=1",
            ])
            .arg(input_path)
            .output()
            .await
            .ok()?;
        if !output.status.success() {
            return None;
        }
        String::from_utf8_lossy(&output.stdout).trim().parse::<f64>().ok()
    }
}

#[async_trait]
impl KeyframeExtractor for FfmpegKeyframeExtractor {
    #[instrument(skip(self, video_bytes), fields(bytes = video_bytes.len()))]
    async fn extract_keyframe(&self, video_bytes: &[u8]) -> Result<Vec<u8>, CapabilityError> {
        timeout(KEYFRAME_TIMEOUT, self.extract_keyframe_inner(video_bytes))
            .await
            .map_err(|_| CapabilityError::new(format!("{:?}", MediaToolError::TimedOut(KEYFRAME_TIMEOUT))))?
            .map_err(|err| CapabilityError::new(err.to_string()))
    }
}

impl FfmpegKeyframeExtractor {
    async fn extract_keyframe_inner(&self, video_bytes: &[u8]) -> Result<Vec<u8>, MediaToolError> {
        let workdir = tempfile::tempdir().map_err(|err| MediaToolError::SubprocessFailed(err.to_string()))?;
        let input_path = workdir.path().join("input.mp4");
        let output_path = workdir.path().join("output.jpg");
        tokio::fs::write(&input_path, video_bytes)
            .await
            .map_err(|err| MediaToolError::SubprocessFailed(err.to_string()))?;

        let timestamp = match self.video_duration_seconds(&input_path).await {
            Some(duration) => (duration * 0.1).min(1.0),
            None => 1.0,
        };
        let quality_arg = ((100 - self.config.thumbnail_quality.min(100)) / 10 + 1).to_string();
        let scale_arg = format!("scale={}:-1", self.config.thumbnail_width);

        let output = Command::new(&self.config.ffmpeg_path)
            .args(["-y", "-ss", &timestamp.to_string(), "-i"])
            .arg(&input_path)
            .args(["-vframes", "1", "-vf", &scale_arg, "-q:v", &quality_arg])
            .arg(&output_path)
            .output()
            .await
            .map_err(|err| MediaToolError::SubprocessFailed(err.to_string()))?;

        if !output.status.success() {
            return Err(MediaToolError::SubprocessFailed(String::from_utf8_lossy(&output.stderr).to_string()));
        }

        tokio::fs::read(&output_path)
            .await
            .map_err(|err| MediaToolError::SubprocessFailed(err.to_string()))
    }
}

/// Selected when `ffmpeg` is unavailable. `extract_keyframe` always
/// fails, so the pipeline's `extract_keyframe` stage records an error and
/// continues.
pub struct NoopKeyframeExtractor;

#[async_trait]
impl KeyframeExtractor for NoopKeyframeExtractor {
    async fn extract_keyframe(&self, _video_bytes: &[u8]) -> Result<Vec<u8>, CapabilityError> {
        Err(CapabilityError::new("keyframe extraction unavailable: ffmpeg not configured"))
    }
}

/// Demuxes the audio track out of a video blob as 16kHz mono MP3, matching
/// the source's `TranscriptionService.extract_audio` ffmpeg invocation.
/// Shared by `attention-infra-ai-clients`' transcriber, which needs the
/// extracted audio before it can call the remote speech-to-text endpoint.
#[instrument(skip(video_bytes, config), fields(bytes = video_bytes.len()))]
pub async fn extract_audio_mp3(video_bytes: &[u8], config: &MediaToolsConfig) -> Result<Vec<u8>, MediaToolError> {
    timeout(AUDIO_EXTRACTION_TIMEOUT, extract_audio_mp3_inner(video_bytes, config))
        .await
        .map_err(|_| MediaToolError::TimedOut(AUDIO_EXTRACTION_TIMEOUT))?
}

async fn extract_audio_mp3_inner(video_bytes: &[u8], config: &MediaToolsConfig) -> Result<Vec<u8>, MediaToolError> {
    let available = Command::new(&config.ffmpeg_path)
        .arg("-version")
        .output()
        .await
        .map(|output| output.status.success())
        .unwrap_or(false);
    if !available {
        return Err(MediaToolError::Unavailable(config.ffmpeg_path.clone()));
    }

    let workdir = tempfile::tempdir().map_err(|err| MediaToolError::SubprocessFailed(err.to_string()))?;
    let input_path = workdir.path().join("input.mp4");
    let output_path = workdir.path().join("output.mp3");
    tokio::fs::write(&input_path, video_bytes)
        .await
        .map_err(|err| MediaToolError::SubprocessFailed(err.to_string()))?;

    let output = Command::new(&config.ffmpeg_path)
        .args(["-y", "-i"])
        .arg(&input_path)
        .args(["-vn", "-acodec", "libmp3lame", "-ar", "16000", "-ac", "1", "-b:a", "64k"])
        .arg(&output_path)
        .output()
        .await
        .map_err(|err| MediaToolError::SubprocessFailed(err.to_string()))?;

    if !output.status.success() {
        debug!(stderr = %String::from_utf8_lossy(&output.stderr), "ffmpeg audio extraction failed");
        return Err(MediaToolError::SubprocessFailed(String::from_utf8_lossy(&output.stderr).to_string()));
    }

    tokio::fs::read(&output_path)
        .await
        .map_err(|err| MediaToolError::SubprocessFailed(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn detect_returns_none_for_a_nonexistent_binary() {
        let config = MediaToolsConfig { ffmpeg_path: "/nonexistent/ffmpeg-binary".to_string(), ..Default::default() };
        assert!(FfmpegKeyframeExtractor::detect(config).await.is_none());
    }

    #[tokio::test]
    async fn noop_keyframe_extractor_always_fails() {
        let extractor = NoopKeyframeExtractor;
        assert!(extractor.extract_keyframe(&[1, 2, 3]).await.is_err());
    }

    #[tokio::test]
    async fn audio_extraction_fails_fast_without_ffmpeg() {
        let config = MediaToolsConfig { ffmpeg_path: "/nonexistent/ffmpeg-binary".to_string(), ..Default::default() };
        let result = extract_audio_mp3(&[1, 2, 3], &config).await;
        assert!(matches!(result, Err(MediaToolError::Unavailable(_))));
    }
}
