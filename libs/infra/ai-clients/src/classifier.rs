// [libs/infra/ai-clients/src/classifier.rs]
use async_trait::async_trait;
use attention_domain_models::{Category, Severity};
use attention_domain_pipeline::{CapabilityError, Classification, Classifier};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{instrument, warn};

/// Recommended timeout for the classification call ("60 s for classification").
const CLASSIFY_TIMEOUT: Duration = Duration::from_secs(60);

const CATEGORY_GUIDE: &[(&str, &str)] = &[
    ("emergency", "Fire, explosion, collapse"),
    ("security", "Drone activity, suspicious activity"),
    ("traffic", "Accident, road blockage"),
    ("protest", "March, demonstration, gathering"),
    ("infrastructure", "Pothole, broken streetlight, damage"),
    ("environmental", "Pollution, fallen tree, flooding"),
    ("informational", "General observation"),
];

const SEVERITY_GUIDE: &[(u8, &str)] = &[
    (1, "Low - Informational only"),
    (2, "Medium - Needs attention, not urgent"),
    (3, "High - Urgent, requires response"),
    (4, "Critical - Life-threatening emergency"),
];

/// Submits combined user-description + transcription text to OpenRouter's
/// chat completions endpoint and parses a structured classification.
/// The response JSON may arrive wrapped in a markdown code fence from
/// some remote models --
/// [`strip_markdown_fence`] handles that before `serde_json` sees it.
pub struct OpenRouterClassifier {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

impl OpenRouterClassifier {
    const BASE_URL: &'static str = "https://openrouter.ai/api/v1/chat/completions";

    pub fn new(api_key: String, model: String) -> Self {
        Self { http: reqwest::Client::new(), api_key, model }
    }

    fn build_prompt(description: &str) -> String {
        let categories = CATEGORY_GUIDE
            .iter()
            .map(|(name, desc)| format!("- {name}: {desc}"))
            .collect::<Vec<_>>()
            .join("\n");
        let severities = SEVERITY_GUIDE
            .iter()
            .map(|(level, desc)| format!("- {level}: {desc}"))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "Analyze this incident report and classify it.\n\n\
            Description: {}\n\n\
            Classify into one of these categories:\n{categories}\n\n\
            Also assign severity (1-4):\n{severities}\n\n\
            Respond in JSON format only:\n\
            {{\"category\": \"...\", \"subcategory\": \"...\", \"severity\": N, \"confidence\": 0.0-1.0, \"reasoning\": \"...\"}}\n",
            if description.trim().is_empty() { "No description provided" } else { description }
        )
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

#[derive(Deserialize)]
struct RawClassification {
    category: String,
    #[serde(default)]
    subcategory: String,
    severity: i64,
    confidence: Option<f64>,
    #[serde(default)]
    reasoning: String,
}

/// Strips a leading/trailing triple-backtick fence (optionally tagged with a
/// language, e.g. ` ```json `) from a model response before parsing.
pub fn strip_markdown_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_prefix('\n').unwrap_or(rest);
    rest.rfind("```").map(|end| rest[..end].trim()).unwrap_or(rest.trim())
}

#[async_trait]
impl Classifier for OpenRouterClassifier {
    #[instrument(skip(self, combined_text))]
    async fn classify(&self, combined_text: &str) -> Result<Classification, CapabilityError> {
        let prompt = Self::build_prompt(combined_text);
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: vec![ChatMessage { role: "user", content: prompt }],
        };

        let response = tokio::time::timeout(
            CLASSIFY_TIMEOUT,
            self.http
                .post(Self::BASE_URL)
                .bearer_auth(&self.api_key)
                .header("HTTP-Referer", "https://attention-map.app")
                .header("X-Title", "Attention Map")
                .json(&request)
                .send(),
        )
        .await
        .map_err(|_| CapabilityError::new("classification request timed out"))?
        .map_err(|err| CapabilityError::new(format!("classification request failed: {err}")))?;

        if !response.status().is_success() {
            return Err(CapabilityError::new(format!("classification endpoint returned {}", response.status())));
        }

        let body: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|err| CapabilityError::new(format!("malformed classification response: {err}")))?;

        let content = body
            .choices
            .first()
            .map(|choice| choice.message.content.as_str())
            .ok_or_else(|| CapabilityError::new("classification response had no choices"))?;

        let stripped = strip_markdown_fence(content);
        let raw: RawClassification = serde_json::from_str(stripped)
            .map_err(|err| CapabilityError::new(format!("invalid classification JSON: {err}")))?;

        Ok(Classification {
            category: Category::coerce(&raw.category),
            subcategory: raw.subcategory,
            severity: Severity::clamp(raw.severity),
            confidence: raw.confidence,
            reasoning: raw.reasoning,
        })
    }
}

/// Selected when `OPENROUTER_API_KEY` is absent. Always returns an
/// error so the orchestrator applies its sentinel classification
/// (`category: informational`, `severity: 1`, `confidence: null`).
pub struct NoopClassifier;

#[async_trait]
impl Classifier for NoopClassifier {
    async fn classify(&self, _combined_text: &str) -> Result<Classification, CapabilityError> {
        warn!("classifier not configured, applying sentinel classification upstream");
        Err(CapabilityError::new("classification skipped - API not configured"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_a_plain_fence() {
        let raw = "```\n{\"category\": \"traffic\"}\n```";
        assert_eq!(strip_markdown_fence(raw), "{\"category\": \"traffic\"}");
    }

    #[test]
    fn strips_a_json_tagged_fence() {
        let raw = "```json\n{\"category\": \"traffic\"}\n```";
        assert_eq!(strip_markdown_fence(raw), "{\"category\": \"traffic\"}");
    }

    #[test]
    fn leaves_unfenced_json_untouched() {
        let raw = "{\"category\": \"traffic\"}";
        assert_eq!(strip_markdown_fence(raw), raw);
    }
}
