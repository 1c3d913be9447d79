//! Analysis service clients.

use crate::error::{AiError, AiResult};
use crate::request::AnalysisRequest;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default Gemini API root.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// A multimodal model that can analyze a request.
///
/// Returns the model's raw text payload, or `None` when the service answered
/// successfully but produced no text.
#[async_trait]
pub trait AnalysisClient: Send + Sync {
    /// Get the client name
    fn name(&self) -> &str;

    /// Send one request. Implementations never retry.
    async fn analyze(&self, request: &AnalysisRequest) -> AiResult<Option<String>>;
}

/// Connection settings for [`GeminiClient`].
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub base_url: String,
    pub connect_timeout: Duration,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// Client for Gemini's `generateContent` endpoint.
pub struct GeminiClient {
    config: GeminiConfig,
    http: reqwest::Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> AiResult<Self> {
        if config.api_key.trim().is_empty() {
            return Err(AiError::MissingApiKey);
        }
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()?;
        Ok(Self { config, http })
    }

    /// URL of the `generateContent` call for `model`.
    pub fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            model
        )
    }
}

#[async_trait]
impl AnalysisClient for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn analyze(&self, request: &AnalysisRequest) -> AiResult<Option<String>> {
        let model = request.settings.model.as_str();
        info!(
            model,
            images = request.image_count(),
            payload_bytes = request.payload_bytes(),
            "Sending analysis request"
        );

        let response = self
            .http
            .post(self.endpoint(model))
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request.to_gemini_body())
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            let message = api_error_message(&body)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("Request failed").to_string());
            warn!(status = status.as_u16(), %message, "Analysis service returned an error");
            return Err(AiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|e| AiError::MalformedResponse(format!("Unreadable response envelope: {e}")))?;
        let text = parsed.text();
        match &text {
            Some(text) => debug!(chars = text.len(), "Received analysis payload"),
            None => warn!(
                finish_reason = ?parsed.finish_reason(),
                block_reason = ?parsed.block_reason(),
                "Analysis response carried no text"
            ),
        }
        Ok(text)
    }
}

/// The subset of a `generateContent` response the pipeline reads.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Default, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    thought: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated answer text of the first candidate, skipping thought
    /// summaries. `None` if there is no text at all.
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter(|part| !part.thought)
            .filter_map(|part| part.text.as_deref())
            .collect();
        (!text.is_empty()).then_some(text)
    }

    pub fn finish_reason(&self) -> Option<&str> {
        self.candidates.first()?.finish_reason.as_deref()
    }

    pub fn block_reason(&self) -> Option<&str> {
        self.prompt_feedback.as_ref()?.block_reason.as_deref()
    }
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Provider error text from an error response body.
///
/// Uses `error.message` when the body is the usual JSON envelope, otherwise
/// the trimmed body itself. `None` for an empty body.
pub fn api_error_message(body: &str) -> Option<String> {
    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) {
        return Some(envelope.error.message);
    }
    let trimmed = body.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
