//! Turning a frame sequence into one multimodal analysis request.

use crate::schema::response_schema;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tripcut_core::FrameSequence;

/// Default Gemini model used for analysis.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// MIME type of every frame preview.
pub const PREVIEW_MIME_TYPE: &str = "image/jpeg";

/// Task description sent ahead of the frames.
pub const ANALYSIS_INSTRUCTION: &str = "\
You are given still frames sampled in order from a travel video. Frames are \
numbered from 0 in the order they appear in this request.

Write a travel vlog log for the video:
- title: a short title for the trip.
- summary: two or three sentences describing the trip.
- vibe: three to five short style tags.
- timeline: the notable moments in chronological order. For each moment give
  - timestamp: the display time of the moment, as MM:SS.
  - content: a rich description of what happens.
  - location: the place name, read from any visible signage, storefronts or \
    menus. Omit it if nothing legible identifies the place.
  - foodItems: every food or drink item that is visible, as specific as you \
    can read them. Omit it if there is none.
  - bestFrameIndex: the 0-based number of the frame that best shows the moment.
  - highlightType: one of food, scenery, transport, other.

Read text in the frames carefully; prefer what is written over guesses.";

/// Model parameters for one analysis call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationSettings {
    /// Model identifier, e.g. `gemini-2.5-flash`.
    pub model: String,
    /// Sampling temperature. Kept low for accurate signage reading.
    pub temperature: f32,
    /// Token budget for the model's internal reasoning.
    pub thinking_budget: u32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.2,
            thinking_budget: 2048,
        }
    }
}

/// One inline image attached to a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePart {
    pub mime_type: &'static str,
    /// Base64-encoded image bytes.
    pub data: String,
}

/// A complete analysis request: instruction, ordered images, output schema.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    pub instruction: String,
    /// One part per frame; position `i` is frame index `i`.
    pub images: Vec<ImagePart>,
    pub schema: Value,
    pub settings: GenerationSettings,
}

impl AnalysisRequest {
    /// Number of attached frames.
    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    /// Total size of the encoded image payload.
    pub fn payload_bytes(&self) -> usize {
        self.images.iter().map(|part| part.data.len()).sum()
    }

    /// Render the `generateContent` request body.
    pub fn to_gemini_body(&self) -> Value {
        let mut parts = Vec::with_capacity(self.images.len() + 1);
        parts.push(json!({ "text": self.instruction }));
        parts.extend(self.images.iter().map(|image| {
            json!({
                "inlineData": {
                    "mimeType": image.mime_type,
                    "data": image.data,
                }
            })
        }));

        json!({
            "contents": [{ "role": "user", "parts": parts }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": self.schema,
                "temperature": self.settings.temperature,
                "thinkingConfig": { "thinkingBudget": self.settings.thinking_budget },
            }
        })
    }
}

/// Builds analysis requests from sampled frames.
#[derive(Debug, Clone, Default)]
pub struct AnalysisRequestBuilder {
    settings: GenerationSettings,
}

impl AnalysisRequestBuilder {
    pub fn new(settings: GenerationSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    /// Build the request for `frames`.
    ///
    /// Images follow sequence order so the model can refer to frames by
    /// position. An empty sequence yields a request with no images.
    pub fn build(&self, frames: &FrameSequence) -> AnalysisRequest {
        let engine = base64::engine::general_purpose::STANDARD;
        let images = frames
            .iter()
            .map(|frame| ImagePart {
                mime_type: PREVIEW_MIME_TYPE,
                data: engine.encode(frame.preview()),
            })
            .collect();

        AnalysisRequest {
            instruction: ANALYSIS_INSTRUCTION.to_string(),
            images,
            schema: response_schema(),
            settings: self.settings.clone(),
        }
    }
}
