//! Output schema sent with every analysis request.
//!
//! Uses the OpenAPI subset accepted by Gemini's `responseSchema`
//! (uppercase type names).

use crate::analysis::HighlightType;
use serde_json::{json, Value};

/// Schema of the JSON object the model must return.
pub fn response_schema() -> Value {
    let categories: Vec<&str> = HighlightType::ALL.iter().map(HighlightType::as_str).collect();

    json!({
        "type": "OBJECT",
        "properties": {
            "title": { "type": "STRING" },
            "summary": { "type": "STRING" },
            "vibe": {
                "type": "ARRAY",
                "items": { "type": "STRING" }
            },
            "timeline": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "timestamp": { "type": "STRING" },
                        "content": { "type": "STRING" },
                        "location": { "type": "STRING" },
                        "foodItems": {
                            "type": "ARRAY",
                            "items": { "type": "STRING" }
                        },
                        "bestFrameIndex": { "type": "INTEGER" },
                        "highlightType": {
                            "type": "STRING",
                            "enum": categories
                        }
                    },
                    "required": ["timestamp", "content", "bestFrameIndex", "highlightType"]
                }
            }
        },
        "required": ["title", "summary", "vibe", "timeline"]
    })
}
