//! Tripcut AI - Multimodal analysis of sampled frames
//!
//! This crate provides:
//! - The analysis request (instruction, ordered frame images, output schema)
//! - The analysis client abstraction and a Gemini implementation
//! - Reconciliation of the model's index-based answer onto real frames

pub mod analysis;
pub mod client;
pub mod error;
pub mod reconcile;
pub mod request;
pub mod schema;

pub use analysis::{AnalysisResult, HighlightType, RawAnalysis, RawTimelineEvent, TimelineEvent};
pub use client::{AnalysisClient, GeminiClient, GeminiConfig};
pub use error::{AiError, AiResult};
pub use reconcile::{parse_response, reconcile, reconcile_raw};
pub use request::{AnalysisRequest, AnalysisRequestBuilder, GenerationSettings, ImagePart};
pub use schema::response_schema;
