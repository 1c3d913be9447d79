//! Reconciliation of raw model output against the sampled frames.
//!
//! The model refers to frames by position and its indices are untrusted.
//! Every event is clamped onto a real frame and takes that frame's capture
//! time; the declared display timestamp is kept as-is.

use crate::analysis::{AnalysisResult, RawAnalysis, RawTimelineEvent, TimelineEvent};
use crate::error::{AiError, AiResult};
use tracing::{debug, info, warn};
use tripcut_core::{parse_timestamp, FrameSequence};

/// Declared timestamps further than this from the resolved frame are logged.
const DRIFT_LOG_THRESHOLD: f64 = 5.0;

/// Parse and reconcile a raw model payload.
///
/// `None` or a blank payload is [`AiError::EmptyResponse`]; a payload that
/// does not match the schema is [`AiError::MalformedResponse`].
pub fn reconcile(raw: Option<&str>, frames: &FrameSequence) -> AiResult<AnalysisResult> {
    let parsed = parse_response(raw)?;
    reconcile_raw(parsed, frames)
}

/// Parse a raw payload into the wire shape without touching indices.
pub fn parse_response(raw: Option<&str>) -> AiResult<RawAnalysis> {
    let text = raw
        .map(strip_code_fence)
        .filter(|text| !text.is_empty())
        .ok_or(AiError::EmptyResponse)?;

    serde_json::from_str(text).map_err(|e| AiError::MalformedResponse(e.to_string()))
}

/// Resolve every event of an already-parsed analysis against `frames`.
pub fn reconcile_raw(raw: RawAnalysis, frames: &FrameSequence) -> AiResult<AnalysisResult> {
    if frames.is_empty() {
        return Err(AiError::NoFrames);
    }

    let timeline = raw
        .timeline
        .into_iter()
        .enumerate()
        .map(|(position, event)| resolve_event(position, event, frames))
        .collect::<AiResult<Vec<_>>>()?;

    info!(
        events = timeline.len(),
        frames = frames.len(),
        "Reconciled analysis timeline"
    );

    Ok(AnalysisResult {
        title: raw.title,
        summary: raw.summary,
        vibe: raw.vibe,
        timeline,
    })
}

fn resolve_event(
    position: usize,
    event: RawTimelineEvent,
    frames: &FrameSequence,
) -> AiResult<TimelineEvent> {
    let requested = event.best_frame_index;
    let index = frames.clamp_index(requested).ok_or(AiError::NoFrames)?;
    let time_offset = frames.time_offset(index).ok_or(AiError::NoFrames)?;

    if i64::try_from(index).ok() != Some(requested) {
        warn!(
            position,
            requested,
            resolved = index,
            frames = frames.len(),
            "Clamped out-of-range frame index"
        );
    }

    if let Some(declared) = parse_timestamp(&event.timestamp) {
        if (declared - time_offset).abs() > DRIFT_LOG_THRESHOLD {
            debug!(
                position,
                declared,
                resolved = time_offset,
                "Declared timestamp differs from resolved frame"
            );
        }
    }

    Ok(TimelineEvent::resolved(event, index, time_offset))
}

/// Remove a surrounding Markdown code fence, if any.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(body) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (e.g. `json`) on the opening line.
    let body = match body.find('\n') {
        Some(newline) => &body[newline + 1..],
        None => body,
    };
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}
