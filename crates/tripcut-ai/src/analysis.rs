//! Analysis result types: the raw wire shape returned by the model and the
//! reconciled timeline handed to presentation.

use crate::error::{AiError, AiResult};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Number;
use tripcut_core::FrameSequence;

/// Closed classification of a timeline event's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HighlightType {
    Food,
    Scenery,
    Transport,
    /// Anything else, including categories outside the closed set.
    #[default]
    #[serde(other)]
    Other,
}

impl HighlightType {
    /// Every category, in schema order.
    pub const ALL: [Self; 4] = [Self::Food, Self::Scenery, Self::Transport, Self::Other];

    /// Wire name of the category.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Scenery => "scenery",
            Self::Transport => "transport",
            Self::Other => "other",
        }
    }
}

/// One timeline entry as the model returned it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTimelineEvent {
    /// Display timestamp declared by the model, e.g. `"00:07"`.
    pub timestamp: String,
    /// Narrative description.
    pub content: String,
    /// Index of the frame the model picked. Untrusted: may be negative or
    /// past the end of the sequence.
    #[serde(deserialize_with = "deserialize_frame_index")]
    pub best_frame_index: i64,
    /// Content category.
    pub highlight_type: HighlightType,
    /// Place name read from signage, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Visible food and drink items, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub food_items: Option<Vec<String>>,
}

/// The model's structured response before reconciliation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawAnalysis {
    pub title: String,
    pub summary: String,
    pub vibe: Vec<String>,
    pub timeline: Vec<RawTimelineEvent>,
}

/// Accept any JSON number as a frame index.
///
/// Fractions truncate toward zero and integers beyond `i64` saturate, so the
/// reconciler always has something to clamp.
fn deserialize_frame_index<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let number = Number::deserialize(deserializer)?;
    frame_index_from_number(&number)
        .ok_or_else(|| de::Error::custom(format!("bestFrameIndex {number} is not usable")))
}

fn frame_index_from_number(number: &Number) -> Option<i64> {
    if let Some(i) = number.as_i64() {
        return Some(i);
    }
    if let Some(u) = number.as_u64() {
        return Some(i64::try_from(u).unwrap_or(i64::MAX));
    }
    number
        .as_f64()
        .filter(|f| f.is_finite())
        .map(|f| f.trunc() as i64)
}

/// A timeline event whose frame reference has been resolved.
///
/// The frame index and time offset are only set by reconciliation or
/// [`TimelineEvent::reassign_frame`]; the other fields are user-editable.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEvent {
    /// Display timestamp, kept exactly as the model declared it.
    pub timestamp: String,
    /// Narrative description.
    pub content: String,
    /// Place name, if any.
    pub location: Option<String>,
    /// Visible food and drink items.
    pub food_items: Vec<String>,
    /// Content category.
    pub highlight_type: HighlightType,
    frame_index: usize,
    resolved_time_offset: f64,
}

impl TimelineEvent {
    pub(crate) fn resolved(raw: RawTimelineEvent, frame_index: usize, time_offset: f64) -> Self {
        Self {
            timestamp: raw.timestamp,
            content: raw.content,
            location: raw.location,
            food_items: raw.food_items.unwrap_or_default(),
            highlight_type: raw.highlight_type,
            frame_index,
            resolved_time_offset: time_offset,
        }
    }

    /// Index of the frame this event is attached to.
    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    /// Capture time of the attached frame, in seconds.
    pub fn resolved_time_offset(&self) -> f64 {
        self.resolved_time_offset
    }

    /// Place name with surrounding whitespace removed, if non-empty.
    pub fn place(&self) -> Option<&str> {
        self.location
            .as_deref()
            .map(str::trim)
            .filter(|place| !place.is_empty())
    }

    /// Attach the event to another frame.
    ///
    /// The index is clamped exactly as during reconciliation and the time
    /// offset re-resolved from `frames`. Returns the index actually used.
    pub fn reassign_frame(&mut self, index: i64, frames: &FrameSequence) -> AiResult<usize> {
        let resolved = frames.clamp_index(index).ok_or(AiError::NoFrames)?;
        let offset = frames.time_offset(resolved).ok_or(AiError::NoFrames)?;
        self.frame_index = resolved;
        self.resolved_time_offset = offset;
        Ok(resolved)
    }

    /// Convert back to the wire shape.
    pub fn to_raw(&self) -> RawTimelineEvent {
        RawTimelineEvent {
            timestamp: self.timestamp.clone(),
            content: self.content.clone(),
            best_frame_index: i64::try_from(self.frame_index).unwrap_or(i64::MAX),
            highlight_type: self.highlight_type,
            location: self.location.clone(),
            food_items: (!self.food_items.is_empty()).then(|| self.food_items.clone()),
        }
    }
}

/// A reconciled analysis of one video.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub title: String,
    pub summary: String,
    pub vibe: Vec<String>,
    pub timeline: Vec<TimelineEvent>,
}

impl AnalysisResult {
    /// Convert back to the wire shape.
    pub fn to_raw(&self) -> RawAnalysis {
        RawAnalysis {
            title: self.title.clone(),
            summary: self.summary.clone(),
            vibe: self.vibe.clone(),
            timeline: self.timeline.iter().map(TimelineEvent::to_raw).collect(),
        }
    }
}
