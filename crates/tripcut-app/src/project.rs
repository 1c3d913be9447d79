//! Projects: one uploaded video and everything derived from it.

use crate::error::{AppError, AppResult};
use serde::Serialize;
use std::sync::Arc;
use tripcut_ai::AnalysisResult;
use tripcut_core::{FrameSequence, SharedFrameSequence};
use tripcut_media::VideoInput;
use uuid::Uuid;

/// Processing state of a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum ProjectStatus {
    /// Uploaded, not yet processed.
    Idle,
    /// Sampling frames from the video.
    Extracting,
    /// Waiting for the model's analysis.
    Analyzing,
    /// Frames and analysis are available.
    Done,
    /// Processing failed.
    Error { message: String },
}

impl ProjectStatus {
    /// Short name of the state.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Extracting => "extracting",
            Self::Analyzing => "analyzing",
            Self::Done => "done",
            Self::Error { .. } => "error",
        }
    }

    /// Whether processing has finished, successfully or not.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Error { .. })
    }

    /// Whether `next` may directly follow this state.
    ///
    /// `Idle → Extracting → Analyzing → Done`, with `Error` reachable from
    /// either working state.
    pub fn can_transition_to(&self, next: &ProjectStatus) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Extracting)
                | (Self::Extracting, Self::Analyzing)
                | (Self::Analyzing, Self::Done)
                | (Self::Extracting | Self::Analyzing, Self::Error { .. })
        )
    }
}

/// A single uploaded video and its pipeline output.
#[derive(Debug, Clone)]
pub struct Project {
    id: Uuid,
    /// Display name
    pub name: String,
    /// The uploaded video
    pub source: VideoInput,
    status: ProjectStatus,
    /// Sampled frames; empty until extraction finishes
    pub frames: SharedFrameSequence,
    /// Reconciled analysis, once available
    pub analysis: Option<AnalysisResult>,
}

impl Project {
    /// Create an idle project for `source`.
    pub fn new(name: impl Into<String>, source: VideoInput) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            source,
            status: ProjectStatus::Idle,
            frames: Arc::new(FrameSequence::new()),
            analysis: None,
        }
    }

    /// Create an idle project named after the input's file name.
    pub fn from_input(source: VideoInput) -> Self {
        let name = source.display_name();
        Self::new(name, source)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn status(&self) -> &ProjectStatus {
        &self.status
    }

    /// Move to `next`, rejecting transitions the lifecycle does not allow.
    pub fn transition(&mut self, next: ProjectStatus) -> AppResult<()> {
        if !self.status.can_transition_to(&next) {
            return Err(AppError::transition(&self.status, &next));
        }
        self.status = next;
        Ok(())
    }
}
