//! Error types for project orchestration.

use crate::project::ProjectStatus;
use thiserror::Error;
use tripcut_ai::AiError;
use tripcut_media::MediaError;
use uuid::Uuid;

/// Errors raised while managing or running projects.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Project not found: {0}")]
    ProjectNotFound(Uuid),

    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        from: &'static str,
        to: &'static str,
    },

    #[error("Project {project} has no timeline event {event}")]
    EventNotFound { project: Uuid, event: usize },

    #[error(transparent)]
    Media(#[from] MediaError),

    #[error(transparent)]
    Ai(#[from] AiError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl AppError {
    pub(crate) fn transition(from: &ProjectStatus, to: &ProjectStatus) -> Self {
        Self::InvalidTransition {
            from: from.name(),
            to: to.name(),
        }
    }
}

/// Result type alias for application operations.
pub type AppResult<T> = std::result::Result<T, AppError>;
