//! Error types for the analysis subsystem.

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while requesting or reconciling an analysis.
#[derive(Debug, Error)]
pub enum AiError {
    /// The model call returned no parsable payload.
    #[error("The model returned an empty response")]
    EmptyResponse,

    /// The payload could not be read as the expected schema shape.
    #[error("Malformed model response: {0}")]
    MalformedResponse(String),

    /// There are no frames to resolve timeline events against.
    #[error("Cannot analyze an empty frame sequence")]
    NoFrames,

    /// The HTTP request could not be completed.
    #[error("Request to analysis service failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with an error status. `message` is the
    /// provider's own text.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The call did not finish within the configured timeout.
    #[error("Analysis timed out after {0:?}")]
    Timeout(Duration),

    /// No API key was configured.
    #[error("No API key configured for the analysis service")]
    MissingApiKey,
}

/// Result type alias for analysis operations.
pub type AiResult<T> = std::result::Result<T, AiError>;
