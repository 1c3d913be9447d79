//! Error types for media operations.

use thiserror::Error;
use tripcut_core::TripcutError;

/// Errors that can occur while opening or sampling a video.
#[derive(Debug, Error)]
pub enum MediaError {
    /// The video could not be opened or decoded.
    #[error("Decode error: {0}")]
    Decode(String),

    /// No readable frame could be produced from the video.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Sampler configuration cannot produce any frames.
    #[error("Invalid sampler configuration: {0}")]
    InvalidConfig(String),

    /// Encoding a captured image failed.
    #[error("Image encoding error: {0}")]
    Encode(#[from] image::ImageError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Frame sequence invariant violated.
    #[error(transparent)]
    Core(#[from] TripcutError),
}

/// Result type alias for media operations.
pub type MediaResult<T> = std::result::Result<T, MediaError>;
