//! Tripcut Media - FFmpeg integration for frame sampling
//!
//! This crate handles:
//! - Opening uploaded videos (on disk or spooled from memory)
//! - Media file probing
//! - Seek-and-capture decoding through FFmpeg
//! - Sampling a video into an ordered, bounded frame sequence

pub mod decoder;
pub mod encode;
pub mod error;
pub mod input;
pub mod probe;
pub mod sampler;
pub mod source;

pub use decoder::{FfmpegOpener, FfmpegSource};
pub use error::{MediaError, MediaResult};
pub use input::{TempVideo, VideoInput};
pub use probe::MediaProbe;
pub use sampler::{FrameSampler, SampleProgress, SamplerConfig};
pub use source::{FrameSource, SourceMetadata, SourceOpener};

/// Check whether an FFmpeg binary is reachable on `PATH`.
pub fn ffmpeg_available() -> bool {
    let found = which::which("ffmpeg").is_ok();
    tracing::debug!(found, "Checked for ffmpeg on PATH");
    found
}
