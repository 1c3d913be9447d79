//! Deterministic temporal sampling of a video into a bounded frame set.
//!
//! Frames are spread across the whole duration at a fixed interval:
//!
//! ```text
//! interval = max(min_interval, duration / target_count)
//! t_k      = k * interval            for k = 0, 1, 2, ...
//! ```
//!
//! Sampling stops once `t_k >= duration` or `target_count` frames have been
//! captured, whichever comes first. Each step seeks, waits for the decoder
//! to settle, captures at the scaled size and encodes the result.

use crate::encode::encode_frame;
use crate::error::{MediaError, MediaResult};
use crate::source::FrameSource;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use tripcut_core::FrameSequence;

/// Seeks are kept this far (seconds) inside the end of the video.
pub const SEEK_EPSILON: f64 = 0.001;

/// Configuration for frame sampling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplerConfig {
    /// Maximum number of frames to capture (default: 120).
    pub target_count: u32,
    /// Maximum output width in pixels (default: 960).
    pub max_width: u32,
    /// Floor on the sampling interval in seconds (default: 0.5).
    pub min_interval: f64,
    /// JPEG quality of the preview encoding, 1-100 (default: 60).
    pub preview_quality: u8,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            target_count: 120,
            max_width: 960,
            min_interval: 0.5,
            preview_quality: 60,
        }
    }
}

impl SamplerConfig {
    fn validate(&self) -> MediaResult<()> {
        if self.target_count == 0 {
            return Err(MediaError::InvalidConfig("target_count must be at least 1".into()));
        }
        if self.max_width == 0 {
            return Err(MediaError::InvalidConfig("max_width must be at least 1".into()));
        }
        if !self.min_interval.is_finite() || self.min_interval <= 0.0 {
            return Err(MediaError::InvalidConfig(format!(
                "min_interval must be positive, got {}",
                self.min_interval
            )));
        }
        Ok(())
    }
}

/// Progress reported after each captured frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleProgress {
    /// Frames captured so far.
    pub captured: usize,
    /// Frames the sampler expects to capture in total.
    pub planned: usize,
    /// Time offset of the frame just captured.
    pub time_offset: f64,
}

impl SampleProgress {
    /// Completion fraction (0.0 to 1.0).
    pub fn fraction(&self) -> f32 {
        if self.planned == 0 {
            return 0.0;
        }
        (self.captured as f32 / self.planned as f32).min(1.0)
    }
}

/// Gap between consecutive captures.
pub fn sampling_interval(duration: f64, target_count: u32, min_interval: f64) -> f64 {
    (duration / target_count.max(1) as f64).max(min_interval)
}

/// Number of sample positions `k * interval` that fall before `duration`,
/// capped at `target_count`.
pub fn planned_frame_count(duration: f64, interval: f64, target_count: u32) -> usize {
    if duration.is_nan() || interval.is_nan() || duration <= 0.0 || interval <= 0.0 {
        return 0;
    }
    let positions = (duration / interval).ceil() as usize;
    positions.min(target_count as usize)
}

/// Seek time for a sample position, kept inside `[0, duration - SEEK_EPSILON]`.
fn clamp_seek_time(position: f64, duration: f64) -> f64 {
    position.min(duration - SEEK_EPSILON).max(0.0)
}

/// Samples videos into ordered frame sequences.
#[derive(Debug, Clone, Default)]
pub struct FrameSampler {
    config: SamplerConfig,
}

impl FrameSampler {
    /// Create a sampler with the given configuration.
    pub fn new(config: SamplerConfig) -> Self {
        Self { config }
    }

    /// Sampler configuration.
    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// Sample `source` into a frame sequence.
    ///
    /// The source is consumed and dropped before returning, on success and
    /// on failure alike.
    pub async fn sample<S: FrameSource>(&self, source: S) -> MediaResult<FrameSequence> {
        self.sample_with_progress(source, |_| {}).await
    }

    /// Sample `source`, reporting progress after each captured frame.
    pub async fn sample_with_progress<S: FrameSource>(
        &self,
        mut source: S,
        mut on_progress: impl FnMut(SampleProgress) + Send,
    ) -> MediaResult<FrameSequence> {
        self.config.validate()?;

        let metadata = source.metadata();
        let duration = metadata.duration;
        if !duration.is_finite() || duration <= 0.0 {
            return Err(MediaError::Decode(format!(
                "Video duration is unreadable ({duration})"
            )));
        }
        if metadata.dimensions().is_empty() {
            return Err(MediaError::UnsupportedFormat(format!(
                "Video reports empty dimensions {}x{}",
                metadata.width, metadata.height
            )));
        }

        let output = metadata.dimensions().fit_width(self.config.max_width);
        let target = self.config.target_count as usize;
        let interval = sampling_interval(duration, self.config.target_count, self.config.min_interval);
        let planned = planned_frame_count(duration, interval, self.config.target_count);

        info!(
            duration,
            interval,
            planned,
            width = output.width,
            height = output.height,
            "Sampling video"
        );

        let mut frames = FrameSequence::with_capacity(planned);
        let mut step: u32 = 0;
        loop {
            let position = step as f64 * interval;
            if position >= duration || frames.len() >= target {
                break;
            }
            step += 1;

            let seek_time = clamp_seek_time(position, duration);
            let image = match source.capture(seek_time, output.width, output.height).await {
                Ok(image) => image,
                Err(e) => {
                    warn!(time_offset = seek_time, error = %e, "Skipping unreadable frame");
                    continue;
                }
            };

            let frame = encode_frame(&image, seek_time, self.config.preview_quality)?;
            debug!(
                index = frames.len(),
                time_offset = seek_time,
                preview_bytes = frame.preview().len(),
                "Frame sampled"
            );
            frames.push(frame)?;

            on_progress(SampleProgress {
                captured: frames.len(),
                planned,
                time_offset: seek_time,
            });
        }
        drop(source);

        if frames.is_empty() {
            return Err(MediaError::UnsupportedFormat(
                "No readable frame could be captured".into(),
            ));
        }

        info!(frames = frames.len(), "Sampling complete");
        Ok(frames)
    }
}
