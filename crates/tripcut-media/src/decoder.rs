//! Frame source backed by FFmpeg via ffmpeg-sidecar.
//!
//! Each capture spawns FFmpeg with an input seek and asks for exactly one
//! scaled `rgb24` frame. FFmpeg runs on the blocking pool; the caller
//! suspends until the frame at the requested position is ready.

use crate::error::{MediaError, MediaResult};
use crate::input::{TempVideo, VideoInput};
use crate::probe::MediaProbe;
use crate::source::{FrameSource, SourceMetadata, SourceOpener};
use async_trait::async_trait;
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel};
use image::RgbImage;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A video opened for seeking through FFmpeg.
pub struct FfmpegSource {
    path: PathBuf,
    metadata: SourceMetadata,
    // Dropped with the source, releasing the spooled upload.
    _temp: Option<TempVideo>,
}

impl FfmpegSource {
    /// Open a video and load its metadata.
    ///
    /// Fails with [`MediaError::Decode`] if the file cannot be read or has
    /// no usable duration, and [`MediaError::UnsupportedFormat`] if it has no
    /// video stream.
    pub async fn open(input: &VideoInput) -> MediaResult<Self> {
        let (path, temp) = match input {
            VideoInput::Path(path) => (path.clone(), None),
            VideoInput::Bytes { name, data } => {
                let temp = TempVideo::spool(name, data)?;
                (temp.path().to_path_buf(), Some(temp))
            }
        };

        let probe_path = path.clone();
        let probe = tokio::task::spawn_blocking(move || MediaProbe::probe(probe_path))
            .await
            .map_err(|e| MediaError::Decode(format!("Probe task failed: {e}")))??;

        let video = probe.primary_video().ok_or_else(|| {
            MediaError::UnsupportedFormat(format!("No video stream in {}", input.display_name()))
        })?;

        let duration = match probe.duration {
            Some(d) if d.is_finite() && d > 0.0 => d,
            other => {
                return Err(MediaError::Decode(format!(
                    "Unreadable duration {other:?} for {}",
                    input.display_name()
                )))
            }
        };

        let (width, height) = video.display_dimensions();
        let metadata = SourceMetadata {
            duration,
            width,
            height,
        };
        info!(
            name = %input.display_name(),
            duration,
            width,
            height,
            rotation = video.rotation,
            codec = %video.codec,
            "Opened video source"
        );

        Ok(Self {
            path,
            metadata,
            _temp: temp,
        })
    }

    /// Path FFmpeg reads from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl FrameSource for FfmpegSource {
    fn metadata(&self) -> SourceMetadata {
        self.metadata
    }

    async fn capture(
        &mut self,
        time_offset: f64,
        width: u32,
        height: u32,
    ) -> MediaResult<RgbImage> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || capture_frame(&path, time_offset, width, height))
            .await
            .map_err(|e| MediaError::Decode(format!("Capture task failed: {e}")))?
    }
}

/// Decode the frame at `time_offset`, scaled to `width` x `height`.
///
/// Blocking: runs one FFmpeg process to completion.
pub fn capture_frame(path: &Path, time_offset: f64, width: u32, height: u32) -> MediaResult<RgbImage> {
    let mut child = FfmpegCommand::new()
        .hide_banner()
        .seek(format!("{time_offset:.3}"))
        .input(&*path.to_string_lossy())
        .frames(1)
        .args(["-vf", &format!("scale={width}:{height}")])
        .rawvideo()
        .spawn()
        .map_err(|e| MediaError::Decode(format!("Failed to spawn ffmpeg: {e}")))?;

    let events = child
        .iter()
        .map_err(|e| MediaError::Decode(format!("Failed to read ffmpeg output: {e}")))?;

    let mut captured = None;
    let mut last_error = None;
    for event in events {
        match event {
            FfmpegEvent::OutputFrame(frame) if captured.is_none() => captured = Some(frame),
            FfmpegEvent::Log(LogLevel::Error | LogLevel::Fatal, message)
            | FfmpegEvent::Error(message) => last_error = Some(message),
            _ => {}
        }
    }
    let _ = child.wait();

    let frame = captured.ok_or_else(|| {
        MediaError::Decode(format!(
            "No frame decoded at {time_offset:.3}s: {}",
            last_error.unwrap_or_else(|| "ffmpeg produced no output".to_string())
        ))
    })?;

    debug!(time_offset, width = frame.width, height = frame.height, "Captured frame");
    RgbImage::from_raw(frame.width, frame.height, frame.data).ok_or_else(|| {
        MediaError::Decode(format!(
            "Frame buffer at {time_offset:.3}s does not match {}x{} rgb24",
            frame.width, frame.height
        ))
    })
}

/// Opens uploaded videos with [`FfmpegSource`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FfmpegOpener;

#[async_trait]
impl SourceOpener for FfmpegOpener {
    async fn open(&self, input: &VideoInput) -> MediaResult<Box<dyn FrameSource>> {
        let source = FfmpegSource::open(input).await?;
        Ok(Box::new(source))
    }
}
