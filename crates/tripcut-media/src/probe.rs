//! Media file probing to get metadata without a full decode.

use crate::error::{MediaError, MediaResult};
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Information about a media file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaProbe {
    /// File path
    pub path: String,
    /// Duration in seconds, if the container reports one
    pub duration: Option<f64>,
    /// Video streams
    pub video_streams: Vec<VideoStreamInfo>,
}

/// Information about a video stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoStreamInfo {
    pub index: u32,
    pub codec: String,
    pub width: u32,
    pub height: u32,
    pub fps: f32,
    pub pixel_format: String,
    /// Display rotation in degrees from the stream's display matrix
    #[serde(default)]
    pub rotation: f64,
}

impl VideoStreamInfo {
    /// Size of the picture as shown, after applying the display rotation.
    ///
    /// FFmpeg autorotates decoded frames, so a portrait phone clip stored
    /// as 1920x1080 with a quarter-turn comes out as 1080x1920.
    pub fn display_dimensions(&self) -> (u32, u32) {
        let quarter_turns = (self.rotation / 90.0).round() as i64;
        if quarter_turns.rem_euclid(2) == 1 {
            (self.height, self.width)
        } else {
            (self.width, self.height)
        }
    }
}

/// Read the rotation from a stream side-data line, either the display
/// matrix form (`displaymatrix: rotation of -90.00 degrees`) or the older
/// `rotate : 90` metadata tag.
pub fn parse_rotation(line: &str) -> Option<f64> {
    let line = line.trim();
    if let Some(rest) = line
        .find("rotation of ")
        .map(|at| &line[at + "rotation of ".len()..])
    {
        return rest.split_whitespace().next()?.parse().ok();
    }
    let (key, value) = line.split_once(':')?;
    if key.trim() == "rotate" {
        return value.trim().parse().ok();
    }
    None
}

/// Accumulates what FFmpeg reports about an input while it parses headers.
#[derive(Debug, Default)]
struct ProbeState {
    duration: Option<f64>,
    video_streams: Vec<VideoStreamInfo>,
    errors: Vec<String>,
    // Side data lines follow the stream line they belong to.
    in_video_stream: bool,
}

impl ProbeState {
    fn push_video(&mut self, info: VideoStreamInfo) {
        self.video_streams.push(info);
        self.in_video_stream = true;
    }

    fn end_stream(&mut self) {
        self.in_video_stream = false;
    }

    fn observe_line(&mut self, line: &str) {
        if !self.in_video_stream {
            return;
        }
        if let (Some(rotation), Some(stream)) = (parse_rotation(line), self.video_streams.last_mut()) {
            debug!(stream = stream.index, rotation, "Video stream is rotated");
            stream.rotation = rotation;
        }
    }
}

impl MediaProbe {
    /// Probe a media file by letting FFmpeg parse its headers.
    ///
    /// Blocking: spawns FFmpeg and waits for it to exit.
    pub fn probe<P: AsRef<Path>>(path: P) -> MediaResult<Self> {
        let path = path.as_ref();
        let path_str = path.to_string_lossy().to_string();

        if !path.exists() {
            return Err(MediaError::Decode(format!("File not found: {path_str}")));
        }

        let mut child = FfmpegCommand::new()
            .hide_banner()
            .input(&path_str)
            .args(["-frames:v", "0"])
            .format("null")
            .output("-")
            .spawn()
            .map_err(|e| MediaError::Decode(format!("Failed to spawn ffmpeg: {e}")))?;

        let events = child
            .iter()
            .map_err(|e| MediaError::Decode(format!("Failed to read ffmpeg output: {e}")))?;

        let mut state = ProbeState::default();
        for event in events {
            match event {
                FfmpegEvent::ParsedDuration(parsed) if parsed.input_index == 0 => {
                    state.duration = Some(parsed.duration);
                }
                FfmpegEvent::ParsedInputStream(stream) => match stream.video_data() {
                    Some(video) if stream.parent_index == 0 => state.push_video(VideoStreamInfo {
                        index: stream.stream_index,
                        codec: stream.format.clone(),
                        width: video.width,
                        height: video.height,
                        fps: video.fps,
                        pixel_format: video.pix_fmt.clone(),
                        rotation: 0.0,
                    }),
                    _ => state.end_stream(),
                },
                FfmpegEvent::ParsedOutput(_)
                | FfmpegEvent::ParsedOutputStream(_)
                | FfmpegEvent::ParsedStreamMapping(_) => {
                    state.end_stream();
                }
                FfmpegEvent::Log(LogLevel::Error | LogLevel::Fatal, message)
                | FfmpegEvent::Error(message) => {
                    debug!(%message, "ffmpeg reported an error while probing");
                    state.errors.push(message);
                }
                FfmpegEvent::Log(_, line) => state.observe_line(&line),
                _ => {}
            }
        }
        let _ = child.wait();
        let ProbeState {
            duration,
            video_streams,
            errors,
            ..
        } = state;

        if duration.is_none() && video_streams.is_empty() {
            let detail = errors
                .last()
                .cloned()
                .unwrap_or_else(|| "no stream information".to_string());
            return Err(MediaError::Decode(format!(
                "Could not read {path_str}: {detail}"
            )));
        }

        info!(
            path = %path_str,
            duration = ?duration,
            video_streams = video_streams.len(),
            "Probed media file"
        );

        Ok(Self {
            path: path_str,
            duration,
            video_streams,
        })
    }

    /// Check if the file has video.
    pub fn has_video(&self) -> bool {
        !self.video_streams.is_empty()
    }

    /// Get the primary video stream info.
    pub fn primary_video(&self) -> Option<&VideoStreamInfo> {
        self.video_streams.first()
    }
}
