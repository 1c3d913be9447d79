//! Synthetic sources and scripted analysis clients shared by the scenarios.

use async_trait::async_trait;
use image::{Rgb, RgbImage};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tripcut_ai::{AiError, AiResult, AnalysisClient, AnalysisRequest};
use tripcut_app::{Pipeline, PipelineConfig, ProjectStore};
use tripcut_media::{
    FrameSource, MediaError, MediaResult, SourceMetadata, SourceOpener, VideoInput,
};

// ── Sources ────────────────────────────────────────────────────

/// Holds a source's first capture until released.
#[derive(Default)]
pub struct CaptureGate {
    pub entered: Notify,
    pub release: Notify,
}

/// A video that paints each frame with a colour derived from its time.
pub struct SyntheticSource {
    metadata: SourceMetadata,
    released: Arc<AtomicUsize>,
    gate: Option<Arc<CaptureGate>>,
}

impl Drop for SyntheticSource {
    fn drop(&mut self) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl FrameSource for SyntheticSource {
    fn metadata(&self) -> SourceMetadata {
        self.metadata
    }

    async fn capture(&mut self, time_offset: f64, width: u32, height: u32) -> MediaResult<RgbImage> {
        if let Some(gate) = self.gate.take() {
            gate.entered.notify_one();
            gate.release.notified().await;
        }
        tokio::task::yield_now().await;
        let shade = ((time_offset * 10.0) as u32 % 256) as u8;
        Ok(RgbImage::from_pixel(width, height, Rgb([shade, 128, 255 - shade])))
    }
}

/// Opens synthetic sources whose duration and size come from the input's
/// file name, e.g. `tokyo-12s-1920x1080.mp4`. Counts released sources.
#[derive(Default)]
pub struct SyntheticOpener {
    pub released: Arc<AtomicUsize>,
    pub opened: AtomicUsize,
    pub gate: Option<Arc<CaptureGate>>,
}

impl SyntheticOpener {
    /// An opener whose sources wait on `gate` before their first capture.
    pub fn gated(gate: Arc<CaptureGate>) -> Self {
        Self {
            gate: Some(gate),
            ..Default::default()
        }
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }
}

fn parse_name(name: &str) -> Option<SourceMetadata> {
    let stem = name.rsplit_once('.').map_or(name, |(stem, _)| stem);
    let mut parts = stem.rsplit('-');
    let (width, height) = parts.next()?.split_once('x')?;
    let duration = parts.next()?.strip_suffix('s')?;
    Some(SourceMetadata {
        duration: duration.parse().ok()?,
        width: width.parse().ok()?,
        height: height.parse().ok()?,
    })
}

#[async_trait]
impl SourceOpener for SyntheticOpener {
    async fn open(&self, input: &VideoInput) -> MediaResult<Box<dyn FrameSource>> {
        let name = input.display_name();
        let metadata = parse_name(&name)
            .ok_or_else(|| MediaError::Decode(format!("Cannot read {name}")))?;
        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(SyntheticSource {
            metadata,
            released: Arc::clone(&self.released),
            gate: self.gate.clone(),
        }))
    }
}

// ── Clients ────────────────────────────────────────────────────

/// A reply a scripted client gives.
#[derive(Clone)]
pub enum Reply {
    Payload(String),
    Nothing,
    Fail { status: u16, message: String },
    Hang,
}

/// Answers by number of attached frames, falling back to `default`.
pub struct ScriptedClient {
    by_frame_count: HashMap<usize, Reply>,
    default: Reply,
    pub calls: AtomicUsize,
}

impl ScriptedClient {
    pub fn always(reply: Reply) -> Self {
        Self {
            by_frame_count: HashMap::new(),
            default: reply,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn when_frames(mut self, count: usize, reply: Reply) -> Self {
        self.by_frame_count.insert(count, reply);
        self
    }
}

#[async_trait]
impl AnalysisClient for ScriptedClient {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn analyze(&self, request: &AnalysisRequest) -> AiResult<Option<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let reply = self
            .by_frame_count
            .get(&request.image_count())
            .unwrap_or(&self.default)
            .clone();
        match reply {
            Reply::Payload(text) => Ok(Some(text)),
            Reply::Nothing => Ok(None),
            Reply::Fail { status, message } => Err(AiError::Api { status, message }),
            Reply::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(None)
            }
        }
    }
}

/// Holds every call until released, signalling when a call arrives.
pub struct GatedClient {
    pub entered: Notify,
    pub release: Notify,
    pub reply: String,
}

#[async_trait]
impl AnalysisClient for GatedClient {
    fn name(&self) -> &str {
        "gated"
    }

    async fn analyze(&self, _request: &AnalysisRequest) -> AiResult<Option<String>> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok(Some(self.reply.clone()))
    }
}

// ── Helpers ────────────────────────────────────────────────────

/// A valid payload with one event per entry of `indices`.
pub fn payload(title: &str, indices: &[i64]) -> String {
    let timeline: Vec<_> = indices
        .iter()
        .enumerate()
        .map(|(i, index)| {
            serde_json::json!({
                "timestamp": format!("00:{:02}", i * 2),
                "content": format!("moment {i}"),
                "bestFrameIndex": index,
                "highlightType": "scenery",
                "location": format!("Stop {i}")
            })
        })
        .collect();
    serde_json::json!({
        "title": title,
        "summary": "Scripted summary.",
        "vibe": ["scripted"],
        "timeline": timeline
    })
    .to_string()
}

pub fn pipeline_with(
    opener: Arc<SyntheticOpener>,
    client: Arc<dyn AnalysisClient>,
    config: PipelineConfig,
) -> Pipeline {
    Pipeline::new(ProjectStore::new(), opener, client, config)
}

pub fn video(name: &str) -> VideoInput {
    VideoInput::path(format!("/trips/{name}"))
}

#[test]
fn parse_name_reads_duration_and_size() {
    let metadata = parse_name("tokyo-12s-1920x1080.mp4").unwrap();
    assert_eq!(metadata.duration, 12.0);
    assert_eq!((metadata.width, metadata.height), (1920, 1080));
    assert!(parse_name("broken.mp4").is_none());
}
