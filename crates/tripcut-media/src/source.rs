//! Decoder abstraction used by the frame sampler.

use crate::error::MediaResult;
use crate::input::VideoInput;
use async_trait::async_trait;
use image::RgbImage;
use tripcut_core::Dimensions;

/// Stream information known once the video's metadata has loaded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceMetadata {
    /// Duration in seconds.
    pub duration: f64,
    /// Source frame width in pixels.
    pub width: u32,
    /// Source frame height in pixels.
    pub height: u32,
}

impl SourceMetadata {
    /// Source dimensions.
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }
}

/// A seekable video that can produce a still at a given time.
///
/// Seeking is stateful, so capture takes `&mut self`: one source never has
/// two captures in flight.
#[async_trait]
pub trait FrameSource: Send {
    /// Metadata loaded when the source was opened.
    fn metadata(&self) -> SourceMetadata;

    /// Seek to `time_offset` seconds, wait for the decoder to settle there,
    /// and return the visible image scaled to `width` x `height`.
    async fn capture(&mut self, time_offset: f64, width: u32, height: u32)
        -> MediaResult<RgbImage>;
}

#[async_trait]
impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn metadata(&self) -> SourceMetadata {
        (**self).metadata()
    }

    async fn capture(
        &mut self,
        time_offset: f64,
        width: u32,
        height: u32,
    ) -> MediaResult<RgbImage> {
        (**self).capture(time_offset, width, height).await
    }
}

/// Opens a [`FrameSource`] for an uploaded video.
#[async_trait]
pub trait SourceOpener: Send + Sync {
    /// Open `input` and load its metadata.
    async fn open(&self, input: &VideoInput) -> MediaResult<Box<dyn FrameSource>>;
}
