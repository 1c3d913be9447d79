//! Sampled video frames and the ordered sequence that owns them.
//!
//! Frames are immutable once produced. Later pipeline stages never copy a
//! frame: they hold the sequence behind an `Arc` and refer to frames by
//! positional index.

use crate::error::{Result, TripcutError};
use std::sync::Arc;

/// A single still captured from a video at a known time offset.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    time_offset: f64,
    width: u32,
    height: u32,
    preview: Vec<u8>,
    blob: Vec<u8>,
}

impl Frame {
    /// Create a frame from its capture time and both encodings.
    ///
    /// `preview` is the compact lossy encoding (JPEG) used for transport,
    /// `blob` the lossless encoding kept for higher-fidelity reuse.
    pub fn new(time_offset: f64, width: u32, height: u32, preview: Vec<u8>, blob: Vec<u8>) -> Self {
        Self {
            time_offset,
            width,
            height,
            preview,
            blob,
        }
    }

    /// Capture time in seconds from the start of the video.
    #[inline]
    pub fn time_offset(&self) -> f64 {
        self.time_offset
    }

    /// Frame dimensions as `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Compact preview encoding (JPEG).
    pub fn preview(&self) -> &[u8] {
        &self.preview
    }

    /// Lossless encoding (PNG).
    pub fn blob(&self) -> &[u8] {
        &self.blob
    }
}

/// An ordered list of frames with non-decreasing time offsets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameSequence {
    frames: Vec<Frame>,
}

/// Arc-wrapped sequence shared between a project and its pipeline stages.
pub type SharedFrameSequence = Arc<FrameSequence>;

impl FrameSequence {
    /// Create an empty sequence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty sequence with room for `capacity` frames.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            frames: Vec::with_capacity(capacity),
        }
    }

    /// Append a frame.
    ///
    /// Rejects frames whose time offset is negative, not finite, or earlier
    /// than the last frame already in the sequence.
    pub fn push(&mut self, frame: Frame) -> Result<()> {
        if !frame.time_offset.is_finite() || frame.time_offset < 0.0 {
            return Err(TripcutError::InvalidParameter(format!(
                "Frame time offset must be a non-negative number, got {}",
                frame.time_offset
            )));
        }
        if let Some(last) = self.frames.last() {
            if frame.time_offset < last.time_offset {
                return Err(TripcutError::InvalidParameter(format!(
                    "Frame at {:.3}s would precede previous frame at {:.3}s",
                    frame.time_offset, last.time_offset
                )));
            }
        }
        self.frames.push(frame);
        Ok(())
    }

    /// Number of frames.
    #[inline]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether the sequence holds no frames.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frame at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    /// Last frame, if any.
    pub fn last(&self) -> Option<&Frame> {
        self.frames.last()
    }

    /// Iterate frames in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Frame> {
        self.frames.iter()
    }

    /// Time offset of the frame at `index`.
    pub fn time_offset(&self, index: usize) -> Option<f64> {
        self.frames.get(index).map(Frame::time_offset)
    }

    /// All time offsets in order.
    pub fn time_offsets(&self) -> Vec<f64> {
        self.frames.iter().map(Frame::time_offset).collect()
    }

    /// Clamp an arbitrary index into `[0, len - 1]`.
    ///
    /// Out-of-range values resolve to the nearest valid frame: negatives to
    /// the first, anything past the end to the last. Returns `None` only for
    /// an empty sequence.
    pub fn clamp_index(&self, index: i64) -> Option<usize> {
        let last = self.frames.len().checked_sub(1)?;
        let last = i64::try_from(last).unwrap_or(i64::MAX);
        Some(index.min(last).max(0) as usize)
    }
}

impl TryFrom<Vec<Frame>> for FrameSequence {
    type Error = TripcutError;

    fn try_from(frames: Vec<Frame>) -> Result<Self> {
        let mut sequence = Self::with_capacity(frames.len());
        for frame in frames {
            sequence.push(frame)?;
        }
        Ok(sequence)
    }
}

impl<'a> IntoIterator for &'a FrameSequence {
    type Item = &'a Frame;
    type IntoIter = std::slice::Iter<'a, Frame>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}
