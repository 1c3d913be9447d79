//! Output dimension math for frame capture.

use serde::{Deserialize, Serialize};

/// Pixel dimensions of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    /// Create new dimensions.
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Whether either side is zero.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Downscale factor that brings the width to at most `max_width`.
    ///
    /// Never greater than 1: sources narrower than `max_width` are not
    /// upscaled.
    pub fn scale_factor(self, max_width: u32) -> f64 {
        if self.width == 0 {
            return 1.0;
        }
        (max_width as f64 / self.width as f64).min(1.0)
    }

    /// Scale to fit within `max_width`, preserving aspect ratio.
    ///
    /// Each side is rounded to the nearest pixel and kept at least 1.
    pub fn fit_width(self, max_width: u32) -> Self {
        let scale = self.scale_factor(max_width);
        if scale >= 1.0 {
            return self;
        }
        let width = ((self.width as f64 * scale).round() as u32).clamp(1, max_width.max(1));
        let height = ((self.height as f64 * scale).round() as u32).max(1);
        Self { width, height }
    }
}
