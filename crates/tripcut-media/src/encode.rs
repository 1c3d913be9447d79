//! Encoding captured images into frame payloads.

use crate::error::MediaResult;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbImage};
use tripcut_core::Frame;

/// Encode one captured image into a [`Frame`].
///
/// The compact JPEG preview and the lossless PNG blob are both written from
/// the same decoded pixels.
pub fn encode_frame(image: &RgbImage, time_offset: f64, preview_quality: u8) -> MediaResult<Frame> {
    let (width, height) = image.dimensions();

    let mut preview = Vec::new();
    JpegEncoder::new_with_quality(&mut preview, preview_quality.clamp(1, 100)).write_image(
        image.as_raw(),
        width,
        height,
        ExtendedColorType::Rgb8,
    )?;

    let mut blob = Vec::new();
    PngEncoder::new(&mut blob).write_image(image.as_raw(), width, height, ExtendedColorType::Rgb8)?;

    Ok(Frame::new(time_offset, width, height, preview, blob))
}
