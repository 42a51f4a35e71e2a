//! RGB frame helpers on top of the `image` crate.
//!
//! Frames travel through the workspace as `Tensor<u8>` in HWC layout
//! `[height, width, 3]`. This crate converts between that representation and
//! encoded bytes, and provides the two geometric operations the service and
//! the tools need: horizontal mirroring and height-constrained resizing.

pub mod error;

pub use error::ImageError;

use crates_image::{ImageBuffer, ImageFormat, Rgb, RgbImage, codecs::jpeg::JpegEncoder, imageops};
use gesture_base::Tensor;
use std::path::Path;

/// JPEG quality used when no explicit quality is requested.
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Decode any supported image format into an RGB tensor.
///
/// Grayscale, alpha and 16-bit inputs are converted to 8-bit RGB, since the
/// hand detector only accepts RGB frames.
pub fn decode_rgb(data: &[u8]) -> Result<Tensor<u8>, ImageError> {
    let rgb = crates_image::load_from_memory(data)?.to_rgb8();
    from_rgb_image(rgb)
}

/// Sniff the container format without decoding pixels.
pub fn guess_format(data: &[u8]) -> Option<&'static str> {
    match crates_image::guess_format(data).ok()? {
        ImageFormat::Jpeg => Some("jpeg"),
        ImageFormat::Png => Some("png"),
        ImageFormat::Bmp => Some("bmp"),
        ImageFormat::WebP => Some("webp"),
        _ => None,
    }
}

fn from_rgb_image(rgb: RgbImage) -> Result<Tensor<u8>, ImageError> {
    let (width, height) = rgb.dimensions();
    Ok(Tensor::new(
        vec![height as usize, width as usize, 3],
        rgb.into_raw(),
    )?)
}

fn to_rgb_image(frame: &Tensor<u8>) -> Result<RgbImage, ImageError> {
    let (height, width, channels) = frame.image_dims()?;
    if channels != 3 {
        return Err(ImageError::UnsupportedChannels(channels));
    }
    ImageBuffer::<Rgb<u8>, _>::from_raw(width as u32, height as u32, frame.data.clone())
        .ok_or_else(|| ImageError::Encode("pixel buffer does not match dimensions".to_string()))
}

/// Encode an RGB tensor as JPEG.
pub fn encode_jpeg(frame: &Tensor<u8>, quality: u8) -> Result<Vec<u8>, ImageError> {
    let rgb = to_rgb_image(frame)?;
    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, quality)
        .encode_image(&rgb)
        .map_err(|e| ImageError::Encode(e.to_string()))?;
    Ok(out)
}

/// Encode an RGB tensor as JPEG and write it to `path`.
pub fn save_jpeg(frame: &Tensor<u8>, path: impl AsRef<Path>) -> Result<(), ImageError> {
    let bytes = encode_jpeg(frame, DEFAULT_JPEG_QUALITY)?;
    std::fs::write(path.as_ref(), bytes).map_err(|e| ImageError::Encode(e.to_string()))
}

/// Mirror an HWC tensor left-to-right. Works for any channel count.
pub fn flip_horizontal(frame: &Tensor<u8>) -> Result<Tensor<u8>, ImageError> {
    let (height, width, channels) = frame.image_dims()?;
    let row_len = width * channels;
    let mut data = Vec::with_capacity(frame.data.len());
    for row in frame.data.chunks_exact(row_len) {
        for pixel in row.chunks_exact(channels).rev() {
            data.extend_from_slice(pixel);
        }
    }
    Ok(Tensor::new(vec![height, width, channels], data)?)
}

/// Resize an RGB tensor to `height` rows, keeping the aspect ratio.
pub fn resize_to_height(frame: &Tensor<u8>, height: u32) -> Result<Tensor<u8>, ImageError> {
    let rgb = to_rgb_image(frame)?;
    let (w, h) = rgb.dimensions();
    if h == 0 || height == 0 {
        return Err(ImageError::Encode(format!("cannot resize {w}x{h} to height {height}")));
    }
    let width = ((w as f64 * height as f64 / h as f64) as u32).max(1);
    let resized = imageops::resize(&rgb, width, height, imageops::FilterType::Triangle);
    from_rgb_image(resized)
}
