//! Pixel buffer helpers shared by rasterizing previewers.

use std::io::Cursor;

use image::error::{ImageError, ParameterError, ParameterErrorKind};
use image::{DynamicImage, ImageFormat, RgbaImage};

/// Repack a BGRA bitmap into tightly packed RGBA.
///
/// Rows of `raw` may be padded; the stride is derived from the buffer
/// length. Returns an empty buffer when `raw` is too short for the
/// dimensions.
pub fn bgra_to_rgba(raw: &[u8], width: u32, height: u32) -> Vec<u8> {
    let (width, height) = (width as usize, height as usize);
    if width == 0 || height == 0 {
        return Vec::new();
    }

    let row_bytes = width * 4;
    let stride = raw.len() / height;
    if stride < row_bytes {
        return Vec::new();
    }

    let mut rgba = Vec::with_capacity(row_bytes * height);
    for row in raw.chunks(stride).take(height) {
        for pixel in row[..row_bytes].chunks_exact(4) {
            rgba.extend_from_slice(&[pixel[2], pixel[1], pixel[0], pixel[3]]);
        }
    }
    rgba
}

/// Encode a tightly packed RGBA buffer as PNG.
pub fn encode_png(rgba: Vec<u8>, width: u32, height: u32) -> Result<Vec<u8>, ImageError> {
    let image = RgbaImage::from_raw(width, height, rgba).ok_or_else(|| {
        ImageError::Parameter(ParameterError::from_kind(
            ParameterErrorKind::DimensionMismatch,
        ))
    })?;

    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(image).write_to(&mut out, ImageFormat::Png)?;
    Ok(out.into_inner())
}
