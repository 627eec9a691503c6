//! Raster image decoding into RGBA buffers.

use std::io::Cursor;

use image::ImageReader;

use super::{DecodeError, ImageFormat};
use crate::buffer::PixelBuffer;

/// Decode compressed image bytes into an RGBA pixel buffer.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if the bytes are not a supported format.
/// Returns `DecodeError::CorruptedFile` if the image data is damaged.
pub fn decode_image(bytes: &[u8]) -> Result<PixelBuffer, DecodeError> {
    let format = detect_format(bytes).ok_or(DecodeError::InvalidFormat)?;

    let mut reader = ImageReader::new(Cursor::new(bytes));
    reader.set_format(format.to_image_format());

    let img = reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let buffer = PixelBuffer::from_rgba_image(img.into_rgba8());
    buffer.validate()?;
    Ok(buffer)
}

/// Identify the container format from its magic bytes.
///
/// Returns `None` for unknown signatures and for formats this build
/// cannot decode.
pub fn detect_format(bytes: &[u8]) -> Option<ImageFormat> {
    match image::guess_format(bytes).ok()? {
        image::ImageFormat::Png => Some(ImageFormat::Png),
        image::ImageFormat::Jpeg => Some(ImageFormat::Jpeg),
        image::ImageFormat::Gif => Some(ImageFormat::Gif),
        image::ImageFormat::WebP => Some(ImageFormat::WebP),
        _ => None,
    }
}
