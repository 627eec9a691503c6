//! PNG encoding for processed images.
//!
//! This module provides PNG encoding using the `image` crate's PNG encoder.
//! Output is always 8-bit RGBA so alpha written by the blur survives intact.

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::buffer::{InvalidBufferError, PixelBuffer};

/// Content type of the bytes produced by [`encode_png`].
pub const PNG_CONTENT_TYPE: &str = "image/png";

/// Errors that can occur during PNG encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data doesn't match the buffer's dimensions
    #[error(transparent)]
    InvalidBuffer(#[from] InvalidBufferError),

    /// PNG encoding failed
    #[error("PNG encoding failed: {0}")]
    EncodingFailed(String),
}

/// Speed/size trade-off for the deflate stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PngCompression {
    /// Fastest encoding, largest files.
    Fast,
    /// Balanced.
    #[default]
    Default,
    /// Smallest files, slowest encoding.
    Best,
}

impl PngCompression {
    fn to_image_compression(self) -> CompressionType {
        match self {
            PngCompression::Fast => CompressionType::Fast,
            PngCompression::Default => CompressionType::Default,
            PngCompression::Best => CompressionType::Best,
        }
    }
}

/// Encode an RGBA buffer to PNG bytes with default compression.
pub fn encode_png(buffer: &PixelBuffer) -> Result<Vec<u8>, EncodeError> {
    encode_png_with(buffer, PngCompression::Default)
}

/// Encode an RGBA buffer to PNG bytes.
///
/// # Returns
///
/// PNG-encoded bytes on success, or an error if the buffer is malformed
/// or encoding fails.
pub fn encode_png_with(
    buffer: &PixelBuffer,
    compression: PngCompression,
) -> Result<Vec<u8>, EncodeError> {
    buffer.validate()?;

    let mut out = Vec::new();
    let encoder = PngEncoder::new_with_quality(
        &mut out,
        compression.to_image_compression(),
        FilterType::Adaptive,
    );

    encoder
        .write_image(
            &buffer.pixels,
            buffer.width,
            buffer.height,
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(out)
}
