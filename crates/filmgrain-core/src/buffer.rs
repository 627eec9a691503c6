//! Interleaved RGBA pixel buffer shared by every pipeline stage.

use thiserror::Error;

/// Number of interleaved channels per pixel (R, G, B, A).
pub const CHANNELS: usize = 4;

/// A buffer whose dimensions disagree with its byte length.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidBufferError {
    /// Width or height is zero.
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    ZeroDimension { width: u32, height: u32 },

    /// Pixel data length doesn't match `width * height * 4`.
    #[error("Invalid pixel data for {width}x{height}: expected {expected} bytes (width * height * 4), got {actual}")]
    LengthMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    /// `width * height * 4` does not fit in memory addressing.
    #[error("Image dimensions {width}x{height} are too large")]
    TooLarge { width: u32, height: u32 },
}

/// A decoded image with RGBA pixel data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// RGBA pixel data in row-major order (4 bytes per pixel).
    /// Length must be width * height * 4.
    pub pixels: Vec<u8>,
}

impl PixelBuffer {
    /// Create a buffer, rejecting inconsistent dimensions.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, InvalidBufferError> {
        let buffer = Self {
            width,
            height,
            pixels,
        };
        buffer.validate()?;
        Ok(buffer)
    }

    /// Create a buffer where every pixel holds the same RGBA value.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Result<Self, InvalidBufferError> {
        let len = expected_len(width, height)?;
        let pixels = rgba.iter().copied().cycle().take(len).collect();
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Check that the dimensions are non-zero and agree with the byte length.
    pub fn validate(&self) -> Result<(), InvalidBufferError> {
        let expected = expected_len(self.width, self.height)?;
        if self.pixels.len() != expected {
            return Err(InvalidBufferError::LengthMismatch {
                width: self.width,
                height: self.height,
                expected,
                actual: self.pixels.len(),
            });
        }
        Ok(())
    }

    /// Byte offset of pixel `(x, y)`.
    #[inline]
    pub fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * CHANNELS
    }

    /// Channel `c` (0=R, 1=G, 2=B, 3=A) of pixel `(x, y)`.
    #[inline]
    pub fn channel(&self, x: u32, y: u32, c: usize) -> u8 {
        self.pixels[self.offset(x, y) + c]
    }

    /// The RGBA value of pixel `(x, y)`.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.offset(x, y);
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }

    /// Get the total number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Create a buffer from an `image::RgbaImage`.
    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            pixels: img.into_raw(),
        }
    }
}

/// Byte length implied by `width x height` RGBA pixels.
fn expected_len(width: u32, height: u32) -> Result<usize, InvalidBufferError> {
    if width == 0 || height == 0 {
        return Err(InvalidBufferError::ZeroDimension { width, height });
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(CHANNELS))
        .ok_or(InvalidBufferError::TooLarge { width, height })
}

/// Round a float channel value to the nearest byte, saturating at 0 and 255.
///
/// Halfway values round to the even neighbor, as a clamped byte array store
/// does. NaN maps to 0.
#[inline]
pub fn clamp_to_u8(value: f64) -> u8 {
    // `as` saturates and maps NaN to 0.
    value.round_ties_even().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_valid_buffer() {
        let buffer = PixelBuffer::new(3, 2, vec![0u8; 3 * 2 * 4]).unwrap();
        assert_eq!(buffer.width, 3);
        assert_eq!(buffer.height, 2);
        assert_eq!(buffer.pixel_count(), 6);
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let result = PixelBuffer::new(10, 10, vec![0u8; 300]);
        assert_eq!(
            result,
            Err(InvalidBufferError::LengthMismatch {
                width: 10,
                height: 10,
                expected: 400,
                actual: 300,
            })
        );
    }

    #[test]
    fn test_zero_dimension_rejected() {
        assert!(matches!(
            PixelBuffer::new(0, 5, vec![]),
            Err(InvalidBufferError::ZeroDimension { .. })
        ));
        assert!(matches!(
            PixelBuffer::filled(5, 0, [0, 0, 0, 0]),
            Err(InvalidBufferError::ZeroDimension { .. })
        ));
    }

    #[test]
    fn test_filled_layout() {
        let buffer = PixelBuffer::filled(2, 2, [1, 2, 3, 4]).unwrap();
        assert_eq!(buffer.pixels, vec![1, 2, 3, 4, 1, 2, 3, 4, 1, 2, 3, 4, 1, 2, 3, 4]);
    }

    #[test]
    fn test_channel_addressing() {
        // 2x2 image where each byte holds its own index
        let pixels: Vec<u8> = (0..16).collect();
        let buffer = PixelBuffer::new(2, 2, pixels).unwrap();

        assert_eq!(buffer.pixel(0, 0), [0, 1, 2, 3]);
        assert_eq!(buffer.pixel(1, 0), [4, 5, 6, 7]);
        assert_eq!(buffer.pixel(0, 1), [8, 9, 10, 11]);
        assert_eq!(buffer.channel(1, 1, 3), 15);
    }

    #[test]
    fn test_from_rgba_image() {
        let img = image::RgbaImage::from_pixel(4, 3, image::Rgba([10, 20, 30, 40]));
        let buffer = PixelBuffer::from_rgba_image(img);
        assert_eq!((buffer.width, buffer.height), (4, 3));
        assert_eq!(buffer, PixelBuffer::filled(4, 3, [10, 20, 30, 40]).unwrap());
    }

    #[test]
    fn test_clamp_to_u8() {
        assert_eq!(clamp_to_u8(-12.0), 0);
        assert_eq!(clamp_to_u8(300.0), 255);
        assert_eq!(clamp_to_u8(127.49), 127);
        assert_eq!(clamp_to_u8(127.51), 128);
        assert_eq!(clamp_to_u8(f64::NEG_INFINITY), 0);
    }

    #[test]
    fn test_clamp_to_u8_ties_to_even() {
        assert_eq!(clamp_to_u8(127.5), 128);
        assert_eq!(clamp_to_u8(126.5), 126);
        assert_eq!(clamp_to_u8(0.5), 0);
        assert_eq!(clamp_to_u8(1.5), 2);
        assert_eq!(clamp_to_u8(254.5), 254);
        assert_eq!(clamp_to_u8(f64::NAN), 0);
    }

    #[test]
    fn test_error_display() {
        let err = InvalidBufferError::LengthMismatch {
            width: 10,
            height: 10,
            expected: 400,
            actual: 300,
        };
        assert_eq!(
            err.to_string(),
            "Invalid pixel data for 10x10: expected 400 bytes (width * height * 4), got 300"
        );
    }
}
