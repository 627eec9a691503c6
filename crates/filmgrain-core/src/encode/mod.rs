//! Image encoding for filmgrain.
//!
//! This module provides functionality for:
//! - Encoding RGBA pixel buffers to PNG (lossless, all four channels kept)
//!
//! # Examples
//!
//! ```ignore
//! use filmgrain_core::{encode::encode_png, PixelBuffer};
//!
//! let buffer = PixelBuffer::filled(100, 100, [128, 128, 128, 255]).unwrap();
//! let png_bytes = encode_png(&buffer).unwrap();
//! println!("Encoded {} bytes", png_bytes.len());
//! ```

mod png;

pub use png::{encode_png, encode_png_with, EncodeError, PngCompression, PNG_CONTENT_TYPE};
