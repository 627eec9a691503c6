//! Image decoding for filmgrain.
//!
//! This module turns compressed image bytes into an RGBA [`PixelBuffer`]:
//! - The container format is guessed from the leading magic bytes
//! - Any format the `image` crate is built with is accepted (PNG, JPEG, GIF, WebP)
//! - Every color type is converted to 8-bit RGBA; opaque formats get `A = 255`
//!
//! # Examples
//!
//! ```ignore
//! use filmgrain_core::decode::decode_image;
//!
//! let bytes = std::fs::read("photo.png").unwrap();
//! let buffer = decode_image(&bytes).unwrap();
//! println!("Decoded {}x{} image", buffer.width, buffer.height);
//! ```
//!
//! [`PixelBuffer`]: crate::PixelBuffer

mod raster;
mod types;

pub use raster::{decode_image, detect_format};
pub use types::{DecodeError, ImageFormat};
