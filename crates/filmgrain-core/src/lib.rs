//! Filmgrain Core - Pixel pipeline for the filmgrain look
//!
//! This crate provides the image processing behind filmgrain: luminance
//! grain, Gaussian blur, and a tinted posterization, plus the decode and
//! encode steps that turn compressed bytes into RGBA buffers and back.
//!
//! # Module Structure
//!
//! - `buffer` - RGBA pixel buffer and its validation
//! - `noise` - Shared per-pixel grain over R, G, B
//! - `kernel` - Normalized 2D Gaussian kernels
//! - `convolve` - Clamp-to-edge kernel convolution
//! - `quantize` - Per-channel tint and step quantization
//! - `pipeline` - Configured grain → blur → quantize sequence
//! - `decode` / `encode` - Compressed bytes to buffer and back
//!
//! The core does no I/O beyond in-memory codecs and does no logging.

pub mod buffer;
pub mod convolve;
pub mod decode;
pub mod encode;
pub mod kernel;
pub mod noise;
pub mod pipeline;
pub mod quantize;

pub use buffer::{InvalidBufferError, PixelBuffer};
pub use convolve::convolve;
pub use kernel::GaussianKernel;
pub use noise::{inject_noise, RandomSource};
pub use pipeline::{process, Pipeline, PipelineConfig, PipelineError};
pub use quantize::{floor_to_step, quantize, Tint};
