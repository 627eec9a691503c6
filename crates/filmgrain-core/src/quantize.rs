//! Per-channel tint and posterization.
//!
//! Each color channel is scaled by its tint factor and then snapped to the
//! nearest multiple of its quantization step. Steps are independent per
//! channel; the default look bands blue twice as coarsely as red and green.

use serde::{Deserialize, Serialize};

use crate::buffer::{PixelBuffer, CHANNELS};

/// Multiplicative tint and quantization step for each color channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tint {
    pub r_factor: f64,
    pub g_factor: f64,
    pub b_factor: f64,
    pub r_step: u32,
    pub g_step: u32,
    pub b_step: u32,
}

impl Tint {
    /// No color shift, no banding.
    pub fn neutral() -> Self {
        Self {
            r_factor: 1.0,
            g_factor: 1.0,
            b_factor: 1.0,
            r_step: 1,
            g_step: 1,
            b_step: 1,
        }
    }
}

/// Snap `value` to the nearest multiple of `step`, saturating to `[0, 255]`.
///
/// Halfway values round away from zero. A zero step is treated as 1.
#[inline]
pub fn floor_to_step(value: f64, step: u32) -> u8 {
    let step = step.max(1) as f64;
    let snapped = (value / step).round() * step;
    // `as` maps NaN to 0.
    snapped.clamp(0.0, 255.0) as u8
}

/// Apply `tint` to every pixel in place. Alpha is left untouched.
pub fn quantize(buffer: &mut PixelBuffer, tint: &Tint) {
    for chunk in buffer.pixels.chunks_exact_mut(CHANNELS) {
        chunk[0] = floor_to_step(chunk[0] as f64 * tint.r_factor, tint.r_step);
        chunk[1] = floor_to_step(chunk[1] as f64 * tint.g_factor, tint.g_step);
        chunk[2] = floor_to_step(chunk[2] as f64 * tint.b_factor, tint.b_step);
    }
}
