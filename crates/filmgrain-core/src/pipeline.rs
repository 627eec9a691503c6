//! The filmgrain look: grain, then blur, then tinted posterization.
//!
//! ## Stage Order
//! 1. Noise injection (in place)
//! 2. Gaussian blur (new buffer; the noisy input is dropped)
//! 3. Tint + quantization (in place on the blurred buffer)
//!
//! The buffer is validated once up front; after that no stage can fail.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::buffer::{InvalidBufferError, PixelBuffer};
use crate::convolve::convolve;
use crate::kernel::GaussianKernel;
use crate::noise::{inject_noise, RandomSource};
use crate::quantize::{quantize, Tint};

/// Errors that reject a pipeline invocation before any stage runs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    /// Buffer dimensions disagree with its byte length
    #[error(transparent)]
    InvalidBuffer(#[from] InvalidBufferError),

    /// A configuration value is out of range
    #[error("Invalid pipeline config: {0}")]
    InvalidConfig(String),
}

/// Parameters of the filmgrain look.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Noise amplitude in channel units (0 disables grain)
    pub grain: f64,
    /// Extra red multiplier, stacked on top of `yellowness`
    pub redness: f64,
    /// Red and green multiplier
    pub yellowness: f64,
    /// Gaussian blur radius in pixels (0 disables blur)
    pub blur_radius: u32,
    /// Quantization step for red
    pub red_step: u32,
    /// Quantization step for green
    pub green_step: u32,
    /// Quantization step for blue
    pub blue_step: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            grain: 22.0,
            redness: 1.1,
            yellowness: 1.15,
            blur_radius: 2,
            red_step: 32,
            green_step: 32,
            blue_step: 64,
        }
    }
}

impl PipelineConfig {
    /// Maximum accepted blur radius. Cost grows with the square of the radius.
    pub const MAX_BLUR_RADIUS: u32 = 64;

    /// Per-channel tint derived from `redness` and `yellowness`.
    pub fn tint(&self) -> Tint {
        Tint {
            r_factor: self.redness * self.yellowness,
            g_factor: self.yellowness,
            b_factor: 1.0,
            r_step: self.red_step,
            g_step: self.green_step,
            b_step: self.blue_step,
        }
    }

    /// Check that every parameter is usable.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if !self.grain.is_finite() || self.grain < 0.0 {
            return Err(PipelineError::InvalidConfig(format!(
                "grain must be a non-negative number, got {}",
                self.grain
            )));
        }
        for (name, factor) in [("redness", self.redness), ("yellowness", self.yellowness)] {
            if !factor.is_finite() || factor < 0.0 {
                return Err(PipelineError::InvalidConfig(format!(
                    "{} must be a non-negative number, got {}",
                    name, factor
                )));
            }
        }
        for (name, step) in [
            ("red_step", self.red_step),
            ("green_step", self.green_step),
            ("blue_step", self.blue_step),
        ] {
            if step == 0 {
                return Err(PipelineError::InvalidConfig(format!(
                    "{} must be at least 1",
                    name
                )));
            }
        }
        if self.blur_radius > Self::MAX_BLUR_RADIUS {
            return Err(PipelineError::InvalidConfig(format!(
                "blur_radius must be at most {}, got {}",
                Self::MAX_BLUR_RADIUS,
                self.blur_radius
            )));
        }
        Ok(())
    }
}

/// A configured pipeline. The blur kernel is built once and reused.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
    tint: Tint,
    kernel: GaussianKernel,
}

impl Pipeline {
    /// Create a pipeline, rejecting invalid configuration.
    pub fn new(config: PipelineConfig) -> Result<Self, PipelineError> {
        config.validate()?;
        Ok(Self {
            tint: config.tint(),
            kernel: GaussianKernel::new(config.blur_radius),
            config,
        })
    }

    /// Run grain, blur and quantization over `buffer`.
    ///
    /// Takes ownership of the buffer; a malformed buffer is rejected before
    /// any stage touches it.
    pub fn process<R: RandomSource + ?Sized>(
        &self,
        mut buffer: PixelBuffer,
        rng: &mut R,
    ) -> Result<PixelBuffer, PipelineError> {
        buffer.validate()?;

        inject_noise(&mut buffer, self.config.grain, rng);

        let mut blurred = convolve(&buffer, &self.kernel)?;
        drop(buffer);

        quantize(&mut blurred, &self.tint);
        Ok(blurred)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        let config = PipelineConfig::default();
        Self {
            tint: config.tint(),
            kernel: GaussianKernel::new(config.blur_radius),
            config,
        }
    }
}

/// Process `buffer` with the default look and thread-local randomness.
pub fn process(buffer: PixelBuffer) -> Result<PixelBuffer, PipelineError> {
    Pipeline::default().process(buffer, &mut rand::thread_rng())
}
