//! Normalized 2D Gaussian kernels.
//!
//! The kernel for radius `r` is a `(2r+1) x (2r+1)` row-major grid of weights
//! sampled from an isotropic Gaussian with `sigma = r / 3`, so the window
//! covers three standard deviations on each side. Weights are divided by
//! their raw sum, which makes the leading `1 / (2 pi sigma^2)` factor cancel
//! out but keeps the values recognizable when inspected.

use std::f64::consts::PI;

/// An immutable square convolution kernel.
#[derive(Debug, Clone, PartialEq)]
pub struct GaussianKernel {
    radius: u32,
    weights: Vec<f64>,
}

impl GaussianKernel {
    /// Build the normalized Gaussian kernel for `radius`.
    ///
    /// Radius 0 yields the 1x1 identity kernel.
    pub fn new(radius: u32) -> Self {
        if radius == 0 {
            return Self::identity();
        }

        let r = radius as i64;
        let size = 2 * radius as usize + 1;
        let sigma = radius as f64 / 3.0;
        let two_sigma2 = 2.0 * sigma * sigma;
        let scale = 1.0 / (PI * two_sigma2);

        let mut weights = Vec::with_capacity(size * size);
        for dy in -r..=r {
            for dx in -r..=r {
                let dist2 = (dx * dx + dy * dy) as f64;
                weights.push((-dist2 / two_sigma2).exp() * scale);
            }
        }

        let sum: f64 = weights.iter().sum();
        for w in &mut weights {
            *w /= sum;
        }

        Self { radius, weights }
    }

    /// The 1x1 kernel with a single weight of 1.0.
    pub fn identity() -> Self {
        Self {
            radius: 0,
            weights: vec![1.0],
        }
    }

    pub fn radius(&self) -> u32 {
        self.radius
    }

    /// Side length of the kernel window (`2 * radius + 1`).
    pub fn size(&self) -> usize {
        2 * self.radius as usize + 1
    }

    /// Row-major weights, `size * size` entries.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Weight at offset `(dx, dy)` from the center, each in `[-radius, radius]`.
    #[inline]
    pub fn weight(&self, dx: i64, dy: i64) -> f64 {
        let r = self.radius as i64;
        debug_assert!(dx.abs() <= r && dy.abs() <= r, "offset outside kernel");
        let size = self.size() as i64;
        self.weights[((dy + r) * size + (dx + r)) as usize]
    }
}
