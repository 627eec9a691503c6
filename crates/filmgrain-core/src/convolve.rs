//! Kernel convolution with clamp-to-edge sampling.
//!
//! Every output channel (alpha included) is the kernel-weighted sum of the
//! input window around the pixel. Samples that fall outside the image are
//! taken from the nearest edge pixel, so a constant field stays constant all
//! the way to the border.
//!
//! # Performance
//! Cost is `O(width * height * size^2)`. Output rows are independent, so with
//! the `parallel` feature they are distributed across rayon workers; each
//! worker writes a disjoint row slice of the output and only reads the input
//! and the kernel.

use crate::buffer::{clamp_to_u8, InvalidBufferError, PixelBuffer, CHANNELS};
use crate::kernel::GaussianKernel;

/// Convolve `buffer` with `kernel`, producing a new buffer of the same size.
///
/// Output values are rounded to nearest and saturated to `[0, 255]`.
/// The input is not modified. A buffer whose dimensions disagree with its
/// byte length is rejected before any row is computed.
pub fn convolve(
    buffer: &PixelBuffer,
    kernel: &GaussianKernel,
) -> Result<PixelBuffer, InvalidBufferError> {
    buffer.validate()?;

    let mut output = vec![0u8; buffer.pixels.len()];
    let row_bytes = buffer.width as usize * CHANNELS;

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        output
            .par_chunks_mut(row_bytes)
            .enumerate()
            .for_each(|(y, row)| convolve_row(buffer, kernel, y as u32, row));
    }

    #[cfg(not(feature = "parallel"))]
    {
        output
            .chunks_mut(row_bytes)
            .enumerate()
            .for_each(|(y, row)| convolve_row(buffer, kernel, y as u32, row));
    }

    Ok(PixelBuffer {
        width: buffer.width,
        height: buffer.height,
        pixels: output,
    })
}

/// Compute output row `y` into `row` (`width * 4` bytes).
fn convolve_row(src: &PixelBuffer, kernel: &GaussianKernel, y: u32, row: &mut [u8]) {
    let r = kernel.radius() as i64;
    let max_x = src.width as i64 - 1;
    let max_y = src.height as i64 - 1;
    let weights = kernel.weights();

    for (x, out) in row.chunks_exact_mut(CHANNELS).enumerate() {
        let mut acc = [0.0f64; CHANNELS];
        let mut k = 0;

        for dy in -r..=r {
            let sy = (y as i64 + dy).clamp(0, max_y) as u32;
            for dx in -r..=r {
                let sx = (x as i64 + dx).clamp(0, max_x) as u32;
                let weight = weights[k];
                k += 1;

                let offset = src.offset(sx, sy);
                let px = &src.pixels[offset..offset + CHANNELS];
                for c in 0..CHANNELS {
                    acc[c] += px[c] as f64 * weight;
                }
            }
        }

        for c in 0..CHANNELS {
            out[c] = clamp_to_u8(acc[c]);
        }
    }
}
