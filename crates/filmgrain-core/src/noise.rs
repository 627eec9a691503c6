//! Luminance grain injection.
//!
//! Every pixel receives one uniform jitter value in `[-amplitude, amplitude]`,
//! added to R, G and B alike so the grain reads as brightness noise rather
//! than colored speckle. Alpha is never touched.

use crate::buffer::{clamp_to_u8, PixelBuffer, CHANNELS};

/// Source of uniform samples in `[0, 1)`.
///
/// Any `rand::Rng` is a `RandomSource`, so callers can pass `rand::thread_rng()`
/// in production and a seeded `StdRng` in tests.
pub trait RandomSource {
    /// Next uniform sample in `[0, 1)`.
    fn next_unit(&mut self) -> f64;
}

impl<R: rand::Rng> RandomSource for R {
    #[inline]
    fn next_unit(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

/// Add shared per-pixel noise to the RGB channels in place.
///
/// Noisy values are rounded to the nearest integer and saturated to `[0, 255]`.
/// A non-positive or non-finite amplitude leaves the buffer unchanged.
pub fn inject_noise<R: RandomSource + ?Sized>(
    buffer: &mut PixelBuffer,
    amplitude: f64,
    rng: &mut R,
) {
    if !(amplitude > 0.0 && amplitude.is_finite()) {
        return;
    }

    for chunk in buffer.pixels.chunks_exact_mut(CHANNELS) {
        let noise = noise_sample(rng, amplitude);
        for value in &mut chunk[..3] {
            *value = clamp_to_u8(*value as f64 + noise);
        }
    }
}

/// Map a unit sample onto `[-amplitude, amplitude)`.
#[inline]
fn noise_sample<R: RandomSource + ?Sized>(rng: &mut R, amplitude: f64) -> f64 {
    rng.next_unit() * (amplitude * 2.0) - amplitude
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Replays a fixed sequence of unit samples.
    struct Sequence {
        values: Vec<f64>,
        next: usize,
    }

    impl RandomSource for Sequence {
        fn next_unit(&mut self) -> f64 {
            let v = self.values[self.next % self.values.len()];
            self.next += 1;
            v
        }
    }

    fn sequence(values: &[f64]) -> Sequence {
        Sequence {
            values: values.to_vec(),
            next: 0,
        }
    }

    #[test]
    fn test_noise_shared_across_rgb() {
        let mut buffer = PixelBuffer::new(1, 1, vec![100, 50, 200, 77]).unwrap();
        // 0.75 * 44 - 22 = 11
        inject_noise(&mut buffer, 22.0, &mut sequence(&[0.75]));
        assert_eq!(buffer.pixels, vec![111, 61, 211, 77]);
    }

    #[test]
    fn test_noise_one_sample_per_pixel() {
        let mut buffer = PixelBuffer::filled(2, 1, [100, 100, 100, 255]).unwrap();
        // First pixel: 0.0 -> -10, second pixel: 0.5 -> 0
        let mut rng = sequence(&[0.0, 0.5]);
        inject_noise(&mut buffer, 10.0, &mut rng);
        assert_eq!(buffer.pixels, vec![90, 90, 90, 255, 100, 100, 100, 255]);
        assert_eq!(rng.next, 2);
    }

    #[test]
    fn test_noise_saturates() {
        let mut buffer = PixelBuffer::new(2, 1, vec![250, 5, 128, 255, 3, 252, 128, 0]).unwrap();
        // +20 on the first pixel, -20 on the second
        inject_noise(&mut buffer, 20.0, &mut sequence(&[1.0, 0.0]));
        assert_eq!(buffer.pixels, vec![255, 25, 148, 255, 0, 232, 108, 0]);
    }

    #[test]
    fn test_zero_amplitude_is_identity() {
        let original = PixelBuffer::new(2, 1, vec![1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        let mut buffer = original.clone();
        inject_noise(&mut buffer, 0.0, &mut StdRng::seed_from_u64(1));
        assert_eq!(buffer, original);

        inject_noise(&mut buffer, f64::NAN, &mut StdRng::seed_from_u64(1));
        assert_eq!(buffer, original);
    }

    #[test]
    fn test_alpha_untouched() {
        let mut buffer = PixelBuffer::filled(32, 32, [128, 128, 128, 42]).unwrap();
        inject_noise(&mut buffer, 22.0, &mut StdRng::seed_from_u64(7));
        assert!(buffer.pixels.chunks_exact(4).all(|p| p[3] == 42));
    }

    #[test]
    fn test_amplitude_bound_statistical() {
        // Mid-gray so no delta is hidden by saturation.
        let mut buffer = PixelBuffer::filled(100, 100, [128, 128, 128, 255]).unwrap();
        inject_noise(&mut buffer, 22.0, &mut StdRng::seed_from_u64(0xF11A));

        let max_delta = buffer
            .pixels
            .chunks_exact(4)
            .flat_map(|p| p[..3].iter())
            .map(|&v| (v as i32 - 128).abs())
            .max()
            .unwrap();

        assert!(max_delta <= 22, "Observed delta {} exceeds amplitude", max_delta);
        // 10,000 samples should cover most of the range.
        assert!(max_delta >= 18, "Noise suspiciously weak: {}", max_delta);
    }

    #[test]
    fn test_noise_sample_range() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..10_000 {
            let n = noise_sample(&mut rng, 22.0);
            assert!((-22.0..22.0).contains(&n), "sample {} out of range", n);
        }
    }
}
