use am_core::frame::PixelBuffer;
use rayon::prelude::*;

use crate::params::{BrightnessLevel, ContrastLevel, NoiseIntensity};

/// Mid-gray pivot for the contrast curve.
const PIVOT: f64 = 127.5;

#[inline(always)]
fn to_channel(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Apply `f` to the R, G and B channels of every pixel, in parallel.
fn map_rgb(buffer: &mut PixelBuffer, f: impl Fn(u8) -> u8 + Sync) {
    buffer
        .as_raw_mut()
        .par_chunks_exact_mut(4)
        .for_each(|px| {
            px[0] = f(px[0]);
            px[1] = f(px[1]);
            px[2] = f(px[2]);
        });
}

/// Invert colors: `c := 255 - c` on R, G, B.
///
/// # Example
/// ```
/// use am_core::frame::PixelBuffer;
/// use am_transform::invert;
/// let out = invert(PixelBuffer::filled(1, 1, [0, 100, 255, 7]));
/// assert_eq!(out.pixel(0, 0), (255, 155, 0, 7));
/// ```
#[must_use]
pub fn invert(mut buffer: PixelBuffer) -> PixelBuffer {
    map_rgb(&mut buffer, |c| 255 - c);
    buffer
}

/// Additive brightness shift: `c := clamp(c + level * 255, 0, 255)`.
///
/// # Example
/// ```
/// use am_core::frame::PixelBuffer;
/// use am_transform::{adjust_brightness, BrightnessLevel};
/// let out = adjust_brightness(
///     PixelBuffer::filled(1, 1, [100, 250, 0, 255]),
///     BrightnessLevel::new(0.2).unwrap(),
/// );
/// assert_eq!(out.pixel(0, 0), (151, 255, 51, 255));
/// ```
#[must_use]
pub fn adjust_brightness(mut buffer: PixelBuffer, level: BrightnessLevel) -> PixelBuffer {
    let delta = level.get() * 255.0;
    if delta == 0.0 {
        return buffer;
    }
    map_rgb(&mut buffer, |c| to_channel(f64::from(c) + delta));
    buffer
}

/// Contrast stretch around mid-gray.
///
/// `factor = (1 + level) / (1 - level)`, `c := (c - 127.5) * factor + 127.5`.
/// Level 0 is the identity; level 1 is a hard threshold (≤127 → 0, ≥128 → 255).
/// The curve is monotonic for every level.
///
/// # Example
/// ```
/// use am_core::frame::PixelBuffer;
/// use am_transform::{enhance_contrast, ContrastLevel};
/// let src = PixelBuffer::filled(1, 1, [100, 128, 200, 255]);
/// let out = enhance_contrast(src, ContrastLevel::new(1.0).unwrap());
/// assert_eq!(out.pixel(0, 0), (0, 255, 255, 255));
/// ```
#[must_use]
pub fn enhance_contrast(mut buffer: PixelBuffer, level: ContrastLevel) -> PixelBuffer {
    let level = level.get();
    if level == 0.0 {
        return buffer;
    }
    if level >= 1.0 {
        map_rgb(&mut buffer, |c| if f64::from(c) < PIVOT { 0 } else { 255 });
        return buffer;
    }
    let factor = (1.0 + level) / (1.0 - level);
    map_rgb(&mut buffer, |c| {
        to_channel((f64::from(c) - PIVOT) * factor + PIVOT)
    });
    buffer
}

/// Uniform per-channel noise from a fresh generator.
///
/// Output is non-deterministic; see [`add_noise_with`] for a seeded variant.
#[must_use]
pub fn add_noise(buffer: PixelBuffer, intensity: NoiseIntensity) -> PixelBuffer {
    let mut rng = fastrand::Rng::new();
    add_noise_with(buffer, intensity, &mut rng)
}

/// Uniform noise in `[-intensity*2.55, +intensity*2.55]`, drawn independently
/// for R, G and B of every pixel.
///
/// Draws are truncated toward zero before being added, so no channel ever moves
/// by more than the amplitude.
///
/// # Example
/// ```
/// use am_core::frame::PixelBuffer;
/// use am_transform::{NoiseIntensity, pixel::add_noise_with};
/// let src = PixelBuffer::filled(4, 4, [128, 128, 128, 255]);
/// let mut rng = fastrand::Rng::with_seed(7);
/// let out = add_noise_with(src.clone(), NoiseIntensity::new(0.0).unwrap(), &mut rng);
/// assert_eq!(out, src);
/// ```
#[must_use]
pub fn add_noise_with(
    mut buffer: PixelBuffer,
    intensity: NoiseIntensity,
    rng: &mut fastrand::Rng,
) -> PixelBuffer {
    let amplitude = intensity.amplitude();
    if amplitude == 0.0 {
        return buffer;
    }
    // séquentiel : un seul générateur, ordre de tirage stable pour une graine donnée
    for px in buffer.as_raw_mut().chunks_exact_mut(4) {
        for c in &mut px[..3] {
            let noise = (rng.f64() * 2.0 - 1.0) * amplitude;
            *c = (f64::from(*c) + noise.trunc()).clamp(0.0, 255.0) as u8;
        }
    }
    buffer
}

/// Greyscale with BT.709 weights, rounded; R = G = B afterwards.
///
/// # Example
/// ```
/// use am_core::frame::PixelBuffer;
/// use am_transform::greyscale;
/// let out = greyscale(PixelBuffer::filled(1, 1, [255, 255, 255, 9]));
/// assert_eq!(out.pixel(0, 0), (255, 255, 255, 9));
/// ```
#[must_use]
pub fn greyscale(mut buffer: PixelBuffer) -> PixelBuffer {
    buffer
        .as_raw_mut()
        .par_chunks_exact_mut(4)
        .for_each(|px| {
            let y = to_channel(
                0.2126 * f64::from(px[0]) + 0.7152 * f64::from(px[1]) + 0.0722 * f64::from(px[2]),
            );
            px[0] = y;
            px[1] = y;
            px[2] = y;
        });
    buffer
}
