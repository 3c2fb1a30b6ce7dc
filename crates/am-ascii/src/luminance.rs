use std::sync::LazyLock;

use am_core::frame::PixelBuffer;
use rayon::prelude::*;

/// Display gamma used for linearisation and re-encoding.
pub const GAMMA: f64 = 2.2;

/// ITU-R BT.709 weights (R, G, B).
pub const BT709: [f64; 3] = [0.2126, 0.7152, 0.0722];

/// ITU-R BT.601 weights (R, G, B).
pub const BT601: [f64; 3] = [0.299, 0.587, 0.114];

/// `(c / 255)^2.2` for every channel value, computed once.
static LINEAR: LazyLock<[f64; 256]> = LazyLock::new(|| {
    let mut lut = [0.0; 256];
    for (c, slot) in lut.iter_mut().enumerate() {
        *slot = (c as f64 / 255.0).powf(GAMMA);
    }
    lut
});

/// Gamma-corrected BT.709 luminance in [0, 255].
///
/// Channels are linearised with `(c/255)^2.2`, weighted, then re-encoded with
/// `^(1/2.2) * 255`. Black and white map to exactly 0 and 255.
///
/// # Example
/// ```
/// use am_ascii::luminance::perceptual_luminance;
/// assert_eq!(perceptual_luminance(0, 0, 0), 0.0);
/// assert!((perceptual_luminance(255, 255, 255) - 255.0).abs() < 1e-6);
/// ```
#[inline(always)]
#[must_use]
pub fn perceptual_luminance(r: u8, g: u8, b: u8) -> f64 {
    let lin = &*LINEAR;
    let y = BT709[0] * lin[usize::from(r)]
        + BT709[1] * lin[usize::from(g)]
        + BT709[2] * lin[usize::from(b)];
    y.powf(1.0 / GAMMA) * 255.0
}

/// Flat BT.601 luminance in [0, 255], used by the image analyzer.
///
/// Deliberately not unified with [`perceptual_luminance`]: analysis numbers
/// are defined on this formula.
///
/// # Example
/// ```
/// use am_ascii::luminance::fast_luminance;
/// assert!((fast_luminance(255, 255, 255) - 255.0).abs() < 1e-9);
/// ```
#[inline(always)]
#[must_use]
pub fn fast_luminance(r: u8, g: u8, b: u8) -> f64 {
    BT601[0] * f64::from(r) + BT601[1] * f64::from(g) + BT601[2] * f64::from(b)
}

/// Perceptual luminance of every pixel of a buffer, computed once per render.
///
/// Sobel and bilinear sampling read each source pixel several times; caching
/// the scalar field keeps results bit-identical while avoiding repeated `powf`.
///
/// # Example
/// ```
/// use am_core::frame::PixelBuffer;
/// use am_ascii::luminance::LuminanceField;
/// let field = LuminanceField::from_buffer(&PixelBuffer::filled(3, 2, [255, 255, 255, 255]));
/// assert_eq!(field.at(2, 1), 255.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct LuminanceField {
    values: Vec<f64>,
    width: u32,
    height: u32,
}

impl LuminanceField {
    /// Compute the field, one row per rayon task.
    #[must_use]
    pub fn from_buffer(buffer: &PixelBuffer) -> Self {
        let width = buffer.width();
        let height = buffer.height();
        let mut values = vec![0.0; buffer.pixel_count()];
        let row_bytes = width as usize * 4;

        if row_bytes > 0 {
            values
                .par_chunks_mut(width as usize)
                .zip(buffer.as_raw().par_chunks(row_bytes))
                .for_each(|(dst, src)| {
                    for (v, px) in dst.iter_mut().zip(src.chunks_exact(4)) {
                        *v = perceptual_luminance(px[0], px[1], px[2]);
                    }
                });
        }

        Self {
            values,
            width,
            height,
        }
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `width / height` of the source.
    #[must_use]
    pub fn aspect_ratio(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height.max(1))
    }

    /// Luminance at an in-bounds pixel.
    #[inline(always)]
    #[must_use]
    pub fn at(&self, x: u32, y: u32) -> f64 {
        debug_assert!(x < self.width && y < self.height, "field out of bounds");
        self.values[y as usize * self.width as usize + x as usize]
    }

    /// Luminance with border replication for out-of-range coordinates.
    #[inline(always)]
    #[must_use]
    pub fn at_clamped(&self, x: i64, y: i64) -> f64 {
        let x = x.clamp(0, i64::from(self.width.saturating_sub(1))) as u32;
        let y = y.clamp(0, i64::from(self.height.saturating_sub(1))) as u32;
        self.at(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extremes_have_no_gamma_drift() {
        assert!(perceptual_luminance(0, 0, 0).abs() < 1e-6);
        assert!((perceptual_luminance(255, 255, 255) - 255.0).abs() < 1e-6);
    }

    #[test]
    fn grey_is_a_fixed_point() {
        for v in [1u8, 17, 64, 128, 200, 254] {
            let l = perceptual_luminance(v, v, v);
            assert!((l - f64::from(v)).abs() < 1e-6, "gris {v} → {l}");
        }
    }

    #[test]
    fn green_dominates_perceptually() {
        let g = perceptual_luminance(0, 255, 0);
        let r = perceptual_luminance(255, 0, 0);
        let b = perceptual_luminance(0, 0, 255);
        assert!(g > r && r > b);
        // gamma-corrected weights brighten saturated primaries vs flat weights
        assert!(r > fast_luminance(255, 0, 0));
    }

    #[test]
    fn lut_matches_direct_formula() {
        let direct = |r: u8, g: u8, b: u8| {
            let lin = |c: u8| (f64::from(c) / 255.0).powf(GAMMA);
            (0.2126 * lin(r) + 0.7152 * lin(g) + 0.0722 * lin(b)).powf(1.0 / GAMMA) * 255.0
        };
        for (r, g, b) in [(12, 200, 99), (255, 0, 3), (77, 77, 250)] {
            assert_eq!(perceptual_luminance(r, g, b).to_bits(), direct(r, g, b).to_bits());
        }
    }

    #[test]
    fn fast_luminance_uses_bt601() {
        assert!((fast_luminance(100, 0, 0) - 29.9).abs() < 1e-9);
        assert!((fast_luminance(0, 100, 0) - 58.7).abs() < 1e-9);
        assert!((fast_luminance(0, 0, 100) - 11.4).abs() < 1e-9);
    }

    #[test]
    fn field_matches_per_pixel_model() {
        let mut fb = PixelBuffer::new(5, 3);
        fb.set_pixel(4, 2, [10, 220, 40, 255]);
        fb.set_pixel(0, 1, [255, 255, 0, 255]);
        let field = LuminanceField::from_buffer(&fb);
        assert_eq!(field.at(4, 2), perceptual_luminance(10, 220, 40));
        assert_eq!(field.at(0, 1), perceptual_luminance(255, 255, 0));
        assert_eq!(field.at_clamped(-5, 99), field.at(0, 2));
    }
}
