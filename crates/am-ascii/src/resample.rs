use crate::luminance::LuminanceField;

/// How a grid cell reads the source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SamplingMode {
    /// `floor(target * ratio)`; used when upsampling or without anti-aliasing.
    Nearest,
    /// Four-pixel interpolation; used when downsampling with anti-aliasing.
    Bilinear,
}

/// Maps output-grid coordinates onto source pixels.
///
/// # Example
/// ```
/// use am_ascii::resample::{Resampler, SamplingMode};
/// let r = Resampler::new((400, 200), (100, 50), true);
/// assert_eq!(r.ratios(), (4.0, 4.0));
/// assert_eq!(r.mode(), SamplingMode::Bilinear);
/// assert_eq!(r.nearest(3, 1), (12, 4));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Resampler {
    x_ratio: f64,
    y_ratio: f64,
    src_width: u32,
    src_height: u32,
    mode: SamplingMode,
}

impl Resampler {
    /// Ratios are `source / target` per axis. Bilinear is chosen only when
    /// `anti_alias` is on and at least one axis is being downsampled.
    #[must_use]
    pub fn new(source: (u32, u32), target: (u32, u32), anti_alias: bool) -> Self {
        let x_ratio = f64::from(source.0) / f64::from(target.0.max(1));
        let y_ratio = f64::from(source.1) / f64::from(target.1.max(1));
        let mode = if anti_alias && (x_ratio > 1.0 || y_ratio > 1.0) {
            SamplingMode::Bilinear
        } else {
            SamplingMode::Nearest
        };
        Self {
            x_ratio,
            y_ratio,
            src_width: source.0,
            src_height: source.1,
            mode,
        }
    }

    /// (x, y) ratios.
    #[must_use]
    pub fn ratios(&self) -> (f64, f64) {
        (self.x_ratio, self.y_ratio)
    }

    /// Selected mode.
    #[must_use]
    pub fn mode(&self) -> SamplingMode {
        self.mode
    }

    /// Fractional source coordinate of a grid cell.
    #[inline(always)]
    #[must_use]
    pub fn source_coords(&self, x: u32, y: u32) -> (f64, f64) {
        (f64::from(x) * self.x_ratio, f64::from(y) * self.y_ratio)
    }

    /// Nearest source pixel of a grid cell, clamped into the source.
    #[inline(always)]
    #[must_use]
    pub fn nearest(&self, x: u32, y: u32) -> (u32, u32) {
        let (sx, sy) = self.source_coords(x, y);
        (
            (sx.floor() as u32).min(self.src_width.saturating_sub(1)),
            (sy.floor() as u32).min(self.src_height.saturating_sub(1)),
        )
    }

    /// Brightness of a grid cell according to the selected mode.
    #[inline(always)]
    #[must_use]
    pub fn brightness(&self, field: &LuminanceField, x: u32, y: u32) -> f64 {
        match self.mode {
            SamplingMode::Nearest => {
                let (px, py) = self.nearest(x, y);
                field.at(px, py)
            }
            SamplingMode::Bilinear => {
                let (sx, sy) = self.source_coords(x, y);
                bilinear(field, sx, sy)
            }
        }
    }
}

/// Bilinear interpolation at a fractional source coordinate: along x for the
/// two rows, then along y. The "+1" neighbours clamp to the last index.
///
/// # Example
/// ```
/// use am_core::frame::PixelBuffer;
/// use am_ascii::{resample::bilinear, LuminanceField};
/// let mut fb = PixelBuffer::filled(2, 1, [0, 0, 0, 255]);
/// fb.set_pixel(1, 0, [200, 200, 200, 255]);
/// let field = LuminanceField::from_buffer(&fb);
/// assert!((bilinear(&field, 0.5, 0.0) - 100.0).abs() < 1e-9);
/// ```
#[inline(always)]
#[must_use]
pub fn bilinear(field: &LuminanceField, x: f64, y: f64) -> f64 {
    let max_x = field.width().saturating_sub(1);
    let max_y = field.height().saturating_sub(1);

    let x1 = (x.floor().max(0.0) as u32).min(max_x);
    let y1 = (y.floor().max(0.0) as u32).min(max_y);
    let x2 = (x1 + 1).min(max_x);
    let y2 = (y1 + 1).min(max_y);
    let fx = x - x.floor();
    let fy = y - y.floor();

    let b11 = field.at(x1, y1);
    let b21 = field.at(x2, y1);
    let b12 = field.at(x1, y2);
    let b22 = field.at(x2, y2);

    let top = lerp(b11, b21, fx);
    let bottom = lerp(b12, b22, fx);
    lerp(top, bottom, fy)
}

/// `a + (b - a) * t`: returns `a` bit-for-bit when `a == b`.
#[inline(always)]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}
