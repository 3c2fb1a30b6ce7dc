use am_core::charset::GlyphRamp;

/// Ramp index for a brightness: `floor(b / 255 * (len - 1))`, clamped.
///
/// Uniform linear bucketing, not histogram-equalised.
#[inline(always)]
#[must_use]
pub fn quantize_index(brightness: f64, len: usize) -> usize {
    let last = len.saturating_sub(1);
    let idx = (brightness / 255.0 * last as f64).floor();
    // NaN et négatifs saturent à 0 via `as`
    (idx as usize).min(last)
}

/// Map a brightness in [0, 255] to a glyph.
///
/// # Example
/// ```
/// use am_core::charset::GlyphRamp;
/// use am_ascii::quantize;
/// let ramp = GlyphRamp::new(" .:#").unwrap();
/// assert_eq!(quantize(0.0, &ramp), ' ');
/// assert_eq!(quantize(128.0, &ramp), '.');
/// assert_eq!(quantize(255.0, &ramp), '#');
/// ```
#[inline(always)]
#[must_use]
pub fn quantize(brightness: f64, ramp: &GlyphRamp) -> char {
    ramp.glyph(quantize_index(brightness, ramp.len()))
}

/// [`quantize`] with optional inversion (`b := 255 - b` first).
#[inline(always)]
#[must_use]
pub fn quantize_with(brightness: f64, ramp: &GlyphRamp, invert: bool) -> char {
    let b = if invert { 255.0 - brightness } else { brightness };
    quantize(b, ramp)
}
