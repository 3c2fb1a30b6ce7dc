use std::fmt;

use am_ascii::fast_luminance;
use am_core::frame::PixelBuffer;
use rayon::prelude::*;
use serde::Serialize;

use crate::recommend::{Recommendations, recommend};

/// Mean brightness below this is low-key (dark).
pub const LOW_KEY_MAX: f64 = 85.0;
/// Mean brightness above this is high-key (bright).
pub const HIGH_KEY_MIN: f64 = 170.0;

/// Histogram: 8 levels per channel (`c >> 5`), 8×8×8 bins.
const LEVEL_SHIFT: u8 = 5;
const BINS: usize = 512;
/// Colour histogram reads every 4th pixel on both axes.
const SAMPLE_STEP: usize = 4;
const TOP_COLOURS: usize = 5;

/// Detail bucket derived from the contrast range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    /// contrast ≤ 0.4
    Low,
    /// 0.4 < contrast ≤ 0.7
    Medium,
    /// contrast > 0.7
    High,
}

impl Complexity {
    /// # Example
    /// ```
    /// use am_analysis::Complexity;
    /// assert_eq!(Complexity::from_contrast(0.4), Complexity::Low);
    /// assert_eq!(Complexity::from_contrast(0.41), Complexity::Medium);
    /// assert_eq!(Complexity::from_contrast(0.71), Complexity::High);
    /// ```
    #[must_use]
    pub fn from_contrast(contrast: f64) -> Self {
        if contrast > 0.7 {
            Self::High
        } else if contrast > 0.4 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        })
    }
}

/// Dominant tone from the mean brightness.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    /// Low-key.
    Dark,
    /// High-key.
    Bright,
    /// Neither.
    Balanced,
}

impl Tone {
    /// Dark below 85, bright above 170.
    #[must_use]
    pub fn from_mean(mean: f64) -> Self {
        if mean < LOW_KEY_MAX {
            Self::Dark
        } else if mean > HIGH_KEY_MIN {
            Self::Bright
        } else {
            Self::Balanced
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Dark => "dark",
            Self::Bright => "bright",
            Self::Balanced => "balanced",
        })
    }
}

/// One bin of the sampled colour histogram.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct DominantColour {
    /// Quantised level per channel, 0..8.
    pub bin: [u8; 3],
    /// Bin centre in RGB.
    pub rgb: [u8; 3],
    /// Sampled pixels in this bin.
    pub count: u32,
    /// `count / samples`.
    pub share: f64,
}

/// Statistiques d'une image, calculées une seule fois.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AnalysisResult {
    /// Source width in pixels.
    pub width: u32,
    /// Source height in pixels.
    pub height: u32,
    /// Mean BT.601 luminance in [0, 255].
    pub mean_brightness: f64,
    /// Darkest pixel luminance.
    pub min_brightness: f64,
    /// Brightest pixel luminance.
    pub max_brightness: f64,
    /// `(max - min) / 255`.
    pub contrast: f64,
    /// `width / height`.
    pub aspect_ratio: f64,
    /// Bucketed from `contrast`.
    pub complexity: Complexity,
    /// Mean below 85.
    pub low_key: bool,
    /// Mean above 170.
    pub high_key: bool,
    /// Tone derived from the mean.
    pub tone: Tone,
    /// Most frequent histogram bins, most frequent first.
    pub dominant_colours: Vec<DominantColour>,
    /// Suggested ramp, width and transform plan.
    pub recommendations: Recommendations,
}

impl AnalysisResult {
    /// `"{width}x{height}"`.
    #[must_use]
    pub fn dimensions(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }

    /// One-sentence summary of the analysis and the suggested ramp.
    ///
    /// # Example
    /// ```
    /// use am_core::frame::PixelBuffer;
    /// use am_analysis::analyze;
    /// let result = analyze(&PixelBuffer::filled(4, 4, [128, 128, 128, 255]));
    /// assert_eq!(
    ///     result.strategy(),
    ///     "Image is low complexity, balanced with low contrast. Recommend minimal character set."
    /// );
    /// ```
    #[must_use]
    pub fn strategy(&self) -> String {
        let quality = if self.contrast > 0.5 { "good" } else { "low" };
        format!(
            "Image is {} complexity, {} with {quality} contrast. Recommend {} character set.",
            self.complexity, self.tone, self.recommendations.ramp
        )
    }
}

/// Per-row partials, folded in row order.
struct RowStats {
    sum: f64,
    min: f64,
    max: f64,
    bins: Vec<u16>,
}

#[inline(always)]
fn bin_index(r: u8, g: u8, b: u8) -> u16 {
    (u16::from(r >> LEVEL_SHIFT) << 6) | (u16::from(g >> LEVEL_SHIFT) << 3) | u16::from(b >> LEVEL_SHIFT)
}

fn scan_row(row: &[u8], sampled: bool) -> RowStats {
    let mut stats = RowStats {
        sum: 0.0,
        min: 255.0,
        max: 0.0,
        bins: Vec::new(),
    };
    for (x, px) in row.chunks_exact(4).enumerate() {
        let l = fast_luminance(px[0], px[1], px[2]);
        stats.sum += l;
        stats.min = stats.min.min(l);
        stats.max = stats.max.max(l);
        if sampled && x % SAMPLE_STEP == 0 {
            stats.bins.push(bin_index(px[0], px[1], px[2]));
        }
    }
    stats
}

fn dominant_colours(histogram: &[u32; BINS]) -> Vec<DominantColour> {
    let samples: u32 = histogram.iter().sum();
    let mut bins: Vec<(usize, u32)> = histogram
        .iter()
        .copied()
        .enumerate()
        .filter(|&(_, count)| count > 0)
        .collect();
    // tri stable : à égalité, l'index de bin le plus bas d'abord
    bins.sort_by(|a, b| b.1.cmp(&a.1));
    bins.into_iter()
        .take(TOP_COLOURS)
        .map(|(idx, count)| {
            let bin = [(idx >> 6) as u8, ((idx >> 3) & 7) as u8, (idx & 7) as u8];
            DominantColour {
                bin,
                rgb: bin.map(|level| (level << LEVEL_SHIFT) + 16),
                count,
                share: f64::from(count) / f64::from(samples.max(1)),
            }
        })
        .collect()
}

/// Analyse a decoded buffer.
///
/// Rows are scanned in parallel; partial sums are combined in row order so the
/// result is identical from run to run.
///
/// # Example
/// ```
/// use am_core::frame::PixelBuffer;
/// use am_analysis::{analyze, Complexity};
/// let result = analyze(&PixelBuffer::filled(8, 8, [128, 128, 128, 255]));
/// assert_eq!(result.contrast, 0.0);
/// assert_eq!(result.complexity, Complexity::Low);
/// ```
#[must_use]
pub fn analyze(buffer: &PixelBuffer) -> AnalysisResult {
    let (width, height) = (buffer.width(), buffer.height());
    let row_bytes = (width as usize * 4).max(4);

    let rows: Vec<RowStats> = buffer
        .as_raw()
        .par_chunks(row_bytes)
        .enumerate()
        .map(|(y, row)| scan_row(row, y % SAMPLE_STEP == 0))
        .collect();

    let mut sum = 0.0;
    let mut min: f64 = 255.0;
    let mut max: f64 = 0.0;
    let mut histogram = [0u32; BINS];
    for row in &rows {
        sum += row.sum;
        min = min.min(row.min);
        max = max.max(row.max);
        for &bin in &row.bins {
            histogram[usize::from(bin)] += 1;
        }
    }

    let mean = sum / buffer.pixel_count().max(1) as f64;
    let contrast = ((max - min) / 255.0).max(0.0);
    let complexity = Complexity::from_contrast(contrast);
    let tone = Tone::from_mean(mean);
    let aspect_ratio = buffer.aspect_ratio();

    log::debug!(
        "Analyse {width}x{height} : moyenne {mean:.1}, contraste {contrast:.2}, complexité {complexity}"
    );

    AnalysisResult {
        width,
        height,
        mean_brightness: mean,
        min_brightness: min,
        max_brightness: max,
        contrast,
        aspect_ratio,
        complexity,
        low_key: mean < LOW_KEY_MAX,
        high_key: mean > HIGH_KEY_MIN,
        tone,
        dominant_colours: dominant_colours(&histogram),
        recommendations: recommend(complexity, contrast, tone, aspect_ratio),
    }
}

#[cfg(test)]
mod tests {
    use am_core::charset::RampPreset;

    use super::*;

    #[test]
    fn flat_grey_has_no_contrast() {
        let result = analyze(&PixelBuffer::filled(10, 6, [128, 128, 128, 255]));
        assert_eq!(result.contrast, 0.0);
        assert_eq!(result.complexity, Complexity::Low);
        assert!((result.mean_brightness - 128.0).abs() < 1e-9);
        assert_eq!(result.tone, Tone::Balanced);
        assert!(!result.low_key && !result.high_key);
        assert_eq!(result.dimensions(), "10x6");
    }

    #[test]
    fn black_and_white_halves_are_high_complexity() {
        let mut fb = PixelBuffer::filled(8, 4, [0, 0, 0, 255]);
        for y in 0..4 {
            for x in 4..8 {
                fb.set_pixel(x, y, [255, 255, 255, 255]);
            }
        }
        let result = analyze(&fb);
        assert!((result.contrast - 1.0).abs() < 1e-9);
        assert_eq!(result.complexity, Complexity::High);
        assert_eq!(result.recommendations.ramp, RampPreset::Dense);
        assert!((result.mean_brightness - 127.5).abs() < 1e-9);
        assert_eq!(result.aspect_ratio, 2.0);
    }

    #[test]
    fn key_classification() {
        let dark = analyze(&PixelBuffer::filled(4, 4, [20, 20, 20, 255]));
        assert!(dark.low_key && !dark.high_key);
        assert_eq!(dark.tone, Tone::Dark);

        let bright = analyze(&PixelBuffer::filled(4, 4, [240, 240, 240, 255]));
        assert!(bright.high_key);
        assert_eq!(bright.tone, Tone::Bright);

        // frontières exclusives
        assert_eq!(Tone::from_mean(85.0), Tone::Balanced);
        assert_eq!(Tone::from_mean(170.0), Tone::Balanced);
    }

    #[test]
    fn histogram_samples_every_fourth_pixel() {
        let mut fb = PixelBuffer::filled(8, 8, [0, 0, 255, 255]);
        // (0,0) est échantillonné, (1,0) ne l'est pas
        fb.set_pixel(0, 0, [255, 0, 0, 255]);
        fb.set_pixel(1, 0, [0, 255, 0, 255]);
        let colours = analyze(&fb).dominant_colours;
        assert_eq!(colours.len(), 2);
        assert_eq!(colours[0].bin, [0, 0, 7]);
        assert_eq!(colours[0].rgb, [16, 16, 240]);
        assert_eq!(colours[0].count, 3);
        assert!((colours[0].share - 0.75).abs() < 1e-12);
        assert_eq!(colours[1].bin, [7, 0, 0]);
    }

    #[test]
    fn at_most_five_dominant_colours() {
        let mut fb = PixelBuffer::new(32, 4);
        for x in 0..32 {
            let v = (x * 8) as u8;
            for y in 0..4 {
                fb.set_pixel(x, y, [v, 255 - v, 0, 255]);
            }
        }
        let colours = analyze(&fb).dominant_colours;
        assert_eq!(colours.len(), 5);
        assert!(colours.windows(2).all(|w| w[0].count >= w[1].count));
    }

    #[test]
    fn analysis_is_reproducible() {
        let mut fb = PixelBuffer::new(97, 53);
        for y in 0..53 {
            for x in 0..97 {
                fb.set_pixel(x, y, [(x * 7 % 256) as u8, (y * 13 % 256) as u8, ((x + y) % 256) as u8, 255]);
            }
        }
        assert_eq!(analyze(&fb), analyze(&fb));
    }

    #[test]
    fn buffer_is_left_untouched() {
        let fb = PixelBuffer::filled(5, 5, [1, 2, 3, 4]);
        let copy = fb.clone();
        let _ = analyze(&fb);
        assert_eq!(fb, copy);
    }

    #[test]
    fn serialises_with_lowercase_enums() {
        let result = analyze(&PixelBuffer::filled(4, 4, [10, 10, 10, 255]));
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["complexity"], "low");
        assert_eq!(json["tone"], "dark");
        assert_eq!(json["recommendations"]["ramp"], "minimal");
    }
}
