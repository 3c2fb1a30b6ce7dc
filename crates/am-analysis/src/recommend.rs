use am_core::charset::RampPreset;
use am_core::config::RenderConfig;
use am_transform::{BrightnessLevel, ContrastLevel, NoiseIntensity, TransformOp};
use serde::Serialize;

use crate::analyzer::{Complexity, Tone};

/// Brightness shift suggested for dark images.
const LIFT_DARK: f64 = 0.3;
/// Brightness shift suggested for bright images.
const DIM_BRIGHT: f64 = -0.2;
/// Noise intensity for flat images, kept subtle.
const SUBTLE_NOISE: f64 = 10.0;

/// Suggested conversion parameters for an analysed image.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Recommendations {
    /// Ramp matched to the amount of detail.
    pub ramp: RampPreset,
    /// Contrast below 0.5.
    pub enhance_contrast: bool,
    /// Low-key or high-key.
    pub adjust_brightness: bool,
    /// +0.3 for dark, −0.2 for bright, 0 otherwise.
    pub brightness_adjustment: f64,
    /// Dark with enough contrast to survive inversion.
    pub invert: bool,
    /// Flat, low-detail images get texture.
    pub add_noise: bool,
    /// Output width in glyphs, from the aspect ratio.
    pub optimal_width: u32,
}

/// Derive recommendations from the analysed statistics.
///
/// # Example
/// ```
/// use am_analysis::{recommend, Complexity, Tone};
/// use am_core::charset::RampPreset;
/// let rec = recommend(Complexity::Medium, 0.6, Tone::Balanced, 16.0 / 9.0);
/// assert_eq!(rec.ramp, RampPreset::Standard);
/// assert_eq!(rec.optimal_width, 120);
/// assert!(!rec.enhance_contrast && !rec.adjust_brightness);
/// ```
#[must_use]
pub fn recommend(complexity: Complexity, contrast: f64, tone: Tone, aspect_ratio: f64) -> Recommendations {
    let ramp = match complexity {
        Complexity::High => RampPreset::Dense,
        Complexity::Medium => RampPreset::Standard,
        Complexity::Low => RampPreset::Minimal,
    };
    let brightness_adjustment = match tone {
        Tone::Dark => LIFT_DARK,
        Tone::Bright => DIM_BRIGHT,
        Tone::Balanced => 0.0,
    };
    let optimal_width = if aspect_ratio > 1.5 {
        120
    } else if aspect_ratio > 1.0 {
        100
    } else {
        80
    };

    Recommendations {
        ramp,
        enhance_contrast: contrast < 0.5,
        adjust_brightness: tone != Tone::Balanced,
        brightness_adjustment,
        invert: tone == Tone::Dark && contrast > 0.3,
        add_noise: complexity == Complexity::Low && contrast < 0.3,
        optimal_width,
    }
}

impl Recommendations {
    /// Transform plan in application order: contrast, brightness, invert, noise.
    ///
    /// # Example
    /// ```
    /// use am_analysis::{recommend, Complexity, Tone};
    /// let plan = recommend(Complexity::Low, 0.35, Tone::Dark, 1.0).plan();
    /// let names: Vec<String> = plan.iter().map(ToString::to_string).collect();
    /// assert_eq!(names, ["contrast(0.5)", "brightness(0.3)", "invert"]);
    /// ```
    #[must_use]
    pub fn plan(&self) -> Vec<TransformOp> {
        let mut plan = Vec::with_capacity(4);
        if self.enhance_contrast {
            plan.push(TransformOp::Contrast {
                level: ContrastLevel::default(),
            });
        }
        if self.adjust_brightness
            && let Ok(level) = BrightnessLevel::new(self.brightness_adjustment)
        {
            plan.push(TransformOp::Brightness { level });
        }
        if self.invert {
            plan.push(TransformOp::Invert);
        }
        if self.add_noise
            && let Ok(intensity) = NoiseIntensity::new(SUBTLE_NOISE)
        {
            plan.push(TransformOp::Noise { intensity });
        }
        plan
    }

    /// Render configuration at the recommended width and ramp.
    #[must_use]
    pub fn render_config(&self) -> RenderConfig {
        RenderConfig::new(self.optimal_width).with_ramp(self.ramp.ramp())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ramp_follows_complexity() {
        let pick = |c| recommend(c, 0.5, Tone::Balanced, 1.0).ramp;
        assert_eq!(pick(Complexity::High), RampPreset::Dense);
        assert_eq!(pick(Complexity::Medium), RampPreset::Standard);
        assert_eq!(pick(Complexity::Low), RampPreset::Minimal);
    }

    #[test]
    fn optimal_width_thresholds() {
        let width = |aspect| recommend(Complexity::Low, 0.0, Tone::Balanced, aspect).optimal_width;
        assert_eq!(width(2.0), 120);
        assert_eq!(width(1.5), 100);
        assert_eq!(width(1.2), 100);
        assert_eq!(width(1.0), 80);
        assert_eq!(width(0.5), 80);
    }

    #[test]
    fn brightness_direction_depends_on_key() {
        let dark = recommend(Complexity::Low, 0.1, Tone::Dark, 1.0);
        assert!(dark.adjust_brightness);
        assert_eq!(dark.brightness_adjustment, 0.3);
        let bright = recommend(Complexity::Low, 0.1, Tone::Bright, 1.0);
        assert_eq!(bright.brightness_adjustment, -0.2);
        assert!(!bright.invert);
        let neutral = recommend(Complexity::Low, 0.1, Tone::Balanced, 1.0);
        assert!(!neutral.adjust_brightness);
        assert_eq!(neutral.brightness_adjustment, 0.0);
    }

    #[test]
    fn invert_needs_dark_and_some_contrast() {
        assert!(!recommend(Complexity::Low, 0.3, Tone::Dark, 1.0).invert);
        assert!(recommend(Complexity::Low, 0.31, Tone::Dark, 1.0).invert);
        assert!(!recommend(Complexity::High, 0.9, Tone::Balanced, 1.0).invert);
    }

    #[test]
    fn flat_dark_image_gets_full_plan() {
        let rec = recommend(Complexity::Low, 0.1, Tone::Dark, 1.0);
        let plan = rec.plan();
        assert_eq!(plan.len(), 3);
        assert!(matches!(plan[0], TransformOp::Contrast { .. }));
        assert!(matches!(plan[1], TransformOp::Brightness { level } if level.get() == 0.3));
        assert!(matches!(plan[2], TransformOp::Noise { intensity } if intensity.get() == 10.0));
    }

    #[test]
    fn busy_balanced_image_needs_nothing() {
        let rec = recommend(Complexity::High, 0.9, Tone::Balanced, 1.0);
        assert!(rec.plan().is_empty());
        let config = rec.render_config();
        assert_eq!(config.width, 80);
        assert_eq!(config.ramp, RampPreset::Dense.ramp());
    }
}
