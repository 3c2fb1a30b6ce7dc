/// Pixel-level transforms applied before conversion.
///
/// Every transform consumes a buffer and returns it with the same dimensions;
/// alpha is never touched.

pub mod params;
pub mod pixel;
pub mod plan;

pub use params::{BrightnessLevel, ContrastLevel, NoiseIntensity};
pub use pixel::{add_noise, adjust_brightness, enhance_contrast, greyscale, invert};
pub use plan::{Transform, TransformOp, apply_plan};
