/// Configuration, types, and shared structures for asciimorph.
///
/// This crate contains the pixel buffer, the output grid, the glyph ramp
/// registry, render configuration and the error taxonomy shared across the
/// workspace.

pub mod charset;
pub mod config;
pub mod error;
pub mod frame;
pub mod traits;

pub use charset::{GlyphRamp, RampPreset};
pub use config::{EdgeBoost, FrameStyle, MultiResConfig, RenderConfig, Settings};
pub use error::CoreError;
pub use frame::{CharGrid, PixelBuffer};
