/// Image → glyph grid conversion engine for asciimorph.
///
/// Brightness model, Sobel edge emphasis, resampling, quantization, the
/// renderer itself and the multi-resolution driver.

pub mod edge;
pub mod framing;
pub mod luminance;
pub mod multires;
pub mod quantize;
pub mod renderer;
pub mod resample;

pub use framing::frame_text;
pub use luminance::{LuminanceField, fast_luminance, perceptual_luminance};
pub use multires::{MultiResolution, Variant, render_all_resolutions, terminal_fit};
pub use quantize::quantize;
pub use renderer::{RenderResult, RenderStats, Renderer, render};
