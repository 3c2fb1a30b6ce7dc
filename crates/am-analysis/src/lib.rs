/// Image statistics and conversion recommendations for asciimorph.
///
/// The analyzer reads a decoded buffer once and never mutates it. Its numbers
/// use the flat BT.601 luminance, not the renderer's gamma-corrected one.

pub mod analyzer;
pub mod recommend;

pub use analyzer::{AnalysisResult, Complexity, DominantColour, Tone, analyze};
pub use recommend::{Recommendations, recommend};
