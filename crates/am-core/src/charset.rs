//! Registre des rampes de glyphes.
//!
//! Every ramp is ordered darkest/background first, densest last. The preset
//! table is a static constant shared by every crate in the workspace.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// 4 caractères: haut contraste.
pub const CHARSET_MINIMAL: &str = " .-#";

/// 10 caractères: compact, bon contraste.
pub const CHARSET_STANDARD: &str = " .:-=+*#%@";

/// 70 caractères: Paul Bourke extended.
pub const CHARSET_DENSE: &str =
    " .'`^\",:;Il!i><~+_-?][}{1)(|\\/tfjrxnuvczXYUJCLQ0OZmwqpdbkhao*#MW&8%B@$";

/// Bourke réduit + blocs Unicode, pour les rendus très larges.
pub const CHARSET_ULTRADENSE: &str =
    " .\",:;iI!<>~+_-?]{}()|\\/tfjrxnuvczXYUJCLQ0OZmwqpdbkhao*#MW&8%B@$▁▂▃▄▅▆▇█░▒▓";

/// Blocs ombrés.
pub const CHARSET_ARTISTIC: &str = " ░▒▓█";

/// Blocs verticaux progressifs.
pub const CHARSET_BLOCKS: &str = " ▁▂▃▄▅▆▇█";

/// Dégradé mixte ASCII / blocs.
pub const CHARSET_GRADIENT: &str = " .:░▒▓██";

/// Points Unicode.
pub const CHARSET_DOTS: &str = " ·∵∴∷⁖⁘⁙⁛⁜";

/// Points puis ponctuation et exposants Unicode, 69 glyphes.
pub const CHARSET_UNICODE: &str =
    " ·∵∴∷⁖⁘⁙⁛⁜‖‗''\"\"…‰‱‴‵‶‷‸‹›※‼‽‾‿⁀⁁⁂⁃⁄⁅⁆⁇⁈⁉⁊⁋⁌⁍⁎⁏⁐⁑⁒⁓⁔⁕⁰ⁱ⁲⁳⁴⁵⁶⁷⁸⁹⁺⁻⁼⁽⁾ⁿ";

/// Rampe « typographique » à 23 glyphes.
pub const CHARSET_PROFESSIONAL: &str = " .,:;irsXA253hMHGS#9B&@";

/// Named ramp presets.
///
/// # Example
/// ```
/// use am_core::charset::RampPreset;
/// let p: RampPreset = "artistic".parse().unwrap();
/// assert_eq!(p.glyphs(), " ░▒▓█");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RampPreset {
    /// ` .-#`
    Minimal,
    /// ` .:-=+*#%@`
    #[default]
    Standard,
    /// 70-glyph Bourke ramp.
    Dense,
    /// Bourke + block glyphs.
    UltraDense,
    /// Block-shaded ` ░▒▓█`.
    Artistic,
    /// Eighth blocks.
    Blocks,
    /// ASCII into shaded blocks.
    Gradient,
    /// Unicode dot shading.
    Dots,
    /// Long Unicode punctuation ramp.
    Unicode,
    /// Typographic ramp.
    Professional,
}

impl RampPreset {
    /// Every preset, in registry order.
    pub const ALL: [RampPreset; 10] = [
        RampPreset::Minimal,
        RampPreset::Standard,
        RampPreset::Dense,
        RampPreset::UltraDense,
        RampPreset::Artistic,
        RampPreset::Blocks,
        RampPreset::Gradient,
        RampPreset::Dots,
        RampPreset::Unicode,
        RampPreset::Professional,
    ];

    /// Registry name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Minimal => "minimal",
            Self::Standard => "standard",
            Self::Dense => "dense",
            Self::UltraDense => "ultradense",
            Self::Artistic => "artistic",
            Self::Blocks => "blocks",
            Self::Gradient => "gradient",
            Self::Dots => "dots",
            Self::Unicode => "unicode",
            Self::Professional => "professional",
        }
    }

    /// The ramp string for this preset.
    #[must_use]
    pub fn glyphs(self) -> &'static str {
        match self {
            Self::Minimal => CHARSET_MINIMAL,
            Self::Standard => CHARSET_STANDARD,
            Self::Dense => CHARSET_DENSE,
            Self::UltraDense => CHARSET_ULTRADENSE,
            Self::Artistic => CHARSET_ARTISTIC,
            Self::Blocks => CHARSET_BLOCKS,
            Self::Gradient => CHARSET_GRADIENT,
            Self::Dots => CHARSET_DOTS,
            Self::Unicode => CHARSET_UNICODE,
            Self::Professional => CHARSET_PROFESSIONAL,
        }
    }

    /// Ready-to-use ramp. Preset strings always have at least two glyphs.
    #[must_use]
    pub fn ramp(self) -> GlyphRamp {
        GlyphRamp {
            glyphs: self.glyphs().chars().collect(),
        }
    }
}

impl fmt::Display for RampPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RampPreset {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.name() == wanted)
            .ok_or_else(|| {
                let known: Vec<&str> = Self::ALL.iter().map(|p| p.name()).collect();
                CoreError::config(format!(
                    "rampe inconnue « {s} » (connues : {})",
                    known.join(", ")
                ))
            })
    }
}

/// Look up a preset ramp string by name.
///
/// # Example
/// ```
/// use am_core::charset::preset;
/// assert_eq!(preset("minimal"), Some(" .-#"));
/// assert_eq!(preset("nope"), None);
/// ```
#[must_use]
pub fn preset(name: &str) -> Option<&'static str> {
    name.parse::<RampPreset>().ok().map(RampPreset::glyphs)
}

/// Ordered glyph ramp, counted in code points (not bytes).
///
/// Always holds at least two glyphs: a one-glyph ramp would make every
/// brightness map to the same symbol.
///
/// # Example
/// ```
/// use am_core::charset::GlyphRamp;
/// let ramp = GlyphRamp::new(" ░▒▓█").unwrap();
/// assert_eq!(ramp.len(), 5);
/// assert_eq!(ramp.last(), '█');
/// assert!(GlyphRamp::new("#").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlyphRamp {
    glyphs: Vec<char>,
}

impl GlyphRamp {
    /// Build a custom ramp from a string, darkest first.
    ///
    /// # Errors
    /// Returns [`CoreError::Config`] if the string has fewer than two code points.
    pub fn new(glyphs: &str) -> Result<Self, CoreError> {
        let glyphs: Vec<char> = glyphs.chars().collect();
        if glyphs.len() < 2 {
            return Err(CoreError::config(format!(
                "une rampe doit contenir au moins 2 glyphes, {} reçu(s)",
                glyphs.len()
            )));
        }
        Ok(Self { glyphs })
    }

    /// Number of glyphs.
    #[inline(always)]
    #[must_use]
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// Never true; present for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Glyph at `index`, clamped to the last entry.
    #[inline(always)]
    #[must_use]
    pub fn glyph(&self, index: usize) -> char {
        self.glyphs[index.min(self.glyphs.len() - 1)]
    }

    /// Darkest / background glyph.
    #[must_use]
    pub fn first(&self) -> char {
        self.glyphs[0]
    }

    /// Densest glyph.
    #[must_use]
    pub fn last(&self) -> char {
        self.glyphs[self.glyphs.len() - 1]
    }

    /// All glyphs in order.
    #[must_use]
    pub fn as_slice(&self) -> &[char] {
        &self.glyphs
    }
}

impl Default for GlyphRamp {
    fn default() -> Self {
        RampPreset::default().ramp()
    }
}

impl fmt::Display for GlyphRamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ch in &self.glyphs {
            write!(f, "{ch}")?;
        }
        Ok(())
    }
}
