use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::charset::{GlyphRamp, RampPreset};
use crate::error::CoreError;

/// Row squash applied when the output height is derived: a terminal glyph cell
/// is roughly twice as tall as it is wide.
pub const ROW_SQUASH: f64 = 0.5;

/// Named width ladder used by the multi-resolution path.
pub const RESOLUTION_LADDER: [(&str, u32); 6] = [
    ("4K Ultra", 2000),
    ("4K High", 1600),
    ("2K", 1200),
    ("HD", 800),
    ("Standard", 400),
    ("Terminal", 120),
];

/// Display name for a target width: the ladder name when it matches, else `"{w} cols"`.
///
/// # Example
/// ```
/// use am_core::config::resolution_name;
/// assert_eq!(resolution_name(800), "HD");
/// assert_eq!(resolution_name(640), "640 cols");
/// ```
#[must_use]
pub fn resolution_name(width: u32) -> String {
    RESOLUTION_LADDER
        .iter()
        .find(|(_, w)| *w == width)
        .map_or_else(|| format!("{width} cols"), |(name, _)| (*name).to_string())
}

/// Edge emphasis: when the Sobel magnitude exceeds `threshold`, the cell
/// brightness gains `magnitude * factor` (clamped to 255).
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct EdgeBoost {
    /// Minimum gradient magnitude that triggers the boost.
    pub threshold: f64,
    /// Multiplier applied to the magnitude.
    pub factor: f64,
}

impl EdgeBoost {
    /// Resampled rendering path.
    pub const STANDARD: Self = Self {
        threshold: 20.0,
        factor: 0.3,
    };

    /// Single-pixel glyph mapping.
    pub const SINGLE_PIXEL: Self = Self {
        threshold: 30.0,
        factor: 0.5,
    };
}

impl Default for EdgeBoost {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Border drawn around a rendered grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameStyle {
    /// No border.
    #[default]
    None,
    /// `+---+` / `|`.
    Simple,
    /// `╔═╗` / `║`.
    Double,
    /// `┌─┐` / `│`.
    Artistic,
}

impl FromStr for FrameStyle {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "simple" => Ok(Self::Simple),
            "double" => Ok(Self::Double),
            "artistic" => Ok(Self::Artistic),
            other => Err(CoreError::config(format!("cadre inconnu « {other} »"))),
        }
    }
}

/// Configuration d'un rendu image → grille de glyphes.
///
/// # Example
/// ```
/// use am_core::config::RenderConfig;
/// let config = RenderConfig::new(120).with_edge_detection(false);
/// assert_eq!(config.width, 120);
/// assert!(config.validate().is_ok());
/// ```
#[allow(clippy::struct_excessive_bools)]
#[derive(Clone, Debug, PartialEq)]
pub struct RenderConfig {
    /// Output width in glyphs.
    pub width: u32,
    /// Output height in rows. `None` = derived from the source aspect ratio.
    pub height: Option<u32>,
    /// Glyph ramp, darkest first.
    pub ramp: GlyphRamp,
    /// Boost brightness near strong gradients.
    pub use_edge_detection: bool,
    /// Bilinear sampling when downsampling.
    pub use_anti_aliasing: bool,
    /// Inverser la luminance avant quantification.
    pub invert: bool,
    /// Edge boost threshold and factor.
    pub edge_boost: EdgeBoost,
    /// Optional border around the rendered text.
    pub frame: FrameStyle,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::new(80)
    }
}

impl RenderConfig {
    /// Defaults at the given width.
    #[must_use]
    pub fn new(width: u32) -> Self {
        Self {
            width,
            height: None,
            ramp: GlyphRamp::default(),
            use_edge_detection: true,
            use_anti_aliasing: true,
            invert: false,
            edge_boost: EdgeBoost::STANDARD,
            frame: FrameStyle::None,
        }
    }

    /// Fixed output height.
    #[must_use]
    pub fn with_height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    /// Replace the ramp.
    #[must_use]
    pub fn with_ramp(mut self, ramp: GlyphRamp) -> Self {
        self.ramp = ramp;
        self
    }

    /// Toggle edge emphasis.
    #[must_use]
    pub fn with_edge_detection(mut self, on: bool) -> Self {
        self.use_edge_detection = on;
        self
    }

    /// Toggle bilinear downsampling.
    #[must_use]
    pub fn with_anti_aliasing(mut self, on: bool) -> Self {
        self.use_anti_aliasing = on;
        self
    }

    /// Toggle luminance inversion.
    #[must_use]
    pub fn with_invert(mut self, on: bool) -> Self {
        self.invert = on;
        self
    }

    /// Same config at another width (height re-derived unless fixed).
    #[must_use]
    pub fn at_width(&self, width: u32) -> Self {
        Self {
            width,
            ..self.clone()
        }
    }

    /// Reject configurations that would produce a degenerate scan.
    ///
    /// # Errors
    /// Returns [`CoreError::Config`] for a zero width/height, a short ramp or a
    /// non-finite edge boost.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.width == 0 {
            return Err(CoreError::config("la largeur de sortie doit être > 0"));
        }
        if self.height == Some(0) {
            return Err(CoreError::config("la hauteur de sortie doit être > 0"));
        }
        if self.ramp.len() < 2 {
            return Err(CoreError::config("une rampe doit contenir au moins 2 glyphes"));
        }
        let EdgeBoost { threshold, factor } = self.edge_boost;
        if !threshold.is_finite() || !factor.is_finite() || threshold < 0.0 || factor < 0.0 {
            return Err(CoreError::config(format!(
                "edge boost invalide : seuil {threshold}, facteur {factor}"
            )));
        }
        Ok(())
    }

    /// Output rows for a source with the given aspect ratio (`width / height`).
    ///
    /// Derived heights use `floor(width / aspect * 0.5)`, never less than one row.
    ///
    /// # Example
    /// ```
    /// use am_core::config::RenderConfig;
    /// assert_eq!(RenderConfig::new(800).output_height(16.0 / 9.0), 225);
    /// assert_eq!(RenderConfig::new(2).output_height(2.0), 1);
    /// assert_eq!(RenderConfig::new(80).with_height(7).output_height(1.0), 7);
    /// ```
    #[must_use]
    pub fn output_height(&self, aspect_ratio: f64) -> u32 {
        self.height.unwrap_or_else(|| {
            let derived = (f64::from(self.width) / aspect_ratio * ROW_SQUASH).floor();
            if derived.is_finite() {
                (derived as u32).max(1)
            } else {
                1
            }
        })
    }
}

/// Paramètres du rendu multi-résolution.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct MultiResConfig {
    /// Target widths, rendered in this order.
    pub widths: Vec<u32>,
    /// Renders wider than this also get a terminal-fit grid.
    pub terminal_width: u32,
    /// Greyscale + mild contrast before rendering.
    pub prepare: bool,
}

impl Default for MultiResConfig {
    fn default() -> Self {
        Self {
            widths: RESOLUTION_LADDER.iter().map(|(_, w)| *w).collect(),
            terminal_width: 200,
            prepare: true,
        }
    }
}

impl MultiResConfig {
    /// # Errors
    /// Returns [`CoreError::Config`] if the width list is empty or holds a zero,
    /// or if the terminal width is zero.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.widths.is_empty() {
            return Err(CoreError::config("aucune largeur cible"));
        }
        if self.widths.contains(&0) {
            return Err(CoreError::config("largeur cible nulle"));
        }
        if self.terminal_width == 0 {
            return Err(CoreError::config("la largeur terminal doit être > 0"));
        }
        Ok(())
    }
}

/// Everything a TOML file can set.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Settings {
    /// Single-render parameters.
    pub render: RenderConfig,
    /// Multi-resolution parameters.
    pub multires: MultiResConfig,
}

/// Structure TOML intermédiaire pour désérialisation avec valeurs optionnelles.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    render: Option<RenderSection>,
    multires: Option<MultiResSection>,
}

/// Render section, all fields optional for partial override.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RenderSection {
    width: Option<u32>,
    height: Option<u32>,
    ramp: Option<RampPreset>,
    custom_ramp: Option<String>,
    edge_detection: Option<bool>,
    anti_aliasing: Option<bool>,
    invert: Option<bool>,
    edge_threshold: Option<f64>,
    edge_boost: Option<f64>,
    frame: Option<FrameStyle>,
}

/// Multires section, all fields optional.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct MultiResSection {
    widths: Option<Vec<u32>>,
    terminal_width: Option<u32>,
    prepare: Option<bool>,
}

/// Parse TOML text and merge it over the defaults.
///
/// # Errors
/// Returns an error if the text is not valid TOML for this schema or if the
/// merged settings fail validation.
///
/// # Example
/// ```
/// use am_core::config::parse_config;
/// let s = parse_config("[render]\nwidth = 64\nramp = \"dense\"\n").unwrap();
/// assert_eq!(s.render.width, 64);
/// assert_eq!(s.render.ramp.len(), 70);
/// ```
pub fn parse_config(content: &str) -> Result<Settings> {
    let file: ConfigFile = toml::from_str(content).context("Erreur de parsing TOML")?;
    let mut settings = Settings::default();

    if let Some(r) = file.render {
        let cfg = &mut settings.render;
        if let Some(v) = r.width {
            cfg.width = v;
        }
        if r.height.is_some() {
            cfg.height = r.height;
        }
        if let Some(v) = r.ramp {
            cfg.ramp = v.ramp();
        }
        // custom_ramp l'emporte sur le preset
        if let Some(v) = r.custom_ramp {
            cfg.ramp = GlyphRamp::new(&v)?;
        }
        if let Some(v) = r.edge_detection {
            cfg.use_edge_detection = v;
        }
        if let Some(v) = r.anti_aliasing {
            cfg.use_anti_aliasing = v;
        }
        if let Some(v) = r.invert {
            cfg.invert = v;
        }
        if let Some(v) = r.edge_threshold {
            cfg.edge_boost.threshold = v;
        }
        if let Some(v) = r.edge_boost {
            cfg.edge_boost.factor = v;
        }
        if let Some(v) = r.frame {
            cfg.frame = v;
        }
    }

    if let Some(m) = file.multires {
        if let Some(v) = m.widths {
            settings.multires.widths = v;
        }
        if let Some(v) = m.terminal_width {
            settings.multires.terminal_width = v;
        }
        if let Some(v) = m.prepare {
            settings.multires.prepare = v;
        }
    }

    settings.render.validate()?;
    settings.multires.validate()?;
    Ok(settings)
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns an error if the file cannot be read, parsed or validated.
///
/// # Example
/// ```no_run
/// use am_core::config::load_config;
/// use std::path::Path;
/// let settings = load_config(Path::new("config/default.toml")).unwrap();
/// ```
pub fn load_config(path: &Path) -> Result<Settings> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;
    let settings =
        parse_config(&content).with_context(|| format!("Configuration {}", path.display()))?;
    log::debug!("Configuration chargée depuis {}", path.display());
    Ok(settings)
}
