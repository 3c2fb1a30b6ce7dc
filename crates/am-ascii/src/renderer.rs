use std::path::Path;
use std::time::{Duration, Instant};

use am_core::charset::GlyphRamp;
use am_core::config::{EdgeBoost, RenderConfig};
use am_core::error::CoreError;
use am_core::frame::{CharGrid, PixelBuffer};
use am_core::traits::PixelSource;
use rayon::prelude::*;

use crate::edge::edge_strength;
use crate::luminance::LuminanceField;
use crate::quantize::quantize_with;
use crate::resample::Resampler;

/// Métadonnées d'un rendu.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderStats {
    /// Wall-clock time spent in the scan.
    pub elapsed: Duration,
    /// Glyphs plus row terminators.
    pub char_count: usize,
    /// UTF-8 size of the persisted text.
    pub byte_count: usize,
    /// `char_count / source pixels`.
    pub compression_ratio: f64,
}

/// A rendered grid and its metadata.
#[derive(Clone, Debug)]
pub struct RenderResult {
    /// Full-resolution grid.
    pub grid: CharGrid,
    /// Scan statistics.
    pub stats: RenderStats,
    /// Downscaled copy for narrow displays (multi-resolution path only).
    pub terminal: Option<CharGrid>,
}

impl RenderResult {
    /// Output width in glyphs.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.grid.width()
    }

    /// Output height in rows.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.grid.height()
    }

    /// `"{width}x{height}"`.
    #[must_use]
    pub fn dimensions(&self) -> String {
        format!("{}x{}", self.width(), self.height())
    }

    /// Grid to show on a terminal: the terminal-fit copy when there is one.
    #[must_use]
    pub fn display_grid(&self) -> &CharGrid {
        self.terminal.as_ref().unwrap_or(&self.grid)
    }
}

/// Convertit un buffer de pixels en grille de glyphes.
///
/// # Example
/// ```
/// use am_core::config::RenderConfig;
/// use am_core::frame::PixelBuffer;
/// use am_ascii::Renderer;
///
/// let renderer = Renderer::new(RenderConfig::new(8).with_height(2)).unwrap();
/// let out = renderer.render(&PixelBuffer::filled(16, 16, [255, 255, 255, 255]));
/// assert_eq!(out.grid.to_text(), "@@@@@@@@\n@@@@@@@@\n");
/// ```
#[derive(Clone, Debug)]
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    /// Validate the configuration up front; rendering itself cannot fail.
    ///
    /// # Errors
    /// Returns [`CoreError::Config`] if the configuration is invalid.
    pub fn new(config: RenderConfig) -> Result<Self, CoreError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Skip validation for a config derived from an already validated one.
    pub(crate) fn validated(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Render a decoded buffer.
    #[must_use]
    pub fn render(&self, buffer: &PixelBuffer) -> RenderResult {
        let start = Instant::now();
        let field = LuminanceField::from_buffer(buffer);
        self.render_field_since(&field, start)
    }

    /// Render from a precomputed luminance field (shared across several widths).
    #[must_use]
    pub fn render_field(&self, field: &LuminanceField) -> RenderResult {
        self.render_field_since(field, Instant::now())
    }

    fn render_field_since(&self, field: &LuminanceField, start: Instant) -> RenderResult {
        let cfg = &self.config;
        let out_w = cfg.width;
        let out_h = cfg.output_height(field.aspect_ratio());
        let sampler = Resampler::new((field.width(), field.height()), (out_w, out_h), cfg.use_anti_aliasing);

        let (xr, yr) = sampler.ratios();
        log::debug!(
            "Rendu {}x{} → {out_w}x{out_h} glyphes, ratios x={xr:.2} y={yr:.2}, {:?}",
            field.width(),
            field.height(),
            sampler.mode()
        );

        let mut grid = CharGrid::new(out_w, out_h);
        let progress_every = (out_h / 20).max(1);

        // une ligne par tâche : écritures disjointes, ordre des lignes préservé
        grid.cells_mut()
            .par_chunks_mut(out_w as usize)
            .enumerate()
            .for_each(|(cy, row)| {
                let cy = cy as u32;
                if cy % progress_every == 0 {
                    log::debug!(
                        "Progression : {:.1}% ({cy}/{out_h} lignes)",
                        f64::from(cy) / f64::from(out_h) * 100.0
                    );
                }
                for (cx, cell) in row.iter_mut().enumerate() {
                    *cell = cell_glyph(field, &sampler, cfg, cx as u32, cy);
                }
            });

        let elapsed = start.elapsed();
        let char_count = grid.char_count();
        let byte_count = grid
            .rows()
            .map(|row| row.iter().map(|c| c.len_utf8()).sum::<usize>() + 1)
            .sum();
        let pixels = (field.width() as usize * field.height() as usize).max(1);

        log::info!(
            "Rendu terminé : {out_w}x{out_h} en {} ms ({char_count} caractères)",
            elapsed.as_millis()
        );

        RenderResult {
            grid,
            stats: RenderStats {
                elapsed,
                char_count,
                byte_count,
                compression_ratio: char_count as f64 / pixels as f64,
            },
            terminal: None,
        }
    }
}

#[inline(always)]
fn cell_glyph(
    field: &LuminanceField,
    sampler: &Resampler,
    cfg: &RenderConfig,
    x: u32,
    y: u32,
) -> char {
    let mut brightness = sampler.brightness(field, x, y);
    if cfg.use_edge_detection {
        let (px, py) = sampler.nearest(x, y);
        brightness = boost_edges(field, px, py, brightness, cfg.edge_boost);
    }
    quantize_with(brightness, &cfg.ramp, cfg.invert)
}

#[inline(always)]
fn boost_edges(field: &LuminanceField, x: u32, y: u32, brightness: f64, boost: EdgeBoost) -> f64 {
    let strength = edge_strength(field, x, y);
    if strength > boost.threshold {
        (brightness + strength * boost.factor).min(255.0)
    } else {
        brightness
    }
}

/// Map one source pixel straight to a glyph, with the single-pixel edge boost
/// (threshold 30, factor 0.5).
///
/// # Example
/// ```
/// use am_core::charset::GlyphRamp;
/// use am_core::frame::PixelBuffer;
/// use am_ascii::{renderer::glyph_at, LuminanceField};
/// let field = LuminanceField::from_buffer(&PixelBuffer::filled(3, 3, [0, 0, 0, 255]));
/// assert_eq!(glyph_at(&field, 1, 1, &GlyphRamp::new(" #").unwrap(), true), ' ');
/// ```
#[must_use]
pub fn glyph_at(field: &LuminanceField, x: u32, y: u32, ramp: &GlyphRamp, edges: bool) -> char {
    let mut brightness = field.at(x, y);
    if edges {
        brightness = boost_edges(field, x, y, brightness, EdgeBoost::SINGLE_PIXEL);
    }
    quantize_with(brightness, ramp, false)
}

/// Render a buffer with the given configuration.
///
/// # Errors
/// Returns [`CoreError::Config`] if the configuration is invalid; nothing is
/// scanned in that case.
///
/// # Example
/// ```
/// use am_core::charset::GlyphRamp;
/// use am_core::config::RenderConfig;
/// use am_core::frame::PixelBuffer;
/// use am_ascii::render;
///
/// let mut img = PixelBuffer::filled(2, 1, [0, 0, 0, 255]);
/// img.set_pixel(1, 0, [255, 255, 255, 255]);
/// let config = RenderConfig::new(2)
///     .with_ramp(GlyphRamp::new(" #").unwrap())
///     .with_edge_detection(false)
///     .with_anti_aliasing(false);
/// assert_eq!(render(&img, &config).unwrap().grid.to_text(), " #\n");
/// ```
pub fn render(buffer: &PixelBuffer, config: &RenderConfig) -> Result<RenderResult, CoreError> {
    Ok(Renderer::new(config.clone())?.render(buffer))
}

/// Decode `path` through `source`, then render it.
///
/// # Errors
/// [`CoreError::Config`] before any decode if the configuration is invalid;
/// [`CoreError::Decode`] if the source cannot be decoded. No blank frame is
/// ever substituted.
pub fn render_path<S: PixelSource + ?Sized>(
    source: &S,
    path: &Path,
    config: &RenderConfig,
) -> Result<RenderResult, CoreError> {
    let renderer = Renderer::new(config.clone())?;
    let buffer = source.decode(path)?;
    Ok(renderer.render(&buffer))
}

#[cfg(test)]
mod tests {
    use am_core::charset::RampPreset;

    use super::*;

    fn checker(width: u32, height: u32, cell: u32) -> PixelBuffer {
        let mut fb = PixelBuffer::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let v = if (x / cell + y / cell) % 2 == 0 { 0 } else { 255 };
                fb.set_pixel(x, y, [v, v, v, 255]);
            }
        }
        fb
    }

    fn assert_shape(result: &RenderResult, width: u32, height: u32) {
        assert_eq!(result.grid.width(), width);
        assert_eq!(result.grid.height(), height);
        let text = result.grid.to_text();
        let rows: Vec<&str> = text.split_terminator('\n').collect();
        assert_eq!(rows.len(), height as usize);
        for row in rows {
            assert_eq!(row.chars().count(), width as usize);
        }
    }

    #[test]
    fn solid_white_fills_with_densest_glyph() {
        let img = PixelBuffer::filled(4, 4, [255, 255, 255, 255]);
        let config = RenderConfig::new(4)
            .with_height(4)
            .with_ramp(GlyphRamp::new(" .:#").unwrap());
        let out = render(&img, &config).unwrap();
        assert_eq!(out.grid.to_text(), "####\n####\n####\n####\n");
    }

    #[test]
    fn black_white_pair_without_edges_or_aa() {
        let mut img = PixelBuffer::filled(2, 1, [0, 0, 0, 255]);
        img.set_pixel(1, 0, [255, 255, 255, 255]);
        let config = RenderConfig::new(2)
            .with_ramp(GlyphRamp::new(" #").unwrap())
            .with_edge_detection(false)
            .with_anti_aliasing(false);
        let out = render(&img, &config).unwrap();
        assert_eq!(out.grid.height(), 1);
        assert_eq!(out.grid.row(0), &[' ', '#']);
    }

    #[test]
    fn shape_holds_for_every_mode_and_size() {
        let img = checker(37, 23, 3);
        for (w, h) in [(1, 1), (5, 2), (80, 40), (200, 11)] {
            for (edges, aa, invert) in [(false, false, false), (true, true, true), (true, false, false)] {
                let config = RenderConfig::new(w)
                    .with_height(h)
                    .with_edge_detection(edges)
                    .with_anti_aliasing(aa)
                    .with_invert(invert);
                assert_shape(&render(&img, &config).unwrap(), w, h);
            }
        }
    }

    #[test]
    fn derived_height_uses_row_squash() {
        let img = checker(160, 90, 4);
        let out = render(&img, &RenderConfig::new(80)).unwrap();
        assert_shape(&out, 80, 22);
    }

    #[test]
    fn single_pixel_source_still_fills_the_grid() {
        let img = PixelBuffer::filled(1, 1, [255, 255, 255, 255]);
        let out = render(&img, &RenderConfig::new(12).with_height(5)).unwrap();
        assert_shape(&out, 12, 5);
        assert!(out.grid.rows().all(|row| row.iter().all(|&c| c == '@')));
    }

    #[test]
    fn invert_swaps_background_and_ink() {
        let img = PixelBuffer::filled(3, 3, [0, 0, 0, 255]);
        let config = RenderConfig::new(3).with_height(1).with_invert(true);
        assert_eq!(render(&img, &config).unwrap().grid.to_text(), "@@@\n");
    }

    #[test]
    fn edges_brighten_boundaries() {
        // bord vertical noir → gris sombre ; sans boost tout reste au fond
        let mut img = PixelBuffer::filled(8, 4, [0, 0, 0, 255]);
        for y in 0..4 {
            for x in 4..8 {
                img.set_pixel(x, y, [40, 40, 40, 255]);
            }
        }
        let ramp = GlyphRamp::new(" .:-=+*#%@").unwrap();
        let base = RenderConfig::new(8).with_height(4).with_ramp(ramp).with_anti_aliasing(false);

        let plain = render(&img, &base.clone().with_edge_detection(false)).unwrap();
        let edged = render(&img, &base.with_edge_detection(true)).unwrap();
        assert_eq!(plain.grid.get(3, 1), ' ');
        assert_ne!(edged.grid.get(3, 1), ' ');
        assert_eq!(edged.grid.get(0, 1), ' ');
    }

    #[test]
    fn invalid_config_is_rejected_before_scan() {
        let img = PixelBuffer::filled(4, 4, [0, 0, 0, 255]);
        assert!(matches!(
            render(&img, &RenderConfig::new(0)),
            Err(CoreError::Config(_))
        ));
        assert!(render(&img, &RenderConfig::new(4).with_height(0)).is_err());
    }

    #[test]
    fn stats_count_glyphs_and_terminators() {
        let img = PixelBuffer::filled(10, 10, [128, 128, 128, 255]);
        let config = RenderConfig::new(6)
            .with_height(3)
            .with_ramp(RampPreset::Artistic.ramp());
        let out = render(&img, &config).unwrap();
        assert_eq!(out.stats.char_count, 6 * 3 + 3);
        assert_eq!(out.stats.byte_count, out.grid.to_text().len());
        assert!((out.stats.compression_ratio - 21.0 / 100.0).abs() < 1e-12);
        assert_eq!(out.dimensions(), "6x3");
        assert!(out.terminal.is_none());
    }

    #[test]
    fn render_path_surfaces_decode_errors() {
        struct Broken;
        impl PixelSource for Broken {
            fn decode(&self, path: &Path) -> Result<PixelBuffer, CoreError> {
                Err(CoreError::Decode {
                    path: path.display().to_string(),
                    source: "truncated".into(),
                })
            }
        }
        let err = render_path(&Broken, Path::new("a.png"), &RenderConfig::new(10)).unwrap_err();
        assert!(matches!(err, CoreError::Decode { .. }));
    }

    #[test]
    fn zero_sized_decode_never_reaches_the_renderer() {
        struct Empty;
        impl PixelSource for Empty {
            fn decode(&self, _path: &Path) -> Result<PixelBuffer, CoreError> {
                PixelBuffer::from_raw(0, 0, Vec::new())
            }
        }
        let config = RenderConfig::new(4).with_height(2);
        let err = render_path(&Empty, Path::new("vide.png"), &config).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InvalidDimensions { width: 0, height: 0 }
        ));
        assert!(std::panic::catch_unwind(|| PixelBuffer::filled(0, 5, [0, 0, 0, 255])).is_err());
    }

    #[test]
    fn glyph_at_uses_single_pixel_boost() {
        let mut img = PixelBuffer::filled(4, 3, [0, 0, 0, 255]);
        for y in 0..3 {
            img.set_pixel(3, y, [20, 20, 20, 255]);
        }
        let field = LuminanceField::from_buffer(&img);
        let ramp = GlyphRamp::new(" .:#").unwrap();
        // gradient = 80 > 30 → 0 + 80 * 0.5 = 40 → still bucket 0 for 4 glyphs
        assert_eq!(glyph_at(&field, 2, 1, &ramp, true), ' ');
        let ramp = RampPreset::Dense.ramp();
        assert_ne!(glyph_at(&field, 2, 1, &ramp, true), ' ');
        assert_eq!(glyph_at(&field, 2, 1, &ramp, false), ' ');
    }
}
