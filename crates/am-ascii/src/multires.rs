use am_core::config::{MultiResConfig, RenderConfig, resolution_name};
use am_core::error::CoreError;
use am_core::frame::{CharGrid, PixelBuffer};
use am_transform::{ContrastLevel, enhance_contrast, greyscale};

use crate::luminance::LuminanceField;
use crate::renderer::{RenderResult, Renderer};

/// Contrast applied by the preparation pass.
const PREPARE_CONTRAST: f64 = 0.1;

/// Nearest-neighbour downsample of a glyph grid to `target_width` columns.
///
/// Rows shrink by the same factor: `max(1, floor(height * target / width))`.
/// Cell `(x, y)` reads `grid[floor(y * y_ratio)][floor(x * x_ratio)]`.
///
/// # Example
/// ```
/// use am_core::frame::CharGrid;
/// use am_ascii::terminal_fit;
/// let grid = CharGrid::parse("abcd\nefgh\nijkl\nmnop\n").unwrap();
/// assert_eq!(terminal_fit(&grid, 2).to_text(), "ac\nik\n");
/// ```
#[must_use]
pub fn terminal_fit(grid: &CharGrid, target_width: u32) -> CharGrid {
    let (w, h) = (grid.width(), grid.height());
    if w == 0 || h == 0 {
        return CharGrid::new(0, 0);
    }
    let tw = target_width.max(1);
    let th = ((u64::from(h) * u64::from(tw) / u64::from(w)) as u32).max(1);
    let x_ratio = f64::from(w) / f64::from(tw);
    let y_ratio = f64::from(h) / f64::from(th);

    let mut out = CharGrid::new(tw, th);
    for y in 0..th {
        let sy = ((f64::from(y) * y_ratio).floor() as u32).min(h - 1);
        for x in 0..tw {
            let sx = ((f64::from(x) * x_ratio).floor() as u32).min(w - 1);
            out.set(x, y, grid.get(sx, sy));
        }
    }
    out
}

/// One rendered width, labelled from the resolution ladder.
#[derive(Clone, Debug)]
pub struct Variant {
    /// Ladder name ("HD", "2K"...) or "{width} cols".
    pub name: String,
    /// Rendered grid and stats.
    pub result: RenderResult,
}

/// Renders one source at several widths.
///
/// The luminance field is computed once and shared by every width. Fixed
/// heights in the base config are ignored: each width derives its own.
#[derive(Clone, Debug)]
pub struct MultiResolution {
    base: RenderConfig,
    config: MultiResConfig,
    contrast: ContrastLevel,
}

impl MultiResolution {
    /// # Errors
    /// Returns [`CoreError::Config`] if either configuration is invalid.
    pub fn new(base: RenderConfig, config: MultiResConfig) -> Result<Self, CoreError> {
        base.validate()?;
        config.validate()?;
        Ok(Self {
            base,
            config,
            contrast: ContrastLevel::new(PREPARE_CONTRAST)?,
        })
    }

    /// Target widths in render order.
    #[must_use]
    pub fn widths(&self) -> &[u32] {
        &self.config.widths
    }

    /// Render every configured width, in order.
    #[must_use]
    pub fn render(&self, buffer: &PixelBuffer) -> Vec<Variant> {
        let field = if self.config.prepare {
            log::debug!("Préparation haute résolution : niveaux de gris + contraste {PREPARE_CONTRAST}");
            let prepared = enhance_contrast(greyscale(buffer.clone()), self.contrast);
            LuminanceField::from_buffer(&prepared)
        } else {
            LuminanceField::from_buffer(buffer)
        };

        self.config
            .widths
            .iter()
            .map(|&width| {
                let mut config = self.base.at_width(width);
                config.height = None;
                let mut result = Renderer::validated(config).render_field(&field);
                if width > self.config.terminal_width {
                    result.terminal = Some(terminal_fit(&result.grid, self.config.terminal_width));
                }
                let name = resolution_name(width);
                log::info!("{name} : {} en {} ms", result.dimensions(), result.stats.elapsed.as_millis());
                Variant { name, result }
            })
            .collect()
    }
}

/// Render `buffer` at each width with default settings, in the given order.
///
/// # Errors
/// Returns [`CoreError::Config`] if `widths` is empty or contains a zero.
///
/// # Example
/// ```
/// use am_core::frame::PixelBuffer;
/// use am_ascii::render_all_resolutions;
/// let out = render_all_resolutions(&PixelBuffer::new(16, 9), &[80, 20]).unwrap();
/// assert_eq!(out.iter().map(|r| r.width()).collect::<Vec<_>>(), [80, 20]);
/// ```
pub fn render_all_resolutions(
    buffer: &PixelBuffer,
    widths: &[u32],
) -> Result<Vec<RenderResult>, CoreError> {
    let config = MultiResConfig {
        widths: widths.to_vec(),
        ..MultiResConfig::default()
    };
    let driver = MultiResolution::new(RenderConfig::default(), config)?;
    Ok(driver.render(buffer).into_iter().map(|v| v.result).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> PixelBuffer {
        let mut fb = PixelBuffer::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let v = (x * 255 / width.max(1)) as u8;
                fb.set_pixel(x, y, [v, v / 2, 255 - v, 255]);
            }
        }
        fb
    }

    #[test]
    fn widescreen_widths_follow_row_squash() {
        let out = render_all_resolutions(&gradient(160, 90), &[800, 120]).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!((out[0].width(), out[0].height()), (800, 225));
        assert_eq!((out[1].width(), out[1].height()), (120, 33));
    }

    #[test]
    fn terminal_grid_only_above_terminal_width() {
        let out = render_all_resolutions(&gradient(160, 90), &[800, 120]).unwrap();
        let terminal = out[0].terminal.as_ref().unwrap();
        assert_eq!(terminal.width(), 200);
        assert_eq!(terminal.height(), 56);
        assert!(out[1].terminal.is_none());
        assert_eq!(out[1].display_grid(), &out[1].grid);
    }

    #[test]
    fn terminal_fit_samples_the_glyph_grid() {
        let grid = CharGrid::parse("0123456789\nabcdefghij\n").unwrap();
        let fit = terminal_fit(&grid, 5);
        assert_eq!(fit.height(), 1);
        assert_eq!(fit.to_text(), "02468\n");
        // jamais moins d'une ligne
        assert_eq!(terminal_fit(&grid, 1).to_text(), "0\n");
        assert_eq!(terminal_fit(&CharGrid::new(0, 0), 10).width(), 0);
    }

    #[test]
    fn fixed_height_is_ignored_per_width() {
        let base = RenderConfig::new(40).with_height(3);
        let config = MultiResConfig {
            widths: vec![40, 20],
            terminal_width: 200,
            prepare: false,
        };
        let variants = MultiResolution::new(base, config).unwrap().render(&gradient(40, 20));
        assert_eq!(variants[0].result.height(), 10);
        assert_eq!(variants[1].result.height(), 5);
        assert_eq!(variants[0].name, "40 cols");
    }

    #[test]
    fn ladder_names_are_attached() {
        let config = MultiResConfig {
            widths: vec![400, 120],
            ..MultiResConfig::default()
        };
        let variants = MultiResolution::new(RenderConfig::default(), config)
            .unwrap()
            .render(&gradient(32, 32));
        let names: Vec<&str> = variants.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, ["Standard", "Terminal"]);
        assert!(variants[0].result.terminal.is_some());
    }

    #[test]
    fn preparation_pass_discards_colour() {
        // bleu pur et gris 18 : même gris BT.709, luminance perceptuelle différente
        let blue = PixelBuffer::filled(8, 8, [0, 0, 255, 255]);
        let grey = PixelBuffer::filled(8, 8, [18, 18, 18, 255]);
        let render_both = |prepare: bool| {
            let config = MultiResConfig {
                widths: vec![8],
                terminal_width: 200,
                prepare,
            };
            let driver = MultiResolution::new(RenderConfig::default(), config).unwrap();
            let a = driver.render(&blue).remove(0).result.grid;
            let b = driver.render(&grey).remove(0).result.grid;
            (a, b)
        };
        let (a, b) = render_both(true);
        assert_eq!(a.height(), 4);
        assert_eq!(a, b);
        let (a, b) = render_both(false);
        assert_ne!(a, b);
    }

    #[test]
    fn empty_width_list_is_a_config_error() {
        let err = render_all_resolutions(&gradient(4, 4), &[]).unwrap_err();
        assert!(matches!(err, CoreError::Config(_)));
        assert!(render_all_resolutions(&gradient(4, 4), &[10, 0]).is_err());
    }
}
