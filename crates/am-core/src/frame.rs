use crate::error::CoreError;

/// Buffer de pixels RGBA, row-major, 4 bytes par pixel.
///
/// The length invariant `data.len() == width * height * 4` is checked once at
/// construction; fields are private so no later mutation can break it. Channel
/// values are `u8`, so the [0, 255] range holds by type.
///
/// # Example
/// ```
/// use am_core::frame::PixelBuffer;
/// let fb = PixelBuffer::new(10, 10);
/// assert_eq!(fb.as_raw().len(), 400);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl PixelBuffer {
    /// Crée un buffer transparent noir aux dimensions données.
    ///
    /// # Panics
    /// If `width` or `height` is zero, like [`PixelBuffer::filled`].
    ///
    /// # Example
    /// ```
    /// use am_core::frame::PixelBuffer;
    /// let fb = PixelBuffer::new(100, 50);
    /// assert_eq!(fb.width(), 100);
    /// assert_eq!(fb.height(), 50);
    /// ```
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, [0, 0, 0, 0])
    }

    /// Buffer where every pixel has the same RGBA value.
    ///
    /// # Panics
    /// If `width` or `height` is zero. A buffer always holds at least one
    /// pixel; use [`PixelBuffer::from_raw`] for a fallible constructor.
    ///
    /// # Example
    /// ```
    /// use am_core::frame::PixelBuffer;
    /// let fb = PixelBuffer::filled(2, 2, [255, 0, 0, 255]);
    /// assert_eq!(fb.pixel(1, 1), (255, 0, 0, 255));
    /// ```
    #[must_use]
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        assert!(
            width > 0 && height > 0,
            "dimensions nulles : {width}x{height}"
        );
        let count = width as usize * height as usize;
        let mut data = Vec::with_capacity(count * 4);
        for _ in 0..count {
            data.extend_from_slice(&rgba);
        }
        Self {
            data,
            width,
            height,
        }
    }

    /// Wrap raw RGBA bytes (as produced by a decoder).
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidDimensions`] if either dimension is zero or
    /// if `data` does not hold exactly `width * height` RGBA samples.
    ///
    /// # Example
    /// ```
    /// use am_core::frame::PixelBuffer;
    /// let fb = PixelBuffer::from_raw(1, 2, vec![0; 8]).unwrap();
    /// assert_eq!(fb.height(), 2);
    /// assert!(PixelBuffer::from_raw(2, 2, vec![0; 8]).is_err());
    /// ```
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self, CoreError> {
        let expected = width as usize * height as usize * 4;
        if width == 0 || height == 0 || data.len() != expected {
            return Err(CoreError::InvalidDimensions { width, height });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Width in pixels.
    #[inline(always)]
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[inline(always)]
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of pixels.
    #[must_use]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Source aspect ratio `width / height`.
    ///
    /// # Example
    /// ```
    /// use am_core::frame::PixelBuffer;
    /// assert_eq!(PixelBuffer::new(16, 9).aspect_ratio(), 16.0 / 9.0);
    /// ```
    #[must_use]
    pub fn aspect_ratio(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height.max(1))
    }

    /// Raw RGBA bytes, row-major.
    #[must_use]
    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    /// Mutable RGBA bytes. The slice length is fixed, so the invariant survives.
    pub fn as_raw_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consume the buffer and return the raw RGBA bytes.
    #[must_use]
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Accès au pixel (x, y) → (r, g, b, a).
    ///
    /// Callers clamp coordinates first (see [`PixelBuffer::clamp`]).
    ///
    /// # Example
    /// ```
    /// use am_core::frame::PixelBuffer;
    /// let fb = PixelBuffer::new(10, 10);
    /// assert_eq!(fb.pixel(0, 0), (0, 0, 0, 0));
    /// ```
    #[inline(always)]
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> (u8, u8, u8, u8) {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        (
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        )
    }

    /// Écrit le pixel (x, y).
    #[inline(always)]
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        self.data[idx..idx + 4].copy_from_slice(&rgba);
    }

    /// Clamp signed coordinates into `[0, width-1] × [0, height-1]` (border replication).
    ///
    /// # Example
    /// ```
    /// use am_core::frame::PixelBuffer;
    /// let fb = PixelBuffer::new(4, 3);
    /// assert_eq!(fb.clamp(-1, 7), (0, 2));
    /// ```
    #[inline(always)]
    #[must_use]
    pub fn clamp(&self, x: i64, y: i64) -> (u32, u32) {
        let max_x = i64::from(self.width.saturating_sub(1));
        let max_y = i64::from(self.height.saturating_sub(1));
        (x.clamp(0, max_x) as u32, y.clamp(0, max_y) as u32)
    }
}

/// Grille de sortie : une suite de lignes de glyphes, toutes de même largeur.
///
/// Persisted as plain text, one glyph per cell, every row `\n`-terminated.
///
/// # Example
/// ```
/// use am_core::frame::CharGrid;
/// let mut grid = CharGrid::new(3, 2);
/// grid.set(1, 0, '#');
/// assert_eq!(grid.to_text(), " # \n   \n");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CharGrid {
    cells: Vec<char>,
    width: u32,
    height: u32,
}

impl CharGrid {
    /// Crée une grille remplie d'espaces.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            cells: vec![' '; width as usize * height as usize],
            width,
            height,
        }
    }

    /// Parse the persisted text format back into a grid.
    ///
    /// A single trailing row terminator is accepted; `\r\n` endings are tolerated.
    ///
    /// # Errors
    /// Returns [`CoreError::Config`] if rows have different glyph counts.
    ///
    /// # Example
    /// ```
    /// use am_core::frame::CharGrid;
    /// let grid = CharGrid::parse("ab\ncd\n").unwrap();
    /// assert_eq!((grid.width(), grid.height()), (2, 2));
    /// assert_eq!(grid.get(1, 1), 'd');
    /// ```
    pub fn parse(text: &str) -> Result<Self, CoreError> {
        let body = text.strip_suffix('\n').unwrap_or(text);
        if body.is_empty() {
            return Ok(Self::new(0, 0));
        }

        let mut cells = Vec::with_capacity(body.len());
        let mut width: Option<usize> = None;
        let mut height = 0u32;
        for (row, line) in body.split('\n').enumerate() {
            let line = line.strip_suffix('\r').unwrap_or(line);
            let before = cells.len();
            cells.extend(line.chars());
            let count = cells.len() - before;
            match width {
                None => width = Some(count),
                Some(w) if w != count => {
                    return Err(CoreError::config(format!(
                        "ligne {row} : {count} glyphes, {w} attendus"
                    )));
                }
                Some(_) => {}
            }
            height += 1;
        }

        Ok(Self {
            cells,
            width: width.unwrap_or(0) as u32,
            height,
        })
    }

    /// Width in glyphs.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in rows.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Set a glyph at position (x, y).
    #[inline(always)]
    pub fn set(&mut self, x: u32, y: u32, ch: char) {
        self.cells[y as usize * self.width as usize + x as usize] = ch;
    }

    /// Get the glyph at position (x, y).
    #[inline(always)]
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> char {
        self.cells[y as usize * self.width as usize + x as usize]
    }

    /// One row of glyphs.
    #[must_use]
    pub fn row(&self, y: u32) -> &[char] {
        let start = y as usize * self.width as usize;
        &self.cells[start..start + self.width as usize]
    }

    /// Rows in top-to-bottom order.
    pub fn rows(&self) -> impl Iterator<Item = &[char]> {
        // chunks_exact(0) panics; an empty-width grid has no visible rows anyway
        self.cells.chunks_exact(self.width.max(1) as usize)
    }

    /// Flat row-major cells, for index-disjoint parallel fills.
    pub fn cells_mut(&mut self) -> &mut [char] {
        &mut self.cells
    }

    /// Glyphs plus row terminators, as counted in the persisted artifact.
    #[must_use]
    pub fn char_count(&self) -> usize {
        self.cells.len() + self.height as usize
    }

    /// Serialise to the persisted format: every row followed by `\n`.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity(self.cells.len() + self.height as usize);
        for row in self.rows() {
            out.extend(row.iter());
            out.push('\n');
        }
        out
    }
}
