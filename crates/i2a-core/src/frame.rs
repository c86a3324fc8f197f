use crate::color::ColorValue;
use crate::error::CoreError;

/// Buffer de pixels décodés, RGBA row-major, 4 bytes par pixel.
///
/// # Example
/// ```
/// use i2a_core::frame::FrameBuffer;
/// let fb = FrameBuffer::new(10, 10);
/// assert_eq!(fb.data.len(), 400);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    /// Pixels RGBA, row-major, 4 bytes par pixel.
    pub data: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl FrameBuffer {
    /// Crée un buffer noir opaque aux dimensions données.
    ///
    /// # Example
    /// ```
    /// use i2a_core::frame::FrameBuffer;
    /// let fb = FrameBuffer::new(100, 50);
    /// assert_eq!(fb.data.len(), 100 * 50 * 4);
    /// assert_eq!(fb.pixel(0, 0), (0, 0, 0, 255));
    /// ```
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, ColorValue::BLACK)
    }

    /// Buffer uniformly filled with one opaque color.
    #[must_use]
    pub fn filled(width: u32, height: u32, color: ColorValue) -> Self {
        let px = [color.r, color.g, color.b, 255];
        let len = width as usize * height as usize;
        let mut data = Vec::with_capacity(len * 4);
        for _ in 0..len {
            data.extend_from_slice(&px);
        }
        Self {
            data,
            width,
            height,
        }
    }

    /// Build a buffer from packed `0x??RRGGBB` pixels, row-major.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidImage`] if the area is zero or `pixels`
    /// does not hold exactly `width * height` values.
    ///
    /// # Example
    /// ```
    /// use i2a_core::frame::FrameBuffer;
    /// let fb = FrameBuffer::from_packed(2, 1, &[0xFF0000, 0x0000FF]).unwrap();
    /// assert_eq!(fb.pixel(1, 0), (0, 0, 255, 255));
    /// ```
    pub fn from_packed(width: u32, height: u32, pixels: &[u32]) -> Result<Self, CoreError> {
        if width == 0 || height == 0 || pixels.len() != width as usize * height as usize {
            return Err(CoreError::InvalidImage {
                width,
                height,
                len: pixels.len() * 4,
            });
        }
        let mut data = Vec::with_capacity(pixels.len() * 4);
        for &p in pixels {
            let c = ColorValue::from_packed(p);
            data.extend_from_slice(&[c.r, c.g, c.b, 255]);
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Check that the buffer is non-empty and consistent with its dimensions.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidImage`] otherwise.
    pub fn validate(&self) -> Result<(), CoreError> {
        let expected = self.width as usize * self.height as usize * 4;
        if self.width == 0 || self.height == 0 || self.data.len() != expected {
            return Err(CoreError::InvalidImage {
                width: self.width,
                height: self.height,
                len: self.data.len(),
            });
        }
        Ok(())
    }

    /// Accès au pixel (x, y) → (r, g, b, a).
    #[inline(always)]
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> (u8, u8, u8, u8) {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        if idx + 3 >= self.data.len() {
            return (0, 0, 0, 0);
        }
        (
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        )
    }

    /// Pixel (x, y) packed as `0xFFRRGGBB`.
    #[inline(always)]
    #[must_use]
    pub fn packed(&self, x: u32, y: u32) -> u32 {
        let (r, g, b, _) = self.pixel(x, y);
        ColorValue { r, g, b }.to_packed()
    }

    /// Overwrite pixel (x, y) with an opaque color. Out-of-bounds writes are ignored.
    #[inline(always)]
    pub fn put(&mut self, x: u32, y: u32, color: ColorValue) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        self.data[idx..idx + 4].copy_from_slice(&[color.r, color.g, color.b, 255]);
    }
}

/// Single cell in the ASCII grid.
///
/// # Example
/// ```
/// use i2a_core::frame::AsciiCell;
/// let cell = AsciiCell::default();
/// assert_eq!(cell.ch, ' ');
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AsciiCell {
    /// Caractère à afficher.
    pub ch: char,
    /// Couleur du pixel échantillonné, après transformations.
    pub color: ColorValue,
}

impl Default for AsciiCell {
    fn default() -> Self {
        Self {
            ch: ' ',
            color: ColorValue::BLACK,
        }
    }
}

/// Grille de sortie ASCII : caractères et couleurs, row-major.
///
/// Every row has exactly `width` cells.
///
/// # Example
/// ```
/// use i2a_core::color::ColorValue;
/// use i2a_core::frame::{AsciiCell, AsciiGrid};
/// let mut grid = AsciiGrid::new(80, 24);
/// grid.set(0, 0, AsciiCell { ch: '@', color: ColorValue::new(255, 0, 0) });
/// assert_eq!(grid.get(0, 0).map(|c| c.ch), Some('@'));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AsciiGrid {
    /// Flat array of cells, row-major.
    pub cells: Vec<AsciiCell>,
    /// Width in characters.
    pub width: u32,
    /// Height in characters.
    pub height: u32,
}

impl AsciiGrid {
    /// Crée une grille remplie de cellules par défaut.
    ///
    /// # Example
    /// ```
    /// use i2a_core::frame::AsciiGrid;
    /// let grid = AsciiGrid::new(80, 24);
    /// assert_eq!(grid.cells.len(), 80 * 24);
    /// ```
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            cells: vec![AsciiCell::default(); width as usize * height as usize],
            width,
            height,
        }
    }

    /// Set a cell at position (x, y). Out-of-range writes are ignored.
    #[inline(always)]
    pub fn set(&mut self, x: u32, y: u32, cell: AsciiCell) {
        if x < self.width && y < self.height {
            self.cells[y as usize * self.width as usize + x as usize] = cell;
        }
    }

    /// Cell at (x, y), if inside the grid.
    #[inline(always)]
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> Option<&AsciiCell> {
        if x < self.width && y < self.height {
            self.cells.get(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    /// Checked access reporting the grid bounds.
    ///
    /// # Errors
    /// Returns [`CoreError::IndexOutOfRange`] outside the grid.
    pub fn cell(&self, x: u32, y: u32) -> Result<&AsciiCell, CoreError> {
        self.get(x, y).ok_or(CoreError::IndexOutOfRange {
            x,
            y,
            width: self.width,
            height: self.height,
        })
    }

    /// Row `y` as a slice, empty if `y` is out of range.
    #[must_use]
    pub fn row(&self, y: u32) -> &[AsciiCell] {
        if y >= self.height {
            return &[];
        }
        let start = y as usize * self.width as usize;
        &self.cells[start..start + self.width as usize]
    }

    /// Rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[AsciiCell]> {
        // chunks() panics on 0; an empty grid simply has no rows.
        self.cells.chunks(self.width.max(1) as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_packed_rejects_bad_shapes() {
        assert!(matches!(
            FrameBuffer::from_packed(0, 3, &[]),
            Err(CoreError::InvalidImage { .. })
        ));
        assert!(matches!(
            FrameBuffer::from_packed(2, 2, &[0; 3]),
            Err(CoreError::InvalidImage { .. })
        ));
    }

    #[test]
    fn packed_pixels_roundtrip() {
        let fb = FrameBuffer::from_packed(2, 1, &[0x0012_3456, 0xAABB_CCDD]).unwrap();
        assert_eq!(fb.packed(0, 0), 0xFF12_3456);
        assert_eq!(fb.packed(1, 0), 0xFFBB_CCDD);
    }

    #[test]
    fn validate_catches_truncated_data() {
        let mut fb = FrameBuffer::new(3, 3);
        assert!(fb.validate().is_ok());
        fb.data.pop();
        assert!(fb.validate().is_err());
        assert!(FrameBuffer::new(0, 5).validate().is_err());
    }

    #[test]
    fn put_ignores_out_of_bounds() {
        let mut fb = FrameBuffer::new(2, 2);
        fb.put(5, 0, ColorValue::WHITE);
        fb.put(1, 1, ColorValue::WHITE);
        assert_eq!(fb.pixel(1, 1), (255, 255, 255, 255));
        assert_eq!(fb.pixel(0, 0), (0, 0, 0, 255));
    }

    #[test]
    fn grid_rows_are_uniform() {
        let grid = AsciiGrid::new(7, 3);
        assert_eq!(grid.rows().count(), 3);
        assert!(grid.rows().all(|r| r.len() == 7));
        assert_eq!(grid.row(2).len(), 7);
        assert!(grid.row(3).is_empty());
    }

    #[test]
    fn checked_access_reports_bounds() {
        let grid = AsciiGrid::new(4, 2);
        assert!(grid.cell(3, 1).is_ok());
        assert_eq!(
            grid.cell(4, 0),
            Err(CoreError::IndexOutOfRange {
                x: 4,
                y: 0,
                width: 4,
                height: 2
            })
        );
    }
}
