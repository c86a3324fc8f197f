use std::collections::HashMap;
use std::io::Cursor;

use ab_glyph::{Font, FontRef, PxScale, point};
use i2a_core::color::ColorValue;
use i2a_core::config::{ConvertConfig, PACKED_MARGIN};
use i2a_core::error::CoreError;
use i2a_core::frame::{AsciiGrid, FrameBuffer};

use crate::error::ExportError;
use crate::serializer::{ColorPolicy, GridSerializer, OutputFormat};

/// Fond neutre peint avant les glyphes.
pub const BACKGROUND: ColorValue = ColorValue {
    r: 220,
    g: 220,
    b: 210,
};

/// Coverage mask of one glyph, top-left anchored, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlyphBitmap {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Coverage per pixel, 0 = transparent, 255 = full ink.
    pub alpha: Vec<u8>,
}

/// Source of pre-rasterized glyphs.
///
/// # Example
/// ```
/// use i2a_export::rasterizer::{GlyphAtlas, GlyphBitmap};
///
/// struct Blocks(GlyphBitmap);
/// impl GlyphAtlas for Blocks {
///     fn glyph(&self, ch: char) -> Option<&GlyphBitmap> {
///         (ch != ' ').then_some(&self.0)
///     }
/// }
/// let atlas = Blocks(GlyphBitmap { width: 1, height: 1, alpha: vec![255] });
/// assert!(atlas.glyph(' ').is_none());
/// ```
pub trait GlyphAtlas {
    /// Bitmap for `ch`, or `None` when nothing should be drawn.
    fn glyph(&self, ch: char) -> Option<&GlyphBitmap>;
}

/// Atlas logiciel des caractères ASCII imprimables, rasterisés une fois via ab_glyph.
pub struct FontAtlas {
    glyphs: HashMap<char, GlyphBitmap>,
    char_width: u32,
    char_height: u32,
}

impl FontAtlas {
    /// Rasterize `' '..='~'` from a TrueType/OpenType font at `font_size` pixels.
    ///
    /// Glyphs the font lacks (`.notdef`) are skipped and render as nothing.
    ///
    /// # Errors
    /// Returns [`ExportError::Font`] if the font data cannot be parsed.
    pub fn new(font_data: &[u8], font_size: f32) -> Result<Self, ExportError> {
        let font = FontRef::try_from_slice(font_data)?;
        let scale = PxScale::from(font_size);
        let units = font.height_unscaled();

        let ascent_px = font.ascent_unscaled() * scale.y / units;
        let height = ((font.ascent_unscaled() - font.descent_unscaled()) * scale.y / units).ceil();
        let width = (font.h_advance_unscaled(font.glyph_id('M')) * scale.x / units).ceil();
        let char_width = (width as u32).max(1);
        let char_height = (height as u32).max(1);

        let mut glyphs = HashMap::new();
        for ch in ' '..='~' {
            let gid = font.glyph_id(ch);
            if gid.0 == 0 {
                continue;
            }
            let mut alpha = vec![0u8; char_width as usize * char_height as usize];
            let glyph = gid.with_scale_and_position(scale, point(0.0, ascent_px));
            if let Some(outline) = font.outline_glyph(glyph) {
                let bounds = outline.px_bounds();
                outline.draw(|x, y, v| {
                    let px = x as i32 + bounds.min.x as i32;
                    let py = y as i32 + bounds.min.y as i32;
                    if px >= 0 && py >= 0 && (px as u32) < char_width && (py as u32) < char_height
                    {
                        let idx = py as usize * char_width as usize + px as usize;
                        alpha[idx] = alpha[idx].max((v * 255.0).round().clamp(0.0, 255.0) as u8);
                    }
                });
            }
            glyphs.insert(
                ch,
                GlyphBitmap {
                    width: char_width,
                    height: char_height,
                    alpha,
                },
            );
        }

        log::debug!(
            "Atlas de police : {} glyphes, cellule {}×{} px",
            glyphs.len(),
            char_width,
            char_height
        );

        Ok(Self {
            glyphs,
            char_width,
            char_height,
        })
    }

    /// Size of one rasterized glyph box.
    #[must_use]
    pub fn glyph_size(&self) -> (u32, u32) {
        (self.char_width, self.char_height)
    }
}

impl GlyphAtlas for FontAtlas {
    fn glyph(&self, ch: char) -> Option<&GlyphBitmap> {
        self.glyphs.get(&ch)
    }
}

/// Distance in pixels between neighbouring cells.
///
/// # Example
/// ```
/// use i2a_export::rasterizer::RasterLayout;
/// let normal = RasterLayout::new(16, false).unwrap();
/// assert_eq!((normal.pitch_x, normal.pitch_y), (8, 16));
/// let packed = RasterLayout::new(16, true).unwrap();
/// assert_eq!((packed.pitch_x, packed.pitch_y), (3, 6));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RasterLayout {
    /// Horizontal pitch.
    pub pitch_x: u32,
    /// Vertical pitch.
    pub pitch_y: u32,
}

impl RasterLayout {
    /// Half the font size across, the full font size down; `pack` removes
    /// [`PACKED_MARGIN`] vertically and half of it horizontally.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidDimension`] if a pitch is not positive.
    pub fn new(font_size: u32, pack: bool) -> Result<Self, CoreError> {
        let mut pitch_x = i64::from(font_size / 2);
        let mut pitch_y = i64::from(font_size);
        if pack {
            pitch_x -= i64::from(PACKED_MARGIN / 2);
            pitch_y -= i64::from(PACKED_MARGIN);
        }
        if pitch_x < 1 || pitch_y < 1 {
            return Err(CoreError::InvalidDimension {
                width: pitch_x,
                height: pitch_y,
            });
        }
        Ok(Self {
            pitch_x: pitch_x as u32,
            pitch_y: pitch_y as u32,
        })
    }

    /// Layout for the font size and `pack` flag of `config`.
    ///
    /// # Errors
    /// See [`RasterLayout::new`].
    pub fn from_config(config: &ConvertConfig) -> Result<Self, CoreError> {
        Self::new(config.font_size, config.pack)
    }

    /// Output image size for `grid`: cols × pitch_x by rows × pitch_y.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidDimension`] for an empty grid or an image
    /// too large to address.
    pub fn image_size(&self, grid: &AsciiGrid) -> Result<(u32, u32), CoreError> {
        let width = grid.width.checked_mul(self.pitch_x);
        let height = grid.height.checked_mul(self.pitch_y);
        match (width, height) {
            (Some(w), Some(h)) if w > 0 && h > 0 => Ok((w, h)),
            _ => Err(CoreError::InvalidDimension {
                width: i64::from(grid.width) * i64::from(self.pitch_x),
                height: i64::from(grid.height) * i64::from(self.pitch_y),
            }),
        }
    }
}

/// Dessine une AsciiGrid en image, puis l'encode en PNG.
pub struct RasterSerializer<'a, A: GlyphAtlas + ?Sized> {
    atlas: &'a A,
    layout: RasterLayout,
    policy: ColorPolicy,
}

impl<'a, A: GlyphAtlas + ?Sized> RasterSerializer<'a, A> {
    /// Serializer drawing glyphs from `atlas`.
    #[must_use]
    pub fn new(atlas: &'a A, layout: RasterLayout, policy: ColorPolicy) -> Self {
        Self {
            atlas,
            layout,
            policy,
        }
    }

    /// Paint the background, then every cell in row-major order.
    ///
    /// Glyphs wider than the pitch overlap their right/lower neighbours and
    /// are clipped at the image border; later cells paint over earlier ones.
    ///
    /// # Errors
    /// See [`RasterLayout::image_size`].
    pub fn render(&self, grid: &AsciiGrid) -> Result<FrameBuffer, CoreError> {
        let (width, height) = self.layout.image_size(grid)?;
        let mut fb = FrameBuffer::filled(width, height, BACKGROUND);

        for (gy, row) in grid.rows().enumerate() {
            let oy = gy as u32 * self.layout.pitch_y;
            for (gx, cell) in row.iter().enumerate() {
                let Some(glyph) = self.atlas.glyph(cell.ch) else {
                    continue;
                };
                let ox = gx as u32 * self.layout.pitch_x;
                draw_glyph(&mut fb, glyph, ox, oy, self.policy.resolve(cell));
            }
        }
        Ok(fb)
    }
}

impl<A: GlyphAtlas + ?Sized> GridSerializer for RasterSerializer<'_, A> {
    fn serialize(&self, grid: &AsciiGrid) -> Result<Vec<u8>, ExportError> {
        let fb = self.render(grid)?;
        encode_png(&fb)
    }

    fn format(&self) -> OutputFormat {
        OutputFormat::Raster
    }
}

/// Alpha-blend `glyph` in `fg` over `fb` with its top-left corner at (ox, oy).
fn draw_glyph(fb: &mut FrameBuffer, glyph: &GlyphBitmap, ox: u32, oy: u32, fg: ColorValue) {
    let w = glyph.width.min(fb.width.saturating_sub(ox));
    let h = glyph.height.min(fb.height.saturating_sub(oy));
    for y in 0..h {
        for x in 0..w {
            let a = glyph.alpha[(y * glyph.width + x) as usize];
            if a == 0 {
                continue;
            }
            let (r, g, b, _) = fb.pixel(ox + x, oy + y);
            fb.put(ox + x, oy + y, blend(ColorValue { r, g, b }, fg, a));
        }
    }
}

#[inline(always)]
fn blend(dst: ColorValue, fg: ColorValue, alpha: u8) -> ColorValue {
    let a = u32::from(alpha);
    let mix = |d: u8, f: u8| ((u32::from(f) * a + u32::from(d) * (255 - a) + 127) / 255) as u8;
    ColorValue {
        r: mix(dst.r, fg.r),
        g: mix(dst.g, fg.g),
        b: mix(dst.b, fg.b),
    }
}

/// Encode un FrameBuffer en PNG RGB 8 bits.
///
/// # Errors
/// Returns [`ExportError::Encode`] if the encoder fails, or
/// [`ExportError::Core`] if the buffer is inconsistent.
pub fn encode_png(fb: &FrameBuffer) -> Result<Vec<u8>, ExportError> {
    fb.validate()?;
    let rgb: Vec<u8> = fb
        .data
        .chunks_exact(4)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect();
    let img = image::RgbImage::from_raw(fb.width, fb.height, rgb).ok_or(CoreError::InvalidImage {
        width: fb.width,
        height: fb.height,
        len: fb.data.len(),
    })?;
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use i2a_core::frame::AsciiCell;

    /// Every glyph but space is a solid block.
    struct BlockAtlas(GlyphBitmap);

    impl BlockAtlas {
        fn new(width: u32, height: u32) -> Self {
            Self(GlyphBitmap {
                width,
                height,
                alpha: vec![255; (width * height) as usize],
            })
        }
    }

    impl GlyphAtlas for BlockAtlas {
        fn glyph(&self, ch: char) -> Option<&GlyphBitmap> {
            (ch != ' ').then_some(&self.0)
        }
    }

    const RED: ColorValue = ColorValue { r: 255, g: 0, b: 0 };
    const BLUE: ColorValue = ColorValue { r: 0, g: 0, b: 255 };

    fn two_cells(first: char) -> AsciiGrid {
        let mut grid = AsciiGrid::new(2, 1);
        grid.set(0, 0, AsciiCell { ch: first, color: RED });
        grid.set(1, 0, AsciiCell { ch: '#', color: BLUE });
        grid
    }

    fn rgb(fb: &FrameBuffer, x: u32, y: u32) -> ColorValue {
        let (r, g, b, _) = fb.pixel(x, y);
        ColorValue { r, g, b }
    }

    #[test]
    fn layout_pitches() {
        assert_eq!(
            RasterLayout::new(16, false).unwrap(),
            RasterLayout { pitch_x: 8, pitch_y: 16 }
        );
        assert_eq!(
            RasterLayout::new(16, true).unwrap(),
            RasterLayout { pitch_x: 3, pitch_y: 6 }
        );
        assert!(matches!(
            RasterLayout::new(10, true),
            Err(CoreError::InvalidDimension { width: 0, height: 0 })
        ));
        assert!(RasterLayout::new(1, false).is_err());
    }

    #[test]
    fn image_size_follows_grid() {
        let layout = RasterLayout::new(16, false).unwrap();
        assert_eq!(layout.image_size(&AsciiGrid::new(3, 2)).unwrap(), (24, 32));
        assert!(layout.image_size(&AsciiGrid::new(0, 2)).is_err());
    }

    #[test]
    fn cells_are_filled_with_their_color() {
        let atlas = BlockAtlas::new(8, 16);
        let layout = RasterLayout::new(16, false).unwrap();
        let fb = RasterSerializer::new(&atlas, layout, ColorPolicy::PerCell)
            .render(&two_cells('#'))
            .unwrap();
        assert_eq!((fb.width, fb.height), (16, 16));
        assert_eq!(rgb(&fb, 0, 0), RED);
        assert_eq!(rgb(&fb, 7, 15), RED);
        assert_eq!(rgb(&fb, 8, 0), BLUE);
        assert_eq!(rgb(&fb, 15, 15), BLUE);
    }

    #[test]
    fn blank_cells_show_the_background() {
        let atlas = BlockAtlas::new(8, 16);
        let layout = RasterLayout::new(16, false).unwrap();
        let fb = RasterSerializer::new(&atlas, layout, ColorPolicy::PerCell)
            .render(&two_cells(' '))
            .unwrap();
        assert_eq!(rgb(&fb, 3, 3), BACKGROUND);
        assert_eq!(rgb(&fb, 9, 3), BLUE);
    }

    #[test]
    fn black_and_white_uses_one_foreground() {
        let atlas = BlockAtlas::new(8, 16);
        let layout = RasterLayout::new(16, false).unwrap();
        let policy = ColorPolicy::Monochrome(ColorValue::BLACK);
        let fb = RasterSerializer::new(&atlas, layout, policy)
            .render(&two_cells('#'))
            .unwrap();
        assert_eq!(rgb(&fb, 0, 0), ColorValue::BLACK);
        assert_eq!(rgb(&fb, 12, 4), ColorValue::BLACK);
    }

    #[test]
    fn packed_glyphs_overlap_and_clip() {
        let atlas = BlockAtlas::new(8, 16);
        let layout = RasterLayout::new(16, true).unwrap();
        let fb = RasterSerializer::new(&atlas, layout, ColorPolicy::PerCell)
            .render(&two_cells('#'))
            .unwrap();
        assert_eq!((fb.width, fb.height), (6, 6));
        assert_eq!(rgb(&fb, 2, 2), RED);
        // Second cell starts at x = 3 and paints over the first.
        assert_eq!(rgb(&fb, 3, 2), BLUE);
        assert_eq!(rgb(&fb, 5, 5), BLUE);
    }

    #[test]
    fn partial_coverage_blends_with_background() {
        let atlas = BlockAtlas(GlyphBitmap {
            width: 1,
            height: 1,
            alpha: vec![128],
        });
        let layout = RasterLayout::new(2, false).unwrap();
        let mut grid = AsciiGrid::new(1, 1);
        grid.set(0, 0, AsciiCell { ch: '#', color: ColorValue::BLACK });
        let fb = RasterSerializer::new(&atlas, layout, ColorPolicy::PerCell)
            .render(&grid)
            .unwrap();
        // 220 * 127 / 255 ≈ 110, 210 * 127 / 255 ≈ 105
        assert_eq!(rgb(&fb, 0, 0), ColorValue::new(110, 110, 105));
        assert_eq!(rgb(&fb, 0, 1), BACKGROUND);
    }

    #[test]
    fn png_roundtrips_through_the_decoder() {
        let atlas = BlockAtlas::new(8, 16);
        let layout = RasterLayout::new(16, false).unwrap();
        let serializer = RasterSerializer::new(&atlas, layout, ColorPolicy::PerCell);
        let bytes = serializer.serialize(&two_cells(' ')).unwrap();
        assert_eq!(serializer.format(), OutputFormat::Raster);
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), (16, 16));
        assert_eq!(decoded.get_pixel(0, 0).0, [220, 220, 210]);
        assert_eq!(decoded.get_pixel(8, 0).0, [0, 0, 255]);
    }

    const MONO: &[u8] = include_bytes!("../tests/fixtures/DejaVuSansMono.ttf");

    fn reddish(c: ColorValue) -> bool {
        i32::from(c.r) > i32::from(c.g) + 50
    }

    fn blueish(c: ColorValue) -> bool {
        i32::from(c.b) > i32::from(c.r) + 50
    }

    #[test]
    fn font_atlas_metrics() {
        let atlas = FontAtlas::new(MONO, 16.0).unwrap();
        assert_eq!(atlas.glyph_size(), (9, 16));
        for ch in [' ', '@', '~'] {
            let glyph = atlas.glyph(ch).unwrap();
            assert_eq!((glyph.width, glyph.height), atlas.glyph_size());
        }
        assert!(atlas.glyph(' ').unwrap().alpha.iter().all(|&a| a == 0));
        assert!(atlas.glyph('@').unwrap().alpha.iter().any(|&a| a >= 128));
        assert!(atlas.glyph('\u{e9}').is_none());
    }

    #[test]
    fn font_ink_takes_the_cell_color() {
        let atlas = FontAtlas::new(MONO, 16.0).unwrap();
        let mut grid = AsciiGrid::new(2, 1);
        grid.set(0, 0, AsciiCell { ch: '@', color: RED });
        grid.set(1, 0, AsciiCell { ch: '@', color: BLUE });
        let layout = RasterLayout::new(16, false).unwrap();
        let fb = RasterSerializer::new(&atlas, layout, ColorPolicy::PerCell)
            .render(&grid)
            .unwrap();
        assert_eq!((fb.width, fb.height), (16, 16));

        let left: Vec<ColorValue> = (0..16)
            .flat_map(|y| (0..8).map(move |x| (x, y)))
            .map(|(x, y)| rgb(&fb, x, y))
            .collect();
        assert!(left.iter().any(|&c| reddish(c)));
        assert!(!left.iter().any(|&c| blueish(c)));
        assert!(left.contains(&BACKGROUND));

        let right_has_blue = (0..16).any(|y| (9..16).any(|x| blueish(rgb(&fb, x, y))));
        assert!(right_has_blue);
    }

    #[test]
    fn font_render_sizes_and_encodes() {
        let atlas = FontAtlas::new(MONO, 16.0).unwrap();
        let mut grid = AsciiGrid::new(3, 2);
        for y in 0..2 {
            for x in 0..3 {
                grid.set(x, y, AsciiCell { ch: '@', color: RED });
            }
        }
        let normal = RasterSerializer::new(
            &atlas,
            RasterLayout::new(16, false).unwrap(),
            ColorPolicy::PerCell,
        );
        let fb = normal.render(&grid).unwrap();
        assert_eq!((fb.width, fb.height), (24, 32));
        let ink = (0..32)
            .flat_map(|y| (0..24).map(move |x| (x, y)))
            .filter(|&(x, y)| reddish(rgb(&fb, x, y)))
            .count();
        assert!(ink > 0);

        let packed = RasterSerializer::new(
            &atlas,
            RasterLayout::new(16, true).unwrap(),
            ColorPolicy::PerCell,
        );
        let bytes = packed.serialize(&grid).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), (9, 12));
    }

    #[test]
    fn invalid_font_is_reported() {
        assert!(matches!(
            FontAtlas::new(b"not a font", 16.0),
            Err(ExportError::Font(_))
        ));
    }
}
