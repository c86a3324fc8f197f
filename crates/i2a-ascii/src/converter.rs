use i2a_core::color::ColorValue;
use i2a_core::config::ConvertConfig;
use i2a_core::error::CoreError;
use i2a_core::frame::{AsciiCell, AsciiGrid, FrameBuffer};
use i2a_source::resize::Resizer;
use rayon::prelude::*;

use crate::select::GlyphSelector;
use crate::transform::TransformChain;

/// Converter orchestre la conversion pixel→ASCII : resample, transformations
/// de couleur, sélection du glyphe, assemblage de la grille.
///
/// # Example
/// ```
/// use i2a_ascii::converter::Converter;
/// use i2a_core::config::ConvertConfig;
/// use i2a_core::frame::FrameBuffer;
///
/// let mut converter = Converter::new();
/// let config = ConvertConfig { adjust_stretch: false, ..ConvertConfig::default() };
/// let grid = converter.convert(&FrameBuffer::new(8, 4), &config).unwrap();
/// assert_eq!((grid.width, grid.height), (8, 4));
/// assert!(grid.cells.iter().all(|c| c.ch == '@'));
/// ```
pub struct Converter {
    resizer: Resizer,
}

impl Converter {
    /// Create a converter with its own resampling scratch space.
    #[must_use]
    pub fn new() -> Self {
        Self {
            resizer: Resizer::new(),
        }
    }

    /// Convert one frame under one configuration.
    ///
    /// Either the whole grid is produced or nothing is.
    ///
    /// # Errors
    /// - [`CoreError::InvalidImage`] for an empty or inconsistent frame.
    /// - [`CoreError::InvalidDimension`] if the scaled size collapses to zero.
    /// - [`CoreError::Config`] / [`CoreError::InvalidRamp`] for a bad configuration.
    pub fn convert(
        &mut self,
        frame: &FrameBuffer,
        config: &ConvertConfig,
    ) -> Result<AsciiGrid, CoreError> {
        frame.validate()?;
        config.validate()?;

        let selector = GlyphSelector::new(config.glyph_ramp()?, config);
        let chain = TransformChain::from_config(config);

        let scaled = self.resizer.scale_for_grid(
            frame,
            config.scale_x,
            config.scale_y,
            config.adjust_stretch,
        )?;

        log::debug!(
            "Conversion {}×{} → {}×{} cellules (rampe {} glyphes, transformations : {})",
            frame.width,
            frame.height,
            scaled.width,
            scaled.height,
            selector.ramp().len(),
            chain.describe()
        );

        Ok(build_grid(&scaled, &chain, &selector))
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::new()
    }
}

/// One cell per pixel of an already-resampled frame.
///
/// Rows are filled in parallel; each cell only depends on its own pixel.
#[must_use]
pub fn build_grid(
    frame: &FrameBuffer,
    chain: &TransformChain,
    selector: &GlyphSelector,
) -> AsciiGrid {
    let mut grid = AsciiGrid::new(frame.width, frame.height);
    if frame.width == 0 {
        return grid;
    }

    grid.cells
        .par_chunks_mut(frame.width as usize)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, cell) in row.iter_mut().enumerate() {
                let color = chain.apply(ColorValue::from_packed(frame.packed(x as u32, y as u32)));
                *cell = AsciiCell {
                    ch: selector.select(color),
                    color,
                };
            }
        });

    grid
}

/// Convenance pour un appel unique.
///
/// # Errors
/// Same as [`Converter::convert`].
///
/// # Example
/// ```
/// use i2a_ascii::convert;
/// use i2a_core::config::ConvertConfig;
/// use i2a_core::frame::FrameBuffer;
///
/// let frame = FrameBuffer::from_packed(1, 1, &[0xFFFFFF]).unwrap();
/// let config = ConvertConfig { adjust_stretch: false, ..ConvertConfig::default() };
/// assert_eq!(convert(&frame, &config).unwrap().cells[0].ch, '_');
/// ```
pub fn convert(frame: &FrameBuffer, config: &ConvertConfig) -> Result<AsciiGrid, CoreError> {
    Converter::new().convert(frame, config)
}
