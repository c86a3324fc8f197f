use i2a_core::color::ColorValue;
use i2a_core::config::ConvertConfig;
use i2a_core::frame::{AsciiCell, AsciiGrid};

use crate::error::ExportError;

/// Output formats produced by the serializers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    /// Plain text, one line per row.
    Text,
    /// HTML fragment with colored spans.
    Markup,
    /// Text with 24-bit ANSI color escapes.
    Ansi,
    /// PNG image.
    Raster,
}

impl OutputFormat {
    /// Conventional file extension.
    ///
    /// # Example
    /// ```
    /// use i2a_export::OutputFormat;
    /// assert_eq!(OutputFormat::Markup.extension(), "html");
    /// ```
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Markup => "html",
            Self::Ansi => "ans",
            Self::Raster => "png",
        }
    }
}

/// Turns a finished grid into bytes. Serializers never mutate the grid, so
/// one grid can feed any number of them, and one failing does not affect the
/// others.
///
/// # Example
/// ```
/// use i2a_core::frame::AsciiGrid;
/// use i2a_export::{ExportError, GridSerializer, OutputFormat};
///
/// struct CellCount;
/// impl GridSerializer for CellCount {
///     fn serialize(&self, grid: &AsciiGrid) -> Result<Vec<u8>, ExportError> {
///         Ok(grid.cells.len().to_string().into_bytes())
///     }
///     fn format(&self) -> OutputFormat { OutputFormat::Text }
/// }
/// assert_eq!(CellCount.serialize(&AsciiGrid::new(3, 2)).unwrap(), b"6");
/// ```
pub trait GridSerializer {
    /// Serialize the whole grid.
    ///
    /// # Errors
    /// Returns an error if the format cannot be produced for this grid.
    fn serialize(&self, grid: &AsciiGrid) -> Result<Vec<u8>, ExportError>;

    /// Format produced.
    fn format(&self) -> OutputFormat;
}

/// How cell colors reach the output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorPolicy {
    /// Each cell keeps its own color.
    #[default]
    PerCell,
    /// Every glyph uses this single foreground.
    Monochrome(ColorValue),
}

impl ColorPolicy {
    /// `Monochrome(BLACK)` in black-and-white mode, `PerCell` otherwise.
    #[must_use]
    pub fn from_config(config: &ConvertConfig) -> Self {
        if config.black_and_white {
            Self::Monochrome(ColorValue::BLACK)
        } else {
            Self::PerCell
        }
    }

    /// Color used to draw `cell`.
    #[inline(always)]
    #[must_use]
    pub fn resolve(self, cell: &AsciiCell) -> ColorValue {
        match self {
            Self::PerCell => cell.color,
            Self::Monochrome(fg) => fg,
        }
    }
}

/// Split one row into maximal runs of identical resolved color.
///
/// Runs never extend past the row, so a color shared by the end of one row
/// and the start of the next yields two runs.
///
/// # Example
/// ```
/// use i2a_core::color::ColorValue;
/// use i2a_core::frame::AsciiCell;
/// use i2a_export::serializer::color_runs;
/// use i2a_export::ColorPolicy;
///
/// let red = AsciiCell { ch: 'a', color: ColorValue::new(255, 0, 0) };
/// let blue = AsciiCell { ch: 'b', color: ColorValue::new(0, 0, 255) };
/// let row = [red, red, blue, red];
/// let runs = color_runs(&row, ColorPolicy::PerCell);
/// assert_eq!(runs.len(), 3);
/// assert_eq!(runs[0].1.len(), 2);
/// ```
#[must_use]
pub fn color_runs(row: &[AsciiCell], policy: ColorPolicy) -> Vec<(ColorValue, &[AsciiCell])> {
    let mut runs = Vec::new();
    let mut start = 0;
    while start < row.len() {
        let color = policy.resolve(&row[start]);
        let len = row[start..]
            .iter()
            .take_while(|cell| policy.resolve(cell) == color)
            .count();
        runs.push((color, &row[start..start + len]));
        start += len;
    }
    runs
}
