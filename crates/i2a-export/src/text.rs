use i2a_core::frame::AsciiGrid;

use crate::error::ExportError;
use crate::serializer::{GridSerializer, OutputFormat};

/// Plain text: each row's glyphs then `\n`, last row included. Colors are dropped.
///
/// # Example
/// ```
/// use i2a_core::frame::AsciiGrid;
/// use i2a_export::text::to_text;
/// assert_eq!(to_text(&AsciiGrid::new(3, 2)), "   \n   \n");
/// ```
#[must_use]
pub fn to_text(grid: &AsciiGrid) -> String {
    let mut out = String::with_capacity((grid.width as usize + 1) * grid.height as usize);
    for row in grid.rows() {
        out.extend(row.iter().map(|cell| cell.ch));
        out.push('\n');
    }
    out
}

/// [`GridSerializer`] for [`to_text`].
#[derive(Clone, Copy, Debug, Default)]
pub struct TextSerializer;

impl GridSerializer for TextSerializer {
    fn serialize(&self, grid: &AsciiGrid) -> Result<Vec<u8>, ExportError> {
        Ok(to_text(grid).into_bytes())
    }

    fn format(&self) -> OutputFormat {
        OutputFormat::Text
    }
}
