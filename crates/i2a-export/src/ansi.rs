use i2a_core::frame::AsciiGrid;

use crate::error::ExportError;
use crate::serializer::{ColorPolicy, GridSerializer, OutputFormat, color_runs};

/// SGR reset, emitted at the end of every row.
pub const RESET: &str = "\x1b[0m";

/// Terminal output with 24-bit foreground escapes, one per color run.
///
/// # Example
/// ```
/// use i2a_core::color::ColorValue;
/// use i2a_core::frame::{AsciiCell, AsciiGrid};
/// use i2a_export::ansi::AnsiSerializer;
///
/// let mut grid = AsciiGrid::new(1, 1);
/// grid.set(0, 0, AsciiCell { ch: '@', color: ColorValue::new(255, 128, 0) });
/// assert_eq!(AnsiSerializer::default().render(&grid), "\x1b[38;2;255;128;0m@\x1b[0m\n");
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct AnsiSerializer {
    policy: ColorPolicy,
}

impl AnsiSerializer {
    /// Serializer using `policy` for glyph colors.
    #[must_use]
    pub fn new(policy: ColorPolicy) -> Self {
        Self { policy }
    }

    /// Render to a string ready for a truecolor terminal.
    #[must_use]
    pub fn render(&self, grid: &AsciiGrid) -> String {
        let mut out = String::new();
        for row in grid.rows() {
            for (color, run) in color_runs(row, self.policy) {
                out.push_str(&format!("\x1b[38;2;{};{};{}m", color.r, color.g, color.b));
                out.extend(run.iter().map(|cell| cell.ch));
            }
            out.push_str(RESET);
            out.push('\n');
        }
        out
    }
}

impl GridSerializer for AnsiSerializer {
    fn serialize(&self, grid: &AsciiGrid) -> Result<Vec<u8>, ExportError> {
        Ok(self.render(grid).into_bytes())
    }

    fn format(&self) -> OutputFormat {
        OutputFormat::Ansi
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use i2a_core::color::ColorValue;
    use i2a_core::frame::AsciiCell;

    #[test]
    fn one_escape_per_run_and_reset_per_row() {
        let mut grid = AsciiGrid::new(3, 2);
        let red = ColorValue::new(255, 0, 0);
        let green = ColorValue::new(0, 255, 0);
        for x in 0..3 {
            grid.set(x, 0, AsciiCell { ch: 'r', color: red });
        }
        grid.set(0, 1, AsciiCell { ch: 'r', color: red });
        grid.set(1, 1, AsciiCell { ch: 'g', color: green });
        grid.set(2, 1, AsciiCell { ch: 'g', color: green });
        let out = AnsiSerializer::default().render(&grid);
        assert_eq!(
            out,
            "\x1b[38;2;255;0;0mrrr\x1b[0m\n\
             \x1b[38;2;255;0;0mr\x1b[38;2;0;255;0mgg\x1b[0m\n"
        );
    }

    #[test]
    fn monochrome_drops_cell_colors() {
        let mut grid = AsciiGrid::new(2, 1);
        grid.set(0, 0, AsciiCell { ch: 'a', color: ColorValue::new(9, 9, 9) });
        grid.set(1, 0, AsciiCell { ch: 'b', color: ColorValue::new(200, 1, 1) });
        let out = AnsiSerializer::new(ColorPolicy::Monochrome(ColorValue::BLACK)).render(&grid);
        assert_eq!(out, "\x1b[38;2;0;0;0mab\x1b[0m\n");
    }
}
