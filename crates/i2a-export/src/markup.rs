use i2a_core::frame::AsciiGrid;

use crate::error::ExportError;
use crate::serializer::{ColorPolicy, GridSerializer, OutputFormat, color_runs};

/// Style header emitted once at the top of the fragment.
pub const MARKUP_HEADER: &str =
    "<style>span { font-size: 6px; font-family: monospace; white-space: pre; }</style>\n";

/// Row separator.
pub const ROW_BREAK: &str = "<br>\n";

/// HTML fragment: one `<span>` per run of identical color within a row.
///
/// # Example
/// ```
/// use i2a_core::color::ColorValue;
/// use i2a_core::frame::{AsciiCell, AsciiGrid};
/// use i2a_export::markup::{MarkupSerializer, MARKUP_HEADER};
/// use i2a_export::ColorPolicy;
///
/// let mut grid = AsciiGrid::new(2, 1);
/// let cell = AsciiCell { ch: '#', color: ColorValue::new(1, 2, 3) };
/// grid.set(0, 0, cell);
/// grid.set(1, 0, cell);
/// let html = MarkupSerializer::new(ColorPolicy::PerCell).render(&grid);
/// assert_eq!(
///     html,
///     format!("{MARKUP_HEADER}<span style=\"color: rgb(1, 2, 3);\">##</span><br>\n")
/// );
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct MarkupSerializer {
    policy: ColorPolicy,
}

impl MarkupSerializer {
    /// Serializer using `policy` for span colors.
    #[must_use]
    pub fn new(policy: ColorPolicy) -> Self {
        Self { policy }
    }

    /// Render the fragment as a string.
    #[must_use]
    pub fn render(&self, grid: &AsciiGrid) -> String {
        let mut out = String::from(MARKUP_HEADER);
        for row in grid.rows() {
            for (color, run) in color_runs(row, self.policy) {
                out.push_str(&format!(
                    "<span style=\"color: rgb({}, {}, {});\">",
                    color.r, color.g, color.b
                ));
                for cell in run {
                    push_escaped(&mut out, cell.ch);
                }
                out.push_str("</span>");
            }
            out.push_str(ROW_BREAK);
        }
        out
    }
}

impl GridSerializer for MarkupSerializer {
    fn serialize(&self, grid: &AsciiGrid) -> Result<Vec<u8>, ExportError> {
        Ok(self.render(grid).into_bytes())
    }

    fn format(&self) -> OutputFormat {
        OutputFormat::Markup
    }
}

fn push_escaped(out: &mut String, ch: char) {
    match ch {
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        '&' => out.push_str("&amp;"),
        '"' => out.push_str("&quot;"),
        '\'' => out.push_str("&#39;"),
        c => out.push(c),
    }
}
