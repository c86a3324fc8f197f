use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use i2a_core::config::ConvertConfig;
use i2a_core::frame::AsciiGrid;
use i2a_export::ansi::AnsiSerializer;
use i2a_export::markup::MarkupSerializer;
use i2a_export::rasterizer::{FontAtlas, RasterLayout, RasterSerializer};
use i2a_export::sink::write_output;
use i2a_export::text::TextSerializer;
use i2a_export::{ColorPolicy, GridSerializer, OutputFormat};

use crate::cli::Cli;

/// One file to produce from the converted grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputRequest {
    pub format: OutputFormat,
    pub target: PathBuf,
}

/// Outputs requested on the command line, in a fixed order.
#[must_use]
pub fn requested_outputs(cli: &Cli) -> Vec<OutputRequest> {
    [
        (OutputFormat::Text, &cli.text),
        (OutputFormat::Markup, &cli.html),
        (OutputFormat::Ansi, &cli.ansi),
        (OutputFormat::Raster, &cli.png),
    ]
    .into_iter()
    .filter_map(|(format, target)| {
        target.as_ref().map(|t| OutputRequest {
            format,
            target: t.clone(),
        })
    })
    .collect()
}

/// Serialize `grid` in `format`. PNG rendering needs `font`.
///
/// # Errors
/// Returns an error if the font is missing or unreadable, or if the
/// serializer fails.
pub fn serialize(
    format: OutputFormat,
    grid: &AsciiGrid,
    config: &ConvertConfig,
    font: Option<&Path>,
) -> Result<Vec<u8>> {
    let policy = ColorPolicy::from_config(config);
    let bytes = match format {
        OutputFormat::Text => TextSerializer.serialize(grid)?,
        OutputFormat::Markup => MarkupSerializer::new(policy).serialize(grid)?,
        OutputFormat::Ansi => AnsiSerializer::new(policy).serialize(grid)?,
        OutputFormat::Raster => {
            let font = font.context("Le rendu PNG requiert --font")?;
            let data = std::fs::read(font)
                .with_context(|| format!("Impossible de lire la police {}", font.display()))?;
            let atlas = FontAtlas::new(&data, config.font_size as f32)?;
            let layout = RasterLayout::from_config(config)?;
            RasterSerializer::new(&atlas, layout, policy).serialize(grid)?
        }
    };
    Ok(bytes)
}

/// Produce every requested output independently.
///
/// A failing output is logged with its target and does not stop the others.
/// Returns the number of failures.
pub fn export_all(
    grid: &AsciiGrid,
    config: &ConvertConfig,
    requests: &[OutputRequest],
    font: Option<&Path>,
) -> usize {
    let mut failures = 0;
    for req in requests {
        let result = serialize(req.format, grid, config, font)
            .and_then(|bytes| write_output(&req.target, &bytes).map_err(anyhow::Error::from));
        if let Err(e) = result {
            log::error!("Échec de l'export {} : {e:#}", req.target.display());
            failures += 1;
        }
    }
    failures
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use i2a_core::color::ColorValue;
    use i2a_core::frame::AsciiCell;

    fn grid() -> AsciiGrid {
        let mut grid = AsciiGrid::new(2, 1);
        grid.set(
            0,
            0,
            AsciiCell {
                ch: '@',
                color: ColorValue::new(255, 0, 0),
            },
        );
        grid.set(
            1,
            0,
            AsciiCell {
                ch: '<',
                color: ColorValue::new(0, 0, 255),
            },
        );
        grid
    }

    fn request(format: OutputFormat, dir: &Path, name: &str) -> OutputRequest {
        OutputRequest {
            format,
            target: dir.join(name),
        }
    }

    #[test]
    fn requests_follow_cli_flags() {
        let cli = Cli::try_parse_from([
            "img2ascii", "--image", "a.png", "--png", "o.png", "--text", "o.txt",
        ])
        .unwrap();
        let outputs = requested_outputs(&cli);
        assert_eq!(outputs.len(), 2);
        assert_eq!(outputs[0].format, OutputFormat::Text);
        assert_eq!(outputs[1].target, PathBuf::from("o.png"));
    }

    #[test]
    fn text_markup_and_ansi_are_written() {
        let dir = tempfile::tempdir().unwrap();
        let requests = [
            request(OutputFormat::Text, dir.path(), "a.txt"),
            request(OutputFormat::Markup, dir.path(), "a.html"),
            request(OutputFormat::Ansi, dir.path(), "a.ans"),
        ];
        let failures = export_all(&grid(), &ConvertConfig::default(), &requests, None);
        assert_eq!(failures, 0);
        assert_eq!(std::fs::read_to_string(dir.path().join("a.txt")).unwrap(), "@<\n");
        let html = std::fs::read_to_string(dir.path().join("a.html")).unwrap();
        assert!(html.contains("&lt;"));
        assert!(html.contains("rgb(255, 0, 0)"));
        let ansi = std::fs::read_to_string(dir.path().join("a.ans")).unwrap();
        assert!(ansi.contains("\x1b[38;2;0;0;255m"));
    }

    #[test]
    fn one_failure_does_not_stop_the_others() {
        let dir = tempfile::tempdir().unwrap();
        let requests = [
            request(OutputFormat::Raster, dir.path(), "a.png"),
            request(OutputFormat::Markup, &dir.path().join("missing"), "a.html"),
            request(OutputFormat::Text, dir.path(), "a.txt"),
        ];
        let failures = export_all(&grid(), &ConvertConfig::default(), &requests, None);
        assert_eq!(failures, 2);
        assert!(!dir.path().join("a.png").exists());
        assert!(dir.path().join("a.txt").exists());
    }

    #[test]
    fn unreadable_font_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let font = dir.path().join("broken.ttf");
        std::fs::write(&font, b"nope").unwrap();
        let config = ConvertConfig::default();
        assert!(serialize(OutputFormat::Raster, &grid(), &config, Some(font.as_path())).is_err());
        assert!(serialize(OutputFormat::Raster, &grid(), &config, None).is_err());
    }
}
