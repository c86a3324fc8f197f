use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use i2a_core::config::ConvertConfig;
use i2a_core::frame::FrameBuffer;

pub mod cli;
pub mod pipeline;

fn main() -> Result<()> {
    // 1. Parser CLI
    let cli = cli::Cli::parse();

    // 2. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    // 3. Charger la config, puis les overrides CLI
    let mut config = resolve_config(&cli.config)?;
    cli.apply_overrides(&mut config)?;

    // 4. Charger et convertir l'image
    let frame = load_source(&cli.image)?;
    let grid = i2a_ascii::convert(&frame, &config)
        .with_context(|| format!("Conversion impossible de {}", cli.image.display()))?;
    log::info!("Grille : {}×{}", grid.width, grid.height);

    // 5. Sans sortie demandée, le texte part sur stdout
    if !cli.has_outputs() {
        let text = i2a_export::text::to_text(&grid);
        std::io::stdout()
            .lock()
            .write_all(text.as_bytes())
            .context("Écriture sur stdout impossible")?;
        return Ok(());
    }

    // 6. Chaque sortie indépendamment
    let requests = pipeline::requested_outputs(&cli);
    let failures = pipeline::export_all(&grid, &config, &requests, cli.font.as_deref());
    if failures > 0 {
        anyhow::bail!("{failures} sortie(s) sur {} en échec", requests.len());
    }
    Ok(())
}

/// Load the TOML config, falling back to defaults when the file is absent.
fn resolve_config(path: &Path) -> Result<ConvertConfig> {
    if path.exists() {
        i2a_core::config::load_config(path)
    } else {
        log::warn!(
            "Config introuvable : {}. Utilisation des défauts.",
            path.display()
        );
        Ok(ConvertConfig::default())
    }
}

#[cfg(feature = "image-source")]
fn load_source(path: &Path) -> Result<FrameBuffer> {
    i2a_source::image::load_image(path)
}

#[cfg(not(feature = "image-source"))]
fn load_source(path: &Path) -> Result<FrameBuffer> {
    anyhow::bail!(
        "Impossible de charger {} : requiert --features image-source",
        path.display()
    )
}
