use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use i2a_core::config::{ConvertConfig, LuminanceMode};
use i2a_core::ramp::RampPreset;

/// img2ascii — Convertit une image en art ASCII (texte, HTML, ANSI, PNG).
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Image source (PNG, JPEG, BMP, GIF).
    #[arg(long)]
    pub image: PathBuf,

    /// Fichier de configuration TOML. Défaut : config/default.toml.
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Facteur d'échelle appliqué aux deux axes.
    #[arg(long)]
    pub scale: Option<f64>,

    /// Horizontal scale (overrides --scale).
    #[arg(long)]
    pub scale_x: Option<f64>,

    /// Vertical scale (overrides --scale).
    #[arg(long)]
    pub scale_y: Option<f64>,

    /// Ne pas compresser verticalement pour compenser la hauteur des cellules.
    #[arg(long, default_value_t = false)]
    pub no_stretch: bool,

    /// Inverser les couleurs.
    #[arg(long, default_value_t = false)]
    pub invert: bool,

    /// Niveaux de gris.
    #[arg(long, default_value_t = false)]
    pub grayscale: bool,

    /// Single black foreground in HTML, ANSI and PNG outputs.
    #[arg(long, default_value_t = false)]
    pub bw: bool,

    /// Pas de cellule resserré pour le PNG.
    #[arg(long, default_value_t = false)]
    pub pack: bool,

    /// Un seul glyphe pour toutes les cellules (défaut : celui de la config).
    #[arg(long, num_args = 0..=1, value_name = "CHAR")]
    pub single_char: Option<Option<char>>,

    /// Rampe built-in.
    #[arg(long, value_enum)]
    pub ramp: Option<RampArg>,

    /// Custom ramp glyphs, ordered per the configured `ramp_density`.
    #[arg(long, conflicts_with = "ramp")]
    pub ramp_glyphs: Option<String>,

    /// Source de luminance pour la sélection du glyphe.
    #[arg(long, value_enum)]
    pub luminance: Option<LuminanceArg>,

    /// Écrire le texte brut dans ce fichier.
    #[arg(long, value_name = "PATH")]
    pub text: Option<PathBuf>,

    /// Écrire le HTML coloré dans ce fichier.
    #[arg(long, value_name = "PATH")]
    pub html: Option<PathBuf>,

    /// Write ANSI truecolor text to this file.
    #[arg(long, value_name = "PATH")]
    pub ansi: Option<PathBuf>,

    /// Écrire le rendu PNG dans ce fichier. Requiert --font.
    #[arg(long, value_name = "PATH")]
    pub png: Option<PathBuf>,

    /// Police TrueType/OpenType pour le rendu PNG.
    #[arg(long, value_name = "PATH")]
    pub font: Option<PathBuf>,

    /// Taille de police en pixels pour le rendu PNG.
    #[arg(long)]
    pub font_size: Option<u32>,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

/// Built-in ramps selectable from the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum RampArg {
    Classic,
    Bourke,
    Compact,
}

impl From<RampArg> for RampPreset {
    fn from(arg: RampArg) -> Self {
        match arg {
            RampArg::Classic => Self::Classic,
            RampArg::Bourke => Self::Bourke,
            RampArg::Compact => Self::Compact,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LuminanceArg {
    Average,
    Perceptual,
}

impl From<LuminanceArg> for LuminanceMode {
    fn from(arg: LuminanceArg) -> Self {
        match arg {
            LuminanceArg::Average => Self::Average,
            LuminanceArg::Perceptual => Self::Perceptual,
        }
    }
}

impl Cli {
    /// Apply command-line overrides on top of the loaded configuration.
    ///
    /// Flags only ever switch options on; `--scale-x`/`--scale-y` win over
    /// `--scale`.
    ///
    /// # Errors
    /// Returns an error if the resulting configuration is invalid.
    pub fn apply_overrides(&self, config: &mut ConvertConfig) -> anyhow::Result<()> {
        if let Some(s) = self.scale {
            config.scale_x = s;
            config.scale_y = s;
        }
        if let Some(x) = self.scale_x {
            config.scale_x = x;
        }
        if let Some(y) = self.scale_y {
            config.scale_y = y;
        }
        if self.no_stretch {
            config.adjust_stretch = false;
        }
        config.invert |= self.invert;
        config.grayscale |= self.grayscale;
        config.black_and_white |= self.bw;
        config.pack |= self.pack;
        if let Some(glyph) = self.single_char {
            config.single_char = true;
            if let Some(c) = glyph {
                config.single_char_glyph = c;
            }
        }
        if let Some(ramp) = self.ramp {
            config.ramp = ramp.into();
        }
        if let Some(ref glyphs) = self.ramp_glyphs {
            config.ramp = RampPreset::Custom;
            config.ramp_glyphs.clone_from(glyphs);
        }
        if let Some(mode) = self.luminance {
            config.luminance = mode.into();
        }
        if let Some(size) = self.font_size {
            config.font_size = size;
        }

        config.clamp_all();
        config.validate()?;
        Ok(())
    }

    /// True when at least one output file was requested.
    #[must_use]
    pub fn has_outputs(&self) -> bool {
        self.text.is_some() || self.html.is_some() || self.ansi.is_some() || self.png.is_some()
    }
}
