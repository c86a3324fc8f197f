use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::ramp::{Density, GlyphRamp, RampPreset, is_printable_ascii};

/// Margin removed from the raster cell pitch in packed layout, in pixels.
pub const PACKED_MARGIN: u32 = 10;

/// Configuration complète d'une conversion.
///
/// Sérialisable en TOML. Chaque champ a une valeur par défaut saine, et une
/// même valeur s'applique uniformément à tous les pixels d'un appel.
///
/// # Example
/// ```
/// use i2a_core::config::ConvertConfig;
/// let config = ConvertConfig::default();
/// assert!(config.adjust_stretch);
/// assert_eq!(config.font_size, 16);
/// ```
#[allow(clippy::struct_excessive_bools)]
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ConvertConfig {
    // === Transformations ===
    /// Complément des couleurs avant la sélection du glyphe.
    pub invert: bool,
    /// Niveaux de gris perceptuels avant la sélection du glyphe.
    pub grayscale: bool,
    /// Ignorer la couleur des cellules à la sérialisation (un seul avant-plan).
    pub black_and_white: bool,
    /// Pas de cellule resserré pour le rendu raster.
    pub pack: bool,
    /// Remplacer la rampe par un glyphe unique.
    pub single_char: bool,
    /// Glyphe utilisé quand `single_char` est actif.
    pub single_char_glyph: char,

    // === Rampe ===
    /// Rampe built-in, ou `Custom` pour `ramp_glyphs`.
    pub ramp: RampPreset,
    /// Glyphes de la rampe `Custom`.
    pub ramp_glyphs: String,
    /// Direction de la rampe `Custom`.
    pub ramp_density: Density,
    /// Source de luminance pour la sélection.
    pub luminance: LuminanceMode,

    // === Échelle ===
    /// Horizontal scale applied to the source image.
    pub scale_x: f64,
    /// Vertical scale applied to the source image.
    pub scale_y: f64,
    /// Compresser verticalement (×0.49) pour compenser la hauteur des cellules.
    pub adjust_stretch: bool,

    // === Raster ===
    /// Taille de police en pixels pour le rendu PNG.
    pub font_size: u32,
}

/// Luminance used to pick a glyph.
///
/// # Example
/// ```
/// use i2a_core::config::LuminanceMode;
/// assert!(matches!(LuminanceMode::default(), LuminanceMode::Average));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum LuminanceMode {
    /// Mean of the three channels, or `r` once grayscale has been applied.
    #[default]
    Average,
    /// Linear-light Rec. 709 luminance of the transformed color.
    Perceptual,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            invert: false,
            grayscale: false,
            black_and_white: false,
            pack: false,
            single_char: false,
            single_char_glyph: '@',
            ramp: RampPreset::Classic,
            ramp_glyphs: String::new(),
            ramp_density: Density::DenseFirst,
            luminance: LuminanceMode::Average,
            scale_x: 1.0,
            scale_y: 1.0,
            adjust_stretch: true,
            font_size: 16,
        }
    }
}

impl ConvertConfig {
    /// Clamp numeric fields to their valid ranges.
    /// Called after TOML deserialization.
    ///
    /// Scale factors are left alone: an unusable scale is reported by the
    /// resampler as an invalid dimension.
    pub fn clamp_all(&mut self) {
        self.font_size = self.font_size.clamp(4, 256);
    }

    /// Check the values that cannot be clamped.
    ///
    /// # Errors
    /// Returns [`CoreError::Config`] for a non-printable override glyph and
    /// [`CoreError::InvalidRamp`] for an unusable custom ramp.
    pub fn validate(&self) -> Result<(), CoreError> {
        if !is_printable_ascii(self.single_char_glyph) {
            return Err(CoreError::Config(format!(
                "single_char_glyph {:?} n'est pas un caractère ASCII imprimable",
                self.single_char_glyph
            )));
        }
        self.glyph_ramp().map(|_| ())
    }

    /// Resolve the configured ramp.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidRamp`] if the `Custom` glyphs are rejected.
    ///
    /// # Example
    /// ```
    /// use i2a_core::config::ConvertConfig;
    /// use i2a_core::ramp::{Density, RampPreset};
    /// let config = ConvertConfig {
    ///     ramp: RampPreset::Custom,
    ///     ramp_glyphs: " @".into(),
    ///     ramp_density: Density::SparseFirst,
    ///     ..ConvertConfig::default()
    /// };
    /// assert_eq!(config.glyph_ramp().unwrap().len(), 2);
    /// ```
    pub fn glyph_ramp(&self) -> Result<GlyphRamp, CoreError> {
        match self.ramp {
            RampPreset::Custom => GlyphRamp::new(&self.ramp_glyphs, self.ramp_density),
            preset => Ok(GlyphRamp::preset(preset)),
        }
    }
}

/// Structure TOML intermédiaire pour désérialisation avec valeurs optionnelles.
#[derive(Deserialize)]
struct ConfigFile {
    convert: Option<ConvertSection>,
    scale: Option<ScaleSection>,
    raster: Option<RasterSection>,
}

/// `[convert]` section, all fields optional for partial override.
#[derive(Deserialize)]
struct ConvertSection {
    invert: Option<bool>,
    grayscale: Option<bool>,
    black_and_white: Option<bool>,
    pack: Option<bool>,
    single_char: Option<bool>,
    single_char_glyph: Option<char>,
    ramp: Option<RampPreset>,
    ramp_glyphs: Option<String>,
    ramp_density: Option<Density>,
    luminance: Option<LuminanceMode>,
}

/// `[scale]` section.
#[derive(Deserialize)]
struct ScaleSection {
    x: Option<f64>,
    y: Option<f64>,
    adjust_stretch: Option<bool>,
}

/// `[raster]` section.
#[derive(Deserialize)]
struct RasterSection {
    font_size: Option<u32>,
}

/// Parse a TOML document and merge it over the defaults.
///
/// # Errors
/// Returns an error if the document is not valid TOML for this layout.
///
/// # Example
/// ```
/// use i2a_core::config::parse_config;
/// let config = parse_config("[convert]\ninvert = true\n").unwrap();
/// assert!(config.invert);
/// assert!(!config.grayscale);
/// ```
pub fn parse_config(content: &str) -> Result<ConvertConfig> {
    let file: ConfigFile = toml::from_str(content).context("Erreur de parsing TOML")?;

    let mut config = ConvertConfig::default();

    if let Some(c) = file.convert {
        if let Some(v) = c.invert {
            config.invert = v;
        }
        if let Some(v) = c.grayscale {
            config.grayscale = v;
        }
        if let Some(v) = c.black_and_white {
            config.black_and_white = v;
        }
        if let Some(v) = c.pack {
            config.pack = v;
        }
        if let Some(v) = c.single_char {
            config.single_char = v;
        }
        if let Some(v) = c.single_char_glyph {
            config.single_char_glyph = v;
        }
        if let Some(v) = c.ramp {
            config.ramp = v;
        }
        if let Some(v) = c.ramp_glyphs {
            config.ramp_glyphs = v;
        }
        if let Some(v) = c.ramp_density {
            config.ramp_density = v;
        }
        if let Some(v) = c.luminance {
            config.luminance = v;
        }
    }

    if let Some(s) = file.scale {
        if let Some(v) = s.x {
            config.scale_x = v;
        }
        if let Some(v) = s.y {
            config.scale_y = v;
        }
        if let Some(v) = s.adjust_stretch {
            config.adjust_stretch = v;
        }
    }

    if let Some(r) = file.raster {
        if let Some(v) = r.font_size {
            config.font_size = v;
        }
    }

    config.clamp_all();
    config.validate()?;
    Ok(config)
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns an error if the file cannot be read, parsed or validated.
///
/// # Example
/// ```no_run
/// use i2a_core::config::load_config;
/// use std::path::Path;
/// let config = load_config(Path::new("config/default.toml")).unwrap();
/// ```
pub fn load_config(path: &Path) -> Result<ConvertConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;
    let config = parse_config(&content)
        .with_context(|| format!("Configuration invalide dans {}", path.display()))?;
    log::info!("Configuration chargée depuis {}", path.display());
    Ok(config)
}
