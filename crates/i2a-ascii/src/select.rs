use i2a_core::color::ColorValue;
use i2a_core::config::{ConvertConfig, LuminanceMode};
use i2a_core::ramp::GlyphRamp;

/// Picks the glyph for a transformed pixel.
///
/// # Example
/// ```
/// use i2a_ascii::select::GlyphSelector;
/// use i2a_core::color::ColorValue;
/// use i2a_core::config::ConvertConfig;
/// use i2a_core::ramp::GlyphRamp;
///
/// let selector = GlyphSelector::new(GlyphRamp::default(), &ConvertConfig::default());
/// assert_eq!(selector.select(ColorValue::BLACK), '@');
/// assert_eq!(selector.select(ColorValue::WHITE), '_');
/// ```
#[derive(Clone, Debug)]
pub struct GlyphSelector {
    ramp: GlyphRamp,
    mode: LuminanceMode,
    /// Colors arrive already grayscale: `r` is the luminance.
    pre_grayscaled: bool,
    /// Single-character override.
    fixed: Option<char>,
}

impl GlyphSelector {
    /// Selector for `ramp` under the luminance and override options of `config`.
    #[must_use]
    pub fn new(ramp: GlyphRamp, config: &ConvertConfig) -> Self {
        Self {
            ramp,
            mode: config.luminance,
            pre_grayscaled: config.grayscale,
            fixed: config.single_char.then_some(config.single_char_glyph),
        }
    }

    /// Ramp in use.
    #[must_use]
    pub fn ramp(&self) -> &GlyphRamp {
        &self.ramp
    }

    /// Luminance in [0, 255] used for index selection.
    #[inline(always)]
    #[must_use]
    pub fn luminance(&self, color: ColorValue) -> f64 {
        match self.mode {
            LuminanceMode::Average if self.pre_grayscaled => f64::from(color.r),
            LuminanceMode::Average => color.mean(),
            LuminanceMode::Perceptual => f64::from(color.grayscale().r),
        }
    }

    /// Glyph for `color`, or the override glyph in single-character mode.
    #[inline(always)]
    #[must_use]
    pub fn select(&self, color: ColorValue) -> char {
        match self.fixed {
            Some(ch) => ch,
            None => self.ramp.glyph_for(self.luminance(color)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use i2a_core::ramp::{Density, RampPreset};

    fn selector(config: &ConvertConfig) -> GlyphSelector {
        GlyphSelector::new(config.glyph_ramp().unwrap(), config)
    }

    #[test]
    fn average_mode_uses_channel_mean() {
        let s = selector(&ConvertConfig::default());
        assert!((s.luminance(ColorValue::new(30, 60, 90)) - 60.0).abs() < 1e-12);
        assert!((s.luminance(ColorValue::new(0, 0, 1)) - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn grayscale_flag_reads_red_channel() {
        let config = ConvertConfig {
            grayscale: true,
            ..ConvertConfig::default()
        };
        let s = selector(&config);
        let gray = ColorValue::new(10, 200, 30).grayscale();
        assert!((s.luminance(gray) - f64::from(gray.r)).abs() < f64::EPSILON);
        // Same answer as the plain mean for a gray pixel.
        let plain = selector(&ConvertConfig::default());
        assert_eq!(s.select(gray), plain.select(gray));
    }

    #[test]
    fn perceptual_mode_weights_green() {
        let green = ColorValue::new(0, 255, 0);
        let average = selector(&ConvertConfig::default());
        let perceptual = selector(&ConvertConfig {
            luminance: LuminanceMode::Perceptual,
            ..ConvertConfig::default()
        });
        assert_eq!(average.ramp().select_index(average.luminance(green)), 31);
        assert_eq!(perceptual.ramp().select_index(perceptual.luminance(green)), 80);
        assert_ne!(average.select(green), perceptual.select(green));
    }

    #[test]
    fn single_char_ignores_color() {
        let config = ConvertConfig {
            single_char: true,
            single_char_glyph: '#',
            ..ConvertConfig::default()
        };
        let s = selector(&config);
        for c in [ColorValue::BLACK, ColorValue::WHITE, ColorValue::new(9, 99, 199)] {
            assert_eq!(s.select(c), '#');
        }
    }

    #[test]
    fn sparse_first_ramp_maps_black_to_dense() {
        let config = ConvertConfig {
            ramp: RampPreset::Custom,
            ramp_glyphs: " @".into(),
            ramp_density: Density::SparseFirst,
            ..ConvertConfig::default()
        };
        let s = selector(&config);
        assert_eq!(s.select(ColorValue::BLACK), '@');
        assert_eq!(s.select(ColorValue::WHITE), ' ');
    }
}
