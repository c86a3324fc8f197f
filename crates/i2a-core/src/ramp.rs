use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Rampe historique de 94 caractères, du plus dense au plus clair.
///
/// Version 1 of the classic table; the default ramp.
pub const CLASSIC_94_V1: &str = concat!(
    "@$%G&8W69mQgbO3p0#XdhSkUBAeRwquaNnVPyx5C{2}s4j?voMzE|iYc",
    "ZK][*l>I1</\\t+FD7)T\"(rHfLJ^~!;=,'`:-._",
);

/// 70 caractères — Paul Bourke, dense→clair.
pub const BOURKE_70: &str =
    "$@B%8&WM#*oahkbdpqwmZO0QLCJUYXzcvunxrjft/\\|()1{}[]?-_+~<>i!lI;:,\"^`'. ";

/// 10 caractères — compact, clair→dense.
pub const COMPACT_10: &str = " .:-=+*#%@";

/// Longest ramp accepted: every printable ASCII glyph except space, or 94 with it.
pub const MAX_RAMP_LEN: usize = 94;

/// Ordering of a ramp's glyphs by visual ink density.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum Density {
    /// Index 0 is the densest glyph.
    #[default]
    DenseFirst,
    /// Index 0 is the lightest glyph.
    SparseFirst,
}

/// Built-in ramp selection.
///
/// # Example
/// ```
/// use i2a_core::ramp::RampPreset;
/// assert!(matches!(RampPreset::default(), RampPreset::Classic));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum RampPreset {
    /// [`CLASSIC_94_V1`].
    #[default]
    Classic,
    /// [`BOURKE_70`].
    Bourke,
    /// [`COMPACT_10`].
    Compact,
    /// User-supplied glyphs from the configuration.
    Custom,
}

/// Ordered glyph sequence mapping luminance to characters.
///
/// Dark pixels always land on dense glyphs whatever the stored direction.
///
/// # Example
/// ```
/// use i2a_core::ramp::{Density, GlyphRamp};
/// let ramp = GlyphRamp::new(" .:#@", Density::SparseFirst).unwrap();
/// assert_eq!(ramp.glyph_for(0.0), '@');
/// assert_eq!(ramp.glyph_for(255.0), ' ');
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlyphRamp {
    glyphs: Vec<char>,
    density: Density,
}

impl GlyphRamp {
    /// Build a ramp from printable ASCII glyphs.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidRamp`] if the ramp holds fewer than 2 or more
    /// than [`MAX_RAMP_LEN`] glyphs, or any glyph outside `' '..='~'`.
    pub fn new(glyphs: &str, density: Density) -> Result<Self, CoreError> {
        let glyphs: Vec<char> = glyphs.chars().collect();
        if glyphs.len() < 2 || glyphs.len() > MAX_RAMP_LEN {
            return Err(CoreError::InvalidRamp(format!(
                "{} glyphes (attendu 2..={MAX_RAMP_LEN})",
                glyphs.len()
            )));
        }
        if let Some(bad) = glyphs.iter().find(|c| !is_printable_ascii(**c)) {
            return Err(CoreError::InvalidRamp(format!(
                "caractère non imprimable {bad:?}"
            )));
        }
        Ok(Self { glyphs, density })
    }

    /// Built-in ramp for a preset. `Custom` falls back to the classic table.
    #[must_use]
    pub fn preset(preset: RampPreset) -> Self {
        let (glyphs, density) = match preset {
            RampPreset::Classic | RampPreset::Custom => (CLASSIC_94_V1, Density::DenseFirst),
            RampPreset::Bourke => (BOURKE_70, Density::DenseFirst),
            RampPreset::Compact => (COMPACT_10, Density::SparseFirst),
        };
        Self {
            glyphs: glyphs.chars().collect(),
            density,
        }
    }

    /// Number of glyphs in the ramp.
    #[must_use]
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// Always false: construction rejects ramps shorter than 2.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// `round(luminance / 255 * (N - 1))`, clamped to `[0, N - 1]`.
    ///
    /// # Example
    /// ```
    /// use i2a_core::ramp::{GlyphRamp, RampPreset};
    /// let ramp = GlyphRamp::preset(RampPreset::Classic);
    /// assert_eq!(ramp.select_index(0.0), 0);
    /// assert_eq!(ramp.select_index(255.0), 93);
    /// ```
    #[inline(always)]
    #[must_use]
    pub fn select_index(&self, luminance: f64) -> usize {
        let max = self.glyphs.len() - 1;
        let lum = if luminance.is_nan() {
            0.0
        } else {
            luminance.clamp(0.0, 255.0)
        };
        ((lum / 255.0 * max as f64).round() as usize).min(max)
    }

    /// Glyph for a selection index, index 0 being the darkest luminance.
    #[inline(always)]
    #[must_use]
    pub fn glyph_at(&self, index: usize) -> char {
        let max = self.glyphs.len() - 1;
        let index = index.min(max);
        match self.density {
            Density::DenseFirst => self.glyphs[index],
            Density::SparseFirst => self.glyphs[max - index],
        }
    }

    /// Glyph for a luminance value in [0, 255].
    #[inline(always)]
    #[must_use]
    pub fn glyph_for(&self, luminance: f64) -> char {
        self.glyph_at(self.select_index(luminance))
    }
}

impl Default for GlyphRamp {
    fn default() -> Self {
        Self::preset(RampPreset::Classic)
    }
}

/// True for `' '..='~'`.
#[inline(always)]
#[must_use]
pub fn is_printable_ascii(c: char) -> bool {
    (' '..='~').contains(&c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_lengths() {
        assert_eq!(GlyphRamp::preset(RampPreset::Classic).len(), 94);
        assert_eq!(GlyphRamp::preset(RampPreset::Bourke).len(), 70);
        assert_eq!(GlyphRamp::preset(RampPreset::Compact).len(), 10);
    }

    #[test]
    fn presets_are_valid_ramps() {
        for (glyphs, density) in [
            (CLASSIC_94_V1, Density::DenseFirst),
            (BOURKE_70, Density::DenseFirst),
            (COMPACT_10, Density::SparseFirst),
        ] {
            assert!(GlyphRamp::new(glyphs, density).is_ok(), "{glyphs}");
        }
    }

    #[test]
    fn select_index_extremes() {
        for preset in [RampPreset::Classic, RampPreset::Bourke, RampPreset::Compact] {
            let ramp = GlyphRamp::preset(preset);
            assert_eq!(ramp.select_index(0.0), 0);
            assert_eq!(ramp.select_index(255.0), ramp.len() - 1);
            assert_eq!(ramp.select_index(-10.0), 0);
            assert_eq!(ramp.select_index(1000.0), ramp.len() - 1);
        }
    }

    #[test]
    fn select_index_monotonic() {
        let ramp = GlyphRamp::preset(RampPreset::Classic);
        let mut prev = 0;
        for lum in 0..=255u8 {
            let idx = ramp.select_index(f64::from(lum));
            assert!(idx >= prev, "non monotone à luminance {lum}");
            prev = idx;
        }
    }

    #[test]
    fn select_index_is_linear_and_rounded() {
        let ramp = GlyphRamp::new("0123456789", Density::DenseFirst).unwrap();
        // 127.5 / 255 * 9 = 4.5 → 5
        assert_eq!(ramp.select_index(127.5), 5);
        assert_eq!(ramp.select_index(28.0), 1);
        assert_eq!(ramp.select_index(14.0), 0);
    }

    #[test]
    fn direction_keeps_dark_pixels_dense() {
        let dense_first = GlyphRamp::new("@. ", Density::DenseFirst).unwrap();
        let sparse_first = GlyphRamp::new(" .@", Density::SparseFirst).unwrap();
        for lum in [0.0, 100.0, 200.0, 255.0] {
            assert_eq!(dense_first.glyph_for(lum), sparse_first.glyph_for(lum));
        }
        assert_eq!(dense_first.glyph_for(0.0), '@');
    }

    #[test]
    fn classic_table_starts_dense() {
        let ramp = GlyphRamp::default();
        assert_eq!(ramp.glyph_for(0.0), '@');
        assert_eq!(ramp.glyph_for(255.0), '_');
    }

    #[test]
    fn rejects_bad_ramps() {
        assert!(GlyphRamp::new("@", Density::DenseFirst).is_err());
        assert!(GlyphRamp::new("", Density::DenseFirst).is_err());
        assert!(GlyphRamp::new("@\t", Density::DenseFirst).is_err());
        assert!(GlyphRamp::new("█▓▒░", Density::DenseFirst).is_err());
        let too_long: String = std::iter::repeat_n('#', MAX_RAMP_LEN + 1).collect();
        assert!(GlyphRamp::new(&too_long, Density::DenseFirst).is_err());
    }
}
