use serde::{Deserialize, Serialize};

/// Rec. 709 luminance weights applied in linear light.
const LUMA_R: f64 = 0.2126;
const LUMA_G: f64 = 0.7152;
const LUMA_B: f64 = 0.0722;

/// Couleur RGB 8 bits. Les canaux restent toujours dans [0, 255].
///
/// # Example
/// ```
/// use i2a_core::color::ColorValue;
/// let c = ColorValue::new(300, -4, 128);
/// assert_eq!((c.r, c.g, c.b), (255, 0, 128));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct ColorValue {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl ColorValue {
    /// Pure black.
    pub const BLACK: Self = Self { r: 0, g: 0, b: 0 };
    /// Pure white.
    pub const WHITE: Self = Self {
        r: 255,
        g: 255,
        b: 255,
    };

    /// Build a color from three integers, clamping each one to [0, 255].
    #[must_use]
    pub fn new(r: i32, g: i32, b: i32) -> Self {
        Self {
            r: r.clamp(0, 255) as u8,
            g: g.clamp(0, 255) as u8,
            b: b.clamp(0, 255) as u8,
        }
    }

    /// Build a color from a packed `0x??RRGGBB` value. The top byte is ignored.
    ///
    /// # Example
    /// ```
    /// use i2a_core::color::ColorValue;
    /// let c = ColorValue::from_packed(0x12_34_56_78);
    /// assert_eq!((c.r, c.g, c.b), (0x34, 0x56, 0x78));
    /// ```
    #[inline(always)]
    #[must_use]
    pub fn from_packed(packed: u32) -> Self {
        Self {
            r: ((packed >> 16) & 0xFF) as u8,
            g: ((packed >> 8) & 0xFF) as u8,
            b: (packed & 0xFF) as u8,
        }
    }

    /// Pack as `0xFFRRGGBB` (opaque alpha in the top byte).
    ///
    /// # Example
    /// ```
    /// use i2a_core::color::ColorValue;
    /// assert_eq!(ColorValue::new(1, 2, 3).to_packed(), 0xFF01_0203);
    /// ```
    #[inline(always)]
    #[must_use]
    pub fn to_packed(self) -> u32 {
        0xFF00_0000 | (u32::from(self.r) << 16) | (u32::from(self.g) << 8) | u32::from(self.b)
    }

    /// Complement the packed RGB bits: each channel becomes `255 - value`.
    ///
    /// # Example
    /// ```
    /// use i2a_core::color::ColorValue;
    /// assert_eq!(ColorValue::new(0, 100, 255).invert(), ColorValue::new(255, 155, 0));
    /// ```
    #[must_use]
    pub fn invert(self) -> Self {
        Self::from_packed(self.to_packed() ^ 0x00FF_FFFF)
    }

    /// Perceptual grayscale: linearize each channel, combine with Rec. 709
    /// weights, re-encode to sRGB and round. Sets r = g = b.
    ///
    /// # Example
    /// ```
    /// use i2a_core::color::ColorValue;
    /// let g = ColorValue::new(255, 0, 0).grayscale();
    /// assert_eq!(g, ColorValue::new(127, 127, 127));
    /// ```
    #[must_use]
    pub fn grayscale(self) -> Self {
        let r = srgb_to_linear(f64::from(self.r) / 255.0);
        let g = srgb_to_linear(f64::from(self.g) / 255.0);
        let b = srgb_to_linear(f64::from(self.b) / 255.0);
        let y = LUMA_R * r + LUMA_G * g + LUMA_B * b;
        let gray = (linear_to_srgb(y) * 255.0).round().clamp(0.0, 255.0) as u8;
        Self {
            r: gray,
            g: gray,
            b: gray,
        }
    }

    /// Arithmetic mean of the three channels.
    #[inline(always)]
    #[must_use]
    pub fn mean(self) -> f64 {
        (f64::from(self.r) + f64::from(self.g) + f64::from(self.b)) / 3.0
    }
}

/// sRGB-encoded channel in [0, 1] → linear light.
#[must_use]
pub fn srgb_to_linear(c: f64) -> f64 {
    if c < 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Linear light in [0, 1] → sRGB-encoded channel.
#[must_use]
pub fn linear_to_srgb(y: f64) -> f64 {
    if y <= 0.003_130_8 {
        12.92 * y
    } else {
        1.055 * y.powf(1.0 / 2.4) - 0.055
    }
}
