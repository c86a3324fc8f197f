use crate::color::ColorValue;

/// Transformation appliquée à chaque pixel avant la sélection du glyphe.
///
/// Implémenté par : `PixelTransform` (inversion, niveaux de gris).
///
/// # Example
/// ```
/// use i2a_core::color::ColorValue;
/// use i2a_core::traits::ColorTransform;
///
/// struct Identity;
/// impl ColorTransform for Identity {
///     fn apply(&self, color: ColorValue) -> ColorValue { color }
///     fn name(&self) -> &'static str { "identity" }
/// }
/// assert_eq!(Identity.apply(ColorValue::WHITE), ColorValue::WHITE);
/// ```
pub trait ColorTransform: Send + Sync {
    /// Return the transformed color. Output channels stay within [0, 255].
    fn apply(&self, color: ColorValue) -> ColorValue;

    /// Nom lisible pour le debug.
    fn name(&self) -> &'static str;
}
