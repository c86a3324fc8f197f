use i2a_core::color::ColorValue;
use i2a_core::config::ConvertConfig;
use i2a_core::traits::ColorTransform;

/// A single per-pixel color transform.
///
/// # Example
/// ```
/// use i2a_ascii::transform::PixelTransform;
/// use i2a_core::color::ColorValue;
/// use i2a_core::traits::ColorTransform;
/// assert_eq!(PixelTransform::Invert.apply(ColorValue::BLACK), ColorValue::WHITE);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelTransform {
    /// Complement each channel.
    Invert,
    /// Perceptual grayscale.
    Grayscale,
}

impl ColorTransform for PixelTransform {
    #[inline(always)]
    fn apply(&self, color: ColorValue) -> ColorValue {
        match self {
            Self::Invert => color.invert(),
            Self::Grayscale => color.grayscale(),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Invert => "invert",
            Self::Grayscale => "grayscale",
        }
    }
}

/// Ordered list of transforms applied once per pixel.
///
/// Built from the configuration with inversion always ahead of grayscale.
///
/// # Example
/// ```
/// use i2a_ascii::transform::{PixelTransform, TransformChain};
/// use i2a_core::config::ConvertConfig;
/// let config = ConvertConfig { invert: true, grayscale: true, ..ConvertConfig::default() };
/// let chain = TransformChain::from_config(&config);
/// assert_eq!(chain.steps(), &[PixelTransform::Invert, PixelTransform::Grayscale]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransformChain {
    steps: Vec<PixelTransform>,
}

impl TransformChain {
    /// Chain for the flags set in `config`.
    #[must_use]
    pub fn from_config(config: &ConvertConfig) -> Self {
        let mut steps = Vec::with_capacity(2);
        if config.invert {
            steps.push(PixelTransform::Invert);
        }
        if config.grayscale {
            steps.push(PixelTransform::Grayscale);
        }
        Self { steps }
    }

    /// Transforms in application order.
    #[must_use]
    pub fn steps(&self) -> &[PixelTransform] {
        &self.steps
    }

    /// True when the chain leaves colors untouched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Run every step, in order.
    #[inline(always)]
    #[must_use]
    pub fn apply(&self, color: ColorValue) -> ColorValue {
        self.steps.iter().fold(color, |c, step| step.apply(c))
    }

    /// Step names joined with `+`, for logs.
    #[must_use]
    pub fn describe(&self) -> String {
        if self.steps.is_empty() {
            return "none".to_string();
        }
        self.steps
            .iter()
            .map(ColorTransform::name)
            .collect::<Vec<_>>()
            .join("+")
    }
}
