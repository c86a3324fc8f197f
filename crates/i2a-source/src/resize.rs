use fast_image_resize::images::Image;
use fast_image_resize::{PixelType, ResizeAlg, ResizeOptions, Resizer as FirResizer};
use i2a_core::error::CoreError;
use i2a_core::frame::FrameBuffer;

/// Vertical compression applied after the main scale.
///
/// A text line is a little less than twice as tall as a glyph is wide, so
/// halving the rows (0.49) keeps the printed picture in proportion.
pub const STRETCH_FACTOR: f64 = 0.49;

/// Resizer réutilisable wrappant fast_image_resize en mode nearest-neighbour.
///
/// # Example
/// ```
/// use i2a_source::resize::Resizer;
/// let r = Resizer::new();
/// ```
pub struct Resizer {
    inner: FirResizer,
    options: ResizeOptions,
    /// Scratch copy of the source (fast_image_resize wants `&mut` on it).
    src_buf: Vec<u8>,
}

impl Resizer {
    /// Create a new nearest-neighbour resizer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: FirResizer::new(),
            options: ResizeOptions::new().resize_alg(ResizeAlg::Nearest),
            src_buf: Vec::new(),
        }
    }

    /// Resize `src` into `dst`. Dimensions of `dst` determine output size.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidImage`] if a buffer does not match its
    /// dimensions, or [`CoreError::Resample`] if the resampler rejects it.
    ///
    /// # Example
    /// ```
    /// use i2a_source::resize::Resizer;
    /// use i2a_core::frame::FrameBuffer;
    /// let mut r = Resizer::new();
    /// let src = FrameBuffer::new(100, 100);
    /// let mut dst = FrameBuffer::new(50, 50);
    /// r.resize_into(&src, &mut dst).unwrap();
    /// ```
    pub fn resize_into(
        &mut self,
        src: &FrameBuffer,
        dst: &mut FrameBuffer,
    ) -> Result<(), CoreError> {
        src.validate()?;
        dst.validate()?;
        if src.width == dst.width && src.height == dst.height {
            dst.data.copy_from_slice(&src.data);
            return Ok(());
        }

        self.src_buf.clear();
        self.src_buf.extend_from_slice(&src.data);

        let src_image =
            Image::from_slice_u8(src.width, src.height, &mut self.src_buf, PixelType::U8x4)
                .map_err(|e| CoreError::Resample(format!("source : {e}")))?;

        let mut dst_image =
            Image::from_slice_u8(dst.width, dst.height, &mut dst.data, PixelType::U8x4)
                .map_err(|e| CoreError::Resample(format!("destination : {e}")))?;

        self.inner
            .resize(&src_image, &mut dst_image, Some(&self.options))
            .map_err(|e| CoreError::Resample(e.to_string()))?;

        Ok(())
    }

    /// Scale `src` by independent factors.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidDimension`] if a target side rounds below 1,
    /// or [`CoreError::InvalidImage`] for an inconsistent source.
    ///
    /// # Example
    /// ```
    /// use i2a_source::resize::Resizer;
    /// use i2a_core::frame::FrameBuffer;
    /// let mut r = Resizer::new();
    /// let out = r.scale(&FrameBuffer::new(10, 4), 0.25, 1.0).unwrap();
    /// assert_eq!((out.width, out.height), (3, 4));
    /// ```
    pub fn scale(
        &mut self,
        src: &FrameBuffer,
        scale_x: f64,
        scale_y: f64,
    ) -> Result<FrameBuffer, CoreError> {
        src.validate()?;
        let (width, height) = target_dimensions(src.width, src.height, scale_x, scale_y)?;
        let mut dst = FrameBuffer::new(width, height);
        self.resize_into(src, &mut dst)?;
        Ok(dst)
    }

    /// Main scale, then the optional [`STRETCH_FACTOR`] vertical pass.
    ///
    /// # Errors
    /// Same as [`Resizer::scale`], for either pass.
    pub fn scale_for_grid(
        &mut self,
        src: &FrameBuffer,
        scale_x: f64,
        scale_y: f64,
        adjust_stretch: bool,
    ) -> Result<FrameBuffer, CoreError> {
        let scaled = self.scale(src, scale_x, scale_y)?;
        if adjust_stretch {
            self.scale(&scaled, 1.0, STRETCH_FACTOR)
        } else {
            Ok(scaled)
        }
    }
}

impl Default for Resizer {
    fn default() -> Self {
        Self::new()
    }
}

/// `(round(width * scale_x), round(height * scale_y))`.
///
/// # Errors
/// Returns [`CoreError::InvalidDimension`] if either side is below 1, does not
/// fit in a `u32`, or the scale is not finite.
///
/// # Example
/// ```
/// use i2a_source::resize::target_dimensions;
/// assert_eq!(target_dimensions(3, 100, 0.5, 0.49).unwrap(), (2, 49));
/// assert!(target_dimensions(3, 1, 0.1, 1.0).is_err());
/// ```
pub fn target_dimensions(
    width: u32,
    height: u32,
    scale_x: f64,
    scale_y: f64,
) -> Result<(u32, u32), CoreError> {
    let w = scaled_side(width, scale_x);
    let h = scaled_side(height, scale_y);
    let max = i64::from(u32::MAX);
    if w < 1 || h < 1 || w > max || h > max {
        return Err(CoreError::InvalidDimension {
            width: w,
            height: h,
        });
    }
    Ok((w as u32, h as u32))
}

fn scaled_side(len: u32, scale: f64) -> i64 {
    let v = (f64::from(len) * scale).round();
    if v.is_finite() { v as i64 } else { 0 }
}

/// One-shot nearest-neighbour scale by independent factors.
///
/// # Errors
/// See [`Resizer::scale`].
///
/// # Example
/// ```
/// use i2a_source::resize::resize;
/// use i2a_core::frame::FrameBuffer;
/// let out = resize(&FrameBuffer::new(3, 3), 0.5, 0.5).unwrap();
/// assert_eq!((out.width, out.height), (2, 2));
/// ```
pub fn resize(src: &FrameBuffer, scale_x: f64, scale_y: f64) -> Result<FrameBuffer, CoreError> {
    Resizer::new().scale(src, scale_x, scale_y)
}
