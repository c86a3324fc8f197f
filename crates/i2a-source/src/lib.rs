/// Pixel sources for img2ascii: image decoding and resampling.

#[cfg(feature = "image-source")]
pub mod image;
pub mod resize;
