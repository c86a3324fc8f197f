use thiserror::Error;

/// Errors originating from the core module.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Empty pixel buffer, or a buffer whose length disagrees with its dimensions.
    #[error("Image invalide : {width}×{height} ({len} octets)")]
    InvalidImage {
        /// Declared width.
        width: u32,
        /// Declared height.
        height: u32,
        /// Actual byte length of the buffer.
        len: usize,
    },

    /// A resample target or raster pitch resolved to zero or less.
    #[error("Dimensions invalides : {width}×{height}")]
    InvalidDimension {
        /// Computed width.
        width: i64,
        /// Computed height.
        height: i64,
    },

    /// Grid access outside the computed bounds.
    #[error("Cellule ({x}, {y}) hors de la grille {width}×{height}")]
    IndexOutOfRange {
        /// Requested column.
        x: u32,
        /// Requested row.
        y: u32,
        /// Grid width.
        width: u32,
        /// Grid height.
        height: u32,
    },

    /// Glyph ramp rejected (length or non-printable characters).
    #[error("Rampe de glyphes invalide : {0}")]
    InvalidRamp(String),

    /// Invalid configuration value or structure.
    #[error("Configuration invalide : {0}")]
    Config(String),

    /// The resampling backend refused the buffers.
    #[error("Échec du redimensionnement : {0}")]
    Resample(String),
}
