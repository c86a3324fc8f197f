use std::path::PathBuf;

use i2a_core::error::CoreError;
use thiserror::Error;

/// Errors originating from the export module.
#[derive(Error, Debug)]
pub enum ExportError {
    /// Writing the serialized bytes to their destination failed.
    #[error("Écriture impossible vers {} : {source}", .target.display())]
    Io {
        /// Destination that could not be written.
        target: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// PNG encoding failed.
    #[error("Encodage de l'image impossible : {0}")]
    Encode(#[from] image::ImageError),

    /// The supplied font could not be parsed.
    #[error("Police invalide : {0}")]
    Font(#[from] ab_glyph::InvalidFont),

    /// Layout or grid error from the core.
    #[error(transparent)]
    Core(#[from] CoreError),
}
