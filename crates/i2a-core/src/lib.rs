/// Configuration, types, and shared structures for img2ascii.
///
/// This crate contains the color model, glyph ramps, pixel and character
/// grids, configuration and error types shared across the workspace.

pub mod color;
pub mod config;
pub mod error;
pub mod frame;
pub mod ramp;
pub mod traits;

pub use color::ColorValue;
pub use config::ConvertConfig;
pub use error::CoreError;
pub use frame::{AsciiCell, AsciiGrid, FrameBuffer};
pub use ramp::GlyphRamp;

/// Re-exports pour accès par chemin sémantique.
pub mod grid {
    pub use crate::frame::{AsciiCell, AsciiGrid};
}
