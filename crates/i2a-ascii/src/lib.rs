/// ASCII conversion engine for img2ascii.
///
/// Converts pixel frames to character grids: resampling, per-pixel color
/// transforms, glyph selection.
pub mod converter;
pub mod select;
pub mod transform;

pub use converter::{Converter, convert};
