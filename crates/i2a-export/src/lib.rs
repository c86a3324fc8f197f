/// Serializers for img2ascii grids: plain text, HTML markup, ANSI truecolor
/// and PNG raster, plus the sink writing their bytes to disk.

pub mod ansi;
pub mod error;
pub mod markup;
pub mod rasterizer;
pub mod serializer;
pub mod sink;
pub mod text;

pub use error::ExportError;
pub use serializer::{ColorPolicy, GridSerializer, OutputFormat};
