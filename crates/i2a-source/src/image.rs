use std::path::Path;

use anyhow::{Context, Result};
use i2a_core::frame::FrameBuffer;

/// Charge une image depuis le disque (PNG, JPEG, BMP, GIF).
///
/// Transparent pixels are flattened over black.
///
/// # Errors
/// Returns an error if the file cannot be read or decoded.
///
/// # Example
/// ```no_run
/// use i2a_source::image::load_image;
/// use std::path::Path;
/// let frame = load_image(Path::new("photo.jpg")).unwrap();
/// ```
pub fn load_image(path: &Path) -> Result<FrameBuffer> {
    let img = image::open(path)
        .with_context(|| format!("Impossible de charger {}", path.display()))?;
    let frame = flatten(img);
    log::info!(
        "Image chargée : {} ({}×{})",
        path.display(),
        frame.width,
        frame.height
    );
    Ok(frame)
}

/// Decode an in-memory encoded image.
///
/// # Errors
/// Returns an error if the format is not recognized or the data is corrupt.
pub fn decode_image(bytes: &[u8]) -> Result<FrameBuffer> {
    let img = image::load_from_memory(bytes).context("Impossible de décoder l'image")?;
    Ok(flatten(img))
}

/// RGBA8 with alpha composited over opaque black.
fn flatten(img: image::DynamicImage) -> FrameBuffer {
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    let mut data = rgba.into_raw();
    for px in data.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a < 255 {
            for c in &mut px[..3] {
                *c = ((u16::from(*c) * a + 127) / 255) as u8;
            }
            px[3] = 255;
        }
    }
    FrameBuffer {
        data,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn encode_png(img: &image::RgbaImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn decodes_png_pixels() {
        let mut img = image::RgbaImage::new(2, 1);
        img.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
        img.put_pixel(1, 0, image::Rgba([0, 0, 255, 255]));
        let frame = decode_image(&encode_png(&img)).unwrap();
        assert_eq!((frame.width, frame.height), (2, 1));
        assert_eq!(frame.pixel(0, 0), (255, 0, 0, 255));
        assert_eq!(frame.pixel(1, 0), (0, 0, 255, 255));
    }

    #[test]
    fn transparency_is_flattened_over_black() {
        let mut img = image::RgbaImage::new(2, 1);
        img.put_pixel(0, 0, image::Rgba([200, 100, 50, 0]));
        img.put_pixel(1, 0, image::Rgba([255, 255, 255, 51]));
        let frame = decode_image(&encode_png(&img)).unwrap();
        assert_eq!(frame.pixel(0, 0), (0, 0, 0, 255));
        assert_eq!(frame.pixel(1, 0), (51, 51, 51, 255));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(decode_image(b"definitely not an image").is_err());
    }
}
