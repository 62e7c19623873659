//! PNG encode/decode for in-memory rasters.

use image::codecs::png::PngEncoder;
use image::{GrayImage, ImageEncoder, ImageFormat};
use tracing::debug;

use crate::error::{ImageEngineError, Result};
use crate::raster::RasterImage;

/// Content type of every image this crate emits.
pub const PNG_CONTENT_TYPE: &str = "image/png";

/// Decode PNG bytes into an RGBA raster.
///
/// Other formats are rejected even if `image` could read them; the error
/// records what the bytes looked like.
pub fn decode_png(bytes: &[u8]) -> Result<RasterImage> {
    let decoded = image::load_from_memory_with_format(bytes, ImageFormat::Png)
        .map_err(|source| ImageEngineError::Decode {
            detected: sniff_mime(bytes),
            source,
        })?;

    debug!(
        width = decoded.width(),
        height = decoded.height(),
        color = ?decoded.color(),
        "Decoded PNG"
    );

    Ok(RasterImage::from_dynamic(decoded))
}

/// Encode a raster as an RGBA8 PNG.
pub fn encode_png(image: &RasterImage) -> Result<Vec<u8>> {
    let pixels = image.pixels();
    let mut out = Vec::new();
    PngEncoder::new(&mut out)
        .write_image(
            pixels.as_raw(),
            pixels.width(),
            pixels.height(),
            image::ExtendedColorType::Rgba8,
        )
        .map_err(|source| ImageEngineError::Encode { source })?;
    Ok(out)
}

/// Encode a grayscale buffer as an 8-bit grayscale PNG.
pub(crate) fn encode_png_luma(image: &GrayImage) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    PngEncoder::new(&mut out)
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            image::ExtendedColorType::L8,
        )
        .map_err(|source| ImageEngineError::Encode { source })?;
    Ok(out)
}

fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    image::guess_format(bytes)
        .ok()
        .map(|format| format.to_mime_type())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgba, RgbaImage};

    fn gradient(width: u32, height: u32) -> RasterImage {
        RasterImage::from_rgba(RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x * 10) as u8, (y * 10) as u8, 90, (x * y) as u8])
        }))
    }

    #[test]
    fn encode_then_decode_is_pixel_identical() {
        let img = gradient(16, 9);
        let bytes = encode_png(&img).unwrap();
        assert_eq!(decode_png(&bytes).unwrap(), img);
    }

    #[test]
    fn encode_emits_png_signature() {
        let bytes = encode_png(&gradient(2, 2)).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn luma_png_decodes_to_opaque_rgba() {
        let gray = GrayImage::from_pixel(3, 3, Luma([0]));
        let bytes = encode_png_luma(&gray).unwrap();
        let raster = decode_png(&bytes).unwrap();
        assert_eq!(raster.get_pixel(2, 2), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn truncated_png_is_decode_error() {
        let bytes = encode_png(&gradient(8, 8)).unwrap();
        let err = decode_png(&bytes[..bytes.len() / 2]).unwrap_err();
        match err {
            ImageEngineError::Decode { detected, .. } => {
                assert_eq!(detected, Some(PNG_CONTENT_TYPE));
            }
            other => panic!("expected decode error, got {other:?}"),
        }
    }

    #[test]
    fn jpeg_bytes_report_detected_type() {
        let jpeg_header = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];
        let err = decode_png(&jpeg_header).unwrap_err();
        assert!(err.to_string().contains("image/jpeg"), "{err}");
    }

    #[test]
    fn garbage_is_unrecognised() {
        let err = decode_png(b"not an image at all").unwrap_err();
        assert!(matches!(
            err,
            ImageEngineError::Decode { detected: None, .. }
        ));
    }
}
