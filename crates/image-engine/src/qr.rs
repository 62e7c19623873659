//! QR code generation.

use image::{GrayImage, Luma};
use qrcode::{EcLevel, QrCode};
use tracing::debug;

use crate::codec::encode_png_luma;
use crate::error::{ImageEngineError, Result};

/// Error correction level for every generated code.
pub const ERROR_CORRECTION: EcLevel = EcLevel::M;

/// Light modules surrounding the symbol on each side.
pub const QUIET_ZONE_MODULES: u32 = 4;

/// Largest requested image side, in pixels.
pub const MAX_QR_SIZE: u32 = 8192;

/// Generate a QR code for `content` as PNG bytes.
///
/// The image is `size` pixels square whenever the symbol plus quiet zone
/// fits at one pixel per module; otherwise it grows to the smallest size
/// that fits.
pub fn generate_qr(content: &str, size: u32) -> Result<Vec<u8>> {
    let img = render_qr(content, size)?;
    encode_png_luma(&img)
}

/// Render a QR code into a grayscale buffer.
pub fn render_qr(content: &str, size: u32) -> Result<GrayImage> {
    if content.is_empty() {
        return Err(ImageEngineError::Encoding {
            reason: "content is empty".into(),
        });
    }
    if size == 0 {
        return Err(ImageEngineError::Encoding {
            reason: "size must be positive".into(),
        });
    }
    if size > MAX_QR_SIZE {
        return Err(ImageEngineError::Encoding {
            reason: format!("size {size} exceeds the limit of {MAX_QR_SIZE}"),
        });
    }

    let code = QrCode::with_error_correction_level(content.as_bytes(), ERROR_CORRECTION)
        .map_err(|e| ImageEngineError::Encoding {
            reason: e.to_string(),
        })?;
    let modules = code.to_colors();
    let module_count = code.width() as u32;
    let total_modules = module_count + 2 * QUIET_ZONE_MODULES;

    let scale = (size / total_modules).max(1);
    let img_size = size.max(total_modules);
    // Leftover pixels are split evenly around the symbol.
    let origin = (img_size - module_count * scale) / 2;

    debug!(
        version = ?code.version(),
        module_count,
        scale,
        img_size,
        "Rendering QR code"
    );

    let mut img = GrayImage::from_pixel(img_size, img_size, Luma([255u8]));

    for (i, color) in modules.iter().enumerate() {
        let x = (i as u32) % module_count;
        let y = (i as u32) / module_count;

        if *color == qrcode::Color::Dark {
            for dx in 0..scale {
                for dy in 0..scale {
                    img.put_pixel(origin + x * scale + dx, origin + y * scale + dy, Luma([0u8]));
                }
            }
        }
    }

    Ok(img)
}
