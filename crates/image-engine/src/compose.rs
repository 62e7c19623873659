//! Image composition: centered placement and alpha "over" blending.

use image::Rgba;
use tracing::debug;

use crate::error::{ImageEngineError, Result};
use crate::raster::{Dimensions, Offset, RasterImage};

/// How the vertical offset of an overlay is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CenteringPolicy {
    /// Both axes use half-widths. Only centers on square backgrounds,
    /// which generated QR codes always are.
    SquareBackground,
    /// Horizontal axis uses widths, vertical axis uses heights.
    Centered,
}

/// Centering used unless a caller asks otherwise.
pub const DEFAULT_CENTERING: CenteringPolicy = CenteringPolicy::Centered;

/// Top-left position of `foreground` when centered over `background`.
pub fn overlay_offset(
    background: Dimensions,
    foreground: Dimensions,
    policy: CenteringPolicy,
) -> Offset {
    let half = |v: u32| i64::from(v / 2);
    let x = half(background.width) - half(foreground.width);
    let y = match policy {
        CenteringPolicy::SquareBackground => x,
        CenteringPolicy::Centered => half(background.height) - half(foreground.height),
    };
    Offset::new(x, y)
}

/// Composite `foreground` over the center of `background`.
///
/// The result has the background's bounds. Background pixels are kept
/// verbatim; foreground pixels are blended on top with "over" and clipped
/// to the background.
pub fn overlay(
    background: RasterImage,
    foreground: RasterImage,
    policy: CenteringPolicy,
) -> Result<RasterImage> {
    ensure_not_empty(&background, "background")?;
    ensure_not_empty(&foreground, "foreground")?;

    let offset = overlay_offset(background.dimensions(), foreground.dimensions(), policy);
    debug!(
        bg_width = background.width(),
        bg_height = background.height(),
        fg_width = foreground.width(),
        fg_height = foreground.height(),
        offset_x = offset.x,
        offset_y = offset.y,
        "Compositing watermark"
    );

    let mut canvas = background.into_rgba();
    let top = foreground.pixels();

    // Intersection of the translated foreground with the canvas, in canvas coordinates.
    let x_start = offset.x.max(0);
    let y_start = offset.y.max(0);
    let x_end = (offset.x + i64::from(top.width())).min(i64::from(canvas.width()));
    let y_end = (offset.y + i64::from(top.height())).min(i64::from(canvas.height()));

    for y in y_start..y_end {
        for x in x_start..x_end {
            let src = top.get_pixel((x - offset.x) as u32, (y - offset.y) as u32);
            let dst = canvas.get_pixel_mut(x as u32, y as u32);
            *dst = blend_over(*dst, *src);
        }
    }

    Ok(RasterImage::from_rgba(canvas))
}

fn ensure_not_empty(img: &RasterImage, role: &'static str) -> Result<()> {
    if img.is_empty() {
        return Err(ImageEngineError::EmptyImage {
            role,
            width: img.width(),
            height: img.height(),
        });
    }
    Ok(())
}

/// Porter-Duff "over" on straight (non-premultiplied) RGBA.
fn blend_over(bg: Rgba<u8>, fg: Rgba<u8>) -> Rgba<u8> {
    match fg[3] {
        0 => return bg,
        255 => return fg,
        _ => {}
    }

    let src_a = f32::from(fg[3]) / 255.0;
    let dst_a = f32::from(bg[3]) / 255.0 * (1.0 - src_a);
    let out_a = src_a + dst_a;

    let channel = |i: usize| {
        let c = (f32::from(fg[i]) * src_a + f32::from(bg[i]) * dst_a) / out_a;
        c.round().clamp(0.0, 255.0) as u8
    };

    Rgba([
        channel(0),
        channel(1),
        channel(2),
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    ])
}
