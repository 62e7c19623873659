//! Aspect-ratio-preserving watermark resizing.
//!
//! Resampling runs on premultiplied alpha so the color of fully transparent
//! pixels never bleeds into visible edges.

use image::imageops::{self, FilterType};
use image::{Rgba, Rgba32FImage, RgbaImage};
use tracing::debug;

use crate::error::{ImageEngineError, Result};
use crate::raster::RasterImage;

/// Resampling filter used for every resize.
pub const RESIZE_FILTER: FilterType = FilterType::Lanczos3;

/// Largest source or target area, in pixels, a resize will work on.
pub const MAX_RESIZE_PIXELS: u64 = 4096 * 4096;

/// Resize an image to a target width while maintaining aspect ratio.
///
/// The height is always derived from the width. Uses Lanczos3 filtering.
/// Returns the original image unchanged if it already matches the target width.
pub fn resize_to_width(img: RasterImage, width: u32) -> Result<RasterImage> {
    if width == 0 {
        return Err(ImageEngineError::InvalidDimension { width });
    }
    if img.is_empty() {
        return Err(ImageEngineError::EmptyImage {
            role: "watermark",
            width: img.width(),
            height: img.height(),
        });
    }

    let (orig_w, orig_h) = (img.width(), img.height());

    if orig_w == width {
        debug!(width, "Image already at target width, skipping resize");
        return Ok(img);
    }

    let new_height = scaled_height(orig_w, orig_h, width);
    check_area("watermark", orig_w, orig_h)?;
    check_area("resized watermark", width, new_height)?;

    debug!(
        orig_w,
        orig_h,
        new_width = width,
        new_height,
        "Resizing image to target width"
    );

    let premultiplied = premultiply(img.pixels());
    drop(img);
    let resized = imageops::resize(&premultiplied, width, new_height, RESIZE_FILTER);
    Ok(RasterImage::from_rgba(unpremultiply(&resized)))
}

/// Height matching `target_width` at the source aspect ratio, at least 1.
pub fn scaled_height(orig_w: u32, orig_h: u32, target_width: u32) -> u32 {
    let ratio = f64::from(target_width) / f64::from(orig_w);
    let new_height = (f64::from(orig_h) * ratio).round() as u32;
    new_height.max(1)
}

fn check_area(role: &'static str, width: u32, height: u32) -> Result<()> {
    if u64::from(width) * u64::from(height) > MAX_RESIZE_PIXELS {
        return Err(ImageEngineError::TooLarge {
            role,
            width,
            height,
            max_pixels: MAX_RESIZE_PIXELS,
        });
    }
    Ok(())
}

fn premultiply(img: &RgbaImage) -> Rgba32FImage {
    Rgba32FImage::from_fn(img.width(), img.height(), |x, y| {
        let [r, g, b, a] = img.get_pixel(x, y).0;
        let alpha = f32::from(a) / 255.0;
        let channel = |v: u8| f32::from(v) / 255.0 * alpha;
        Rgba([channel(r), channel(g), channel(b), alpha])
    })
}

fn unpremultiply(img: &Rgba32FImage) -> RgbaImage {
    let to_u8 = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    RgbaImage::from_fn(img.width(), img.height(), |x, y| {
        let [r, g, b, a] = img.get_pixel(x, y).0;
        let alpha = to_u8(a);
        if alpha == 0 {
            return Rgba([0, 0, 0, 0]);
        }
        Rgba([to_u8(r / a), to_u8(g / a), to_u8(b / a), alpha])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Create a test raster with given dimensions.
    fn create_test_image(width: u32, height: u32) -> RasterImage {
        RasterImage::from_rgba(RgbaImage::from_pixel(width, height, Rgba([128, 64, 32, 255])))
    }

    #[test]
    fn test_resize_to_width_downscale() {
        let result = resize_to_width(create_test_image(800, 600), 400).unwrap();
        assert_eq!(result.width(), 400);
        assert_eq!(result.height(), 300);
    }

    #[test]
    fn test_resize_to_width_upscale() {
        let result = resize_to_width(create_test_image(200, 100), 400).unwrap();
        assert_eq!(result.width(), 400);
        assert_eq!(result.height(), 200);
    }

    #[test]
    fn test_resize_to_width_same_width_is_identity() {
        let img = RasterImage::from_rgba(RgbaImage::from_fn(64, 80, |x, y| {
            Rgba([x as u8, y as u8, (x ^ y) as u8, 200])
        }));
        let result = resize_to_width(img.clone(), 64).unwrap();
        assert_eq!(result, img);
    }

    #[test]
    fn test_resize_width_law() {
        let img = create_test_image(100, 100);
        for width in [1, 2, 25, 75, 99, 101, 333] {
            let result = resize_to_width(img.clone(), width).unwrap();
            assert_eq!(result.width(), width);
            assert_eq!(result.height(), width);
        }
    }

    #[test]
    fn test_resize_rounds_height() {
        // 3 * (2/3) = 2, 100 * (75/400) = 18.75 -> 19
        assert_eq!(scaled_height(3, 3, 2), 2);
        assert_eq!(scaled_height(400, 100, 75), 19);
    }

    #[test]
    fn test_resize_preserves_non_zero_dimensions() {
        // Very wide, very short image
        let result = resize_to_width(create_test_image(1000, 1), 10).unwrap();
        assert_eq!(result.width(), 10);
        assert!(result.height() >= 1, "Height should be at least 1");
    }

    #[test]
    fn test_resize_zero_width_is_rejected() {
        let err = resize_to_width(create_test_image(10, 10), 0).unwrap_err();
        assert!(matches!(err, ImageEngineError::InvalidDimension { width: 0 }));
    }

    #[test]
    fn test_resize_uniform_color_stays_uniform() {
        let result = resize_to_width(create_test_image(90, 90), 30).unwrap();
        assert!(result.pixels().pixels().all(|p| p.0 == [128, 64, 32, 255]));
    }

    #[test]
    fn test_resize_tall_thin_image_is_rejected() {
        // 1x20000 scaled to width 75 would be 75x1500000
        let err = resize_to_width(create_test_image(1, 20_000), 75).unwrap_err();
        match err {
            ImageEngineError::TooLarge { width, height, .. } => {
                assert_eq!((width, height), (75, 1_500_000));
            }
            other => panic!("expected too-large error, got {other:?}"),
        }
    }

    #[test]
    fn test_check_area_limits_source_and_target() {
        assert!(check_area("watermark", 4096, 4096).is_ok());
        assert!(check_area("watermark", 4097, 4096).is_err());
        assert!(check_area("watermark", 1, u32::MAX).is_err());
    }

    #[test]
    fn test_resize_transparent_edge_keeps_color() {
        let img = RasterImage::from_rgba(RgbaImage::from_fn(100, 100, |x, _| {
            if x < 50 {
                Rgba([0, 0, 0, 0])
            } else {
                Rgba([255, 255, 255, 255])
            }
        }));
        let result = resize_to_width(img, 25).unwrap();

        for p in result.pixels().pixels().filter(|p| p[3] > 0) {
            assert_eq!(&p.0[..3], &[255, 255, 255], "fringe pixel {p:?}");
        }
        let edge = result.get_pixel(12, 0);
        assert!(edge[3] > 0 && edge[3] < 255, "edge alpha {edge:?}");
    }

    #[test]
    fn test_resize_transparent_stays_transparent() {
        let img = RasterImage::from_rgba(RgbaImage::from_pixel(40, 40, Rgba([255, 0, 0, 0])));
        let result = resize_to_width(img, 75).unwrap();
        assert!(result.pixels().pixels().all(|p| p[3] == 0));
    }
}
