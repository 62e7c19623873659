//! End-to-end QR generation with an optional centered watermark.
//!
//! Without a watermark the generator's PNG is returned untouched. With one,
//! the code and the watermark are decoded, the watermark is scaled to a
//! fraction of the code width, composited over the center, and the result is
//! re-encoded. The first failing stage aborts the run.

use tracing::debug;

use crate::WATERMARK_SCALE;
use crate::codec::{PNG_CONTENT_TYPE, decode_png, encode_png};
use crate::compose::{CenteringPolicy, DEFAULT_CENTERING, overlay};
use crate::error::{PipelineError, Stage};
use crate::qr::generate_qr;
use crate::resize::resize_to_width;

/// Inputs for one generation run. Validated by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub content: String,
    pub size: u32,
    /// Raw PNG bytes of the watermark, if any.
    pub watermark: Option<Vec<u8>>,
}

impl GenerationRequest {
    pub fn new(content: impl Into<String>, size: u32) -> Self {
        Self {
            content: content.into(),
            size,
            watermark: None,
        }
    }

    pub fn with_watermark(mut self, watermark: Vec<u8>) -> Self {
        self.watermark = Some(watermark);
        self
    }
}

/// Encoded output image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
}

/// Process-wide knobs, fixed after startup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineOptions {
    /// Watermark width as a fraction of the code width.
    pub watermark_scale: f64,
    pub centering: CenteringPolicy,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            watermark_scale: WATERMARK_SCALE,
            centering: DEFAULT_CENTERING,
        }
    }
}

/// Watermark target width for a code `code_width` pixels wide.
pub fn watermark_width(code_width: u32, scale: f64) -> u32 {
    (f64::from(code_width) * scale).round() as u32
}

/// Run the full pipeline for one request.
pub fn generate(
    request: GenerationRequest,
    options: &PipelineOptions,
) -> Result<GeneratedImage, PipelineError> {
    let GenerationRequest {
        content,
        size,
        watermark,
    } = request;

    let code = generate_qr(&content, size).map_err(|e| PipelineError::new(Stage::Generate, e))?;

    let Some(watermark) = watermark else {
        debug!(size, bytes = code.len(), "Generated QR code without watermark");
        return Ok(GeneratedImage {
            bytes: code,
            content_type: PNG_CONTENT_TYPE,
        });
    };

    let base = decode_png(&code).map_err(|e| PipelineError::new(Stage::DecodeCode, e))?;
    let mark =
        decode_png(&watermark).map_err(|e| PipelineError::new(Stage::DecodeWatermark, e))?;

    let target_width = watermark_width(base.width(), options.watermark_scale);
    debug!(
        code_width = base.width(),
        watermark_width = mark.width(),
        target_width,
        "Scaling watermark"
    );
    let mark = resize_to_width(mark, target_width)
        .map_err(|e| PipelineError::new(Stage::Resize, e))?;

    let merged = overlay(base, mark, options.centering)
        .map_err(|e| PipelineError::new(Stage::Composite, e))?;

    let bytes = encode_png(&merged).map_err(|e| PipelineError::new(Stage::Encode, e))?;
    debug!(bytes = bytes.len(), "Generated watermarked QR code");

    Ok(GeneratedImage {
        bytes,
        content_type: PNG_CONTENT_TYPE,
    })
}
