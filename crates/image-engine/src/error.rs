//! Error types for QR generation and watermark compositing.

use std::fmt;

/// Errors produced by a single image stage.
#[derive(Debug, thiserror::Error)]
pub enum ImageEngineError {
    #[error("could not encode QR code: {reason}")]
    Encoding { reason: String },

    #[error("could not decode PNG image ({}): {source}", describe_detected(.detected))]
    Decode {
        /// MIME type sniffed from the leading bytes, if recognised.
        detected: Option<&'static str>,
        #[source]
        source: image::ImageError,
    },

    #[error("invalid resize target width: {width}")]
    InvalidDimension { width: u32 },

    #[error("{role} image has no pixels ({width}x{height})")]
    EmptyImage {
        role: &'static str,
        width: u32,
        height: u32,
    },

    #[error("{role} image is too large ({width}x{height}, limit {max_pixels} pixels)")]
    TooLarge {
        role: &'static str,
        width: u32,
        height: u32,
        max_pixels: u64,
    },

    #[error("could not encode PNG image: {source}")]
    Encode {
        #[source]
        source: image::ImageError,
    },
}

fn describe_detected(detected: &Option<&'static str>) -> String {
    match detected {
        Some(mime) => format!("detected {mime}"),
        None => "unrecognised format".to_string(),
    }
}

/// Result type alias for single-stage operations.
pub type Result<T> = std::result::Result<T, ImageEngineError>;

/// Pipeline stage that produced a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Generate,
    DecodeCode,
    DecodeWatermark,
    Resize,
    Composite,
    Encode,
}

impl Stage {
    /// Stable tag reported to callers.
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Generate => "generate",
            Stage::DecodeCode => "decode_code",
            Stage::DecodeWatermark => "decode_watermark",
            Stage::Resize => "resize",
            Stage::Composite => "composite",
            Stage::Encode => "encode",
        }
    }

    fn describe(self) -> &'static str {
        match self {
            Stage::Generate => "could not generate a QR code",
            Stage::DecodeCode => "could not decode QR code",
            Stage::DecodeWatermark => "could not decode watermark",
            Stage::Resize => "could not resize the watermark image",
            Stage::Composite => "could not add watermark to QR code",
            Stage::Encode => "could not encode the final image",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stage failure annotated with the stage that produced it.
#[derive(Debug, thiserror::Error)]
#[error("{}: {source}", .stage.describe())]
pub struct PipelineError {
    pub stage: Stage,
    #[source]
    pub source: ImageEngineError,
}

impl PipelineError {
    pub fn new(stage: Stage, source: ImageEngineError) -> Self {
        Self { stage, source }
    }

    /// Whether the failure was caused by caller-supplied data rather than
    /// by serialization of an already valid image.
    pub fn is_input_error(&self) -> bool {
        !matches!(self.stage, Stage::Encode)
    }
}
