//! QR code rendering with optional watermark compositing.
//!
//! Provides QR generation, PNG decode/encode, aspect-preserving Lanczos3
//! resizing, and alpha compositing of a centered watermark over the code.

pub mod codec;
pub mod compose;
pub mod error;
pub mod pipeline;
pub mod qr;
pub mod raster;
pub mod resize;

// Re-exports for convenience
pub use codec::{PNG_CONTENT_TYPE, decode_png, encode_png};
pub use compose::{CenteringPolicy, DEFAULT_CENTERING, overlay, overlay_offset};
pub use error::{ImageEngineError, PipelineError, Result, Stage};
pub use pipeline::{GeneratedImage, GenerationRequest, PipelineOptions, generate};
pub use qr::{MAX_QR_SIZE, generate_qr};
pub use raster::{Dimensions, Offset, RasterImage};
pub use resize::{MAX_RESIZE_PIXELS, resize_to_width};

/// Watermark width as a fraction of the QR code width.
pub const WATERMARK_SCALE: f64 = 0.25;
