//! QR code generation API.

use std::time::Duration;

use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use image_engine::{GeneratedImage, GenerationRequest, PipelineError};

use crate::app::SharedState;

use super::err_json;


/// Failures of a single `/generate` request.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("Could not determine the desired QR code content.")]
    MissingContent,

    #[error("Could not determine the desired QR code size.")]
    InvalidSize,

    #[error("QR code size must be between 1 and {max}.")]
    SizeOutOfRange { max: u32 },

    #[error("Could not read the request form: {message}")]
    Form { status: StatusCode, message: String },

    #[error("Could not generate QR code. {0}")]
    Pipeline(#[from] PipelineError),

    #[error("QR code generation timed out after {0} seconds")]
    Timeout(u64),

    #[error("QR code generation worker failed: {0}")]
    Worker(String),
}

impl RequestError {
    pub fn status(&self) -> StatusCode {
        match self {
            RequestError::MissingContent
            | RequestError::InvalidSize
            | RequestError::SizeOutOfRange { .. } => StatusCode::BAD_REQUEST,
            RequestError::Form { status, .. } => *status,
            RequestError::Pipeline(e) if e.is_input_error() => StatusCode::BAD_REQUEST,
            RequestError::Pipeline(_) | RequestError::Worker(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            RequestError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    pub fn stage(&self) -> Option<&'static str> {
        match self {
            RequestError::Pipeline(e) => Some(e.stage.as_str()),
            _ => None,
        }
    }
}

impl From<MultipartError> for RequestError {
    fn from(e: MultipartError) -> Self {
        RequestError::Form {
            status: e.status(),
            message: e.body_text(),
        }
    }
}

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        err_json(self.status(), &self.to_string(), self.stage()).into_response()
    }
}

/// Raw form fields before validation.
#[derive(Debug, Default)]
struct GenerateForm {
    content: Option<String>,
    size: Option<String>,
    watermark: Option<Vec<u8>>,
}

impl GenerateForm {
    async fn read(multipart: &mut Multipart) -> Result<Self, RequestError> {
        let mut form = Self::default();
        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or("").to_string();
            match name.as_str() {
                "content" => form.content = Some(field.text().await?),
                "size" => form.size = Some(field.text().await?),
                "watermark" => {
                    let data = field.bytes().await?;
                    // An empty file part means no file was chosen.
                    if !data.is_empty() {
                        form.watermark = Some(data.to_vec());
                    }
                }
                _ => {}
            }
        }
        Ok(form)
    }

    fn into_request(self, max_size: u32) -> Result<GenerationRequest, RequestError> {
        let content = self
            .content
            .filter(|c| !c.is_empty())
            .ok_or(RequestError::MissingContent)?;
        let size = parse_size(self.size.as_deref(), max_size)?;
        Ok(GenerationRequest {
            content,
            size,
            watermark: self.watermark,
        })
    }
}

/// Parse the `size` field: an integer in `1..=max_size`.
pub fn parse_size(raw: Option<&str>, max_size: u32) -> Result<u32, RequestError> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(RequestError::InvalidSize)?;
    let size: i64 = raw.parse().map_err(|_| RequestError::InvalidSize)?;
    if size < 1 || size > i64::from(max_size) {
        return Err(RequestError::SizeOutOfRange { max: max_size });
    }
    Ok(size as u32)
}

/// POST /generate – Generate a QR code PNG, optionally watermarked
pub async fn generate_qr(
    State(state): State<SharedState>,
    mut multipart: Multipart,
) -> Result<Response, RequestError> {
    let form = GenerateForm::read(&mut multipart).await?;
    let request = form.into_request(state.config().max_size)?;

    tracing::info!(
        content_len = request.content.len(),
        size = request.size,
        watermark_bytes = request.watermark.as_ref().map_or(0, Vec::len),
        "Generating QR code"
    );

    let options = state.pipeline_options();
    let timeout = state.config().request_timeout();
    let job = move || image_engine::generate(request, &options);
    let image = run_with_deadline(timeout, job).await?;

    Ok(([(header::CONTENT_TYPE, image.content_type)], image.bytes).into_response())
}

/// Run a pipeline job on the blocking pool. The result is dropped if the
/// job outlives `timeout`.
async fn run_with_deadline<F>(timeout: Duration, job: F) -> Result<GeneratedImage, RequestError>
where
    F: FnOnce() -> Result<GeneratedImage, PipelineError> + Send + 'static,
{
    let task = tokio::task::spawn_blocking(job);

    match tokio::time::timeout(timeout, task).await {
        Err(_) => {
            tracing::warn!(timeout_secs = timeout.as_secs(), "QR generation timed out");
            Err(RequestError::Timeout(timeout.as_secs()))
        }
        Ok(Err(join_err)) => {
            tracing::error!("QR generation worker failed: {join_err}");
            Err(RequestError::Worker(join_err.to_string()))
        }
        Ok(Ok(Err(e))) => {
            tracing::warn!(stage = %e.stage, "QR generation failed: {e}");
            Err(e.into())
        }
        Ok(Ok(Ok(image))) => Ok(image),
    }
}
