//! REST API handlers.

pub mod generate;

use axum::Json;
use axum::http::StatusCode;
use serde_json::{Value, json};

/// Standard error response. `stage` names the pipeline stage that failed,
/// if the failure came from the image pipeline.
pub fn err_json(
    status: StatusCode,
    message: &str,
    stage: Option<&str>,
) -> (StatusCode, Json<Value>) {
    (
        status,
        Json(json!({ "status": "error", "error": message, "stage": stage })),
    )
}
