// handlers/protected/docs/formats.rs - GET /api/docs/supported-formats handler

use axum::extract::State;
use serde_json::{json, Value};

use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;
use crate::upload::formats::SUPPORTED_FORMATS;

pub async fn supported_formats_get(State(state): State<AppState>) -> ApiResult<Value> {
    Ok(ApiResponse::success(json!({
        "formats": SUPPORTED_FORMATS,
        "max_upload_bytes": state.config.upload.max_file_size_bytes,
    })))
}
