// handlers/protected/auth/password.rs - PUT /api/auth/change-password handler

use axum::extract::{Extension, State};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::{ApiJson, ApiResponse, ApiResult, AuthUser};
use crate::services::accounts;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

pub async fn change_password_put(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ApiJson(payload): ApiJson<ChangePasswordRequest>,
) -> ApiResult<Value> {
    let (Some(current), Some(new)) = (payload.current_password, payload.new_password) else {
        return Err(ApiError::bad_request("current_password and new_password are required"));
    };

    accounts::change_password(&state.db, auth_user.id, &current, &new).await?;
    Ok(ApiResponse::success(json!({ "message": "Password updated" })))
}
