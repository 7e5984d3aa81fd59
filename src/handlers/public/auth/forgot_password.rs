// handlers/public/auth/forgot_password.rs - POST /api/auth/forgot-password handler

use axum::extract::State;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::password::{is_valid_email, normalize_email};
use crate::error::ApiError;
use crate::middleware::{ApiJson, ApiResponse, ApiResult};
use crate::state::AppState;

use super::utils::require;

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: Option<String>,
}

/// POST /api/auth/forgot-password - Acknowledge a reset request
///
/// The answer is identical whether or not the account exists.
pub async fn forgot_password_post(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<ForgotPasswordRequest>,
) -> ApiResult<Value> {
    let email = normalize_email(&require(payload.email, "email")?);
    if !is_valid_email(&email) {
        return Err(ApiError::field_error("email", "Invalid email format"));
    }

    match state.db.users().find_by_email(&email).await? {
        Some(user) => tracing::info!(user_id = user.id, "Password reset requested"),
        None => tracing::info!("Password reset requested for unknown account"),
    }

    Ok(ApiResponse::success(json!({
        "message": "If an account exists for this email, password reset instructions have been sent"
    })))
}
