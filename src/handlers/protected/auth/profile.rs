// handlers/protected/auth/profile.rs - GET/PUT /api/auth/profile handlers

use axum::extract::{Extension, State};
use serde_json::{json, Value};

use crate::database::models::ProfileUpdate;
use crate::middleware::{ApiJson, ApiResponse, ApiResult, AuthUser};
use crate::services::accounts;
use crate::state::AppState;

/// GET /api/auth/profile - Current user's profile
pub async fn profile_get(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> ApiResult<Value> {
    let user = state.db.users().select_404(auth_user.id).await?;
    Ok(ApiResponse::success(json!({ "user": user })))
}

/// PUT /api/auth/profile - Partial update; omitted fields are kept
pub async fn profile_put(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ApiJson(update): ApiJson<ProfileUpdate>,
) -> ApiResult<Value> {
    let user = accounts::update_profile(&state.db, auth_user.id, update).await?;
    tracing::info!(user_id = user.id, "Profile updated");
    Ok(ApiResponse::success(json!({ "user": user })))
}
