// handlers/protected/docs/list.rs - GET /api/docs/mydocs and /api/docs/all handlers

use axum::extract::{Extension, State};
use serde_json::{json, Value};

use crate::api::{group_by_client, group_by_date};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

/// GET /api/docs/mydocs - Caller's own documents, newest first, plus a per-day grouping
pub async fn mydocs_get(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> ApiResult<Value> {
    let documents = state.db.documents().list_for_user(auth_user.id).await?;
    let by_date = group_by_date(&documents);

    Ok(ApiResponse::success(json!({
        "documents": documents,
        "by_date": by_date,
    })))
}

/// GET /api/docs/all - Every document, grouped by client then day. Professionals only.
pub async fn all_get(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> ApiResult<Value> {
    auth_user.require_professional("list all documents")?;

    let documents = state.db.documents().list_all().await?;
    let by_client = group_by_client(&documents);

    Ok(ApiResponse::success(json!({
        "documents": documents,
        "by_client": by_client,
    })))
}
