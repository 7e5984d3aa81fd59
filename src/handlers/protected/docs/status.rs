// handlers/protected/docs/status.rs - PUT /api/docs/status/:id handler

use axum::extract::{Extension, State};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::{ApiJson, ApiPath, ApiResponse, ApiResult, AuthUser};
use crate::services::notify_status_change;
use crate::state::AppState;
use crate::types::DocumentStatus;

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: Option<Value>,
    pub send_notification: Option<bool>,
}

/**
 * PUT /api/docs/status/:id - Move a document to a new status. Professionals only.
 *
 * The owner is emailed afterwards unless `send_notification` is false. Delivery
 * runs in the background; its failure is logged and never changes the response.
 */
pub async fn status_put(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<StatusUpdateRequest>,
) -> ApiResult<Value> {
    auth_user.require_professional("change document status")?;

    let status = parse_status(payload.status.as_ref())?;
    state.db.documents().update_status(id, status).await?;

    tracing::info!(document_id = id, status = %status, by = auth_user.id, "Document status changed");

    let notify = payload.send_notification.unwrap_or(true);
    if notify {
        spawn_notification(state, id, status);
    }

    Ok(ApiResponse::success(json!({
        "document_id": id,
        "status": status,
        "notification_queued": notify,
    })))
}

fn parse_status(raw: Option<&Value>) -> Result<DocumentStatus, ApiError> {
    let allowed = DocumentStatus::ALL.map(|s| s.as_str()).join(", ");
    let raw = raw
        .and_then(Value::as_str)
        .ok_or_else(|| ApiError::field_error("status", format!("status is required ({})", allowed)))?;

    raw.parse()
        .map_err(|_| ApiError::field_error("status", format!("Invalid status '{}'. Allowed: {}", raw, allowed)))
}

fn spawn_notification(state: AppState, document_id: i64, status: DocumentStatus) {
    tokio::spawn(async move {
        let result = notify_status_change(
            &state.db,
            state.mailer.as_ref(),
            &state.config.email.portal_url,
            document_id,
            status,
        )
        .await;

        if let Err(e) = result {
            tracing::warn!(document_id, status = %status, "Status notification failed: {}", e);
        }
    });
}
