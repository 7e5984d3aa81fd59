// handlers/protected/docs/upload.rs - POST /api/docs/upload handler

use axum::{
    extract::{multipart::{MultipartError, MultipartRejection}, Extension, Multipart, State},
    http::StatusCode,
};
use chrono::Utc;
use serde_json::{json, Value};

use crate::database::models::NewDocument;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;
use crate::upload::{self, Placement, UploadError, UploadedFile};

/// Multipart field carrying the document
pub const FILE_FIELD: &str = "file";

/**
 * POST /api/docs/upload - Store one document for the caller
 *
 * Multipart body with a single `file` part. The file lands under
 * `<upload root>/<letter>/<last-first>/<YYYY-MM-DD>/`; when the caller's
 * profile cannot be read it goes to `<upload root>/temp/` instead.
 */
pub async fn upload_post(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Value> {
    let multipart = multipart?;
    let max_bytes = state.config.upload.max_file_size_bytes;
    let file = read_file_part(multipart, max_bytes).await?;
    let format = file.validate(max_bytes)?;

    let owner = match state.db.users().find_by_id(auth_user.id).await {
        Ok(Some(user)) => Some(user),
        Ok(None) => {
            tracing::warn!(user_id = auth_user.id, "Uploader not found, storing under temp");
            None
        }
        Err(e) => {
            tracing::warn!(user_id = auth_user.id, "Uploader lookup failed, storing under temp: {}", e);
            None
        }
    };

    let now = Utc::now();
    let placement = Placement::resolve(
        owner.as_ref().map(|u| (u.last_name.as_str(), u.first_name.as_str())),
        &file.original_name,
        now,
    );
    let path = upload::store(&state.config.upload.root_dir, &placement, &file.bytes).await?;

    let new_doc = NewDocument {
        user_id: auth_user.id,
        filename: placement.filename.clone(),
        original_name: file.original_name.clone(),
        filepath: placement.relative_path(),
        mime_type: format.mime_type.to_string(),
        size_bytes: file.bytes.len() as i64,
        uploaded_at: now.naive_utc(),
    };

    let document = match state.db.documents().create(&new_doc).await {
        Ok(doc) => doc,
        Err(e) => {
            // No row will ever point at the stored file
            if let Err(io) = tokio::fs::remove_file(&path).await {
                tracing::warn!(path = %path.display(), "Failed to remove orphaned upload: {}", io);
            }
            return Err(e.into());
        }
    };

    tracing::info!(
        document_id = document.id,
        user_id = auth_user.id,
        path = %document.filepath,
        size = document.size_bytes,
        "Document uploaded"
    );

    Ok(ApiResponse::created(json!({ "document": document })))
}

/// Pull the first `file` part out of the body; other parts are ignored
async fn read_file_part(mut multipart: Multipart, max_bytes: usize) -> Result<UploadedFile, UploadError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_bytes))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let original_name = field
            .file_name()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or(UploadError::MissingFile)?
            .to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map_err(|e| multipart_error(e, max_bytes))?;

        return Ok(UploadedFile {
            original_name,
            content_type,
            bytes: bytes.to_vec(),
        });
    }

    Err(UploadError::MissingFile)
}

fn multipart_error(err: MultipartError, max_bytes: usize) -> UploadError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        UploadError::TooLarge { limit: max_bytes }
    } else {
        UploadError::Multipart(err.body_text())
    }
}
