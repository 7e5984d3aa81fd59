// handlers/protected/docs/file.rs - GET /api/docs/preview/:id and /api/docs/download/:id handlers

use axum::{
    body::Body,
    extract::{Extension, Path, State},
    http::{header, HeaderValue, StatusCode},
    response::Response,
};

use tokio_util::io::ReaderStream;

use crate::database::models::Document;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::state::AppState;
use crate::upload::{self, formats::mime_for_filename};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Inline,
    Attachment,
}

impl Disposition {
    fn as_str(&self) -> &'static str {
        match self {
            Disposition::Inline => "inline",
            Disposition::Attachment => "attachment",
        }
    }
}

/// GET /api/docs/preview/:id - Stream the file for display in the browser
pub async fn preview_get(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    serve_document(&state, &auth_user, id, Disposition::Inline).await
}

/// GET /api/docs/download/:id - Same bytes, served as an attachment
pub async fn download_get(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    serve_document(&state, &auth_user, id, Disposition::Attachment).await
}

async fn serve_document(
    state: &AppState,
    auth_user: &AuthUser,
    id: i64,
    disposition: Disposition,
) -> Result<Response, ApiError> {
    let doc = state.db.documents().select_404(id).await?;

    if !auth_user.can_access(doc.user_id) {
        tracing::warn!(user_id = auth_user.id, document_id = id, "Denied access to another client's document");
        return Err(ApiError::forbidden("You do not have access to this document"));
    }

    let path = upload::resolve(&state.config.upload.root_dir, &doc.filepath);
    let file = match tokio::fs::File::open(&path).await {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::error!(document_id = id, path = %path.display(), "Stored file is missing");
            return Err(ApiError::not_found("File not found"));
        }
        Err(e) => {
            tracing::error!(document_id = id, path = %path.display(), "Failed to open stored file: {}", e);
            return Err(ApiError::internal_server_error("Failed to read document"));
        }
    };
    let len = file
        .metadata()
        .await
        .map_err(|e| {
            tracing::error!(document_id = id, path = %path.display(), "Failed to stat stored file: {}", e);
            ApiError::internal_server_error("Failed to read document")
        })?
        .len();

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, mime_for_filename(&doc.filename))
        .header(header::CONTENT_DISPOSITION, content_disposition(&doc, disposition))
        .header(header::CONTENT_LENGTH, len)
        .body(Body::from_stream(ReaderStream::new(file)))
        .map_err(|e| {
            tracing::error!("Failed to build file response: {}", e);
            ApiError::internal_server_error("Failed to read document")
        })
}

/// ASCII names go out as-is. Anything else gets the stored name as `filename`
/// plus the original as RFC 6266 `filename*`.
fn content_disposition(doc: &Document, disposition: Disposition) -> HeaderValue {
    let kind = disposition.as_str();
    let original = doc.original_name.replace(['"', '\\'], "_");

    let value = if original.is_ascii() && !original.chars().any(|c| c.is_ascii_control()) {
        format!("{}; filename=\"{}\"", kind, original)
    } else {
        format!(
            "{}; filename=\"{}\"; filename*=UTF-8''{}",
            kind,
            doc.filename,
            urlencoding::encode(&doc.original_name)
        )
    };

    HeaderValue::from_str(&value)
        .or_else(|_| HeaderValue::from_str(&format!("{}; filename=\"{}\"", kind, doc.filename)))
        .unwrap_or_else(|_| HeaderValue::from_static(kind))
}
