// handlers/protected/docs/filter.rs - GET /api/docs/filter handler

use axum::extract::{Extension, State};
use serde_json::{json, Value};

use crate::filter::{Filter, FilterParams};
use crate::middleware::{ApiQuery, ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

/// GET /api/docs/filter?status=&type=&from=&to=&client=&search=
///
/// Clients only ever see their own documents; `client` is honoured for professionals.
pub async fn filter_get(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ApiQuery(params): ApiQuery<FilterParams>,
) -> ApiResult<Value> {
    let sql_result = Filter::new(auth_user.scope()).assign(params).to_sql()?;
    let documents = state.db.documents().select_any(&sql_result).await?;

    Ok(ApiResponse::success(json!({
        "count": documents.len(),
        "documents": documents,
    })))
}
