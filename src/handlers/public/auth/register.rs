// handlers/public/auth/register.rs - POST /api/auth/register handler

use axum::extract::State;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::middleware::{ApiJson, ApiResponse, ApiResult};
use crate::services::accounts::{self, Registration};
use crate::state::AppState;

use super::utils::{parse_role, require};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    pub last_name: Option<String>,
    pub first_name: Option<String>,
    pub company: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    #[serde(default)]
    pub gdpr_accepted: bool,
    #[serde(default)]
    pub terms_accepted: bool,
}

/// POST /api/auth/register - Create a client or professional account
///
/// Returns 201 with the new user (never the password hash). Duplicate email is 409.
pub async fn register_post(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> ApiResult<Value> {
    let registration = Registration {
        email: require(payload.email, "email")?,
        password: require(payload.password, "password")?,
        role: parse_role(payload.role)?,
        last_name: require(payload.last_name, "last_name")?,
        first_name: require(payload.first_name, "first_name")?,
        company: payload.company,
        address: payload.address,
        phone: payload.phone,
        gdpr_accepted: payload.gdpr_accepted,
        terms_accepted: payload.terms_accepted,
    };

    let user = accounts::register(&state.db, registration).await?;
    Ok(ApiResponse::created(json!({ "user": user })))
}
