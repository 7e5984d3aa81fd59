// handlers/public/auth/login.rs - POST /api/auth/login handler

use axum::extract::State;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::{generate_jwt, Claims};
use crate::middleware::{ApiJson, ApiResponse, ApiResult};
use crate::services::accounts;
use crate::state::AppState;

use super::utils::{parse_role, require};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    /// Portal the caller is logging in through
    #[serde(alias = "userType")]
    pub role: Option<String>,
}

/**
 * POST /api/auth/login - Authenticate and receive a JWT
 *
 * Output:
 * ```json
 * { "success": true, "data": { "token": "eyJ...", "role": "client", "user": {...}, "expires_in": 86400 } }
 * ```
 *
 * 401 for unknown email or wrong password (indistinguishable), 403 ROLE_MISMATCH when the
 * credentials are right but the account belongs to the other portal.
 */
pub async fn login_post(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> ApiResult<Value> {
    let email = require(payload.email, "email")?;
    let password = require(payload.password, "password")?;
    let claimed = parse_role(payload.role)?;

    let user = accounts::authenticate(&state.db, &email, &password, claimed).await?;

    let expiry_hours = state.config.security.jwt_expiry_hours;
    let token = generate_jwt(&Claims::new(&user, expiry_hours), &state.config.security.jwt_secret)?;

    tracing::info!(user_id = user.id, role = %user.role, "User logged in");

    Ok(ApiResponse::success(json!({
        "token": token,
        "role": user.role,
        "user": user,
        "expires_in": expiry_hours * 3600,
    })))
}
