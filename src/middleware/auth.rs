use axum::{
    extract::{Query, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use serde::Deserialize;

use crate::auth::{validate_jwt, Claims};
use crate::error::ApiError;
use crate::filter::FilterScope;
use crate::state::AppState;
use crate::types::Role;

/// Authenticated user context extracted from JWT
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: i64,
    pub role: Role,
    pub email: String,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.user_id,
            role: claims.role,
            email: claims.email,
        }
    }
}

impl AuthUser {
    pub fn is_professional(&self) -> bool {
        self.role.is_professional()
    }

    /// Fail with 403 unless the caller is a professional
    pub fn require_professional(&self, action: &str) -> Result<(), ApiError> {
        if self.is_professional() {
            Ok(())
        } else {
            tracing::warn!(user_id = self.id, role = %self.role, "Denied professional-only action: {}", action);
            Err(ApiError::forbidden(format!("Only professionals can {}", action)))
        }
    }

    /// May this caller read a document owned by `owner_id`
    pub fn can_access(&self, owner_id: i64) -> bool {
        self.is_professional() || self.id == owner_id
    }

    /// Documents visible to this caller before any filtering
    pub fn scope(&self) -> FilterScope {
        match self.role {
            Role::Professional => FilterScope::All,
            Role::Client => FilterScope::Owner(self.id),
        }
    }
}

/// `?token=` fallback for links that cannot carry headers (inline previews)
#[derive(Debug, Deserialize)]
pub struct TokenQuery {
    pub token: Option<String>,
}

/// JWT authentication middleware that validates tokens and extracts user context
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    token_query: Option<Query<TokenQuery>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let query_token = token_query.and_then(|Query(q)| q.token);
    let token = extract_token(request.headers(), query_token).map_err(|msg| {
        tracing::warn!(path = %request.uri().path(), "Rejected request: {}", msg);
        ApiError::unauthorized(msg)
    })?;

    let claims = validate_jwt(&token, &state.config.security.jwt_secret).map_err(|e| {
        tracing::warn!(path = %request.uri().path(), "Rejected token: {}", e);
        ApiError::unauthorized("Invalid or expired token")
    })?;

    // Convert claims to AuthUser and inject into request
    request.extensions_mut().insert(AuthUser::from(claims));

    Ok(next.run(request).await)
}

/// Bearer header wins; the query parameter is only consulted when no header is sent
fn extract_token(headers: &HeaderMap, query_token: Option<String>) -> Result<String, String> {
    let Some(auth_header) = headers.get(axum::http::header::AUTHORIZATION) else {
        return query_token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| "Missing authentication token".to_string());
    };

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty JWT token".to_string());
        }
        Ok(token.trim().to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}
