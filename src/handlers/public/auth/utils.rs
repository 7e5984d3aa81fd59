// handlers/public/auth/utils.rs - Request field helpers shared by the public auth handlers

use crate::error::ApiError;
use crate::types::Role;

/// Non-blank required field, or a 400 naming it
pub fn require(value: Option<String>, field: &str) -> Result<String, ApiError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ApiError::field_error(field, format!("{} is required", field)))
}

pub fn parse_role(value: Option<String>) -> Result<Role, ApiError> {
    require(value, "role")?
        .parse()
        .map_err(|e: crate::types::ParseEnumError| ApiError::field_error("role", e.to_string()))
}
