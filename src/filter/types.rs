use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Query-string parameters accepted by the document filter. Absent or blank values are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterParams {
    pub status: Option<String>,
    /// Comma-separated extensions, e.g. "pdf,xlsx" or "other"
    #[serde(rename = "type")]
    pub file_type: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub client: Option<String>,
    pub search: Option<String>,
}

/// Which documents the caller may see before any filter applies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterScope {
    Owner(i64),
    All,
}

#[derive(Debug, Clone)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<Value>,
}
