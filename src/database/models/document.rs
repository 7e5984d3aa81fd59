use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use sqlx::FromRow;

use crate::types::DocumentStatus;

/// Document row joined with the profile of the uploading client
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Document {
    pub id: i64,
    pub user_id: i64,
    pub filename: String,
    pub original_name: String,
    /// Relative to the upload root
    pub filepath: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub uploaded_at: NaiveDateTime,
    pub status: DocumentStatus,
    #[sqlx(flatten)]
    pub owner: DocumentOwner,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct DocumentOwner {
    #[sqlx(rename = "owner_email")]
    pub email: String,
    #[sqlx(rename = "owner_last_name")]
    pub last_name: String,
    #[sqlx(rename = "owner_first_name")]
    pub first_name: String,
}

impl Document {
    pub fn upload_date(&self) -> NaiveDate {
        self.uploaded_at.date()
    }
}

impl DocumentOwner {
    /// Grouping label for professional listings, falling back to the email
    pub fn display_name(&self) -> String {
        let name = format!("{} {}", self.last_name.trim(), self.first_name.trim());
        let name = name.trim();
        if name.is_empty() {
            self.email.clone()
        } else {
            name.to_string()
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewDocument {
    pub user_id: i64,
    pub filename: String,
    pub original_name: String,
    pub filepath: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub uploaded_at: NaiveDateTime,
}
