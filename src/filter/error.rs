use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Invalid status '{0}', expected one of: pending, processing, validated, urgent")]
    InvalidStatus(String),

    #[error("Invalid date for '{field}': '{value}', expected YYYY-MM-DD")]
    InvalidDate { field: String, value: String },
}
