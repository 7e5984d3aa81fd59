use serde::Serialize;
use std::path::Path;

/// MIME type sent by browsers that do not know better; accepted for any supported extension
pub const GENERIC_MIME: &str = "application/octet-stream";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FileFormat {
    pub extension: &'static str,
    pub mime_type: &'static str,
}

pub const SUPPORTED_FORMATS: &[FileFormat] = &[
    FileFormat { extension: "pdf", mime_type: "application/pdf" },
    FileFormat { extension: "jpg", mime_type: "image/jpeg" },
    FileFormat { extension: "jpeg", mime_type: "image/jpeg" },
    FileFormat { extension: "png", mime_type: "image/png" },
    FileFormat { extension: "gif", mime_type: "image/gif" },
    FileFormat { extension: "doc", mime_type: "application/msword" },
    FileFormat {
        extension: "docx",
        mime_type: "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    },
    FileFormat { extension: "xls", mime_type: "application/vnd.ms-excel" },
    FileFormat {
        extension: "xlsx",
        mime_type: "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    },
    FileFormat { extension: "txt", mime_type: "text/plain" },
];

pub fn lookup(extension: &str) -> Option<&'static FileFormat> {
    let extension = extension.to_ascii_lowercase();
    SUPPORTED_FORMATS.iter().find(|f| f.extension == extension)
}

/// Lowercased extension of a file name, if it has one
pub fn extension_of(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty())
        .map(|e| e.to_ascii_lowercase())
}

/// Content-Type to serve a stored file with
pub fn mime_for_filename(name: &str) -> &'static str {
    extension_of(name)
        .and_then(|ext| lookup(&ext))
        .map(|f| f.mime_type)
        .unwrap_or(GENERIC_MIME)
}

/// Extensions a type filter token should match; jpg and jpeg name the same format
pub fn equivalent_extensions(extension: &str) -> Vec<String> {
    match extension {
        "jpg" | "jpeg" => vec!["jpg".to_string(), "jpeg".to_string()],
        other => vec![other.to_string()],
    }
}
