// upload/mod.rs - Validation and on-disk storage of uploaded documents

pub mod formats;
pub mod placement;

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use formats::{extension_of, lookup, FileFormat, GENERIC_MIME};
pub use placement::Placement;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("No file provided")]
    MissingFile,

    #[error("Unsupported file type '{0}'. Allowed: pdf, jpg, jpeg, png, gif, doc, docx, xls, xlsx, txt")]
    UnsupportedType(String),

    #[error("Content type '{declared}' does not match a .{extension} file")]
    MimeMismatch { declared: String, extension: String },

    #[error("File too large. Maximum size is {} MB", .limit / (1024 * 1024))]
    TooLarge { limit: usize },

    #[error("Invalid multipart body: {0}")]
    Multipart(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// A file part pulled out of the multipart body
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub original_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    /// Check size, extension and declared MIME type before anything touches disk
    pub fn validate(&self, max_bytes: usize) -> Result<&'static FileFormat, UploadError> {
        if self.bytes.len() > max_bytes {
            return Err(UploadError::TooLarge { limit: max_bytes });
        }

        let extension = extension_of(&self.original_name)
            .ok_or_else(|| UploadError::UnsupportedType(self.original_name.clone()))?;
        let format = lookup(&extension).ok_or_else(|| UploadError::UnsupportedType(extension.clone()))?;

        if let Some(declared) = self.content_type.as_deref() {
            let essence = declared.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
            if !essence.is_empty() && essence != format.mime_type && essence != GENERIC_MIME {
                return Err(UploadError::MimeMismatch {
                    declared: declared.to_string(),
                    extension,
                });
            }
        }

        Ok(format)
    }
}

/// Write `bytes` at `placement` under `root`, creating directories as needed
pub async fn store(root: &Path, placement: &Placement, bytes: &[u8]) -> Result<PathBuf, UploadError> {
    let dir = resolve(root, &placement.relative_dir);
    tokio::fs::create_dir_all(&dir).await?;

    let path = dir.join(&placement.filename);
    tokio::fs::write(&path, bytes).await?;
    Ok(path)
}

/// Absolute location of a stored relative path
pub fn resolve(root: &Path, relative: &str) -> PathBuf {
    relative
        .split('/')
        .filter(|part| !part.is_empty() && *part != "." && *part != "..")
        .fold(root.to_path_buf(), |path, part| path.join(part))
}

/// Remove empty directories below `root`, deepest first. The root itself is kept.
pub fn prune_empty_dirs(root: &Path, dry_run: bool) -> io::Result<Vec<PathBuf>> {
    let mut removed = vec![];
    if root.is_dir() {
        prune_dir(root, dry_run, &mut removed)?;
    }
    Ok(removed)
}

// Returns whether `dir` is (or would be) empty after pruning its children
fn prune_dir(dir: &Path, dry_run: bool, removed: &mut Vec<PathBuf>) -> io::Result<bool> {
    let mut empty = true;
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            if prune_dir(&path, dry_run, removed)? {
                if !dry_run {
                    std::fs::remove_dir(&path)?;
                }
                removed.push(path);
            } else {
                empty = false;
            }
        } else {
            empty = false;
        }
    }
    Ok(empty)
}
