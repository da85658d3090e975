use std::path::Path;

use crate::error::{AppError, Result};

/// Extensions accepted for uploaded photos (lowercase, without the dot).
pub const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// Content types accepted for uploaded photos.
pub const ALLOWED_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];

/// Limits applied to a single upload call.
#[derive(Clone, Copy, Debug)]
pub struct UploadPolicy {
    /// The per-file ceiling in bytes.
    pub max_file_size: usize,
    /// The maximum number of files per call.
    pub max_files: usize,
}

/// Returns the lowercased extension of `filename`, if it has one.
pub fn extension_of(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
}

/// Validates the number of files in a batch.
///
/// # Arguments
///
/// * `count` - The number of files received so far.
/// * `policy` - The limits to apply.
pub fn validate_file_count(count: usize, policy: &UploadPolicy) -> Result<()> {
    if count == 0 {
        return Err(AppError::Validation("No files uploaded".to_string()));
    }

    if count > policy.max_files {
        return Err(AppError::Validation(format!(
            "Too many files. Maximum is {} per upload",
            policy.max_files
        )));
    }

    Ok(())
}

/// Validates the size of one file.
pub fn validate_file_size(filename: &str, size: usize, policy: &UploadPolicy) -> Result<()> {
    if size > policy.max_file_size {
        return Err(AppError::Validation(format!(
            "{}: file too large. Maximum size is {} MB",
            filename,
            policy.max_file_size / (1024 * 1024)
        )));
    }

    Ok(())
}

/// Validates the type of one file by extension and declared content type.
pub fn validate_file_type(filename: &str, content_type: Option<&str>) -> Result<()> {
    let extension_ok = extension_of(filename)
        .map(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false);

    let content_type_ok = content_type
        .map(|ct| ct.split(';').next().unwrap_or("").trim().to_ascii_lowercase())
        .map(|ct| ALLOWED_CONTENT_TYPES.contains(&ct.as_str()))
        .unwrap_or(false);

    if !extension_ok || !content_type_ok {
        return Err(AppError::Validation(format!(
            "{}: only image files (jpeg, jpg, png, gif, webp) are allowed",
            filename
        )));
    }

    Ok(())
}
