//! Pre-upload checks on a selected file
//!
//! Everything here is pure and synchronous: a file that fails these checks is
//! never handed to the transport.

use crate::types::SelectedFile;
use thiserror::Error;

/// MIME types accepted for upload
pub const ALLOWED_MIME_TYPES: &[&str] = &["image/png", "image/jpeg", "image/jpg", "image/webp"];

/// Largest file accepted for upload (10 MiB)
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Reasons a selected file is refused before upload
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid file type. Please upload PNG, JPG, JPEG, or WEBP.")]
    InvalidType { mime_type: String },

    #[error("File too large. Maximum size is 10MB.")]
    TooLarge { size: u64 },
}

/// Whether the MIME type is in the upload allow-set
#[must_use]
pub fn is_valid_image_file(mime_type: &str) -> bool {
    ALLOWED_MIME_TYPES.contains(&mime_type)
}

/// Whether the size is within the upload limit
#[must_use]
pub fn is_valid_file_size(size: u64) -> bool {
    size <= MAX_FILE_SIZE
}

/// Check a MIME type and size pair; the type check runs first
///
/// # Errors
/// - [`ValidationError::InvalidType`] when the type is not allow-listed
/// - [`ValidationError::TooLarge`] when the size exceeds [`MAX_FILE_SIZE`]
pub fn validate_parts(mime_type: &str, size: u64) -> Result<(), ValidationError> {
    if !is_valid_image_file(mime_type) {
        return Err(ValidationError::InvalidType {
            mime_type: mime_type.to_string(),
        });
    }

    if !is_valid_file_size(size) {
        return Err(ValidationError::TooLarge { size });
    }

    Ok(())
}

/// Check a selected file before it is uploaded
///
/// # Errors
/// See [`validate_parts`].
pub fn validate(file: &SelectedFile) -> Result<(), ValidationError> {
    validate_parts(&file.mime_type, file.size)
}
