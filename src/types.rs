//! Core data types shared by the validator, transport and controller

use crate::error::{ClientError, Result};
use crate::format::file_extension;
use image::ImageFormat;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// MIME type reported for files whose extension is not a known image format
pub const UNKNOWN_MIME_TYPE: &str = "application/octet-stream";

/// Where the bytes of a selected file live
#[derive(Debug, Clone)]
pub enum FileSource {
    /// Already in memory
    Memory(Arc<[u8]>),
    /// On disk, read when the upload is sent
    Path(PathBuf),
}

/// A file the user picked or dropped
#[derive(Debug, Clone)]
pub struct SelectedFile {
    /// Display name, sent as the multipart filename
    pub name: String,
    /// MIME type as reported by the picker
    pub mime_type: String,
    /// Size in bytes
    pub size: u64,
    pub source: FileSource,
}

impl SelectedFile {
    /// Create a selected file from in-memory bytes
    pub fn from_bytes<N, M, B>(name: N, mime_type: M, bytes: B) -> Self
    where
        N: Into<String>,
        M: Into<String>,
        B: Into<Arc<[u8]>>,
    {
        let bytes = bytes.into();
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size: bytes.len() as u64,
            source: FileSource::Memory(bytes),
        }
    }

    /// Describe a file on disk without reading its contents
    ///
    /// The MIME type is derived from the extension so that the validator,
    /// not this constructor, decides whether the file is acceptable.
    ///
    /// # Errors
    /// - The path does not exist or its metadata cannot be read
    pub async fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| ClientError::file_io_error("read metadata of", path, &e))?;

        if !metadata.is_file() {
            return Err(ClientError::file_io_error(
                "select",
                path,
                &std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a regular file"),
            ));
        }

        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());

        Ok(Self {
            mime_type: mime_type_for_name(&name).to_string(),
            name,
            size: metadata.len(),
            source: FileSource::Path(path.to_path_buf()),
        })
    }

    /// Load the file contents
    ///
    /// # Errors
    /// - The backing file cannot be read
    pub async fn read_bytes(&self) -> Result<Vec<u8>> {
        match &self.source {
            FileSource::Memory(bytes) => Ok(bytes.to_vec()),
            FileSource::Path(path) => tokio::fs::read(path)
                .await
                .map_err(|e| ClientError::file_io_error("read", path, &e)),
        }
    }
}

/// MIME type for a filename, judged by its extension
#[must_use]
pub fn mime_type_for_name(name: &str) -> &'static str {
    ImageFormat::from_extension(file_extension(name))
        .map_or(UNKNOWN_MIME_TYPE, |format| format.to_mime_type())
}

/// Identifier and size the upload service assigned to a stored file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub filename: String,
    pub size: u64,
}

/// Result of a successful background removal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedImage {
    pub output_filename: String,
    pub width: u32,
    pub height: u32,
    pub size: u64,
}
