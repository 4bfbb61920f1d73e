//! Transport client for the background removal service
//!
//! The service exposes four endpoints:
//!
//! - `POST /upload` takes a multipart body with a `file` field
//! - `POST /remove-bg` takes `{"filename": ...}` naming a previous upload
//! - `GET /preview/{output}` and `GET /download/{output}` serve the result
//!
//! Both workflow operations are single-attempt and report every failure as a
//! [`TransportError`], never as a panic or a propagated raw fault. Faults
//! below the application protocol (connectivity, unreadable bodies) collapse
//! into [`TransportError::Network`] whose detail is for logs only; a
//! well-formed `success: false` body becomes [`TransportError::Application`]
//! and its message is shown verbatim.

mod http;
mod mock;

pub use http::HttpTransport;
pub use mock::{MockTransport, TransportCall};

use crate::types::{ProcessedImage, SelectedFile, UploadedFile};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message shown for every transport fault
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please try again.";
/// Message shown when the upload service rejects a file without saying why
pub const UPLOAD_FAILED_MESSAGE: &str = "Failed to upload file.";
/// Message shown when processing fails without an explanation
pub const PROCESS_FAILED_MESSAGE: &str = "Failed to process image.";
/// Message shown when the selected file cannot be read for upload
pub const LOCAL_FILE_MESSAGE: &str = "Could not read the selected file.";

pub const UPLOAD_PATH: &str = "/upload";
pub const REMOVE_BG_PATH: &str = "/remove-bg";

/// Outcome of an upload request
pub type UploadResult = std::result::Result<UploadedFile, TransportError>;

/// Outcome of a background removal request
pub type ProcessResult = std::result::Result<ProcessedImage, TransportError>;

/// Failure of a single transport operation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Connectivity failure or malformed response
    #[error("transport fault: {0}")]
    Network(String),

    /// The service reported `success: false`
    #[error("{0}")]
    Application(String),

    /// The selected file could not be read
    #[error("local file error: {0}")]
    LocalFile(String),
}

impl TransportError {
    pub fn network<E: std::fmt::Display>(context: &str, error: E) -> Self {
        Self::Network(format!("{}: {}", context, error))
    }

    /// Text shown to the user in the error banner
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::Network(_) => NETWORK_ERROR_MESSAGE,
            Self::Application(message) => message,
            Self::LocalFile(_) => LOCAL_FILE_MESSAGE,
        }
    }

    /// Whether the failure happened below the application protocol
    #[must_use]
    pub fn is_fault(&self) -> bool {
        !matches!(self, Self::Application(_))
    }
}

/// The two workflow operations against the service
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send the file to the upload endpoint
    async fn upload(&self, file: &SelectedFile) -> UploadResult;

    /// Ask the service to remove the background of a previously uploaded file
    async fn remove_background(&self, source_filename: &str) -> ProcessResult;
}

/// Path of the inline preview of a processed image
#[must_use]
pub fn preview_path(output_filename: &str) -> String {
    format!("/preview/{}", output_filename)
}

/// Path of the download of a processed image
#[must_use]
pub fn download_path(output_filename: &str) -> String {
    format!("/download/{}", output_filename)
}

/// Body returned by `POST /upload`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub success: bool,
    pub filename: Option<String>,
    pub size: Option<u64>,
    pub error: Option<String>,
}

impl UploadResponse {
    /// Interpret the body; a success body missing its fields counts as malformed
    pub fn into_result(self) -> UploadResult {
        if !self.success {
            return Err(TransportError::Application(
                self.error
                    .filter(|e| !e.is_empty())
                    .unwrap_or_else(|| UPLOAD_FAILED_MESSAGE.to_string()),
            ));
        }

        match (self.filename, self.size) {
            (Some(filename), Some(size)) => Ok(UploadedFile { filename, size }),
            _ => Err(TransportError::Network(
                "upload response reported success without filename and size".to_string(),
            )),
        }
    }
}

/// Body sent to `POST /remove-bg`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveBackgroundRequest {
    pub filename: String,
}

/// Body returned by `POST /remove-bg`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RemoveBackgroundResponse {
    #[serde(default)]
    pub success: bool,
    pub output_filename: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub size: Option<u64>,
    pub error: Option<String>,
}

impl RemoveBackgroundResponse {
    /// Interpret the body; a success body missing its fields counts as malformed
    pub fn into_result(self) -> ProcessResult {
        if !self.success {
            return Err(TransportError::Application(
                self.error
                    .filter(|e| !e.is_empty())
                    .unwrap_or_else(|| PROCESS_FAILED_MESSAGE.to_string()),
            ));
        }

        match (self.output_filename, self.width, self.height, self.size) {
            (Some(output_filename), Some(width), Some(height), Some(size)) => Ok(ProcessedImage {
                output_filename,
                width,
                height,
                size,
            }),
            _ => Err(TransportError::Network(
                "remove-bg response reported success without output details".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        let err = TransportError::network("POST /upload", "connection refused");
        assert_eq!(err.user_message(), NETWORK_ERROR_MESSAGE);
        assert!(err.is_fault());
        assert!(err.to_string().contains("connection refused"));

        let err = TransportError::Application("File not found".to_string());
        assert_eq!(err.user_message(), "File not found");
        assert!(!err.is_fault());

        let err = TransportError::LocalFile("permission denied".to_string());
        assert_eq!(err.user_message(), LOCAL_FILE_MESSAGE);
    }

    #[test]
    fn test_upload_response_success() {
        let body: UploadResponse = serde_json::from_str(
            r#"{"success": true, "filename": "abc.jpg", "size": 2097152, "message": "ok"}"#,
        )
        .unwrap();
        assert_eq!(
            body.into_result(),
            Ok(UploadedFile {
                filename: "abc.jpg".to_string(),
                size: 2_097_152
            })
        );
    }

    #[test]
    fn test_upload_response_application_error() {
        let body: UploadResponse =
            serde_json::from_str(r#"{"success": false, "error": "No file selected"}"#).unwrap();
        assert_eq!(
            body.into_result(),
            Err(TransportError::Application("No file selected".to_string()))
        );

        let body: UploadResponse = serde_json::from_str(r#"{"success": false}"#).unwrap();
        assert_eq!(
            body.into_result().unwrap_err().user_message(),
            UPLOAD_FAILED_MESSAGE
        );

        // A body without a success flag is a failure, not a fault
        let body: UploadResponse = serde_json::from_str(r#"{"error": "Resource not found."}"#).unwrap();
        assert_eq!(
            body.into_result().unwrap_err().user_message(),
            "Resource not found."
        );
    }

    #[test]
    fn test_upload_response_malformed_success() {
        let body: UploadResponse = serde_json::from_str(r#"{"success": true}"#).unwrap();
        let err = body.into_result().unwrap_err();
        assert!(err.is_fault());
        assert_eq!(err.user_message(), NETWORK_ERROR_MESSAGE);
    }

    #[test]
    fn test_remove_background_response() {
        let body: RemoveBackgroundResponse = serde_json::from_str(
            r#"{"success": true, "output_filename": "abc_out.png", "width": 800, "height": 600, "size": 512000}"#,
        )
        .unwrap();
        let image = body.into_result().unwrap();
        assert_eq!(image.output_filename, "abc_out.png");
        assert_eq!((image.width, image.height, image.size), (800, 600, 512_000));

        let body: RemoveBackgroundResponse =
            serde_json::from_str(r#"{"success": false, "error": "File not found"}"#).unwrap();
        assert_eq!(
            body.into_result(),
            Err(TransportError::Application("File not found".to_string()))
        );

        let body: RemoveBackgroundResponse =
            serde_json::from_str(r#"{"success": false, "error": ""}"#).unwrap();
        assert_eq!(
            body.into_result().unwrap_err().user_message(),
            PROCESS_FAILED_MESSAGE
        );

        let body: RemoveBackgroundResponse =
            serde_json::from_str(r#"{"success": true, "output_filename": "x.png"}"#).unwrap();
        assert!(body.into_result().unwrap_err().is_fault());
    }

    #[test]
    fn test_paths() {
        assert_eq!(preview_path("abc_out.png"), "/preview/abc_out.png");
        assert_eq!(download_path("abc_out.png"), "/download/abc_out.png");
        assert_eq!(
            serde_json::to_string(&RemoveBackgroundRequest {
                filename: "abc.jpg".to_string()
            })
            .unwrap(),
            r#"{"filename":"abc.jpg"}"#
        );
    }
}
