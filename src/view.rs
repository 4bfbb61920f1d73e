//! Toolkit-independent rendering state produced by workflow transitions

use crate::format::format_megabytes;
use crate::transport::{download_path, preview_path};
use crate::types::{FileSource, ProcessedImage, SelectedFile, UploadedFile};
use std::fmt;

/// Format label shown for every processed image
pub const RESULT_FORMAT_LABEL: &str = "PNG (Transparent)";

/// Client-side handle on the original file, used for on-screen display
///
/// Dropping the handle releases it; the controller drops it whenever a new
/// file is chosen or the session resets.
#[derive(Debug, Clone)]
pub struct LocalPreview {
    pub name: String,
    pub mime_type: String,
    pub source: FileSource,
}

impl From<&SelectedFile> for LocalPreview {
    fn from(file: &SelectedFile) -> Self {
        Self {
            name: file.name.clone(),
            mime_type: file.mime_type.clone(),
            source: file.source.clone(),
        }
    }
}

/// Text summary rendered next to the uploaded image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewSummary {
    pub file_name: String,
    /// Size as reported by the upload service
    pub size: u64,
    pub mime_type: String,
}

impl PreviewSummary {
    #[must_use]
    pub fn new(file: &SelectedFile, uploaded: &UploadedFile) -> Self {
        Self {
            file_name: file.name.clone(),
            size: uploaded.size,
            mime_type: file.mime_type.clone(),
        }
    }

    #[must_use]
    pub fn size_label(&self) -> String {
        format_megabytes(self.size)
    }
}

impl fmt::Display for PreviewSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "File: {}", self.file_name)?;
        writeln!(f, "Size: {}", self.size_label())?;
        write!(f, "Type: {}", self.mime_type)
    }
}

/// Text summary and links rendered for the processed image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultSummary {
    pub output_filename: String,
    pub width: u32,
    pub height: u32,
    pub size: u64,
}

impl ResultSummary {
    #[must_use]
    pub fn resolution_label(&self) -> String {
        format!("{} x {}px", self.width, self.height)
    }

    #[must_use]
    pub fn size_label(&self) -> String {
        format_megabytes(self.size)
    }

    #[must_use]
    pub fn format_label(&self) -> &'static str {
        RESULT_FORMAT_LABEL
    }

    /// Where the processed image is fetched from for inline display
    #[must_use]
    pub fn preview_link(&self) -> String {
        preview_path(&self.output_filename)
    }

    /// Direct link the user follows to download the result
    #[must_use]
    pub fn download_link(&self) -> String {
        download_path(&self.output_filename)
    }
}

impl From<&ProcessedImage> for ResultSummary {
    fn from(image: &ProcessedImage) -> Self {
        Self {
            output_filename: image.output_filename.clone(),
            width: image.width,
            height: image.height,
            size: image.size,
        }
    }
}

impl fmt::Display for ResultSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Resolution: {}", self.resolution_label())?;
        writeln!(f, "Size: {}", self.size_label())?;
        write!(f, "Format: {}", self.format_label())
    }
}

/// Everything a front end needs to draw the current workflow step
#[derive(Debug, Clone, Default)]
pub struct ViewModel {
    pub local_preview: Option<LocalPreview>,
    pub preview: Option<PreviewSummary>,
    pub result: Option<ResultSummary>,
}

impl ViewModel {
    pub(crate) fn show_preview(&mut self, file: &SelectedFile, uploaded: &UploadedFile) {
        self.local_preview = Some(LocalPreview::from(file));
        self.preview = Some(PreviewSummary::new(file, uploaded));
        self.result = None;
    }

    pub(crate) fn show_result(&mut self, image: &ProcessedImage) {
        self.result = Some(ResultSummary::from(image));
    }

    /// Drop the handle on the previously chosen file
    pub(crate) fn release_local_preview(&mut self) {
        if let Some(previous) = self.local_preview.take() {
            tracing::trace!(file = %previous.name, "Released local preview");
        }
    }

    pub(crate) fn clear(&mut self) {
        self.release_local_preview();
        self.preview = None;
        self.result = None;
    }

    /// Download link of the current result, if there is one
    #[must_use]
    pub fn download_link(&self) -> Option<String> {
        self.result.as_ref().map(ResultSummary::download_link)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn processed() -> ProcessedImage {
        ProcessedImage {
            output_filename: "abc_out.png".to_string(),
            width: 800,
            height: 600,
            size: 512_000,
        }
    }

    #[test]
    fn test_preview_summary_uses_reported_size() {
        let file = SelectedFile::from_bytes("cat.jpg", "image/jpeg", vec![0u8; 10]);
        let uploaded = UploadedFile {
            filename: "abc.jpg".to_string(),
            size: 2_097_152,
        };
        let summary = PreviewSummary::new(&file, &uploaded);
        assert_eq!(summary.size_label(), "2.00 MB");
        assert_eq!(
            summary.to_string(),
            "File: cat.jpg\nSize: 2.00 MB\nType: image/jpeg"
        );
    }

    #[test]
    fn test_result_summary_labels() {
        let summary = ResultSummary::from(&processed());
        assert_eq!(summary.resolution_label(), "800 x 600px");
        assert_eq!(summary.size_label(), "0.49 MB");
        assert_eq!(summary.format_label(), "PNG (Transparent)");
        assert_eq!(summary.preview_link(), "/preview/abc_out.png");
        assert_eq!(summary.download_link(), "/download/abc_out.png");
        assert_eq!(
            summary.to_string(),
            "Resolution: 800 x 600px\nSize: 0.49 MB\nFormat: PNG (Transparent)"
        );
    }

    #[test]
    fn test_clear_releases_everything() {
        let file = SelectedFile::from_bytes("cat.jpg", "image/jpeg", vec![0u8; 10]);
        let uploaded = UploadedFile {
            filename: "abc.jpg".to_string(),
            size: 10,
        };
        let mut view = ViewModel::default();
        view.show_preview(&file, &uploaded);
        view.show_result(&processed());
        assert_eq!(view.download_link().as_deref(), Some("/download/abc_out.png"));

        view.clear();
        assert!(view.local_preview.is_none());
        assert!(view.preview.is_none());
        assert!(view.result.is_none());
        assert!(view.download_link().is_none());
    }
}
