//! Workflow phases and the session state owned by the controller

use crate::error::{ClientError, Result};
use serde::{Deserialize, Serialize};

/// Discrete step of the upload/process/result workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Phase {
    /// Waiting for a file (initial phase)
    #[default]
    Upload,
    /// A file is uploaded and shown; removal can be requested
    Preview,
    /// Background removal is in flight
    Processing,
    /// The processed image is available for download
    Result,
}

impl Phase {
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Phase::Upload => "Waiting for an image",
            Phase::Preview => "Image uploaded",
            Phase::Processing => "Removing background",
            Phase::Result => "Background removed",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Upload => write!(f, "upload"),
            Self::Preview => write!(f, "preview"),
            Self::Processing => write!(f, "processing"),
            Self::Result => write!(f, "result"),
        }
    }
}

/// Identifiers tracked for one interaction, plus the current phase
///
/// Fields only change through the transition methods below, which keep these
/// invariants:
/// - an output filename is only ever present alongside a source filename
/// - `Result` always has an output filename
/// - `Preview` always has a source filename and never an output filename
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SessionState {
    phase: Phase,
    source_filename: Option<String>,
    output_filename: Option<String>,
}

impl SessionState {
    /// Initial state: nothing uploaded, `Upload` phase
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn source_filename(&self) -> Option<&str> {
        self.source_filename.as_deref()
    }

    #[must_use]
    pub fn output_filename(&self) -> Option<&str> {
        self.output_filename.as_deref()
    }

    /// Record a successful upload and move to `Preview`
    pub(crate) fn enter_preview(&mut self, source_filename: String) {
        self.source_filename = Some(source_filename);
        self.output_filename = None;
        self.phase = Phase::Preview;
    }

    /// Move to `Processing`, returning the source filename to process
    pub(crate) fn begin_processing(&mut self) -> Result<String> {
        let source = self
            .source_filename
            .clone()
            .ok_or_else(|| ClientError::invalid_transition("processing requires an uploaded file"))?;
        self.phase = Phase::Processing;
        Ok(source)
    }

    /// Record a successful removal and move to `Result`
    pub(crate) fn enter_result(&mut self, output_filename: String) -> Result<()> {
        if self.source_filename.is_none() {
            return Err(ClientError::invalid_transition(
                "an output file cannot exist without a source file",
            ));
        }
        self.output_filename = Some(output_filename);
        self.phase = Phase::Result;
        Ok(())
    }

    /// Processing failed: back to `Preview` with the source kept
    pub(crate) fn return_to_preview(&mut self) {
        self.output_filename = None;
        self.phase = if self.source_filename.is_some() {
            Phase::Preview
        } else {
            Phase::Upload
        };
    }

    /// Forget everything and return to the initial state
    pub(crate) fn reset(&mut self) {
        *self = Self::new();
    }

    /// Whether the documented invariants currently hold
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let output_has_source = self.output_filename.is_none() || self.source_filename.is_some();
        let phase_ok = match self.phase {
            Phase::Upload | Phase::Processing => true,
            Phase::Preview => self.source_filename.is_some() && self.output_filename.is_none(),
            Phase::Result => self.output_filename.is_some(),
        };
        output_has_source && phase_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = SessionState::new();
        assert_eq!(state.phase(), Phase::Upload);
        assert!(state.source_filename().is_none());
        assert!(state.output_filename().is_none());
        assert!(state.is_consistent());
    }

    #[test]
    fn test_happy_path_transitions() {
        let mut state = SessionState::new();

        state.enter_preview("abc.jpg".to_string());
        assert_eq!(state.phase(), Phase::Preview);
        assert_eq!(state.source_filename(), Some("abc.jpg"));
        assert!(state.is_consistent());

        let source = state.begin_processing().unwrap();
        assert_eq!(source, "abc.jpg");
        assert_eq!(state.phase(), Phase::Processing);
        assert!(state.is_consistent());

        state.enter_result("abc_out.png".to_string()).unwrap();
        assert_eq!(state.phase(), Phase::Result);
        assert_eq!(state.output_filename(), Some("abc_out.png"));
        assert!(state.is_consistent());
    }

    #[test]
    fn test_processing_without_source_is_refused() {
        let mut state = SessionState::new();
        assert!(state.begin_processing().is_err());
        assert_eq!(state.phase(), Phase::Upload);

        assert!(state.enter_result("orphan.png".to_string()).is_err());
        assert!(state.output_filename().is_none());
        assert!(state.is_consistent());
    }

    #[test]
    fn test_failed_processing_returns_to_preview() {
        let mut state = SessionState::new();
        state.enter_preview("abc.jpg".to_string());
        state.begin_processing().unwrap();

        state.return_to_preview();
        assert_eq!(state.phase(), Phase::Preview);
        assert_eq!(state.source_filename(), Some("abc.jpg"));
        assert!(state.is_consistent());
    }

    #[test]
    fn test_reset_from_every_phase() {
        let mut preview = SessionState::new();
        preview.enter_preview("a.png".to_string());

        let mut processing = preview.clone();
        processing.begin_processing().unwrap();

        let mut result = processing.clone();
        result.enter_result("a_out.png".to_string()).unwrap();

        for mut state in [SessionState::new(), preview, processing, result] {
            state.reset();
            assert_eq!(state, SessionState::new());
            state.reset();
            assert_eq!(state, SessionState::new());
        }
    }

    #[test]
    fn test_new_upload_clears_previous_output() {
        let mut state = SessionState::new();
        state.enter_preview("first.png".to_string());
        state.begin_processing().unwrap();
        state.enter_result("first_out.png".to_string()).unwrap();

        state.enter_preview("second.png".to_string());
        assert_eq!(state.phase(), Phase::Preview);
        assert!(state.output_filename().is_none());
        assert!(state.is_consistent());
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(Phase::Upload.to_string(), "upload");
        assert_eq!(Phase::Processing.to_string(), "processing");
        assert_eq!(Phase::Result.description(), "Background removed");
    }
}
