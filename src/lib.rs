#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::uninlined_format_args)]

//! # Background Removal Workflow Client
//!
//! Client-side controller for a single-image background removal service:
//! the user selects an image, the client validates and uploads it, asks the
//! service to remove the background, and surfaces the transparent result for
//! download.
//!
//! ## Components
//!
//! - **Validation**: type and size checks run before any network call
//! - **Transport**: the `upload` and `remove_background` operations, over HTTP
//!   ([`HttpTransport`]) or scripted ([`MockTransport`])
//! - **Controller**: the phase state machine driven by [`Event`]s through an
//!   explicit transition table
//! - **Banner**: a dismissible error message with a cancellable auto-dismiss
//! - **View model**: preview and result summaries for any front end
//! - **CLI**: optional terminal front end (enable with the `cli` feature)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bgremove_client::{ClientConfig, Event, HttpTransport, Phase, SelectedFile, WorkflowController};
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ClientConfig::builder()
//!     .server_url("http://127.0.0.1:5000")
//!     .build()?;
//! let transport = Arc::new(HttpTransport::new(&config)?);
//! let mut controller = WorkflowController::new(transport, &config);
//!
//! let file = SelectedFile::from_path("portrait.jpg").await?;
//! controller.dispatch(Event::FileSelected(file)).await;
//! controller.dispatch(Event::RemoveBackground).await;
//!
//! if controller.phase() == Phase::Result {
//!     let result = controller.view().result.as_ref().unwrap();
//!     println!("{}", result);
//!     println!("Download: {}", result.download_link());
//! } else if let Some(message) = controller.error_message() {
//!     eprintln!("{}", message);
//! }
//! # Ok(())
//! # }
//! ```

pub mod banner;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod format;
pub mod session;
#[cfg(feature = "cli")]
pub mod tracing_config;
pub mod transport;
pub mod types;
pub mod validation;
pub mod view;

// Public API exports
pub use banner::ErrorBanner;
pub use config::{ClientConfig, ClientConfigBuilder};
pub use controller::{
    Event, EventKind, Outcome, TransitionFn, TransitionTable, WorkflowController,
    NO_FILE_SELECTED_MESSAGE,
};
pub use error::{ClientError, Result};
pub use format::{file_extension, format_file_size, format_megabytes};
pub use session::{Phase, SessionState};
pub use transport::{
    download_path, preview_path, HttpTransport, MockTransport, ProcessResult, Transport,
    TransportCall, TransportError, UploadResult, NETWORK_ERROR_MESSAGE,
};
pub use types::{FileSource, ProcessedImage, SelectedFile, UploadedFile};
pub use validation::{
    is_valid_file_size, is_valid_image_file, validate, ValidationError, ALLOWED_MIME_TYPES,
    MAX_FILE_SIZE,
};
pub use view::{LocalPreview, PreviewSummary, ResultSummary, ViewModel, RESULT_FORMAT_LABEL};

#[cfg(feature = "cli")]
pub use tracing_config::{init_cli_tracing, TracingConfig, TracingFormat};
