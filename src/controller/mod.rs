//! Workflow controller: the upload → preview → processing → result state machine
//!
//! The controller owns the [`SessionState`], the [`ViewModel`] and the
//! [`ErrorBanner`]. Events go through [`WorkflowController::dispatch`], which
//! looks the event up in a [`TransitionTable`] and runs the transition.
//! `dispatch` borrows the controller mutably for the whole transition, so no
//! other event can be handled while a network call is pending.
//!
//! Every failure ends in the banner and leaves the workflow in the nearest
//! safe phase: `Upload` for validation and upload failures, `Preview` for
//! processing failures.

mod dispatch;

pub use dispatch::{Event, EventKind, Outcome, TransitionFn, TransitionTable};

use crate::banner::ErrorBanner;
use crate::config::ClientConfig;
use crate::session::{Phase, SessionState};
use crate::transport::Transport;
use crate::types::SelectedFile;
use crate::validation;
use crate::view::ViewModel;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Message shown when removal is requested before anything was uploaded
pub const NO_FILE_SELECTED_MESSAGE: &str = "No file selected. Please upload an image first.";

/// Drives the workflow in response to user events and transport outcomes
pub struct WorkflowController {
    session: SessionState,
    view: ViewModel,
    banner: ErrorBanner,
    transport: Arc<dyn Transport>,
    transitions: TransitionTable,
    phase_tx: watch::Sender<Phase>,
}

impl std::fmt::Debug for WorkflowController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowController")
            .field("session", &self.session)
            .field("view", &self.view)
            .field("banner", &self.banner)
            .field("transitions", &self.transitions)
            .finish_non_exhaustive()
    }
}

impl WorkflowController {
    /// Create a controller in the initial `Upload` phase
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, config: &ClientConfig) -> Self {
        Self::with_transitions(transport, config.error_dismiss_after, TransitionTable::standard())
    }

    /// Create a controller with a custom transition table
    #[must_use]
    pub fn with_transitions(
        transport: Arc<dyn Transport>,
        error_dismiss_after: Duration,
        transitions: TransitionTable,
    ) -> Self {
        let (phase_tx, _) = watch::channel(Phase::Upload);
        Self {
            session: SessionState::new(),
            view: ViewModel::default(),
            banner: ErrorBanner::new(error_dismiss_after),
            transport,
            transitions,
            phase_tx,
        }
    }

    /// Handle one user event
    pub async fn dispatch(&mut self, event: Event) -> Outcome {
        let kind = event.kind();
        let Some(transition) = self.transitions.get(kind) else {
            return self.ignore(kind);
        };

        tracing::debug!(event = ?kind, phase = %self.session.phase(), "Dispatching event");
        let outcome = transition(self, event).await;
        debug_assert!(self.session.is_consistent(), "session invariants broken");
        tracing::debug!(event = ?kind, outcome = ?outcome, "Event handled");
        outcome
    }

    #[must_use]
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.session.phase()
    }

    #[must_use]
    pub fn view(&self) -> &ViewModel {
        &self.view
    }

    #[must_use]
    pub fn banner(&self) -> &ErrorBanner {
        &self.banner
    }

    /// Currently visible error message
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        self.banner.message()
    }

    /// Watch phase changes, including the transient `Processing` phase
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Phase> {
        self.phase_tx.subscribe()
    }

    pub(crate) async fn select_file(&mut self, file: SelectedFile) -> Outcome {
        let phase = self.session.phase();
        if phase != Phase::Upload {
            return self.ignore(EventKind::FileSelected);
        }

        if let Err(e) = validation::validate(&file) {
            tracing::info!(file = %file.name, reason = ?e, "Selected file rejected");
            return self.fail(e.to_string());
        }

        self.view.release_local_preview();

        let transport = Arc::clone(&self.transport);
        match transport.upload(&file).await {
            Ok(uploaded) => {
                self.session.enter_preview(uploaded.filename.clone());
                self.view.show_preview(&file, &uploaded);
                self.publish_phase();
                Outcome::Transitioned {
                    from: phase,
                    to: Phase::Preview,
                }
            },
            Err(e) => {
                if e.is_fault() {
                    tracing::warn!(error = %e, file = %file.name, "Upload failed");
                }
                self.fail(e.user_message().to_string())
            },
        }
    }

    pub(crate) async fn remove_background(&mut self) -> Outcome {
        if self.session.source_filename().is_none() {
            return self.fail(NO_FILE_SELECTED_MESSAGE.to_string());
        }

        let phase = self.session.phase();
        if phase != Phase::Preview {
            return self.ignore(EventKind::RemoveBackground);
        }

        let source = match self.session.begin_processing() {
            Ok(source) => source,
            Err(e) => return self.fail(e.to_string()),
        };
        self.publish_phase();

        let transport = Arc::clone(&self.transport);
        let result = transport.remove_background(&source).await;

        match result {
            Ok(image) => match self.session.enter_result(image.output_filename.clone()) {
                Ok(()) => {
                    self.view.show_result(&image);
                    self.publish_phase();
                    Outcome::Transitioned {
                        from: phase,
                        to: Phase::Result,
                    }
                },
                Err(e) => {
                    self.session.return_to_preview();
                    self.publish_phase();
                    self.fail(e.to_string())
                },
            },
            Err(e) => {
                if e.is_fault() {
                    tracing::warn!(error = %e, source = %source, "Background removal failed");
                }
                self.session.return_to_preview();
                self.publish_phase();
                self.fail(e.user_message().to_string())
            },
        }
    }

    pub(crate) fn reset(&mut self) -> Outcome {
        let from = self.session.phase();
        self.session.reset();
        self.view.clear();
        self.banner.hide();
        self.publish_phase();
        tracing::debug!(from = %from, "Session reset");
        Outcome::Transitioned {
            from,
            to: Phase::Upload,
        }
    }

    pub(crate) fn download(&mut self) -> Outcome {
        let phase = self.session.phase();
        match (phase, self.view.download_link()) {
            (Phase::Result, Some(link)) => {
                tracing::info!(link = %link, "Download requested");
                Outcome::Unchanged(phase)
            },
            _ => self.ignore(EventKind::Download),
        }
    }

    pub(crate) fn close_error(&mut self) -> Outcome {
        self.banner.hide();
        Outcome::Unchanged(self.session.phase())
    }

    pub(crate) fn ignore(&self, kind: EventKind) -> Outcome {
        let phase = self.session.phase();
        tracing::debug!(event = ?kind, phase = %phase, "Event not applicable, ignored");
        Outcome::Ignored { phase, kind }
    }

    fn fail(&mut self, message: String) -> Outcome {
        self.banner.show(message.clone());
        Outcome::Rejected {
            phase: self.session.phase(),
            message,
        }
    }

    fn publish_phase(&self) {
        self.phase_tx.send_replace(self.session.phase());
    }
}
