//! Event kinds and the table mapping them to transitions

use super::WorkflowController;
use crate::session::Phase;
use crate::types::SelectedFile;
use futures::future::BoxFuture;
use std::collections::HashMap;

/// Something the user did
#[derive(Debug, Clone)]
pub enum Event {
    /// A file was picked or dropped
    FileSelected(SelectedFile),
    /// The user asked for the background to be removed
    RemoveBackground,
    /// The user wants to pick a different image
    ChangeImage,
    /// The user wants to start over
    Reset,
    /// The user followed the download link
    Download,
    /// The user closed the error banner
    CloseError,
}

impl Event {
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            Self::FileSelected(_) => EventKind::FileSelected,
            Self::RemoveBackground => EventKind::RemoveBackground,
            Self::ChangeImage => EventKind::ChangeImage,
            Self::Reset => EventKind::Reset,
            Self::Download => EventKind::Download,
            Self::CloseError => EventKind::CloseError,
        }
    }
}

/// Discriminant of [`Event`], used as the dispatch key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    FileSelected,
    RemoveBackground,
    ChangeImage,
    Reset,
    Download,
    CloseError,
}

impl EventKind {
    pub const ALL: [EventKind; 6] = [
        EventKind::FileSelected,
        EventKind::RemoveBackground,
        EventKind::ChangeImage,
        EventKind::Reset,
        EventKind::Download,
        EventKind::CloseError,
    ];
}

/// What a dispatched event did to the workflow
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The phase changed
    Transitioned { from: Phase, to: Phase },
    /// Handled without a phase change
    Unchanged(Phase),
    /// An error banner was shown; `phase` is where the workflow settled
    Rejected { phase: Phase, message: String },
    /// Not applicable in the current phase
    Ignored { phase: Phase, kind: EventKind },
}

impl Outcome {
    /// Phase the workflow is in after the event
    #[must_use]
    pub fn phase(&self) -> Phase {
        match self {
            Self::Transitioned { to, .. } => *to,
            Self::Unchanged(phase) | Self::Rejected { phase, .. } | Self::Ignored { phase, .. } => {
                *phase
            },
        }
    }

    #[must_use]
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}

/// A transition: runs against the controller for one event
pub type TransitionFn = for<'a> fn(&'a mut WorkflowController, Event) -> BoxFuture<'a, Outcome>;

/// Map from event kind to the transition that handles it
#[derive(Clone)]
pub struct TransitionTable {
    entries: HashMap<EventKind, TransitionFn>,
}

impl std::fmt::Debug for TransitionTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut kinds: Vec<_> = self.entries.keys().collect();
        kinds.sort_by_key(|k| format!("{:?}", k));
        f.debug_struct("TransitionTable").field("kinds", &kinds).finish()
    }
}

impl Default for TransitionTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl TransitionTable {
    /// Table with no transitions; every event is ignored
    #[must_use]
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// The workflow's transitions
    ///
    /// | Event            | Transition                                   |
    /// |------------------|----------------------------------------------|
    /// | FileSelected     | validate, upload, Upload → Preview           |
    /// | RemoveBackground | Preview → Processing → Result (or Preview)   |
    /// | ChangeImage      | any → Upload, session cleared                |
    /// | Reset            | any → Upload, session cleared                |
    /// | Download         | Result, no state change                      |
    /// | CloseError       | hide the banner                              |
    #[must_use]
    pub fn standard() -> Self {
        Self::empty()
            .with(EventKind::FileSelected, on_file_selected)
            .with(EventKind::RemoveBackground, on_remove_background)
            .with(EventKind::ChangeImage, on_reset)
            .with(EventKind::Reset, on_reset)
            .with(EventKind::Download, on_download)
            .with(EventKind::CloseError, on_close_error)
    }

    /// Register or replace the transition for an event kind
    #[must_use]
    pub fn with(mut self, kind: EventKind, transition: TransitionFn) -> Self {
        self.entries.insert(kind, transition);
        self
    }

    #[must_use]
    pub fn get(&self, kind: EventKind) -> Option<TransitionFn> {
        self.entries.get(&kind).copied()
    }

    #[must_use]
    pub fn handles(&self, kind: EventKind) -> bool {
        self.entries.contains_key(&kind)
    }
}

fn on_file_selected(controller: &mut WorkflowController, event: Event) -> BoxFuture<'_, Outcome> {
    Box::pin(async move {
        match event {
            Event::FileSelected(file) => controller.select_file(file).await,
            other => controller.ignore(other.kind()),
        }
    })
}

fn on_remove_background(controller: &mut WorkflowController, _event: Event) -> BoxFuture<'_, Outcome> {
    Box::pin(controller.remove_background())
}

fn on_reset(controller: &mut WorkflowController, _event: Event) -> BoxFuture<'_, Outcome> {
    Box::pin(async move { controller.reset() })
}

fn on_download(controller: &mut WorkflowController, _event: Event) -> BoxFuture<'_, Outcome> {
    Box::pin(async move { controller.download() })
}

fn on_close_error(controller: &mut WorkflowController, _event: Event) -> BoxFuture<'_, Outcome> {
    Box::pin(async move { controller.close_error() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_table_covers_every_kind() {
        let table = TransitionTable::standard();
        for kind in EventKind::ALL {
            assert!(table.handles(kind), "{:?} has no transition", kind);
        }
    }

    #[test]
    fn test_empty_table() {
        let table = TransitionTable::empty();
        assert!(EventKind::ALL.iter().all(|k| !table.handles(*k)));
        assert!(table.get(EventKind::Reset).is_none());
    }

    #[test]
    fn test_event_kinds() {
        let file = SelectedFile::from_bytes("a.png", "image/png", vec![0u8]);
        assert_eq!(Event::FileSelected(file).kind(), EventKind::FileSelected);
        assert_eq!(Event::ChangeImage.kind(), EventKind::ChangeImage);
        assert_eq!(Event::CloseError.kind(), EventKind::CloseError);
    }

    #[test]
    fn test_outcome_phase() {
        let outcome = Outcome::Transitioned {
            from: Phase::Upload,
            to: Phase::Preview,
        };
        assert_eq!(outcome.phase(), Phase::Preview);

        let outcome = Outcome::Rejected {
            phase: Phase::Upload,
            message: "x".to_string(),
        };
        assert!(outcome.is_rejected());
        assert_eq!(outcome.phase(), Phase::Upload);
    }
}
