//! Dismissible error banner with a cancellable auto-dismiss timer

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Default)]
struct BannerState {
    message: Option<String>,
    /// Bumped on every show/hide so a stale timer never clears a newer message
    generation: u64,
}

/// Single-line error message shown over whatever phase is active
///
/// Showing a new message cancels the pending dismiss of the previous one,
/// so at most one dismiss fires per visible message.
#[derive(Debug)]
pub struct ErrorBanner {
    state: Arc<Mutex<BannerState>>,
    dismiss_after: Duration,
    pending: Option<CancellationToken>,
}

impl ErrorBanner {
    #[must_use]
    pub fn new(dismiss_after: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(BannerState::default())),
            dismiss_after,
            pending: None,
        }
    }

    /// Show a message and schedule its dismissal
    ///
    /// Must be called from within a tokio runtime.
    pub fn show<S: Into<String>>(&mut self, message: S) {
        self.cancel_pending();

        let message = message.into();
        tracing::debug!(message = %message, "Showing error banner");

        let generation = {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            state.generation += 1;
            state.message = Some(message);
            state.generation
        };

        let token = CancellationToken::new();
        let task_token = token.clone();
        let state = Arc::clone(&self.state);
        let delay = self.dismiss_after;

        tokio::spawn(async move {
            tokio::select! {
                () = task_token.cancelled() => {}
                () = tokio::time::sleep(delay) => {
                    let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
                    if state.generation == generation {
                        state.message = None;
                        tracing::trace!("Error banner auto-dismissed");
                    }
                }
            }
        });

        self.pending = Some(token);
    }

    /// Hide the banner now and cancel its timer
    pub fn hide(&mut self) {
        self.cancel_pending();
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.generation += 1;
        state.message = None;
    }

    /// The visible message, if any
    #[must_use]
    pub fn message(&self) -> Option<String> {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .message
            .clone()
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.message().is_some()
    }

    #[must_use]
    pub fn dismiss_after(&self) -> Duration {
        self.dismiss_after
    }

    fn cancel_pending(&mut self) {
        if let Some(token) = self.pending.take() {
            token.cancel();
        }
    }
}

impl Drop for ErrorBanner {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}
