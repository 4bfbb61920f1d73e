//! Scripted transport for exercising the workflow without a server

use super::{ProcessResult, Transport, TransportError, UploadResult};
use crate::session::Phase;
use crate::types::{ProcessedImage, SelectedFile, UploadedFile};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};
use tokio::sync::watch;

/// A request the mock received
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportCall {
    Upload {
        name: String,
        mime_type: String,
        size: u64,
    },
    RemoveBackground {
        source_filename: String,
        /// Workflow phase observed when the request arrived, if a probe is attached
        phase: Option<Phase>,
    },
}

/// Transport answering from queues of scripted results
///
/// An operation with nothing queued answers with a transport fault.
#[derive(Debug, Default)]
pub struct MockTransport {
    uploads: Mutex<VecDeque<UploadResult>>,
    removals: Mutex<VecDeque<ProcessResult>>,
    calls: Mutex<Vec<TransportCall>>,
    phase_probe: Mutex<Option<watch::Receiver<Phase>>>,
}

impl MockTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the answer to the next upload
    pub fn push_upload(&self, result: UploadResult) {
        lock(&self.uploads).push_back(result);
    }

    /// Queue the answer to the next background removal
    pub fn push_removal(&self, result: ProcessResult) {
        lock(&self.removals).push_back(result);
    }

    pub fn upload_succeeds(&self, filename: &str, size: u64) {
        self.push_upload(Ok(UploadedFile {
            filename: filename.to_string(),
            size,
        }));
    }

    pub fn removal_succeeds(&self, output_filename: &str, width: u32, height: u32, size: u64) {
        self.push_removal(Ok(ProcessedImage {
            output_filename: output_filename.to_string(),
            width,
            height,
            size,
        }));
    }

    /// Record the workflow phase at the moment each removal request arrives
    pub fn observe_phase(&self, receiver: watch::Receiver<Phase>) {
        *lock(&self.phase_probe) = Some(receiver);
    }

    /// Every request received so far, in order
    #[must_use]
    pub fn calls(&self) -> Vec<TransportCall> {
        lock(&self.calls).clone()
    }

    #[must_use]
    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    #[must_use]
    pub fn removal_calls(&self) -> Vec<TransportCall> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, TransportCall::RemoveBackground { .. }))
            .collect()
    }

    fn unscripted(operation: &str) -> TransportError {
        TransportError::Network(format!("no scripted response for {}", operation))
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn upload(&self, file: &SelectedFile) -> UploadResult {
        lock(&self.calls).push(TransportCall::Upload {
            name: file.name.clone(),
            mime_type: file.mime_type.clone(),
            size: file.size,
        });
        let next = lock(&self.uploads).pop_front();
        next.unwrap_or_else(|| Err(Self::unscripted("upload")))
    }

    async fn remove_background(&self, source_filename: &str) -> ProcessResult {
        let phase = lock(&self.phase_probe).as_ref().map(|rx| *rx.borrow());
        lock(&self.calls).push(TransportCall::RemoveBackground {
            source_filename: source_filename.to_string(),
            phase,
        });
        let next = lock(&self.removals).pop_front();
        next.unwrap_or_else(|| Err(Self::unscripted("remove-bg")))
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
