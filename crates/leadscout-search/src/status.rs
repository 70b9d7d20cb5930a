//! Human-readable progress text for a run.

use std::sync::{Mutex, PoisonError};

/// Receives status text as a run progresses. An empty string clears it.
pub trait StatusReporter: Send + Sync {
    fn report(&self, status: &str);
}

/// Drops every update.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentReporter;

impl StatusReporter for SilentReporter {
    fn report(&self, _status: &str) {}
}

/// Keeps the latest status text for callers that poll, and mirrors each
/// update to `tracing`.
#[derive(Debug, Default)]
pub struct StatusBoard {
    current: Mutex<String>,
}

impl StatusBoard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn current(&self) -> String {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn clear(&self) {
        self.report("");
    }
}

impl StatusReporter for StatusBoard {
    fn report(&self, status: &str) {
        if !status.is_empty() {
            tracing::debug!(status, "search status");
        }
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        status.clone_into(&mut *current);
    }
}
