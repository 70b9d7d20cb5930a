//! Single-owner slot for the live search run.
//!
//! At most one run is active per [`SearchSession`]. Starting a run swaps a
//! fresh cancellation token into the slot and cancels whichever token it
//! displaced; the returned [`RunGuard`] empties the slot again when the run
//! ends, however it ends.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::status::StatusBoard;

#[derive(Debug)]
struct ActiveRun {
    run_id: Uuid,
    token: CancellationToken,
}

#[derive(Debug, Default)]
pub struct SearchSession {
    active: Mutex<Option<ActiveRun>>,
    status: StatusBoard,
}

impl SearchSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new run, cancelling any run that is still live.
    pub fn begin(&self) -> RunGuard<'_> {
        let run_id = Uuid::new_v4();
        let token = CancellationToken::new();

        let displaced = self.slot().replace(ActiveRun {
            run_id,
            token: token.clone(),
        });

        if let Some(previous) = displaced {
            previous.token.cancel();
            tracing::info!(
                run_id = %run_id,
                superseded = %previous.run_id,
                "cancelled previous search run"
            );
        }

        RunGuard {
            session: self,
            run_id,
            token,
        }
    }

    /// Signals the live run to stop. Returns `false` if nothing was running.
    pub fn stop(&self) -> bool {
        match self.slot().as_ref() {
            Some(run) => {
                tracing::info!(run_id = %run.run_id, "stop requested for search run");
                run.token.cancel();
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn is_searching(&self) -> bool {
        self.slot().is_some()
    }

    #[must_use]
    pub fn current_run_id(&self) -> Option<Uuid> {
        self.slot().as_ref().map(|run| run.run_id)
    }

    /// Latest status text; empty when idle.
    #[must_use]
    pub fn status(&self) -> String {
        self.status.current()
    }

    #[must_use]
    pub fn status_board(&self) -> &StatusBoard {
        &self.status
    }

    fn slot(&self) -> MutexGuard<'_, Option<ActiveRun>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Handle to the live run. Dropping it clears the session's slot and status
/// text, unless a newer run has already taken the slot over.
#[derive(Debug)]
pub struct RunGuard<'a> {
    session: &'a SearchSession,
    run_id: Uuid,
    token: CancellationToken,
}

impl RunGuard<'_> {
    #[must_use]
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    #[must_use]
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        let mut slot = self.session.slot();
        if slot.as_ref().is_some_and(|run| run.run_id == self.run_id) {
            *slot = None;
            drop(slot);
            self.session.status.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::status::StatusReporter;

    use super::*;

    #[test]
    fn begin_marks_session_searching() {
        let session = SearchSession::new();
        assert!(!session.is_searching());

        let guard = session.begin();
        assert!(session.is_searching());
        assert_eq!(session.current_run_id(), Some(guard.run_id()));
        assert!(!guard.token().is_cancelled());
    }

    #[test]
    fn dropping_guard_clears_slot_and_status() {
        let session = SearchSession::new();
        {
            let _guard = session.begin();
            session.status_board().report("Centro: 1/20 leads");
        }
        assert!(!session.is_searching());
        assert!(session.status().is_empty());
    }

    #[test]
    fn new_run_cancels_previous_token() {
        let session = SearchSession::new();
        let first = session.begin();
        let second = session.begin();

        assert!(first.token().is_cancelled());
        assert!(!second.token().is_cancelled());
        assert_eq!(session.current_run_id(), Some(second.run_id()));
    }

    #[test]
    fn superseded_guard_leaves_newer_run_in_place() {
        let session = SearchSession::new();
        let first = session.begin();
        let second = session.begin();
        session.status_board().report("Norte: 2/20 leads");

        drop(first);

        assert!(session.is_searching());
        assert_eq!(session.current_run_id(), Some(second.run_id()));
        assert_eq!(session.status(), "Norte: 2/20 leads");
    }

    #[test]
    fn stop_cancels_live_run() {
        let session = SearchSession::new();
        let guard = session.begin();

        assert!(session.stop());
        assert!(guard.token().is_cancelled());
    }

    #[test]
    fn stop_without_run_is_noop() {
        let session = SearchSession::new();
        assert!(!session.stop());
    }
}
