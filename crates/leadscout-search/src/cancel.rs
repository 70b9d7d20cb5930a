use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// How a cancellation-aware sleep ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SleepOutcome {
    Elapsed,
    Interrupted,
}

impl SleepOutcome {
    #[must_use]
    pub fn is_interrupted(self) -> bool {
        self == SleepOutcome::Interrupted
    }
}

/// Sleeps for `duration` unless `cancel` fires first.
///
/// Cancellation wakes the sleeper immediately through the token's listener;
/// nothing polls. An already-cancelled token returns `Interrupted` without
/// sleeping, and a zero duration returns `Elapsed` without yielding.
pub async fn sleep_or_cancel(duration: Duration, cancel: &CancellationToken) -> SleepOutcome {
    if cancel.is_cancelled() {
        return SleepOutcome::Interrupted;
    }
    if duration.is_zero() {
        return SleepOutcome::Elapsed;
    }

    tokio::select! {
        biased;
        () = cancel.cancelled() => SleepOutcome::Interrupted,
        () = tokio::time::sleep(duration) => SleepOutcome::Elapsed,
    }
}
