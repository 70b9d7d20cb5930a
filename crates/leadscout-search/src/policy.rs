//! Retry and delay policy applied at every suspension point of a run.
//!
//! A failed page is retried a bounded number of times after a fixed backoff;
//! after that the area is given up rather than failing the run. Every wait
//! (backoff, pagination, between areas, between categories) goes through
//! [`sleep_or_cancel`] so a stop request ends it immediately.

use std::time::Duration;

use leadscout_core::AppConfig;
use leadscout_places::{PlacesError, TextSearchPage};
use tokio_util::sync::CancellationToken;

use crate::cancel::sleep_or_cancel;
use crate::source::{PageRequest, PlaceSource};
use crate::status::StatusReporter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayPolicy {
    /// Retries after a failed page request before the area is abandoned.
    pub page_retries: u32,
    /// Fixed wait before each retry.
    pub page_retry_backoff: Duration,
    /// Wait before consuming a next-page token. Upstream tokens are not
    /// valid until some time after they are issued; requesting them early
    /// yields invalid or empty pages.
    pub pagination_delay: Duration,
    pub inter_area_delay: Duration,
    pub inter_category_delay: Duration,
}

impl Default for DelayPolicy {
    fn default() -> Self {
        Self {
            page_retries: 1,
            page_retry_backoff: Duration::from_millis(2_000),
            pagination_delay: Duration::from_millis(2_000),
            inter_area_delay: Duration::from_millis(1_000),
            inter_category_delay: Duration::from_millis(1_500),
        }
    }
}

impl DelayPolicy {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            page_retries: config.page_retries,
            page_retry_backoff: Duration::from_millis(config.page_retry_backoff_ms),
            pagination_delay: Duration::from_millis(config.pagination_delay_ms),
            inter_area_delay: Duration::from_millis(config.inter_area_delay_ms),
            inter_category_delay: Duration::from_millis(config.inter_category_delay_ms),
        }
    }

    /// Same retry count as the default, with every wait set to zero.
    #[must_use]
    pub fn immediate() -> Self {
        Self {
            page_retry_backoff: Duration::ZERO,
            pagination_delay: Duration::ZERO,
            inter_area_delay: Duration::ZERO,
            inter_category_delay: Duration::ZERO,
            ..Self::default()
        }
    }

    /// Total attempts per page, first try included.
    #[must_use]
    pub fn page_attempts(&self) -> u32 {
        self.page_retries.saturating_add(1)
    }
}

/// Result of fetching one page under the retry policy.
#[derive(Debug)]
pub enum PageFetch {
    Page(TextSearchPage),
    /// Every attempt failed; carries the last error.
    Abandoned(PlacesError),
    Cancelled,
}

/// Fetches one page, retrying failures per `policy`.
///
/// Cancellation is never retried: a [`PlacesError::Cancelled`] from the
/// source, a token that fired during the request, or an interrupted backoff
/// all resolve to [`PageFetch::Cancelled`]. `area_label` prefixes the status
/// text reported on each failed attempt.
pub async fn fetch_page<S>(
    source: &S,
    request: &PageRequest<'_>,
    policy: &DelayPolicy,
    cancel: &CancellationToken,
    reporter: &dyn StatusReporter,
    area_label: &str,
) -> PageFetch
where
    S: PlaceSource + ?Sized,
{
    let attempts = policy.page_attempts();
    let mut attempt = 1u32;

    loop {
        if cancel.is_cancelled() {
            return PageFetch::Cancelled;
        }

        let err = match source.search(request, cancel).await {
            Ok(page) => return PageFetch::Page(page),
            Err(err) if err.is_cancelled() || cancel.is_cancelled() => {
                return PageFetch::Cancelled;
            }
            Err(err) => err,
        };

        if attempt >= attempts {
            tracing::warn!(
                area = area_label,
                category = %request.target.id,
                attempts,
                error = %err,
                "page request failed repeatedly, skipping area"
            );
            reporter.report(&format!(
                "{area_label}: skipped after {attempts} failed attempts"
            ));
            return PageFetch::Abandoned(err);
        }

        tracing::warn!(
            area = area_label,
            category = %request.target.id,
            attempt,
            attempts,
            backoff_ms = u64::try_from(policy.page_retry_backoff.as_millis()).unwrap_or(u64::MAX),
            error = %err,
            "page request failed, retrying after backoff"
        );
        attempt += 1;
        reporter.report(&format!(
            "{area_label}: request failed, retrying (attempt {attempt}/{attempts})"
        ));

        if sleep_or_cancel(policy.page_retry_backoff, cancel)
            .await
            .is_interrupted()
        {
            return PageFetch::Cancelled;
        }
    }
}
