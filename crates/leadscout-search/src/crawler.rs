//! Paginated crawl of one category within one area.

use std::collections::HashSet;

use leadscout_core::{Area, Geography, Lead, SearchTarget};
use tokio_util::sync::CancellationToken;

use crate::cancel::sleep_or_cancel;
use crate::error::SinkError;
use crate::policy::{fetch_page, DelayPolicy, PageFetch};
use crate::sink::LeadSink;
use crate::source::{PageRequest, PlaceSource};
use crate::status::StatusReporter;

/// Per-category lead cap and how much of it earlier areas already used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AreaBudget {
    pub cap: usize,
    pub collected: usize,
}

impl AreaBudget {
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.cap.saturating_sub(self.collected)
    }
}

/// One category × area unit of work.
#[derive(Debug, Clone, Copy)]
pub struct AreaJob<'a> {
    pub target: &'a SearchTarget,
    pub area: &'a Area,
    pub geography: &'a Geography,
    pub credential: &'a str,
    pub budget: AreaBudget,
}

#[derive(Debug)]
pub enum AreaOutcome {
    /// The last page carried no next-page token.
    Exhausted,
    CapReached,
    Cancelled,
    /// A page kept failing; the area was given up.
    Abandoned,
    /// The lead sink failed; the run cannot continue.
    SinkFailed(SinkError),
}

#[derive(Debug)]
pub struct AreaHarvest {
    /// Newly accepted leads, in upstream order.
    pub leads: Vec<Lead>,
    /// Raw result count across fetched pages, before dedup and cap.
    pub found: usize,
    pub outcome: AreaOutcome,
}

/// Pages through one area for one category.
pub struct AreaCrawler<'a, S: ?Sized> {
    source: &'a S,
    policy: &'a DelayPolicy,
    reporter: &'a dyn StatusReporter,
}

impl<'a, S> AreaCrawler<'a, S>
where
    S: PlaceSource + ?Sized,
{
    pub fn new(source: &'a S, policy: &'a DelayPolicy, reporter: &'a dyn StatusReporter) -> Self {
        Self {
            source,
            policy,
            reporter,
        }
    }

    /// Crawls `job.area` until pages run out, the budget is spent, or
    /// `cancel` fires.
    ///
    /// `seen` is the category-wide set of accepted place ids; every accepted
    /// lead's id is added to it, so later areas of the same category skip
    /// it. `sink` receives each page's new leads before the next page is
    /// requested.
    ///
    /// Page failures never escape: after the policy's retries the area is
    /// abandoned and whatever it already produced is kept.
    pub async fn crawl(
        &self,
        job: &AreaJob<'_>,
        seen: &mut HashSet<String>,
        cancel: &CancellationToken,
        mut sink: Option<&mut (dyn LeadSink + '_)>,
    ) -> AreaHarvest {
        let label = job.area.label(&job.geography.city);
        let cap = job.budget.cap;
        let mut collected = job.budget.collected;
        let mut leads = Vec::new();
        let mut found = 0usize;
        let mut page_token: Option<String> = None;
        let mut pages = 0usize;

        let outcome = loop {
            if collected >= cap {
                break AreaOutcome::CapReached;
            }
            if cancel.is_cancelled() {
                break AreaOutcome::Cancelled;
            }

            let request = PageRequest {
                geography: job.geography,
                target: job.target,
                area: job.area,
                page_token: page_token.as_deref(),
                credential: job.credential,
            };

            let page = match fetch_page(
                self.source,
                &request,
                self.policy,
                cancel,
                self.reporter,
                label,
            )
            .await
            {
                PageFetch::Page(page) => page,
                PageFetch::Cancelled => break AreaOutcome::Cancelled,
                PageFetch::Abandoned(_) => break AreaOutcome::Abandoned,
            };
            pages += 1;
            found += page.hits.len();

            let mut page_leads = Vec::new();
            for hit in page.hits {
                if cancel.is_cancelled() || collected >= cap {
                    break;
                }
                if !seen.insert(hit.place_id.clone()) {
                    continue;
                }
                page_leads.push(Lead::from_hit(hit, job.target, job.geography));
                collected += 1;
                self.reporter
                    .report(&format!("{label}: {collected}/{cap} leads"));
            }

            tracing::debug!(
                category = %job.target.id,
                area = label,
                page = pages,
                accepted = page_leads.len(),
                collected,
                cap,
                "page processed"
            );

            let sink_result = match sink.as_deref_mut() {
                Some(sink) if !page_leads.is_empty() => sink.on_leads_found(&page_leads).await,
                _ => Ok(()),
            };
            leads.extend(page_leads);
            if let Err(err) = sink_result {
                break AreaOutcome::SinkFailed(err);
            }

            if collected >= cap {
                break AreaOutcome::CapReached;
            }
            if cancel.is_cancelled() {
                break AreaOutcome::Cancelled;
            }
            let Some(next) = page.next_page_token else {
                break AreaOutcome::Exhausted;
            };
            if sleep_or_cancel(self.policy.pagination_delay, cancel)
                .await
                .is_interrupted()
            {
                break AreaOutcome::Cancelled;
            }
            page_token = Some(next);
        };

        tracing::debug!(
            category = %job.target.id,
            area = label,
            pages,
            found,
            accepted = leads.len(),
            outcome = ?outcome,
            "area crawl finished"
        );

        AreaHarvest {
            leads,
            found,
            outcome,
        }
    }
}
