//! Category × area campaign controller.

use std::collections::HashSet;

use leadscout_core::{Area, Geography, Lead, SearchTarget};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::cancel::sleep_or_cancel;
use crate::crawler::{AreaBudget, AreaCrawler, AreaJob, AreaOutcome};
use crate::error::{SearchError, SinkError};
use crate::policy::DelayPolicy;
use crate::session::SearchSession;
use crate::sink::LeadSink;
use crate::source::PlaceSource;
use crate::status::StatusReporter;

/// Caller-supplied inputs for one run. Values are expected to be validated
/// by the caller except for the geography, which the run checks itself.
#[derive(Debug, Clone)]
pub struct CampaignRequest {
    pub geography: Geography,
    /// Every configured category, in search order.
    pub categories: Vec<SearchTarget>,
    /// Restricts the run to this single category when set.
    pub target_category_id: Option<String>,
    /// Neighborhood names; empty means the whole city.
    pub areas: Vec<String>,
    pub per_category_cap: usize,
    pub credential: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CampaignOutcome {
    /// `false` only for rejected requests and sink failures.
    pub success: bool,
    pub new_leads: Vec<Lead>,
    pub message: String,
    pub was_stopped: bool,
    /// Raw upstream results seen, before dedup and cap.
    pub total_found: usize,
    pub total_added: usize,
}

impl CampaignOutcome {
    fn rejected(err: &SearchError) -> Self {
        Self {
            success: false,
            new_leads: Vec::new(),
            message: err.to_string(),
            was_stopped: false,
            total_found: 0,
            total_added: 0,
        }
    }

    fn finished(new_leads: Vec<Lead>, total_found: usize, was_stopped: bool) -> Self {
        let total_added = new_leads.len();
        let verb = if was_stopped { "interrupted" } else { "completed" };
        Self {
            success: true,
            message: format!(
                "Search {verb}: {total_added} new leads added ({total_found} found)"
            ),
            new_leads,
            was_stopped,
            total_found,
            total_added,
        }
    }

    fn failed(
        err: &SearchError,
        new_leads: Vec<Lead>,
        total_found: usize,
        was_stopped: bool,
    ) -> Self {
        let total_added = new_leads.len();
        Self {
            success: false,
            message: format!("Search failed: {err} ({total_added} leads kept)"),
            new_leads,
            was_stopped,
            total_found,
            total_added,
        }
    }
}

/// Run-wide inputs shared by every category of a campaign.
#[derive(Clone, Copy)]
pub struct RunScope<'a> {
    pub geography: &'a Geography,
    pub areas: &'a [Area],
    pub cap: usize,
    pub credential: &'a str,
    pub cancel: &'a CancellationToken,
    pub reporter: &'a dyn StatusReporter,
}

/// Leads gathered for one category across all areas.
#[derive(Debug, Default)]
pub struct CategoryHarvest {
    pub leads: Vec<Lead>,
    pub found: usize,
    /// Set when the lead sink failed; the campaign stops on it.
    pub failure: Option<SinkError>,
}

/// Drives a run over every selected category and area.
pub struct Campaign<'a, S: ?Sized> {
    source: &'a S,
    policy: DelayPolicy,
}

impl<'a, S> Campaign<'a, S>
where
    S: PlaceSource + ?Sized,
{
    pub fn new(source: &'a S, policy: DelayPolicy) -> Self {
        Self { source, policy }
    }

    /// Runs the full crawl and summarizes it.
    ///
    /// Never returns an error: rejected requests, cancellation, and sink
    /// failures all resolve to a [`CampaignOutcome`]. A request without city
    /// or state is rejected before any session state changes or any search
    /// call is made. Otherwise the run takes over `session` (cancelling any
    /// run still live there) and releases it on return.
    pub async fn run(
        &self,
        session: &SearchSession,
        request: &CampaignRequest,
        mut sink: Option<&mut (dyn LeadSink + '_)>,
    ) -> CampaignOutcome {
        if !request.geography.is_complete() {
            return CampaignOutcome::rejected(&SearchError::MissingGeography);
        }
        let targets = match select_targets(
            &request.categories,
            request.target_category_id.as_deref(),
        ) {
            Ok(targets) => targets,
            Err(err) => return CampaignOutcome::rejected(&err),
        };

        let guard = session.begin();
        let cancel = guard.token().clone();
        let areas = Area::sequence(&request.areas);
        let scope = RunScope {
            geography: &request.geography,
            areas: &areas,
            cap: request.per_category_cap,
            credential: &request.credential,
            cancel: &cancel,
            reporter: session.status_board(),
        };

        tracing::info!(
            run_id = %guard.run_id(),
            city = %request.geography.city,
            state = %request.geography.state,
            categories = targets.len(),
            areas = areas.len(),
            cap = request.per_category_cap,
            "search campaign started"
        );

        let mut new_leads: Vec<Lead> = Vec::new();
        let mut total_found = 0usize;
        let mut failure: Option<SinkError> = None;

        for (index, target) in targets.iter().enumerate() {
            if cancel.is_cancelled() {
                break;
            }

            let harvest = self
                .crawl_category(target, &scope, sink.as_deref_mut())
                .await;
            total_found += harvest.found;
            new_leads.extend(harvest.leads);

            if let Some(err) = harvest.failure {
                failure = Some(err);
                break;
            }

            let is_last = index + 1 == targets.len();
            if !is_last
                && sleep_or_cancel(self.policy.inter_category_delay, &cancel)
                    .await
                    .is_interrupted()
            {
                break;
            }
        }

        let was_stopped = cancel.is_cancelled();
        let outcome = match failure {
            Some(err) => {
                let err = SearchError::from(err);
                tracing::error!(
                    run_id = %guard.run_id(),
                    error = %err,
                    leads_kept = new_leads.len(),
                    "search campaign failed"
                );
                CampaignOutcome::failed(&err, new_leads, total_found, was_stopped)
            }
            None => CampaignOutcome::finished(new_leads, total_found, was_stopped),
        };

        tracing::info!(
            run_id = %guard.run_id(),
            success = outcome.success,
            was_stopped,
            total_added = outcome.total_added,
            total_found,
            "search campaign finished"
        );

        drop(guard);
        outcome
    }

    /// Crawls every area of `scope` for one category.
    ///
    /// The dedup set lives for this call only: a place seen in one area is
    /// skipped in later areas of the same category but may be collected
    /// again under another category.
    pub async fn crawl_category(
        &self,
        target: &SearchTarget,
        scope: &RunScope<'_>,
        mut sink: Option<&mut (dyn LeadSink + '_)>,
    ) -> CategoryHarvest {
        let crawler = AreaCrawler::new(self.source, &self.policy, scope.reporter);
        let mut seen: HashSet<String> = HashSet::new();
        let mut harvest = CategoryHarvest::default();

        scope
            .reporter
            .report(&format!("Searching {}...", target.label));

        for (index, area) in scope.areas.iter().enumerate() {
            if scope.cancel.is_cancelled() || harvest.leads.len() >= scope.cap {
                break;
            }

            let job = AreaJob {
                target,
                area,
                geography: scope.geography,
                credential: scope.credential,
                budget: AreaBudget {
                    cap: scope.cap,
                    collected: harvest.leads.len(),
                },
            };

            let area_harvest = crawler
                .crawl(&job, &mut seen, scope.cancel, sink.as_deref_mut())
                .await;
            harvest.found += area_harvest.found;
            harvest.leads.extend(area_harvest.leads);

            match area_harvest.outcome {
                AreaOutcome::SinkFailed(err) => {
                    harvest.failure = Some(err);
                    break;
                }
                AreaOutcome::Abandoned => {
                    tracing::warn!(
                        category = %target.id,
                        area = area.label(&scope.geography.city),
                        "area abandoned after repeated failures; continuing"
                    );
                }
                AreaOutcome::Exhausted | AreaOutcome::CapReached | AreaOutcome::Cancelled => {}
            }

            let is_last = index + 1 == scope.areas.len();
            if !is_last
                && harvest.leads.len() < scope.cap
                && sleep_or_cancel(self.policy.inter_area_delay, scope.cancel)
                    .await
                    .is_interrupted()
            {
                break;
            }
        }

        tracing::info!(
            category = %target.id,
            collected = harvest.leads.len(),
            found = harvest.found,
            cap = scope.cap,
            "category finished"
        );

        harvest
    }
}

/// Picks the categories a run covers, keeping configured order.
fn select_targets(
    categories: &[SearchTarget],
    target_category_id: Option<&str>,
) -> Result<Vec<SearchTarget>, SearchError> {
    let selected: Vec<SearchTarget> = match target_category_id {
        Some(id) => {
            let target = categories
                .iter()
                .find(|t| t.id.eq_ignore_ascii_case(id))
                .ok_or_else(|| SearchError::UnknownCategory(id.to_owned()))?;
            vec![target.clone()]
        }
        None => categories.to_vec(),
    };

    if selected.is_empty() {
        return Err(SearchError::NoCategories);
    }
    Ok(selected)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(id: &str) -> SearchTarget {
        SearchTarget {
            id: id.to_owned(),
            label: id.to_uppercase(),
            query: id.to_owned(),
        }
    }

    #[test]
    fn select_targets_keeps_order_without_filter() {
        let all = vec![target("rest"), target("dent"), target("gym")];
        let picked = select_targets(&all, None).unwrap();
        assert_eq!(picked, all);
    }

    #[test]
    fn select_targets_filters_by_id() {
        let all = vec![target("rest"), target("dent")];
        let picked = select_targets(&all, Some("dent")).unwrap();
        assert_eq!(picked, vec![target("dent")]);
    }

    #[test]
    fn select_targets_rejects_unknown_id() {
        let all = vec![target("rest")];
        let err = select_targets(&all, Some("bakery")).unwrap_err();
        assert!(matches!(err, SearchError::UnknownCategory(ref id) if id == "bakery"));
    }

    #[test]
    fn select_targets_rejects_empty_catalog() {
        let err = select_targets(&[], None).unwrap_err();
        assert!(matches!(err, SearchError::NoCategories));
    }

    #[test]
    fn finished_message_distinguishes_interruption() {
        let done = CampaignOutcome::finished(Vec::new(), 25, false);
        assert!(done.success);
        assert_eq!(done.message, "Search completed: 0 new leads added (25 found)");

        let stopped = CampaignOutcome::finished(Vec::new(), 3, true);
        assert!(stopped.success);
        assert!(stopped.was_stopped);
        assert_eq!(stopped.message, "Search interrupted: 0 new leads added (3 found)");
    }

    #[test]
    fn rejected_outcome_is_failure_without_leads() {
        let outcome = CampaignOutcome::rejected(&SearchError::MissingGeography);
        assert!(!outcome.success);
        assert!(!outcome.was_stopped);
        assert!(outcome.new_leads.is_empty());
        assert_eq!(outcome.message, "City and state are required");
    }
}
