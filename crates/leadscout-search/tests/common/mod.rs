//! Scripted collaborators shared by the orchestrator integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use leadscout_core::{Geography, Lead, PlaceHit, SearchTarget};
use leadscout_places::{PlacesError, TextSearchPage};
use leadscout_search::{
    CampaignRequest, LeadSink, PageRequest, PlaceSource, SearchSession, SinkError, StatusReporter,
};
use tokio_util::sync::CancellationToken;

/// `(category id, neighborhood, page token)`
type ScriptKey = (String, Option<String>, Option<String>);

enum Reply {
    Page(TextSearchPage),
    Fail,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRecord {
    pub category_id: String,
    pub area: Option<String>,
    pub page_token: Option<String>,
}

/// In-memory `PlaceSource` that replays scripted pages per
/// category/area/token. Unscripted requests get an empty last page.
#[derive(Default)]
pub struct ScriptedSource {
    scripts: Mutex<HashMap<ScriptKey, VecDeque<Reply>>>,
    calls: Mutex<Vec<CallRecord>>,
    always_fail: bool,
    cancel_during_call: Option<(usize, CancellationToken)>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn always_failing() -> Self {
        Self {
            always_fail: true,
            ..Self::default()
        }
    }

    pub fn page(
        self,
        category_id: &str,
        area: Option<&str>,
        page_token: Option<&str>,
        page: TextSearchPage,
    ) -> Self {
        self.push(category_id, area, page_token, Reply::Page(page))
    }

    pub fn fail(self, category_id: &str, area: Option<&str>, page_token: Option<&str>) -> Self {
        self.push(category_id, area, page_token, Reply::Fail)
    }

    /// Fires `token` while serving the `call_number`-th request (1-based),
    /// then still returns the scripted reply, like a response that lands
    /// just after the user pressed stop.
    pub fn cancel_during_call(mut self, call_number: usize, token: CancellationToken) -> Self {
        self.cancel_during_call = Some((call_number, token));
        self
    }

    pub fn calls(&self) -> Vec<CallRecord> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn push(self, category_id: &str, area: Option<&str>, page_token: Option<&str>, reply: Reply) -> Self {
        let key = (
            category_id.to_owned(),
            area.map(str::to_owned),
            page_token.map(str::to_owned),
        );
        self.scripts
            .lock()
            .unwrap()
            .entry(key)
            .or_default()
            .push_back(reply);
        self
    }
}

#[async_trait]
impl PlaceSource for ScriptedSource {
    async fn search(
        &self,
        request: &PageRequest<'_>,
        _cancel: &CancellationToken,
    ) -> Result<TextSearchPage, PlacesError> {
        let record = CallRecord {
            category_id: request.target.id.clone(),
            area: request.area.neighborhood().map(str::to_owned),
            page_token: request.page_token.map(str::to_owned),
        };
        let call_number = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(record.clone());
            calls.len()
        };

        if let Some((n, token)) = &self.cancel_during_call {
            if *n == call_number {
                token.cancel();
            }
        }

        if self.always_fail {
            return Err(unavailable());
        }

        let key = (record.category_id, record.area, record.page_token);
        let reply = self
            .scripts
            .lock()
            .unwrap()
            .get_mut(&key)
            .and_then(VecDeque::pop_front);

        match reply {
            Some(Reply::Page(page)) => Ok(page),
            Some(Reply::Fail) => Err(unavailable()),
            None => Ok(TextSearchPage::default()),
        }
    }
}

fn unavailable() -> PlacesError {
    PlacesError::Api {
        status: 503,
        code: Some("UNAVAILABLE".to_owned()),
        message: "The service is currently unavailable.".to_owned(),
    }
}

/// Records every status update.
#[derive(Default)]
pub struct StatusLog {
    entries: Mutex<Vec<String>>,
}

impl StatusLog {
    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().unwrap().clone()
    }
}

impl StatusReporter for StatusLog {
    fn report(&self, status: &str) {
        self.entries.lock().unwrap().push(status.to_owned());
    }
}

/// Records each batch of place ids it receives; optionally stops the
/// session or fails after a given number of batches.
#[derive(Default)]
pub struct RecordingSink<'a> {
    pub batches: Vec<Vec<String>>,
    stop_after: Option<(usize, &'a SearchSession)>,
    fail_on: Option<usize>,
}

impl<'a> RecordingSink<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stopping_after(batches: usize, session: &'a SearchSession) -> Self {
        Self {
            stop_after: Some((batches, session)),
            ..Self::default()
        }
    }

    pub fn failing_on(batch: usize) -> Self {
        Self {
            fail_on: Some(batch),
            ..Self::default()
        }
    }
}

#[async_trait]
impl LeadSink for RecordingSink<'_> {
    async fn on_leads_found(&mut self, leads: &[Lead]) -> Result<(), SinkError> {
        self.batches
            .push(leads.iter().map(|l| l.place_id.clone()).collect());

        if self.fail_on == Some(self.batches.len()) {
            return Err(SinkError::Rejected("disk full".to_owned()));
        }
        if let Some((n, session)) = self.stop_after {
            if self.batches.len() >= n {
                session.stop();
            }
        }
        Ok(())
    }
}

pub fn target(id: &str, label: &str) -> SearchTarget {
    SearchTarget {
        id: id.to_owned(),
        label: label.to_owned(),
        query: id.to_owned(),
    }
}

pub fn hit(id: &str) -> PlaceHit {
    PlaceHit {
        place_id: id.to_owned(),
        name: format!("Place {id}"),
        address: format!("{id} Main St"),
        phone: None,
        website: None,
        rating: Some(4.0),
    }
}

/// Hits `"{prefix}-{n}"` for `n` in `range`.
pub fn hits(prefix: &str, range: std::ops::Range<usize>) -> Vec<PlaceHit> {
    range.map(|n| hit(&format!("{prefix}-{n}"))).collect()
}

pub fn page(hits: Vec<PlaceHit>, next_page_token: Option<&str>) -> TextSearchPage {
    TextSearchPage {
        hits,
        next_page_token: next_page_token.map(str::to_owned),
    }
}

pub fn request(categories: Vec<SearchTarget>, areas: &[&str], cap: usize) -> CampaignRequest {
    CampaignRequest {
        geography: Geography::new("SP", "Campinas"),
        categories,
        target_category_id: None,
        areas: areas.iter().map(|a| (*a).to_owned()).collect(),
        per_category_cap: cap,
        credential: "test-key".to_owned(),
    }
}

pub fn place_ids(leads: &[Lead]) -> Vec<String> {
    leads.iter().map(|l| l.place_id.clone()).collect()
}
