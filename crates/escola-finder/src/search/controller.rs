use super::assembler::{ResultAssembler, SearchResults};
use super::domain::{FilterCriteria, SchoolRecord};
use crate::remote::{FetchError, SchoolSource, SearchQuery};
use crate::session::UserIdentity;
use serde::Serialize;
use tracing::{info, warn};

/// Handle for one issued fetch. Only the most recently issued ticket may
/// change the displayed results.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchTicket {
    sequence: u64,
    query: SearchQuery,
}

impl FetchTicket {
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn query(&self) -> &SearchQuery {
        &self.query
    }
}

/// What happened to a completed fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    Failed,
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayState {
    SignedOut,
    Loading,
    NoResults,
    Results,
}

/// Snapshot handed to the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct SearchView {
    pub state: DisplayState,
    pub results: SearchResults,
    pub error: Option<String>,
}

/// Owns the criteria, the last fetched set and the loading/error flags.
/// Every mutation goes through `&mut self`.
#[derive(Debug, Default)]
pub struct SearchController {
    identity: Option<UserIdentity>,
    criteria: FilterCriteria,
    assembler: ResultAssembler,
    fetched: Vec<SchoolRecord>,
    error: Option<String>,
    issued: u64,
    pending: Option<u64>,
    requested_floor: Option<f64>,
}

impl SearchController {
    pub fn new(assembler: ResultAssembler) -> Self {
        Self {
            assembler,
            ..Self::default()
        }
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn identity(&self) -> Option<&UserIdentity> {
        self.identity.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn sign_in(&mut self, identity: UserIdentity) -> Option<FetchTicket> {
        info!(user = %identity.id, "search session started");
        self.identity = Some(identity);
        self.issue()
    }

    /// Drops the visible set; any fetch still in flight becomes stale.
    pub fn sign_out(&mut self) {
        self.identity = None;
        self.fetched.clear();
        self.error = None;
        self.pending = None;
        self.requested_floor = None;
    }

    /// Replaces the criteria and returns a ticket when the change needs data
    /// the last request did not ask for.
    pub fn update_criteria(&mut self, criteria: FilterCriteria) -> Option<FetchTicket> {
        let scope_changed = self.criteria.server_scope_differs(&criteria);
        let floor_lowered = self
            .requested_floor
            .is_some_and(|floor| criteria.minimum_quality < floor);
        self.criteria = criteria;

        if scope_changed || floor_lowered {
            self.issue()
        } else {
            None
        }
    }

    /// Explicit user-triggered search with the current criteria.
    pub fn refresh(&mut self) -> Option<FetchTicket> {
        self.issue()
    }

    fn issue(&mut self) -> Option<FetchTicket> {
        self.identity.as_ref()?;

        self.issued += 1;
        let query = SearchQuery::from_criteria(&self.criteria);
        self.pending = Some(self.issued);
        self.requested_floor = Some(query.minimum_quality());
        info!(sequence = self.issued, params = query.pairs().len(), "school fetch issued");

        Some(FetchTicket {
            sequence: self.issued,
            query,
        })
    }

    /// Applies a finished fetch unless a newer one was issued after it. On
    /// failure the previous results stay visible next to the error banner.
    pub fn complete(
        &mut self,
        ticket: &FetchTicket,
        outcome: Result<Vec<SchoolRecord>, FetchError>,
    ) -> Completion {
        if self.pending != Some(ticket.sequence) {
            warn!(
                sequence = ticket.sequence,
                latest = self.issued,
                "discarding stale school response"
            );
            return Completion::Stale;
        }

        self.pending = None;
        match outcome {
            Ok(records) => {
                info!(sequence = ticket.sequence, count = records.len(), "school fetch applied");
                self.fetched = records;
                self.error = None;
                Completion::Applied
            }
            Err(err) => {
                warn!(sequence = ticket.sequence, error = %err, "school fetch failed");
                self.error = Some(err.user_message());
                Completion::Failed
            }
        }
    }

    /// Issues-and-awaits shorthand for callers that drive one fetch at a time.
    pub async fn fetch_with<S: SchoolSource>(
        &mut self,
        source: &S,
        ticket: FetchTicket,
    ) -> Completion {
        let outcome = source.fetch(ticket.query()).await;
        self.complete(&ticket, outcome)
    }

    pub fn results(&self) -> SearchResults {
        self.assembler.assemble(&self.fetched, &self.criteria)
    }

    pub fn view(&self) -> SearchView {
        let results = self.results();
        let state = if self.identity.is_none() {
            DisplayState::SignedOut
        } else if self.is_loading() {
            DisplayState::Loading
        } else if results.is_empty() {
            DisplayState::NoResults
        } else {
            DisplayState::Results
        };

        SearchView {
            state,
            results,
            error: self.error.clone(),
        }
    }
}
