//! Search state container.
//!
//! Plain reducer over [`SearchState`]. The [`Store`](crate::store::Store)
//! decides when fetches start and which completions are still current; this
//! module only defines how each transition changes the state.

use crate::models::AnimeSummary;
use jikan::api::SearchResponse;
use jikan::{Fetched, RequestError};
use serde::Serialize;
use tracing::debug;

/// Coarse lifecycle of the search box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SearchPhase {
    Idle,
    Loading,
    Settled,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchState {
    pub query: String,
    /// 1-based
    pub page: u32,
    pub results: Vec<AnimeSummary>,
    pub loading: bool,
    pub error: Option<String>,
    pub has_more: bool,
}

impl Default for SearchState {
    fn default() -> Self {
        Self {
            query: String::new(),
            page: 1,
            results: Vec::new(),
            loading: false,
            error: None,
            has_more: false,
        }
    }
}

/// A normalized page of results
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPage {
    pub results: Vec<AnimeSummary>,
    pub has_more: bool,
}

impl From<SearchResponse> for SearchPage {
    fn from(response: SearchResponse) -> Self {
        let has_more = response.has_next_page();
        Self {
            results: response.data.into_iter().map(AnimeSummary::from).collect(),
            has_more,
        }
    }
}

impl SearchState {
    pub fn phase(&self) -> SearchPhase {
        if self.loading {
            SearchPhase::Loading
        } else if self.error.is_some() {
            SearchPhase::Failed
        } else if self.query.trim().is_empty() {
            SearchPhase::Idle
        } else {
            SearchPhase::Settled
        }
    }

    /// New query: back to page 1 with no results. Does not fetch.
    pub fn set_query(&mut self, text: impl Into<String>) {
        self.query = text.into();
        self.page = 1;
        self.results.clear();
        self.has_more = false;
        self.error = None;
    }

    /// Move to page `n` (at least 1)
    pub fn set_page(&mut self, n: u32) {
        self.page = n.max(1);
    }

    pub fn can_go_next(&self) -> bool {
        self.has_more
    }

    pub fn can_go_prev(&self) -> bool {
        self.page > 1
    }

    pub fn fetch_started(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub fn fetch_succeeded(&mut self, results: Vec<AnimeSummary>, has_more: bool) {
        self.loading = false;
        self.error = None;
        self.results = results;
        self.has_more = has_more;
    }

    /// A failed request also drops the previous results
    pub fn fetch_failed(&mut self, message: impl Into<String>) {
        let message = message.into();
        self.loading = false;
        self.error = Some(if message.is_empty() {
            "Failed to fetch".to_string()
        } else {
            message
        });
        self.results.clear();
        self.has_more = false;
    }

    /// Cancellation is not a user-visible error
    pub fn fetch_cancelled(&mut self) {
        self.loading = false;
    }

    /// Apply the outcome of the current request
    pub fn settle(&mut self, outcome: Result<Fetched<SearchResponse>, RequestError>) {
        match outcome {
            Ok(Fetched::Data(response)) => {
                let page = SearchPage::from(response);
                debug!(
                    query = %self.query,
                    page = self.page,
                    results = page.results.len(),
                    has_more = page.has_more,
                    "Search settled"
                );
                self.fetch_succeeded(page.results, page.has_more);
            }
            Ok(Fetched::Cancelled) => {
                debug!(query = %self.query, "Search cancelled");
                self.fetch_cancelled();
            }
            Err(e) => {
                debug!(query = %self.query, error = %e, "Search failed");
                self.fetch_failed(e.to_string());
            }
        }
    }

    /// Back to `Idle`
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
