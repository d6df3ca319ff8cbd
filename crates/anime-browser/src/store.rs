//! Application store.
//!
//! Owns the search and detail containers and is the only place their state
//! changes. Actions are applied synchronously by [`Store::dispatch`]; fetches
//! run as spawned tasks and report back through the [`Completions`] channel,
//! to be applied one at a time by [`Store::apply`]. Only the latest request
//! of each series may change state: starting a new one cancels the previous
//! token and bumps the generation, so late completions are dropped.

use crate::detail::DetailState;
use crate::models::AnimeDetail;
use crate::search::SearchState;
use jikan::api::SearchResponse;
use jikan::{AnimeApi, Fetched, RequestError};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Everything the view can read
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AppState {
    pub search: SearchState,
    pub detail: DetailState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// The debounced search box value changed
    QueryChanged(String),
    /// Search `query` starting at `page`, with a single request
    Search { query: String, page: u32 },
    SetPage(u32),
    NextPage,
    PrevPage,
    /// Stop the running search, keeping the query
    CancelSearch,
    /// Empty the search box
    ClearSearch,
    OpenDetail(u32),
    CloseDetail,
}

/// Result of a spawned fetch, tagged with the generation that started it
#[derive(Debug)]
pub enum Completion {
    Search {
        generation: u64,
        outcome: Result<Fetched<SearchResponse>, RequestError>,
    },
    Detail {
        generation: u64,
        outcome: Result<Fetched<AnimeDetail>, RequestError>,
    },
}

pub type Completions = mpsc::UnboundedReceiver<Completion>;

/// Tracks the one authoritative request of a series
#[derive(Debug, Default)]
struct RequestSlot {
    generation: u64,
    current: Option<CancellationToken>,
}

impl RequestSlot {
    /// Cancel whatever is running and open a new generation
    fn begin(&mut self) -> (u64, CancellationToken) {
        self.abandon();
        let token = CancellationToken::new();
        self.current = Some(token.clone());
        (self.generation, token)
    }

    /// Cancel the running request; its completion still settles the state
    fn cancel(&self) {
        if let Some(token) = &self.current {
            token.cancel();
        }
    }

    /// Cancel the running request and ignore its completion
    fn abandon(&mut self) {
        if let Some(token) = self.current.take() {
            token.cancel();
        }
        self.generation += 1;
    }

    /// Close the slot for `generation`; `None` when superseded, otherwise
    /// whether the request was cancelled
    fn finish(&mut self, generation: u64) -> Option<bool> {
        if generation != self.generation {
            return None;
        }
        self.current.take().map(|token| token.is_cancelled())
    }

    fn is_pending(&self) -> bool {
        self.current.is_some()
    }
}

pub struct Store {
    api: Arc<dyn AnimeApi>,
    state: AppState,
    min_query_len: usize,
    search: RequestSlot,
    detail: RequestSlot,
    completions: mpsc::UnboundedSender<Completion>,
}

impl Store {
    /// Create a store and the channel its fetches report on
    ///
    /// Queries shorter than `min_query_len` characters (after trimming, and
    /// never less than one) do not fetch.
    pub fn new(api: Arc<dyn AnimeApi>, min_query_len: usize) -> (Self, Completions) {
        let (tx, rx) = mpsc::unbounded_channel();
        let store = Self {
            api,
            state: AppState::default(),
            min_query_len: min_query_len.max(1),
            search: RequestSlot::default(),
            detail: RequestSlot::default(),
            completions: tx,
        };
        (store, rx)
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Whether a search or detail request is still outstanding
    pub fn has_pending(&self) -> bool {
        self.search.is_pending() || self.detail.is_pending()
    }

    pub fn dispatch(&mut self, action: Action) {
        debug!(action = ?action, "Dispatch");

        match action {
            Action::QueryChanged(text) => self.query_changed(text, 1),
            Action::Search { query, page } => self.query_changed(query, page),
            Action::SetPage(n) => {
                self.state.search.set_page(n);
                if self.is_searchable() {
                    self.start_search();
                }
            }
            Action::NextPage => {
                if self.state.search.can_go_next() {
                    self.dispatch(Action::SetPage(self.state.search.page + 1));
                }
            }
            Action::PrevPage => {
                if self.state.search.can_go_prev() {
                    self.dispatch(Action::SetPage(self.state.search.page - 1));
                }
            }
            Action::CancelSearch => self.search.cancel(),
            Action::ClearSearch => {
                self.search.abandon();
                self.state.search.clear();
            }
            Action::OpenDetail(id) => self.start_detail(id),
            Action::CloseDetail => {
                self.detail.abandon();
                self.state.detail.reset();
            }
        }
    }

    /// Apply a completion; returns false when it was superseded and ignored
    pub fn apply(&mut self, completion: Completion) -> bool {
        match completion {
            Completion::Search { generation, outcome } => match self.search.finish(generation) {
                None => {
                    debug!(generation, "Ignoring superseded search");
                    false
                }
                Some(cancelled) => {
                    let outcome = if cancelled { Ok(Fetched::Cancelled) } else { outcome };
                    self.state.search.settle(outcome);
                    true
                }
            },
            Completion::Detail { generation, outcome } => match self.detail.finish(generation) {
                None => {
                    debug!(generation, "Ignoring superseded detail request");
                    false
                }
                Some(cancelled) => {
                    let outcome = if cancelled { Ok(Fetched::Cancelled) } else { outcome };
                    self.state.detail.settle(outcome);
                    true
                }
            },
        }
    }

    /// Apply completions until nothing is outstanding
    pub async fn run_until_idle(&mut self, completions: &mut Completions) {
        while self.has_pending() {
            match completions.recv().await {
                Some(completion) => {
                    self.apply(completion);
                }
                None => break,
            }
        }
    }

    fn is_searchable(&self) -> bool {
        self.state.search.query.trim().chars().count() >= self.min_query_len
    }

    fn query_changed(&mut self, text: String, page: u32) {
        if text.trim().is_empty() {
            self.search.abandon();
            self.state.search.clear();
            return;
        }

        self.state.search.set_query(text);
        self.state.search.set_page(page);
        if self.is_searchable() {
            self.start_search();
        } else {
            self.search.abandon();
            self.state.search.fetch_cancelled();
        }
    }

    fn start_search(&mut self) {
        let (generation, cancel) = self.search.begin();
        self.state.search.fetch_started();

        let query = self.state.search.query.trim().to_string();
        let page = self.state.search.page;
        info!(query = %query, page, generation, "Search started");

        let api = Arc::clone(&self.api);
        self.spawn_fetch(
            async move { api.search_anime(&query, page, &cancel).await },
            move |outcome| Completion::Search { generation, outcome },
        );
    }

    fn start_detail(&mut self, id: u32) {
        let (generation, cancel) = self.detail.begin();
        self.state.detail.start(id);
        info!(mal_id = id, generation, "Detail requested");

        let api = Arc::clone(&self.api);
        self.spawn_fetch(
            async move { api.get_anime_detail(id, &cancel).await },
            move |outcome| Completion::Detail { generation, outcome },
        );
    }

    /// Run `fetch` on its own task and report its outcome as a completion
    ///
    /// A fetch task that panics or is aborted still reports, as
    /// [`RequestError::Aborted`], so every pending slot gets closed.
    fn spawn_fetch<T, F>(
        &self,
        fetch: F,
        complete: impl FnOnce(Result<Fetched<T>, RequestError>) -> Completion + Send + 'static,
    ) where
        T: Send + 'static,
        F: Future<Output = Result<Fetched<T>, RequestError>> + Send + 'static,
    {
        let tx = self.completions.clone();
        tokio::spawn(async move {
            let outcome = match tokio::spawn(fetch).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    warn!(error = %e, "Fetch task failed");
                    Err(RequestError::Aborted(e.to_string()))
                }
            };
            if tx.send(complete(outcome)).is_err() {
                debug!("Store dropped before fetch completed");
            }
        });
    }
}

impl Drop for Store {
    fn drop(&mut self) {
        self.search.abandon();
        self.detail.abandon();
    }
}
