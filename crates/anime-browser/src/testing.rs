//! In-memory [`AnimeApi`] for store and browse tests.

use crate::models::AnimeDetail;
use async_trait::async_trait;
use jikan::api::{AnimeItem, Pagination, SearchResponse};
use jikan::{AnimeApi, Fetched, RequestError};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

const DEFAULT_DELAY: Duration = Duration::from_millis(100);

/// Serves three pages of twelve results for any query
pub(crate) struct FakeApi {
    honor_cancel: bool,
    search_delays: HashMap<String, Duration>,
    failing_searches: HashSet<String>,
    failing_details: HashSet<u32>,
    panicking_details: HashSet<u32>,
    search_calls: Mutex<Vec<(String, u32)>>,
    cancelled_searches: Mutex<Vec<String>>,
    detail_calls: Mutex<Vec<u32>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self {
            honor_cancel: true,
            search_delays: HashMap::new(),
            failing_searches: HashSet::new(),
            failing_details: HashSet::new(),
            panicking_details: HashSet::new(),
            search_calls: Mutex::default(),
            cancelled_searches: Mutex::default(),
            detail_calls: Mutex::default(),
        }
    }

    /// Behave like a transport that cannot abort a request
    pub fn ignoring_cancellation(mut self) -> Self {
        self.honor_cancel = false;
        self
    }

    pub fn with_search_delay(mut self, query: &str, delay: Duration) -> Self {
        self.search_delays.insert(query.to_string(), delay);
        self
    }

    pub fn failing_search(mut self, query: &str) -> Self {
        self.failing_searches.insert(query.to_string());
        self
    }

    pub fn failing_detail(mut self, id: u32) -> Self {
        self.failing_details.insert(id);
        self
    }

    pub fn panicking_detail(mut self, id: u32) -> Self {
        self.panicking_details.insert(id);
        self
    }

    pub fn search_calls(&self) -> Vec<(String, u32)> {
        self.search_calls.lock().unwrap().clone()
    }

    pub fn cancelled_searches(&self) -> Vec<String> {
        self.cancelled_searches.lock().unwrap().clone()
    }

    pub fn detail_calls(&self) -> Vec<u32> {
        self.detail_calls.lock().unwrap().clone()
    }

    /// Sleep for `delay`; false if cancelled first
    async fn wait(&self, delay: Duration, cancel: &CancellationToken) -> bool {
        if !self.honor_cancel {
            sleep(delay).await;
            return true;
        }
        tokio::select! {
            _ = cancel.cancelled() => false,
            _ = sleep(delay) => true,
        }
    }
}

pub(crate) fn search_page(query: &str, page: u32) -> SearchResponse {
    let data = (1..=12)
        .map(|n| AnimeItem {
            mal_id: page * 100 + n,
            title: format!("{} {}", query, (page - 1) * 12 + n),
            images: None,
            synopsis: Some(format!("About {}.", query)),
        })
        .collect();
    SearchResponse {
        data,
        pagination: Some(Pagination {
            last_visible_page: Some(3),
            has_next_page: Some(page < 3),
            current_page: Some(page),
            items: None,
        }),
    }
}

#[async_trait]
impl AnimeApi for FakeApi {
    async fn search_anime(
        &self,
        query: &str,
        page: u32,
        cancel: &CancellationToken,
    ) -> Result<Fetched<SearchResponse>, RequestError> {
        self.search_calls.lock().unwrap().push((query.to_string(), page));

        let delay = self.search_delays.get(query).copied().unwrap_or(DEFAULT_DELAY);
        if !self.wait(delay, cancel).await {
            self.cancelled_searches.lock().unwrap().push(query.to_string());
            return Ok(Fetched::Cancelled);
        }
        if self.failing_searches.contains(query) {
            return Err(RequestError::Timeout);
        }
        Ok(Fetched::Data(search_page(query, page)))
    }

    async fn get_anime_detail(
        &self,
        id: u32,
        cancel: &CancellationToken,
    ) -> Result<Fetched<AnimeDetail>, RequestError> {
        self.detail_calls.lock().unwrap().push(id);
        if self.panicking_details.contains(&id) {
            panic!("detail {} blew up", id);
        }

        if !self.wait(DEFAULT_DELAY, cancel).await {
            return Ok(Fetched::Cancelled);
        }
        if self.failing_details.contains(&id) {
            return Err(RequestError::Timeout);
        }
        Ok(Fetched::Data(AnimeDetail {
            mal_id: Some(id),
            title: Some(format!("Anime {}", id)),
            episodes: Some(24),
            ..Default::default()
        }))
    }
}
