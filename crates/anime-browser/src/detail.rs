//! Detail state container for a single anime.

use crate::models::AnimeDetail;
use jikan::{Fetched, RequestError};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DetailPhase {
    Idle,
    Loading,
    Loaded,
    Failed,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DetailState {
    /// Id being shown or requested
    pub id: Option<u32>,
    pub loading: bool,
    pub error: Option<String>,
    pub data: Option<AnimeDetail>,
}

impl DetailState {
    pub fn phase(&self) -> DetailPhase {
        if self.loading {
            DetailPhase::Loading
        } else if self.error.is_some() {
            DetailPhase::Failed
        } else if self.data.is_some() {
            DetailPhase::Loaded
        } else {
            DetailPhase::Idle
        }
    }

    /// Navigation to `id`: drop whatever was shown and wait for the record
    pub fn start(&mut self, id: u32) {
        self.id = Some(id);
        self.loading = true;
        self.error = None;
        self.data = None;
    }

    pub fn loaded(&mut self, data: AnimeDetail) {
        self.loading = false;
        self.error = None;
        self.data = Some(data);
    }

    pub fn failed(&mut self, message: impl Into<String>) {
        let message = message.into();
        self.loading = false;
        self.error = Some(if message.is_empty() {
            "Failed to load".to_string()
        } else {
            message
        });
    }

    /// Apply the outcome of the current request; cancellation changes nothing
    pub fn settle(&mut self, outcome: Result<Fetched<AnimeDetail>, RequestError>) {
        match outcome {
            Ok(Fetched::Data(data)) => {
                debug!(id = ?self.id, "Detail loaded");
                self.loaded(data);
            }
            Ok(Fetched::Cancelled) => {
                debug!(id = ?self.id, "Detail request cancelled");
            }
            Err(e) => {
                debug!(id = ?self.id, error = %e, "Detail failed");
                self.failed(e.to_string());
            }
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hellsing() -> AnimeDetail {
        AnimeDetail {
            mal_id: Some(42),
            title: Some("Hellsing".to_string()),
            episodes: Some(13),
            ..Default::default()
        }
    }

    #[test]
    fn test_start_resets_to_loading() {
        let mut state = DetailState::default();
        assert_eq!(state.phase(), DetailPhase::Idle);

        state.loaded(hellsing());
        state.start(7);
        assert_eq!(state.id, Some(7));
        assert!(state.loading);
        assert_eq!(state.data, None);
        assert_eq!(state.error, None);
        assert_eq!(state.phase(), DetailPhase::Loading);
    }

    #[test]
    fn test_loaded_stores_record_verbatim() {
        let mut state = DetailState::default();
        state.start(42);
        state.settle(Ok(Fetched::Data(hellsing())));
        assert!(!state.loading);
        assert_eq!(state.data, Some(hellsing()));
        assert_eq!(state.phase(), DetailPhase::Loaded);
    }

    #[test]
    fn test_timeout_failure() {
        let mut state = DetailState::default();
        state.start(42);
        state.settle(Err(RequestError::Timeout));
        assert!(!state.loading);
        assert_eq!(state.error.as_deref(), Some("timeout"));
        assert_eq!(state.data, None);
        assert_eq!(state.phase(), DetailPhase::Failed);
    }

    #[test]
    fn test_cancellation_is_a_no_op() {
        let mut state = DetailState::default();
        state.start(42);
        let before = state.clone();
        state.settle(Ok(Fetched::Cancelled));
        assert_eq!(state, before);
    }

    #[test]
    fn test_empty_failure_message_gets_fallback() {
        let mut state = DetailState::default();
        state.start(1);
        state.failed("");
        assert_eq!(state.error.as_deref(), Some("Failed to load"));
    }
}
