//! The request seam between state containers and the remote service.

use super::types::{AnimeDetail, SearchResponse};
use crate::error::RequestError;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// Outcome of a request that was not a failure
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched<T> {
    Data(T),
    /// The caller cancelled the token before the response arrived
    Cancelled,
}

impl<T> Fetched<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Fetched<U> {
        match self {
            Fetched::Data(data) => Fetched::Data(f(data)),
            Fetched::Cancelled => Fetched::Cancelled,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Fetched::Cancelled)
    }

    pub fn data(self) -> Option<T> {
        match self {
            Fetched::Data(data) => Some(data),
            Fetched::Cancelled => None,
        }
    }
}

/// Read-only anime lookups
#[async_trait]
pub trait AnimeApi: Send + Sync {
    /// Search by title, one page at a time
    async fn search_anime(
        &self,
        query: &str,
        page: u32,
        cancel: &CancellationToken,
    ) -> Result<Fetched<SearchResponse>, RequestError>;

    /// Fetch the full record for one id
    async fn get_anime_detail(
        &self,
        id: u32,
        cancel: &CancellationToken,
    ) -> Result<Fetched<AnimeDetail>, RequestError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetched_map() {
        assert_eq!(Fetched::Data(2).map(|n| n * 2), Fetched::Data(4));
        assert_eq!(Fetched::<u32>::Cancelled.map(|n| n * 2), Fetched::Cancelled);
    }

    #[test]
    fn test_fetched_data() {
        assert!(Fetched::<u32>::Cancelled.is_cancelled());
        assert_eq!(Fetched::<u32>::Cancelled.data(), None);
        assert_eq!(Fetched::Data("x").data(), Some("x"));
    }
}
