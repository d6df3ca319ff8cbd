//! Jikan API v4 client for anime search and detail lookups.
//!
//! Every request takes a [`CancellationToken`](tokio_util::sync::CancellationToken);
//! a cancelled request resolves to [`Fetched::Cancelled`] rather than an error.

pub mod api;
pub mod error;

pub use api::{AnimeApi, Fetched, JikanClient, RateLimiter};
pub use error::RequestError;
pub use reqwest::StatusCode;
