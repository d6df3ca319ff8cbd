//! Jikan API v4 client implementation.
//!
//! This module provides a rate-limited, retry-enabled, cancellable client
//! for the Jikan API (MyAnimeList unofficial API).

pub mod client;
pub mod provider;
pub mod rate_limiter;
pub mod types;

pub use client::JikanClient;
pub use provider::{AnimeApi, Fetched};
pub use rate_limiter::RateLimiter;
pub use types::*;
