//! Jikan API client with rate limiting, retry logic and cooperative cancellation.

use super::provider::{AnimeApi, Fetched};
use super::rate_limiter::RateLimiter;
use super::types::*;
use crate::error::RequestError;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use shared::config::JikanConfig;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Jikan API v4 client
pub struct JikanClient {
    /// HTTP client
    client: Client,
    /// Base URL for Jikan API, without trailing slash
    base_url: String,
    /// Items per search page
    page_size: u32,
    /// Shared by concurrent requests; held while waiting for a slot
    rate_limiter: Mutex<RateLimiter>,
    /// Maximum retries for rate-limited or 5xx responses
    max_retries: u32,
    /// Base delay for retry (exponential backoff)
    retry_delay_ms: u64,
}

impl JikanClient {
    pub fn new(config: &JikanConfig) -> Result<Self, RequestError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| RequestError::Build(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            page_size: config.page_size,
            rate_limiter: Mutex::new(RateLimiter::new(
                config.rate_limit.requests_per_second,
                config.rate_limit.requests_per_minute,
            )),
            max_retries: config.max_retries,
            retry_delay_ms: config.retry_delay_ms,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn retry_delay(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.retry_delay_ms.saturating_mul(2u64.saturating_pow(attempt)))
    }

    /// Make a GET request with rate limiting and retry logic
    ///
    /// The token is checked before every attempt and raced against the rate
    /// limiter, the request itself and every backoff sleep.
    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
        cancel: &CancellationToken,
    ) -> Result<Fetched<T>, RequestError> {
        let url = format!("{}{}", self.base_url, endpoint);
        let mut attempt = 0;

        loop {
            if cancel.is_cancelled() {
                debug!(url = %url, "Request cancelled before sending");
                return Ok(Fetched::Cancelled);
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Ok(Fetched::Cancelled),
                _ = async { self.rate_limiter.lock().await.acquire().await } => {}
            }

            debug!(url = %url, attempt = attempt + 1, "Making API request");

            let response = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!(url = %url, "Request cancelled in flight");
                    return Ok(Fetched::Cancelled);
                }
                response = self.client.get(&url).query(query).send() => response,
            };

            let response = match response {
                Ok(response) => response,
                Err(e) => {
                    warn!(url = %url, error = %e, "Request error");
                    return Err(e.into());
                }
            };

            let status = response.status();

            if status.is_success() {
                let body = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return Ok(Fetched::Cancelled),
                    body = response.bytes() => body?,
                };
                let data = serde_json::from_slice::<T>(&body).map_err(|e| {
                    warn!(url = %url, error = %e, "Failed to parse response");
                    RequestError::from(e)
                })?;
                debug!(url = %url, "Request successful");
                return Ok(Fetched::Data(data));
            }

            let error_text = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Ok(Fetched::Cancelled),
                text = response.text() => text.unwrap_or_default(),
            };
            let message = JikanError::message_from_body(&error_text)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown error").to_string());

            warn!(
                url = %url,
                status = %status,
                error = %message,
                "Request failed"
            );

            let retryable = status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error();
            if !retryable || attempt >= self.max_retries {
                return Err(RequestError::Status { status, message });
            }

            let delay = self.retry_delay(attempt);
            debug!(delay_ms = delay.as_millis(), "Retrying after delay");
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Ok(Fetched::Cancelled),
                _ = sleep(delay) => {}
            }
            attempt += 1;
        }
    }
}

#[async_trait]
impl AnimeApi for JikanClient {
    async fn search_anime(
        &self,
        query: &str,
        page: u32,
        cancel: &CancellationToken,
    ) -> Result<Fetched<SearchResponse>, RequestError> {
        info!(query = query, page = page, "Searching anime");
        let params = [
            ("q", query.to_string()),
            ("page", page.to_string()),
            ("limit", self.page_size.to_string()),
        ];
        self.get("/anime", &params, cancel).await
    }

    async fn get_anime_detail(
        &self,
        id: u32,
        cancel: &CancellationToken,
    ) -> Result<Fetched<AnimeDetail>, RequestError> {
        info!(mal_id = id, "Fetching anime details");
        let envelope: Fetched<DetailEnvelope> =
            self.get(&format!("/anime/{}/full", id), &[], cancel).await?;
        Ok(envelope.map(DetailEnvelope::into_inner))
    }
}
