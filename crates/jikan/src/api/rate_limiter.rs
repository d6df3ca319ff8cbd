//! Sliding-window rate limiter.
//!
//! Enforces both per-second and per-minute rate limits for API requests.

use std::time::Duration;
use tokio::time::{sleep, Instant};

const MINUTE: Duration = Duration::from_secs(60);

/// Rate limiter with dual constraints (per-second and per-minute)
#[derive(Debug)]
pub struct RateLimiter {
    /// Maximum requests per second
    max_per_second: f64,
    /// Maximum requests per minute
    max_per_minute: u32,
    /// Last request timestamp
    last_request: Option<Instant>,
    /// Request timestamps in the last minute
    recent_requests: Vec<Instant>,
}

impl RateLimiter {
    pub fn new(max_per_second: f64, max_per_minute: u32) -> Self {
        Self {
            max_per_second,
            max_per_minute,
            last_request: None,
            recent_requests: Vec::with_capacity(max_per_minute as usize),
        }
    }

    /// Wait until a request can be made, respecting both rate limits
    ///
    /// Dropping the returned future before it completes records nothing.
    pub async fn acquire(&mut self) {
        let now = Instant::now();
        self.recent_requests
            .retain(|&timestamp| now.duration_since(timestamp) < MINUTE);

        if self.max_per_minute > 0 && self.recent_requests.len() >= self.max_per_minute as usize {
            // Wait until the oldest request leaves the window
            if let Some(&oldest) = self.recent_requests.first() {
                let wait_time = MINUTE.saturating_sub(now.duration_since(oldest));
                if !wait_time.is_zero() {
                    tracing::debug!(
                        wait_ms = wait_time.as_millis(),
                        "Rate limit: waiting for per-minute limit"
                    );
                    sleep(wait_time).await;
                }
            }
        }

        if let Some(last) = self.last_request.filter(|_| self.max_per_second > 0.0) {
            let min_interval = Duration::from_secs_f64(1.0 / self.max_per_second);
            let elapsed = Instant::now().duration_since(last);

            if elapsed < min_interval {
                let wait_time = min_interval - elapsed;
                tracing::debug!(
                    wait_ms = wait_time.as_millis(),
                    "Rate limit: waiting for per-second limit"
                );
                sleep(wait_time).await;
            }
        }

        let request_time = Instant::now();
        self.last_request = Some(request_time);
        self.recent_requests.push(request_time);
    }

    /// Get the current number of requests in the last minute
    pub fn current_minute_count(&mut self) -> usize {
        let now = Instant::now();
        self.recent_requests
            .retain(|&timestamp| now.duration_since(timestamp) < MINUTE);
        self.recent_requests.len()
    }
}
