//! Request rate limiting
//!
//! A governor token bucket shared by every page fetch issued through one
//! client, so a long AUTO listing stays under the service's quota.

use governor::{DefaultDirectRateLimiter, Quota};
use std::num::NonZeroU32;
use std::sync::Arc;

const DEFAULT_RPS: NonZeroU32 = NonZeroU32::MIN.saturating_add(9);

/// Requests-per-second quota with a burst allowance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimiterConfig {
    /// Sustained requests per second
    pub requests_per_second: NonZeroU32,
    /// Requests that may be sent back to back
    pub burst_size: NonZeroU32,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            requests_per_second: DEFAULT_RPS,
            burst_size: DEFAULT_RPS,
        }
    }
}

impl RateLimiterConfig {
    /// Quota of `rps` requests per second with an equal burst
    ///
    /// Returns `None` for a zero rate.
    pub fn per_second(rps: u32) -> Option<Self> {
        let rate = NonZeroU32::new(rps)?;
        Some(Self {
            requests_per_second: rate,
            burst_size: rate,
        })
    }

    /// Set the burst allowance; zero leaves it unchanged
    #[must_use]
    pub fn with_burst(mut self, burst: u32) -> Self {
        if let Some(burst) = NonZeroU32::new(burst) {
            self.burst_size = burst;
        }
        self
    }
}

impl From<RateLimiterConfig> for Quota {
    fn from(config: RateLimiterConfig) -> Self {
        Quota::per_second(config.requests_per_second).allow_burst(config.burst_size)
    }
}

/// Token bucket rate limiter, cheap to clone
#[derive(Clone)]
pub struct RateLimiter {
    bucket: Arc<DefaultDirectRateLimiter>,
    config: RateLimiterConfig,
}

impl RateLimiter {
    /// Create a rate limiter for the given quota
    pub fn new(config: RateLimiterConfig) -> Self {
        Self {
            bucket: Arc::new(governor::RateLimiter::direct(Quota::from(config))),
            config,
        }
    }

    /// Wait until a request may be sent
    pub async fn wait(&self) {
        self.bucket.until_ready().await;
    }

    /// Quota this limiter enforces
    pub fn config(&self) -> RateLimiterConfig {
        self.config
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
