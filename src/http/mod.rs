//! HTTP client module
//!
//! Transport layer for page fetches.
//!
//! # Features
//!
//! - **Automatic Retries**: 429, 5xx, timeouts and connection errors
//! - **Exponential Backoff**: capped, with Retry-After honoured
//! - **Rate Limiting**: one governor token bucket per client

mod client;
mod rate_limit;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
