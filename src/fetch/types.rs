//! Fetcher types

use crate::error::FetchError;
use crate::request::ListRequest;
use crate::types::OptionStringExt;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// One raw response page
#[derive(Debug, Clone, PartialEq)]
pub struct RawPage {
    /// Decoded response body
    pub body: Value,
    /// Continuation token, `None` on the last page
    pub next_token: Option<String>,
}

impl RawPage {
    /// Create a page, treating an empty token as absent
    pub fn new(body: Value, next_token: Option<String>) -> Self {
        Self {
            body,
            next_token: next_token.none_if_empty(),
        }
    }

    /// Create a final page
    pub fn last(body: Value) -> Self {
        Self::new(body, None)
    }

    /// Check if the service reported no further pages
    pub fn is_last(&self) -> bool {
        self.next_token.is_none()
    }
}

/// Fetches one page of a list operation
///
/// Implementations must not retry on their own behalf and must not keep
/// per-invocation state: the pager owns the iteration state and calls
/// `fetch` at most once at a time.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Perform a single round-trip for `request`
    async fn fetch(&self, request: &ListRequest) -> std::result::Result<RawPage, FetchError>;
}

#[async_trait]
impl<T: PageFetcher + ?Sized> PageFetcher for Arc<T> {
    async fn fetch(&self, request: &ListRequest) -> std::result::Result<RawPage, FetchError> {
        (**self).fetch(request).await
    }
}
