//! In-memory fetcher that replays a fixed script of responses
//!
//! Used to drive the pager without a network, and to test callers that take
//! a `PageFetcher`.

use super::types::{PageFetcher, RawPage};
use crate::error::FetchError;
use crate::request::ListRequest;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Fetcher returning canned responses in order
///
/// Every request it receives is recorded. Once the script runs out, further
/// fetches fail with a transport error.
#[derive(Debug, Default)]
pub struct ScriptedFetcher {
    script: Mutex<VecDeque<std::result::Result<RawPage, FetchError>>>,
    requests: Mutex<Vec<ListRequest>>,
    delay: Option<Duration>,
}

impl ScriptedFetcher {
    /// Create an empty script
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a page with the given body and token
    #[must_use]
    pub fn page(self, body: Value, next_token: Option<&str>) -> Self {
        self.respond(Ok(RawPage::new(body, next_token.map(str::to_string))))
    }

    /// Append a failure
    #[must_use]
    pub fn failure(self, error: FetchError) -> Self {
        self.respond(Err(error))
    }

    /// Sleep this long inside every fetch
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn respond(self, response: std::result::Result<RawPage, FetchError>) -> Self {
        lock(&self.script).push_back(response);
        self
    }

    /// Number of fetches performed so far
    pub fn calls(&self) -> usize {
        lock(&self.requests).len()
    }

    /// Requests received, in order
    pub fn requests(&self) -> Vec<ListRequest> {
        lock(&self.requests).clone()
    }

    /// Tokens submitted, in order
    pub fn tokens(&self) -> Vec<Option<String>> {
        lock(&self.requests)
            .iter()
            .map(|r| r.next_token.clone())
            .collect()
    }
}

#[async_trait]
impl PageFetcher for ScriptedFetcher {
    async fn fetch(&self, request: &ListRequest) -> std::result::Result<RawPage, FetchError> {
        lock(&self.requests).push(request.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        lock(&self.script)
            .pop_front()
            .unwrap_or_else(|| Err(FetchError::transport("no scripted response left")))
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
