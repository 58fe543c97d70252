//! Pager types

use crate::error::{Error, Result};
use crate::types::IterationMode;
use serde::Serialize;
use serde_json::Value;

/// Default safety bound on the number of pages one AUTO listing may fetch
pub const DEFAULT_MAX_PAGES: usize = 10_000;

/// Pager configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagerConfig {
    /// Maximum pages to fetch in AUTO mode (`None` = unbounded)
    pub max_pages: Option<usize>,
}

impl Default for PagerConfig {
    fn default() -> Self {
        Self {
            max_pages: Some(DEFAULT_MAX_PAGES),
        }
    }
}

impl PagerConfig {
    /// Config without a page bound
    pub fn unbounded() -> Self {
        Self { max_pages: None }
    }

    /// Set the page bound
    #[must_use]
    pub fn max_pages(mut self, max_pages: Option<usize>) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Reject a zero page bound
    pub fn validate(&self) -> Result<()> {
        if self.max_pages == Some(0) {
            return Err(Error::invalid_argument("max_pages must be positive"));
        }
        Ok(())
    }
}

/// Lifecycle of a pager
///
/// `Ready` means the next fetch will submit [`IterationState::token`].
/// `Done`, `Cancelled` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerState {
    Ready,
    Fetching,
    Done,
    Cancelled,
    Failed,
}

impl PagerState {
    /// Check if no further fetch will happen
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Cancelled | Self::Failed)
    }
}

/// Iteration state owned by one pager
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IterationState {
    /// Token for the next fetch; after a MANUAL page, the token handed back
    pub token: Option<String>,
    /// Auto-drain or single page
    pub mode: IterationMode,
    /// Whether cancellation was observed
    pub cancelled: bool,
    /// Completed fetches
    pub pages_fetched: usize,
}

/// One projected page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    /// 1-based ordinal within this listing
    pub number: usize,
    /// Projected items in received order
    pub items: Vec<Value>,
    /// Token the service returned with this page
    pub next_token: Option<String>,
}

/// Everything a drained listing produced
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListOutcome {
    /// All items in received order
    pub items: Vec<Value>,
    /// Unconsumed token: MANUAL continuation, or the token in flight when
    /// the listing stopped early
    pub next_token: Option<String>,
    /// Pages fetched
    pub pages: usize,
}

/// A drain that stopped early
///
/// Carries every item received before the failure; `outcome.next_token` is
/// the token whose fetch failed, so the listing can be resumed from it.
#[derive(Debug, thiserror::Error)]
#[error("{error} (after {} items from {} pages)", .outcome.items.len(), .outcome.pages)]
pub struct PartialListing {
    /// Items and pages received before the failure
    pub outcome: ListOutcome,
    /// Why the listing stopped
    #[source]
    pub error: Error,
}

impl From<PartialListing> for Error {
    fn from(partial: PartialListing) -> Self {
        partial.error
    }
}
