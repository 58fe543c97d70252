//! Pager state machine

use super::types::{IterationState, ListOutcome, Page, PagerConfig, PagerState, PartialListing};
use crate::boundary::{guarded_fetch, CancelSignal};
use crate::error::{Error, FetchError, Result};
use crate::fetch::PageFetcher;
use crate::projection::Projection;
use crate::request::ListRequest;
use crate::types::IterationMode;
use futures::stream::{self, Stream};
use serde_json::Value;
use std::borrow::BorrowMut;
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Walks the pages of one list invocation
///
/// The pager performs at most one fetch per [`next_page`](Self::next_page)
/// call and never fetches ahead, so a caller that stops pulling stops the
/// network traffic too. Every fetch runs under the caller's
/// [`CancelSignal`].
pub struct Pager {
    fetcher: Arc<dyn PageFetcher>,
    projection: Projection,
    request: ListRequest,
    signal: CancelSignal,
    config: PagerConfig,
    state: PagerState,
    iteration: IterationState,
    last_submitted: Option<String>,
}

impl Pager {
    /// Create a pager starting from `request.next_token`
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        projection: Projection,
        request: ListRequest,
        mode: IterationMode,
        signal: CancelSignal,
    ) -> Self {
        let iteration = IterationState {
            token: request.next_token.clone(),
            mode,
            ..IterationState::default()
        };
        Self {
            fetcher,
            projection,
            request,
            signal,
            config: PagerConfig::default(),
            state: PagerState::Ready,
            iteration,
            last_submitted: None,
        }
    }

    /// Set pager configuration
    pub fn with_config(mut self, config: PagerConfig) -> Result<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    /// Current lifecycle state
    pub fn state(&self) -> PagerState {
        self.state
    }

    /// Current iteration state
    pub fn iteration(&self) -> &IterationState {
        &self.iteration
    }

    /// Check if the pager will not fetch again
    pub fn is_finished(&self) -> bool {
        self.state.is_terminal()
    }

    /// Token to resume from
    ///
    /// After a MANUAL page this is the token the service returned; after a
    /// completed AUTO run it is `None`. After a failure or cancellation it is
    /// the token that was in flight.
    pub fn final_token(&self) -> Option<&str> {
        self.iteration.token.as_deref()
    }

    /// Fetch and project the next page
    ///
    /// Returns `None` once the pager is finished. An error is returned at
    /// most once; the pager is terminal afterwards.
    pub async fn next_page(&mut self) -> Option<Result<Page>> {
        // A `Fetching` pager here had its previous call dropped mid-flight;
        // the token was not consumed, so fetching it again is safe.
        if self.state.is_terminal() {
            return None;
        }

        let token = self.iteration.token.clone();
        let number = self.iteration.pages_fetched + 1;

        if let Some(token) = &token {
            if self.last_submitted.as_ref() == Some(token) {
                return Some(Err(self.fail(Error::RepeatedToken {
                    page: self.iteration.pages_fetched,
                    token: token.clone(),
                })));
            }
            if let Some(max_pages) = self.config.max_pages {
                if self.iteration.pages_fetched >= max_pages {
                    return Some(Err(self.fail(Error::PageLimitExceeded {
                        max_pages,
                        token: token.clone(),
                    })));
                }
            }
        }

        let request = ListRequest {
            next_token: token.clone(),
            ..self.request.clone()
        };

        self.state = PagerState::Fetching;
        let result = guarded_fetch(self.fetcher.as_ref(), &request, &self.signal).await;
        self.last_submitted = token.clone();

        let raw = match result {
            Ok(raw) => raw,
            Err(FetchError::Cancelled) => {
                warn!("Listing cancelled before page {} completed", number);
                self.state = PagerState::Cancelled;
                self.iteration.cancelled = true;
                return Some(Err(Error::Cancelled {
                    page: number,
                    token,
                }));
            }
            Err(e) => return Some(Err(self.fail(e.at(number, token)))),
        };

        self.iteration.pages_fetched = number;

        let items = match self.projection.project(&raw.body) {
            Ok(items) => items,
            Err(e) => return Some(Err(self.fail(e))),
        };

        debug!(
            "Page {}: {} items, more: {}",
            number,
            items.len(),
            raw.next_token.is_some()
        );

        self.iteration.token = raw.next_token.clone();
        self.state = match (&raw.next_token, self.iteration.mode) {
            (None, _) => {
                info!("Listing complete after {} pages", number);
                PagerState::Done
            }
            (Some(_), IterationMode::Manual) => {
                info!("Returning after one page, more results available");
                PagerState::Done
            }
            (Some(_), IterationMode::Auto) => PagerState::Ready,
        };

        Some(Ok(Page {
            number,
            items,
            next_token: raw.next_token,
        }))
    }

    fn fail(&mut self, err: Error) -> Error {
        warn!("Listing failed: {}", err);
        self.state = PagerState::Failed;
        err
    }

    /// Stream items lazily, borrowing the pager
    ///
    /// Use this when the final token is needed after the stream ends.
    pub fn items(&mut self) -> impl Stream<Item = Result<Value>> + Send + '_ {
        item_stream(self)
    }

    /// Stream items lazily, consuming the pager
    pub fn into_items(self) -> impl Stream<Item = Result<Value>> + Send {
        item_stream(self)
    }

    /// Fetch every remaining page and collect the items
    ///
    /// A failure or cancellation keeps what was already received in the
    /// returned [`PartialListing`].
    pub async fn drain(&mut self) -> std::result::Result<ListOutcome, PartialListing> {
        let mut outcome = ListOutcome::default();
        while let Some(page) = self.next_page().await {
            match page {
                Ok(page) => {
                    outcome.pages += 1;
                    outcome.items.extend(page.items);
                }
                Err(error) => {
                    outcome.next_token = self.iteration.token.clone();
                    return Err(PartialListing { outcome, error });
                }
            }
        }
        outcome.next_token = self.iteration.token.clone();
        Ok(outcome)
    }
}

impl std::fmt::Debug for Pager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pager")
            .field("projection", &self.projection)
            .field("state", &self.state)
            .field("iteration", &self.iteration)
            .finish_non_exhaustive()
    }
}

fn item_stream<P>(pager: P) -> impl Stream<Item = Result<Value>> + Send
where
    P: BorrowMut<Pager> + Send,
{
    stream::unfold(
        (pager, VecDeque::new()),
        |(mut pager, mut buffer)| async move {
            loop {
                if let Some(item) = buffer.pop_front() {
                    return Some((Ok(item), (pager, buffer)));
                }
                match pager.borrow_mut().next_page().await {
                    None => return None,
                    Some(Ok(page)) => buffer.extend(page.items),
                    Some(Err(e)) => return Some((Err(e), (pager, buffer))),
                }
            }
        },
    )
}
