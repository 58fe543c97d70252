//! Cancellation signal and interrupt guard

use crate::error::FetchError;
use crate::fetch::{PageFetcher, RawPage};
use crate::request::ListRequest;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

// ============================================================================
// Cancel Signal
// ============================================================================

/// Caller-owned cancellation flag
///
/// Clones share the same flag. Once cancelled it stays cancelled.
#[derive(Debug, Clone)]
pub struct CancelSignal {
    tx: Arc<watch::Sender<bool>>,
}

impl Default for CancelSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelSignal {
    /// Create a signal that has not fired
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Fire the signal
    pub fn cancel(&self) {
        if !self.tx.send_replace(true) {
            debug!("Cancellation requested");
        }
    }

    /// Check whether the signal has fired
    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolve once the signal fires
    pub async fn cancelled(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }
}

// ============================================================================
// Interrupt Guard
// ============================================================================

/// Fires a [`CancelSignal`] on Ctrl-C for as long as the guard lives
///
/// The listener task is aborted when the guard is dropped, so the handler is
/// released on every exit path, including early returns and panics.
#[derive(Debug)]
pub struct InterruptGuard {
    handle: JoinHandle<()>,
}

impl InterruptGuard {
    /// Start listening for Ctrl-C
    ///
    /// Must be called from within a tokio runtime.
    pub fn install(signal: CancelSignal) -> Self {
        let handle = tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    warn!("Interrupt received, cancelling listing");
                    signal.cancel();
                }
                Err(e) => warn!("Failed to listen for interrupts: {}", e),
            }
        });
        Self { handle }
    }
}

impl Drop for InterruptGuard {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

// ============================================================================
// Guarded Fetch
// ============================================================================

/// Run one fetch inside the boundary
///
/// Returns `FetchError::Cancelled` without calling the fetcher when the
/// signal has already fired, and abandons an in-flight fetch when it fires
/// mid-call. A page that is ready in the same poll as the signal is kept.
pub async fn guarded_fetch<F>(
    fetcher: &F,
    request: &ListRequest,
    signal: &CancelSignal,
) -> std::result::Result<RawPage, FetchError>
where
    F: PageFetcher + ?Sized,
{
    if signal.is_cancelled() {
        return Err(FetchError::Cancelled);
    }

    tokio::select! {
        biased;
        result = fetcher.fetch(request) => result,
        () = signal.cancelled() => Err(FetchError::Cancelled),
    }
}
