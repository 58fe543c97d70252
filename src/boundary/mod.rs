//! Error/interrupt boundary
//!
//! Every page fetch runs inside this boundary. It owns the cancellation
//! signal the caller can fire at any time, the Ctrl-C listener that fires it
//! for the CLI, and the mapping of transport-layer errors into the
//! [`FetchError`](crate::error::FetchError) classification.
//!
//! # Example
//!
//! ```no_run
//! use pagewalk::boundary::{CancelSignal, InterruptGuard};
//!
//! # async fn demo() {
//! let signal = CancelSignal::new();
//! let _guard = InterruptGuard::install(signal.clone());
//! // hand `signal` to `pagewalk::list`; Ctrl-C now cancels the listing
//! # }
//! ```

mod classify;
mod signal;

pub use classify::{classify, service_error_from_body};
pub use signal::{guarded_fetch, CancelSignal, InterruptGuard};
