// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # pagewalk
//!
//! Token-based pagination for the list operations of REST management APIs.
//!
//! A list operation returns one page of results plus an opaque continuation
//! token. `pagewalk` drives such operations to completion (AUTO mode) or one
//! page at a time (MANUAL mode), projecting each page into the items the
//! caller asked for.
//!
//! ## Features
//!
//! - **Declarative Operations**: token placement, filters and result fields in YAML
//! - **Lazy Paging**: items are available as each page arrives, nothing is prefetched
//! - **Cancellation**: a caller-owned signal stops a listing between or during fetches
//! - **Error Transparency**: service error codes and messages are passed through verbatim
//! - **Resumable**: MANUAL runs hand back their token; the CLI can persist it
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pagewalk::{list_operation, load_service, CancelSignal, ListParams, Result};
//! use pagewalk::http::{HttpClient, HttpClientConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let service = load_service("forecast")?;
//!     let op = service.operation("ListDatasets").unwrap();
//!     let config = HttpClientConfig::from_definition(&service.http, &service.base_url);
//!     let client = Arc::new(HttpClient::with_config(config)?);
//!
//!     let params = ListParams::new().include("Status", "ACTIVE");
//!     let mut pager = list_operation(client, op, &params, None, CancelSignal::new())?;
//!     while let Some(page) = pager.next_page().await {
//!         for item in page?.items {
//!             println!("{item}");
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  list(fetcher, projection, params, signal) → Pager           │
//! └──────────────────────────────────────────────────────────────┘
//!                               │
//! ┌───────────┬─────────────────┼──────────────┬─────────────────┐
//! │  Request  │     Pager       │   Boundary   │   Projection    │
//! ├───────────┼─────────────────┼──────────────┼─────────────────┤
//! │ Filters   │ AUTO / MANUAL   │ CancelSignal │ Default field   │
//! │ MaxResults│ Page bound      │ Ctrl-C guard │ Identity        │
//! │ Token     │ Final token     │ Classify     │ Field / Path    │
//! └───────────┴────────┬────────┴──────────────┴─────────────────┘
//!                      │
//!          PageFetcher (HTTP: retry, backoff, rate limit)
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// HTTP client with retry and rate limiting
pub mod http;

/// YAML loader for service definitions
pub mod loader;

/// Built-in service definitions
pub mod services;

/// Request building and validation
pub mod request;

/// Page fetchers
pub mod fetch;

/// Result projection
pub mod projection;

/// Cancellation and error classification
pub mod boundary;

/// Pagination state machine
pub mod pager;

/// Continuation token persistence
pub mod state;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, FetchError, Result};
pub use types::*;

// Re-export commonly used types
pub use boundary::CancelSignal;
pub use fetch::{HttpPageFetcher, PageFetcher, RawPage};
pub use loader::{load_service, load_service_from_str, ListOperation, ServiceDefinition};
pub use pager::{list, list_operation, ListOutcome, Page, Pager, PartialListing};
pub use projection::Projection;
pub use request::{Filter, FilterCondition, ListParams, ListRequest};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
