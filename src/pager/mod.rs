//! Pager module
//!
//! Drives a page fetcher through the pages of one list invocation.
//!
//! # Overview
//!
//! In AUTO mode the pager keeps fetching while the service returns a
//! continuation token; in MANUAL mode it stops after one page and hands the
//! token back through [`Pager::final_token`]. Items are projected as each
//! page arrives and are available before the next fetch starts.
//!
//! # Example
//!
//! ```no_run
//! use pagewalk::boundary::CancelSignal;
//! use pagewalk::fetch::{PageFetcher, ScriptedFetcher};
//! use pagewalk::projection::Projection;
//! use pagewalk::request::ListParams;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! # async fn demo() -> pagewalk::Result<()> {
//! let fetcher: Arc<dyn PageFetcher> = Arc::new(
//!     ScriptedFetcher::new()
//!         .page(json!({"Items": [1, 2]}), Some("T1"))
//!         .page(json!({"Items": [3]}), None),
//! );
//! let mut pager = pagewalk::list(
//!     fetcher,
//!     Projection::DefaultField("Items".into()),
//!     &ListParams::new(),
//!     CancelSignal::new(),
//! )?;
//! let outcome = pager.drain().await?;
//! assert_eq!(outcome.items.len(), 3);
//! # Ok(())
//! # }
//! ```

mod types;
mod walker;

pub use types::{
    IterationState, ListOutcome, Page, PagerConfig, PagerState, PartialListing,
    DEFAULT_MAX_PAGES,
};
pub use walker::Pager;

use crate::boundary::CancelSignal;
use crate::error::Result;
use crate::fetch::{HttpPageFetcher, PageFetcher};
use crate::http::HttpClient;
use crate::loader::ListOperation;
use crate::projection::Projection;
use crate::request::ListParams;
use std::sync::Arc;

/// Start a list invocation
///
/// Parameters are validated before anything is fetched; the returned pager
/// has not touched the network yet.
pub fn list(
    fetcher: Arc<dyn PageFetcher>,
    projection: Projection,
    params: &ListParams,
    signal: CancelSignal,
) -> Result<Pager> {
    let request = params.build()?;
    Ok(Pager::new(fetcher, projection, request, params.mode, signal))
}

/// Start a list invocation of a declared operation over HTTP
///
/// Validates the parameters and the selector against the operation.
pub fn list_operation(
    client: Arc<HttpClient>,
    operation: &ListOperation,
    params: &ListParams,
    select: Option<&str>,
    signal: CancelSignal,
) -> Result<Pager> {
    let request = params.build_for(operation)?;
    let projection = Projection::select(operation, select)?;
    let fetcher = Arc::new(HttpPageFetcher::new(client, operation.clone()));
    Ok(Pager::new(fetcher, projection, request, params.mode, signal))
}
