//! Page fetcher module
//!
//! A page fetcher performs exactly one network round-trip per call: it sends
//! one [`ListRequest`](crate::request::ListRequest) and returns the raw
//! response together with the continuation token it carried.
//!
//! # Overview
//!
//! - `PageFetcher` - the seam the pager drives; inject any implementation
//! - `HttpPageFetcher` - encodes requests per a declared `ListOperation`
//! - `ScriptedFetcher` - in-memory fetcher replaying canned pages

mod http;
mod scripted;
mod types;

pub use http::HttpPageFetcher;
pub use scripted::ScriptedFetcher;
pub use types::{PageFetcher, RawPage};

#[cfg(test)]
mod tests;
