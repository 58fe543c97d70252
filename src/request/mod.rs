//! Request builder module
//!
//! Turns optional caller parameters (filters, page-size hint, starting token,
//! iteration mode) into the request value a page fetcher sends.

mod params;
mod types;

pub use params::ListParams;
pub use types::{Filter, FilterCondition, ListRequest};

#[cfg(test)]
mod tests;
