//! Request types
//!
//! Filters and the request value handed to a page fetcher.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Whether a filter keeps or drops matching items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FilterCondition {
    /// Keep items whose field matches
    #[default]
    Include,
    /// Drop items whose field matches
    Exclude,
}

/// An allow/deny predicate matched by the service against a named field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    /// Include or exclude
    pub condition: FilterCondition,
    /// Field name the service matches against
    pub key: String,
    /// Value to match
    pub value: String,
}

impl Filter {
    /// Create an include filter
    pub fn include(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            condition: FilterCondition::Include,
            key: key.into(),
            value: value.into(),
        }
    }

    /// Create an exclude filter
    pub fn exclude(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            condition: FilterCondition::Exclude,
            key: key.into(),
            value: value.into(),
        }
    }

    /// Parse a `KEY=VALUE` pair
    ///
    /// Only the first `=` separates key from value, so values may contain `=`.
    pub fn parse(condition: FilterCondition, pair: &str) -> Result<Self> {
        let (key, value) = pair.split_once('=').ok_or_else(|| {
            Error::invalid_argument(format!("Filter must be KEY=VALUE, got '{pair}'"))
        })?;
        let key = key.trim();
        if key.is_empty() {
            return Err(Error::invalid_argument(format!(
                "Filter key cannot be empty in '{pair}'"
            )));
        }
        Ok(Self {
            condition,
            key: key.to_string(),
            value: value.to_string(),
        })
    }
}

/// One list request: filters, page-size hint and continuation token
///
/// `next_token == None` asks for the first page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListRequest {
    /// Filters in caller order
    pub filters: Vec<Filter>,
    /// Page-size hint
    pub max_results: Option<u32>,
    /// Continuation token
    pub next_token: Option<String>,
}

impl ListRequest {
    /// Request for the first page with no filters and the default page size
    pub fn first_page() -> Self {
        Self::default()
    }

    /// Same request, continuing from `token`
    #[must_use]
    pub fn continue_from(&self, token: String) -> Self {
        Self {
            filters: self.filters.clone(),
            max_results: self.max_results,
            next_token: Some(token),
        }
    }

    /// Check if this request asks for the first page
    pub fn is_first_page(&self) -> bool {
        self.next_token.is_none()
    }
}
