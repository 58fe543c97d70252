//! List parameters and request building
//!
//! `ListParams` collects the caller's optional inputs. Building validates
//! them locally, before anything is sent over the network.

use super::types::{Filter, FilterCondition, ListRequest};
use crate::error::{Error, Result};
use crate::loader::ListOperation;
use crate::types::{IterationMode, OptionStringExt};

/// Caller-supplied parameters of one list invocation
///
/// No parameter is required: the default asks for all items, first page,
/// default page size, draining every page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams {
    /// Filters in caller order
    pub filters: Vec<Filter>,
    /// Page-size hint
    pub max_results: Option<u32>,
    /// Token of a previously issued pagination to resume
    pub starting_token: Option<String>,
    /// Auto-drain or single page
    pub mode: IterationMode,
}

impl ListParams {
    /// Create empty parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter
    #[must_use]
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Add an include filter
    #[must_use]
    pub fn include(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filter(Filter::include(key, value))
    }

    /// Add an exclude filter
    #[must_use]
    pub fn exclude(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filter(Filter::exclude(key, value))
    }

    /// Set the page-size hint
    #[must_use]
    pub fn max_results(mut self, max_results: u32) -> Self {
        self.max_results = Some(max_results);
        self
    }

    /// Resume from a token returned by an earlier manual invocation
    #[must_use]
    pub fn starting_token(mut self, token: impl Into<String>) -> Self {
        self.starting_token = Some(token.into());
        self
    }

    /// Set the iteration mode
    #[must_use]
    pub fn mode(mut self, mode: IterationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Fetch a single page only
    #[must_use]
    pub fn manual(self) -> Self {
        self.mode(IterationMode::Manual)
    }

    /// Build the initial request without operation-specific checks
    pub fn build(&self) -> Result<ListRequest> {
        if self.max_results == Some(0) {
            return Err(Error::invalid_argument("max_results must be positive"));
        }

        if let Some(filter) = self.filters.iter().find(|f| f.key.trim().is_empty()) {
            return Err(Error::invalid_argument(format!(
                "Filter key cannot be empty (value '{}')",
                filter.value
            )));
        }

        Ok(ListRequest {
            filters: self.filters.clone(),
            max_results: self.max_results,
            next_token: self.starting_token.clone().none_if_empty(),
        })
    }

    /// Build the initial request for a declared operation
    pub fn build_for(&self, op: &ListOperation) -> Result<ListRequest> {
        let request = self.build()?;

        if let Some(max_results) = request.max_results {
            match &op.max_results {
                None => {
                    return Err(Error::invalid_argument(format!(
                        "{} does not accept max_results",
                        op.name
                    )));
                }
                Some(def) => {
                    if let Some(limit) = def.max {
                        if max_results > limit {
                            return Err(Error::invalid_argument(format!(
                                "max_results {max_results} exceeds the {} limit of {limit}",
                                op.name
                            )));
                        }
                    }
                }
            }
        }

        if request.next_token.is_some() && op.token.is_none() {
            return Err(Error::invalid_argument(format!(
                "{} is not paginated and cannot resume from a token",
                op.name
            )));
        }

        if !request.filters.is_empty() {
            let def = op.filters.as_ref().ok_or_else(|| {
                Error::invalid_argument(format!("{} does not accept filters", op.name))
            })?;
            if !def.keys.is_empty() {
                if let Some(filter) = request.filters.iter().find(|f| !def.keys.contains(&f.key)) {
                    return Err(Error::invalid_argument(format!(
                        "{} cannot filter on '{}' (valid keys: {})",
                        op.name,
                        filter.key,
                        def.keys.join(", ")
                    )));
                }
            }
        }

        Ok(request)
    }

    /// Count filters with the given condition
    pub fn count(&self, condition: FilterCondition) -> usize {
        self.filters
            .iter()
            .filter(|f| f.condition == condition)
            .count()
    }
}
