//! Loader types
//!
//! Declarative service definition types for YAML parsing. A service lists
//! the paginated list operations it exposes and how each one places its
//! continuation token, page-size hint and filters on the wire.

use crate::types::{JsonObject, Method, ParamLocation};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// Service Definition
// ============================================================================

/// Top-level service definition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ServiceDefinition {
    /// Service name
    pub name: String,
    /// API version of the service model
    #[serde(default = "default_version")]
    pub version: String,
    /// Base URL for all requests
    pub base_url: String,
    /// HTTP client configuration
    #[serde(default)]
    pub http: HttpDefinition,
    /// Headers sent with every request
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// List operations
    pub operations: Vec<ListOperation>,
}

fn default_version() -> String {
    "0.1.0".to_string()
}

impl ServiceDefinition {
    /// Look up an operation by name (exact match first, then case-insensitive)
    pub fn operation(&self, name: &str) -> Option<&ListOperation> {
        self.operations
            .iter()
            .find(|op| op.name == name)
            .or_else(|| {
                self.operations
                    .iter()
                    .find(|op| op.name.eq_ignore_ascii_case(name))
            })
    }

    /// Names of all operations in definition order
    pub fn operation_names(&self) -> Vec<&str> {
        self.operations.iter().map(|op| op.name.as_str()).collect()
    }
}

// ============================================================================
// HTTP Definition
// ============================================================================

/// HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct HttpDefinition {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Maximum retries
    #[serde(default = "default_retries")]
    pub max_retries: u32,
    /// Rate limit (requests per second)
    #[serde(default)]
    pub rate_limit_rps: Option<u32>,
    /// User agent
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for HttpDefinition {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            max_retries: default_retries(),
            rate_limit_rps: None,
            user_agent: None,
        }
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_retries() -> u32 {
    3
}

// ============================================================================
// List Operation
// ============================================================================

/// A paginated list operation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ListOperation {
    /// Operation name (e.g. "ListDatasets")
    pub name: String,
    /// Short description shown by `pagewalk operations`
    #[serde(default)]
    pub description: Option<String>,
    /// HTTP method
    #[serde(default)]
    pub method: Method,
    /// URL path relative to the service base URL
    #[serde(default = "default_path")]
    pub path: String,
    /// Operation-specific headers
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// Static JSON body fields merged into every request
    #[serde(default)]
    pub body: JsonObject,
    /// Response field holding the primary result collection
    pub items_field: String,
    /// Response fields that may be selected by name
    #[serde(default)]
    pub result_fields: Vec<String>,
    /// Continuation token placement
    #[serde(default)]
    pub token: Option<TokenDefinition>,
    /// Page-size hint placement
    #[serde(default)]
    pub max_results: Option<MaxResultsDefinition>,
    /// Filter encoding
    #[serde(default)]
    pub filters: Option<FilterDefinition>,
}

fn default_path() -> String {
    "/".to_string()
}

impl ListOperation {
    /// Check whether any request parameter lives in the JSON body
    pub fn uses_body(&self) -> bool {
        !self.body.is_empty()
            || self.filters.is_some()
            || self
                .token
                .as_ref()
                .is_some_and(|t| t.location == ParamLocation::Body)
            || self
                .max_results
                .as_ref()
                .is_some_and(|m| m.location == ParamLocation::Body)
    }
}

/// Continuation token definition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TokenDefinition {
    /// Request parameter carrying the token
    #[serde(default = "default_token_param")]
    pub request_param: String,
    /// Path of the next token in the response body
    #[serde(default = "default_token_param")]
    pub response_path: String,
    /// Where the request parameter is placed
    #[serde(default)]
    pub location: ParamLocation,
}

fn default_token_param() -> String {
    "NextToken".to_string()
}

/// Page-size hint definition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MaxResultsDefinition {
    /// Request parameter carrying the page size
    #[serde(default = "default_max_results_param")]
    pub param: String,
    /// Where the request parameter is placed
    #[serde(default)]
    pub location: ParamLocation,
    /// Largest page size the service accepts
    #[serde(default)]
    pub max: Option<u32>,
}

fn default_max_results_param() -> String {
    "MaxResults".to_string()
}

/// Filter encoding definition
///
/// Filters are sent as a JSON body array of `{Key, Value, Condition}` objects.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct FilterDefinition {
    /// Body field holding the filter array
    #[serde(default = "default_filters_param")]
    pub param: String,
    /// Filter keys the service accepts (empty = any)
    #[serde(default)]
    pub keys: Vec<String>,
    /// Wire value of the include condition
    #[serde(default = "default_include")]
    pub include: String,
    /// Wire value of the exclude condition
    #[serde(default = "default_exclude")]
    pub exclude: String,
}

fn default_filters_param() -> String {
    "Filters".to_string()
}

fn default_include() -> String {
    "IS".to_string()
}

fn default_exclude() -> String {
    "IS_NOT".to_string()
}
