//! Projection types
//!
//! A projection maps a raw response body to the items a caller sees. It is
//! resolved once, when the call is constructed, and applied to every page.

use super::extract::{extract_path, extract_with_jsonpath, validate_jsonpath};
use crate::error::{Error, Result};
use crate::loader::ListOperation;
use serde_json::Value;

/// What part of each response a list invocation emits
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Projection {
    /// The operation's documented result collection (e.g. "Explainabilities")
    DefaultField(String),
    /// The whole response, including the token
    Identity,
    /// One named response field
    Field(String),
    /// A JSONPath expression evaluated against the response
    Path(String),
}

impl Projection {
    /// Default projection for an operation
    pub fn default_for(op: &ListOperation) -> Self {
        Self::DefaultField(op.items_field.clone())
    }

    /// Resolve a user selector against an operation
    ///
    /// - `None` selects the documented result collection
    /// - `*` selects the whole response
    /// - `$...` is a JSONPath expression
    /// - anything else must name a declared result field
    pub fn select(op: &ListOperation, selector: Option<&str>) -> Result<Self> {
        let Some(selector) = selector.map(str::trim) else {
            return Ok(Self::default_for(op));
        };

        if selector.is_empty() {
            return Err(Error::invalid_argument("Select cannot be empty"));
        }

        if selector == "*" {
            return Ok(Self::Identity);
        }

        if selector.starts_with('^') {
            return Err(Error::invalid_argument(format!(
                "Selecting request parameters ('{selector}') is not supported"
            )));
        }

        if selector.starts_with('$') {
            validate_jsonpath(selector)?;
            return Ok(Self::Path(selector.to_string()));
        }

        if op.result_fields.is_empty() {
            return Ok(Self::Field(selector.to_string()));
        }

        op.result_fields
            .iter()
            .find(|f| f.as_str() == selector)
            .or_else(|| {
                op.result_fields
                    .iter()
                    .find(|f| f.eq_ignore_ascii_case(selector))
            })
            .map(|f| Self::Field(f.clone()))
            .ok_or_else(|| {
                Error::invalid_argument(format!(
                    "{} has no result field '{selector}' (valid: {}, *)",
                    op.name,
                    op.result_fields.join(", ")
                ))
            })
    }

    /// Apply the projection to a response body
    ///
    /// Arrays yield their elements in received order, scalars and objects
    /// yield one item, missing fields yield nothing. The body is not modified.
    pub fn project(&self, body: &Value) -> Result<Vec<Value>> {
        match self {
            Self::Identity => Ok(vec![body.clone()]),
            Self::DefaultField(field) | Self::Field(field) => {
                Ok(flatten(extract_path(body, field)))
            }
            Self::Path(path) => extract_with_jsonpath(body, path),
        }
    }

    /// Check if this projection emits the whole response
    pub fn is_identity(&self) -> bool {
        matches!(self, Self::Identity)
    }
}

fn flatten(value: Option<&Value>) -> Vec<Value> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(arr)) => arr.clone(),
        Some(other) => vec![other.clone()],
    }
}
