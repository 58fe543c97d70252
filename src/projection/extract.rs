//! Path extraction helpers
//!
//! Simple dot-notation lookups (`Outer.Inner`, `$.Outer.Inner`, `Items[0]`)
//! plus full JSONPath through jsonpath-rust.

use crate::error::{Error, Result};
use serde_json::Value;

/// Look up a value by simple dot-notation path
///
/// Supports `$.` prefixes and non-negative or negative array indices.
pub fn extract_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let path = path.strip_prefix("$.").unwrap_or(path);
    if path.is_empty() || path == "$" {
        return Some(value);
    }

    let mut current = value;
    for part in path.split('.') {
        if let Some(bracket_pos) = part.find('[') {
            let name = &part[..bracket_pos];
            let index_str = part[bracket_pos + 1..].strip_suffix(']')?;

            if !name.is_empty() {
                current = current.get(name)?;
            }

            let index: i64 = index_str.parse().ok()?;
            let Value::Array(arr) = current else {
                return None;
            };
            #[allow(clippy::cast_possible_wrap)]
            let idx = if index < 0 {
                arr.len() as i64 + index
            } else {
                index
            };
            if idx < 0 {
                return None;
            }
            current = arr.get(idx as usize)?;
        } else {
            current = current.as_object()?.get(part)?;
        }
    }

    Some(current)
}

/// Look up a scalar by path and render it as a string
pub fn extract_string(value: &Value, path: &str) -> Option<String> {
    match extract_path(value, path)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Check that a JSONPath expression parses
pub fn validate_jsonpath(path: &str) -> Result<()> {
    extract_with_jsonpath(&Value::Null, path).map(|_| ())
}

/// Evaluate a JSONPath expression, flattening the match list
pub fn extract_with_jsonpath(value: &Value, path: &str) -> Result<Vec<Value>> {
    use jsonpath_rust::JsonPath;

    let jp = JsonPath::try_from(path)
        .map_err(|e| Error::json_path(format!("Invalid JSONPath '{path}': {e}")))?;

    match jp.find(value) {
        Value::Array(arr) => Ok(arr),
        Value::Null => Ok(vec![]),
        other => Ok(vec![other]),
    }
}
