//! Error classification
//!
//! Maps transport-layer errors onto the three outcomes a page fetch can
//! have besides success: transport failure, service rejection, cancellation.

use crate::error::{Error, FetchError};
use serde_json::Value;

/// Classify an error raised while fetching one page
pub fn classify(err: Error) -> FetchError {
    match err {
        Error::HttpStatus { status, body } => service_error_from_body(status, &body),
        Error::Timeout { timeout_ms } => {
            FetchError::transport(format!("request timed out after {timeout_ms}ms"))
        }
        Error::Http(e) => {
            let message = if e.is_connect() {
                "connection failed".to_string()
            } else if e.is_decode() || e.is_body() {
                "failed to read response body".to_string()
            } else {
                "request failed".to_string()
            };
            FetchError::transport_from(message, e)
        }
        Error::JsonParse(e) => FetchError::transport_from("response body is not valid JSON", e),
        Error::Cancelled { .. } => FetchError::Cancelled,
        other => FetchError::transport(other.to_string()),
    }
}

/// Build a service error from a non-success response
///
/// The code comes from `__type` (namespace before `#` dropped), `code` or
/// `Code`; the message from `message` or `Message`. Both are passed through
/// verbatim. Bodies that carry neither fall back to the HTTP status.
pub fn service_error_from_body(status: u16, body: &str) -> FetchError {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let field = |names: &[&str]| -> Option<String> {
        let obj = parsed.as_ref()?.as_object()?;
        names
            .iter()
            .find_map(|name| obj.get(*name).and_then(Value::as_str))
            .map(str::to_string)
    };

    let code = field(&["__type", "code", "Code"])
        .map(|code| match code.rsplit_once('#') {
            Some((_, name)) => name.to_string(),
            None => code,
        })
        .unwrap_or_else(|| format!("HTTP{status}"));

    let message = field(&["message", "Message"])
        .or_else(|| {
            let trimmed = body.trim();
            (parsed.is_none() && !trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .unwrap_or_else(|| {
            reqwest::StatusCode::from_u16(status)
                .ok()
                .and_then(|s| s.canonical_reason())
                .unwrap_or("request rejected")
                .to_string()
        });

    FetchError::service(code, message)
}
