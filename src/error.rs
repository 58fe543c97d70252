//! Error types for pagewalk
//!
//! This module defines the error hierarchy for the whole crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//!
//! Page fetchers report a narrower [`FetchError`]; the pager attaches the
//! ordinal of the failing fetch and the token that was in flight when it
//! converts one into an [`Error`].

use thiserror::Error;

/// Boxed error used as the cause of a transport failure
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The main error type for pagewalk
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Pagination Errors
    // ============================================================================
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("Cancelled before page {page} completed")]
    Cancelled { page: usize, token: Option<String> },

    #[error("Transport error on page {page}{}: {message}", token_suffix(.token))]
    Transport {
        page: usize,
        token: Option<String>,
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("Service error on page {page}{} ({code}): {message}", token_suffix(.token))]
    Service {
        page: usize,
        token: Option<String>,
        code: String,
        message: String,
    },

    #[error("Page limit of {max_pages} reached while the service still returned a token")]
    PageLimitExceeded { max_pages: usize, token: String },

    #[error("Service returned the token it was sent on page {page}: {token}")]
    RepeatedToken { page: usize, token: String },

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("JSONPath error: {message}")]
    JsonPath { message: String },

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // State Errors
    // ============================================================================
    #[error("State error: {message}")]
    State { message: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn token_suffix(token: &Option<String>) -> String {
    match token {
        Some(token) => format!(" (token {token})"),
        None => String::new(),
    }
}

impl Error {
    /// Create an invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a JSONPath error
    pub fn json_path(message: impl Into<String>) -> Self {
        Self::JsonPath {
            message: message.into(),
        }
    }

    /// Create a state error
    pub fn state(message: impl Into<String>) -> Self {
        Self::State {
            message: message.into(),
        }
    }

    /// Ordinal (1-based) of the page fetch this error belongs to, if any
    pub fn page(&self) -> Option<usize> {
        match self {
            Error::Cancelled { page, .. }
            | Error::Transport { page, .. }
            | Error::Service { page, .. }
            | Error::RepeatedToken { page, .. } => Some(*page),
            _ => None,
        }
    }

    /// Check if this error came from the caller's cancellation signal
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled { .. })
    }
}

/// Result type alias for pagewalk
pub type Result<T> = std::result::Result<T, Error>;

// ============================================================================
// Fetch Errors
// ============================================================================

/// Failure of a single page fetch, before the pager adds page context
#[derive(Error, Debug)]
pub enum FetchError {
    /// Network-layer failure (name resolution, connection, timeout, bad body)
    #[error("{message}")]
    Transport {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// The backend rejected the request
    #[error("{code}: {message}")]
    Service { code: String, message: String },

    /// The caller's cancellation signal fired
    #[error("cancelled")]
    Cancelled,
}

impl FetchError {
    /// Create a transport error without an underlying cause
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            source: None,
        }
    }

    /// Create a transport error wrapping its cause
    pub fn transport_from(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Transport {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a service error, preserving code and message verbatim
    pub fn service(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Service {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Attach the page ordinal and in-flight token
    pub fn at(self, page: usize, token: Option<String>) -> Error {
        match self {
            FetchError::Transport { message, source } => Error::Transport {
                page,
                token,
                message,
                source,
            },
            FetchError::Service { code, message } => Error::Service {
                page,
                token,
                code,
                message,
            },
            FetchError::Cancelled => Error::Cancelled { page, token },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::invalid_argument("max_results must be positive");
        assert_eq!(
            err.to_string(),
            "Invalid argument: max_results must be positive"
        );

        let err = Error::http_status(404, "Not found");
        assert_eq!(err.to_string(), "HTTP 404: Not found");
    }

    #[test]
    fn test_fetch_error_at_preserves_service_fields() {
        let err = FetchError::service("InvalidNextTokenException", "The token is stale")
            .at(3, Some("T2".to_string()));

        match &err {
            Error::Service {
                page,
                token,
                code,
                message,
            } => {
                assert_eq!(*page, 3);
                assert_eq!(token.as_deref(), Some("T2"));
                assert_eq!(code, "InvalidNextTokenException");
                assert_eq!(message, "The token is stale");
            }
            other => panic!("Expected Service, got {other:?}"),
        }
        assert_eq!(
            err.to_string(),
            "Service error on page 3 (token T2) (InvalidNextTokenException): The token is stale"
        );
        assert_eq!(err.page(), Some(3));
    }

    #[test]
    fn test_fetch_error_transport_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset by peer");
        let err = FetchError::transport_from("connection failed", io).at(1, None);

        assert_eq!(err.to_string(), "Transport error on page 1: connection failed");
        let source = std::error::Error::source(&err).expect("source attached");
        assert_eq!(source.to_string(), "reset by peer");
    }

    #[test]
    fn test_fetch_error_cancelled() {
        let err = FetchError::Cancelled.at(2, Some("T1".to_string()));
        assert!(err.is_cancelled());
        assert_eq!(err.page(), Some(2));
    }
}
