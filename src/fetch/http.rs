//! HTTP page fetcher
//!
//! Encodes a `ListRequest` the way a declared `ListOperation` expects it on
//! the wire and decodes the continuation token from the response.

use super::types::{PageFetcher, RawPage};
use crate::boundary::classify;
use crate::error::FetchError;
use crate::http::{HttpClient, RequestConfig};
use crate::loader::ListOperation;
use crate::projection::extract_string;
use crate::request::{FilterCondition, ListRequest};
use crate::types::{JsonObject, Method, OptionStringExt, ParamLocation};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;

/// Page fetcher for one declared list operation
///
/// The client is injected so several fetchers (and several concurrent
/// listings) can share one connection pool and rate limiter.
#[derive(Debug, Clone)]
pub struct HttpPageFetcher {
    client: Arc<HttpClient>,
    operation: ListOperation,
}

impl HttpPageFetcher {
    /// Create a fetcher for `operation`
    pub fn new(client: Arc<HttpClient>, operation: ListOperation) -> Self {
        Self { client, operation }
    }

    /// The operation this fetcher sends
    pub fn operation(&self) -> &ListOperation {
        &self.operation
    }

    /// Encode a request into headers, query parameters and body
    pub fn encode(&self, request: &ListRequest) -> RequestConfig {
        let op = &self.operation;
        let mut config = RequestConfig::new();
        let mut body: JsonObject = op.body.clone();

        for (key, value) in &op.headers {
            config = config.header(key, value);
        }

        if let (Some(def), Some(token)) = (&op.token, &request.next_token) {
            config = place(
                config,
                &mut body,
                def.location,
                &def.request_param,
                Value::String(token.clone()),
            );
        }

        if let (Some(def), Some(max_results)) = (&op.max_results, request.max_results) {
            config = place(
                config,
                &mut body,
                def.location,
                &def.param,
                Value::from(max_results),
            );
        }

        if let Some(def) = &op.filters {
            if !request.filters.is_empty() {
                let filters: Vec<Value> = request
                    .filters
                    .iter()
                    .map(|f| {
                        let condition = match f.condition {
                            FilterCondition::Include => &def.include,
                            FilterCondition::Exclude => &def.exclude,
                        };
                        json!({"Key": f.key, "Value": f.value, "Condition": condition})
                    })
                    .collect();
                body.insert(def.param.clone(), Value::Array(filters));
            }
        }

        if op.method == Method::POST || !body.is_empty() {
            config = config.json(Value::Object(body));
        }

        config
    }
}

fn place(
    config: RequestConfig,
    body: &mut JsonObject,
    location: ParamLocation,
    name: &str,
    value: Value,
) -> RequestConfig {
    match location {
        ParamLocation::Body => {
            body.insert(name.to_string(), value);
            config
        }
        ParamLocation::Query => {
            let rendered = match value {
                Value::String(s) => s,
                other => other.to_string(),
            };
            config.query(name, rendered)
        }
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, request: &ListRequest) -> std::result::Result<RawPage, FetchError> {
        let op = &self.operation;
        let config = self.encode(request);

        let body = self
            .client
            .request_json(op.method.into(), &op.path, config)
            .await
            .map_err(classify)?;

        let next_token = op
            .token
            .as_ref()
            .and_then(|def| extract_string(&body, &def.response_path))
            .none_if_empty();

        debug!(
            "{}: received page (continued: {}, more: {})",
            op.name,
            request.next_token.is_some(),
            next_token.is_some()
        );

        Ok(RawPage { body, next_token })
    }
}
