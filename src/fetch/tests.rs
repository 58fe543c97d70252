//! Tests for the fetch module

use super::*;
use crate::error::FetchError;
use crate::http::{HttpClient, HttpClientConfig};
use crate::loader::{load_service_from_str, ListOperation};
use crate::request::{ListParams, ListRequest};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FORECAST_YAML: &str = r#"
name: forecast
base_url: https://forecast.example.com
operations:
  - name: ListExplainabilities
    method: POST
    headers:
      X-Amz-Target: AmazonForecast.ListExplainabilities
    items_field: Explainabilities
    token: {}
    max_results:
      max: 100
    filters:
      keys: [ResourceArn, Status]
"#;

const QUERY_YAML: &str = r#"
name: widgets
base_url: https://widgets.example.com
operations:
  - name: ListWidgets
    path: /v1/widgets
    items_field: Widgets
    token:
      request_param: page_token
      response_path: Meta.Next
      location: query
    max_results:
      param: limit
      location: query
"#;

fn operation(yaml: &str) -> ListOperation {
    load_service_from_str(yaml).unwrap().operations[0].clone()
}

fn client(base_url: &str) -> Arc<HttpClient> {
    let config = HttpClientConfig::builder()
        .base_url(base_url)
        .max_retries(0)
        .timeout(Duration::from_secs(2))
        .no_rate_limit()
        .build();
    Arc::new(HttpClient::with_config(config).unwrap())
}

// ============================================================================
// RawPage Tests
// ============================================================================

#[test]
fn test_raw_page_empty_token_is_absent() {
    let page = RawPage::new(json!({}), Some(String::new()));
    assert!(page.is_last());
    assert_eq!(page.next_token, None);

    let page = RawPage::new(json!({}), Some("T1".to_string()));
    assert!(!page.is_last());
    assert!(RawPage::last(json!([])).is_last());
}

// ============================================================================
// Encoding Tests
// ============================================================================

#[test]
fn test_encode_first_page_posts_empty_object() {
    let fetcher = HttpPageFetcher::new(client("http://localhost"), operation(FORECAST_YAML));
    let config = fetcher.encode(&ListRequest::first_page());

    assert_eq!(config.body, Some(json!({})));
    assert!(config.query.is_empty());
    assert_eq!(
        config.headers.get("X-Amz-Target").map(String::as_str),
        Some("AmazonForecast.ListExplainabilities")
    );
}

#[test]
fn test_encode_body_parameters() {
    let op = operation(FORECAST_YAML);
    let fetcher = HttpPageFetcher::new(client("http://localhost"), op.clone());
    let request = ListParams::new()
        .include("Status", "ACTIVE")
        .exclude("ResourceArn", "arn:aws:forecast:x=y")
        .max_results(25)
        .starting_token("T1")
        .build_for(&op)
        .unwrap();

    let config = fetcher.encode(&request);
    assert_eq!(
        config.body,
        Some(json!({
            "NextToken": "T1",
            "MaxResults": 25,
            "Filters": [
                {"Key": "Status", "Value": "ACTIVE", "Condition": "IS"},
                {"Key": "ResourceArn", "Value": "arn:aws:forecast:x=y", "Condition": "IS_NOT"}
            ]
        }))
    );
}

#[test]
fn test_encode_query_parameters() {
    let fetcher = HttpPageFetcher::new(client("http://localhost"), operation(QUERY_YAML));
    let request = ListRequest {
        max_results: Some(10),
        ..ListRequest::first_page()
    }
    .continue_from("abc".to_string());

    let config = fetcher.encode(&request);
    assert_eq!(config.body, None);
    assert_eq!(
        config.query,
        vec![
            ("page_token".to_string(), "abc".to_string()),
            ("limit".to_string(), "10".to_string())
        ]
    );
}

// ============================================================================
// Fetch Tests
// ============================================================================

#[tokio::test]
async fn test_fetch_extracts_token_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/"))
        .and(header("X-Amz-Target", "AmazonForecast.ListExplainabilities"))
        .and(body_json(json!({"NextToken": "T1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Explainabilities": [{"ExplainabilityArn": "arn:3"}],
            "NextToken": "T2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = HttpPageFetcher::new(client(&server.uri()), operation(FORECAST_YAML));
    let page = fetcher
        .fetch(&ListRequest::first_page().continue_from("T1".to_string()))
        .await
        .unwrap();

    assert_eq!(page.next_token.as_deref(), Some("T2"));
    assert_eq!(page.body["Explainabilities"][0]["ExplainabilityArn"], "arn:3");
}

#[tokio::test]
async fn test_fetch_nested_token_in_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/widgets"))
        .and(query_param("page_token", "p2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Widgets": [],
            "Meta": {"Next": ""}
        })))
        .mount(&server)
        .await;

    let fetcher = HttpPageFetcher::new(client(&server.uri()), operation(QUERY_YAML));
    let page = fetcher
        .fetch(&ListRequest::first_page().continue_from("p2".to_string()))
        .await
        .unwrap();
    assert!(page.is_last());
}

#[tokio::test]
async fn test_fetch_service_error_is_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "__type": "com.amazonaws.forecast#InvalidNextTokenException",
            "message": "The token is not valid."
        })))
        .mount(&server)
        .await;

    let fetcher = HttpPageFetcher::new(client(&server.uri()), operation(FORECAST_YAML));
    let err = fetcher
        .fetch(&ListRequest::first_page().continue_from("stale".to_string()))
        .await
        .unwrap_err();

    match err {
        FetchError::Service { code, message } => {
            assert_eq!(code, "InvalidNextTokenException");
            assert_eq!(message, "The token is not valid.");
        }
        other => panic!("Expected Service, got {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_undecodable_body_is_transport() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let fetcher = HttpPageFetcher::new(client(&server.uri()), operation(FORECAST_YAML));
    let err = fetcher.fetch(&ListRequest::first_page()).await.unwrap_err();
    assert!(matches!(err, FetchError::Transport { .. }), "{err:?}");
}

#[tokio::test]
async fn test_fetch_unreachable_host_is_transport() {
    // Nothing listens on the discard port
    let fetcher = HttpPageFetcher::new(client("http://127.0.0.1:9"), operation(FORECAST_YAML));
    let err = fetcher.fetch(&ListRequest::first_page()).await.unwrap_err();
    assert!(matches!(err, FetchError::Transport { .. }), "{err:?}");
}

// ============================================================================
// Scripted Fetcher Tests
// ============================================================================

#[tokio::test]
async fn test_scripted_fetcher_replays_and_records() {
    let fetcher = ScriptedFetcher::new()
        .page(json!({"Items": [1]}), Some("T1"))
        .failure(FetchError::service("Throttled", "slow down"));

    let first = fetcher.fetch(&ListRequest::first_page()).await.unwrap();
    assert_eq!(first.next_token.as_deref(), Some("T1"));

    let second = fetcher
        .fetch(&ListRequest::first_page().continue_from("T1".to_string()))
        .await;
    assert!(matches!(second, Err(FetchError::Service { .. })));

    let exhausted = fetcher.fetch(&ListRequest::first_page()).await;
    assert!(matches!(exhausted, Err(FetchError::Transport { .. })));

    assert_eq!(fetcher.calls(), 3);
    assert_eq!(
        fetcher.tokens(),
        vec![None, Some("T1".to_string()), None]
    );
}
