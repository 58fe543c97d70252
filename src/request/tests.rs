//! Tests for request module

use super::*;
use crate::loader::load_service_from_str;
use crate::loader::ListOperation;
use crate::types::IterationMode;
use pretty_assertions::assert_eq;

fn operation() -> ListOperation {
    let yaml = r#"
name: test
base_url: https://api.example.com
operations:
  - name: ListPredictors
    method: POST
    items_field: Predictors
    token: {}
    max_results: { max: 100 }
    filters:
      keys: [DatasetGroupArn, Status]
  - name: ListEverything
    method: GET
    items_field: Things
"#;
    load_service_from_str(yaml).unwrap().operations[0].clone()
}

fn unpaginated() -> ListOperation {
    let yaml = r#"
name: test
base_url: https://api.example.com
operations:
  - name: ListEverything
    items_field: Things
"#;
    load_service_from_str(yaml).unwrap().operations[0].clone()
}

// ============================================================================
// Filter Tests
// ============================================================================

#[test]
fn test_filter_parse() {
    let filter = Filter::parse(FilterCondition::Include, "Status=ACTIVE").unwrap();
    assert_eq!(filter, Filter::include("Status", "ACTIVE"));

    let filter = Filter::parse(FilterCondition::Exclude, "Arn=arn:aws:x=y").unwrap();
    assert_eq!(filter.condition, FilterCondition::Exclude);
    assert_eq!(filter.key, "Arn");
    assert_eq!(filter.value, "arn:aws:x=y");
}

#[test]
fn test_filter_parse_rejects_malformed() {
    assert!(Filter::parse(FilterCondition::Include, "Status").is_err());
    assert!(Filter::parse(FilterCondition::Include, "=ACTIVE").is_err());
}

#[test]
fn test_filter_condition_serde() {
    let json = serde_json::to_string(&FilterCondition::Exclude).unwrap();
    assert_eq!(json, "\"EXCLUDE\"");
}

// ============================================================================
// ListRequest Tests
// ============================================================================

#[test]
fn test_list_request_continue_from_keeps_filters() {
    let request = ListParams::new()
        .include("Status", "ACTIVE")
        .max_results(10)
        .build()
        .unwrap();
    assert!(request.is_first_page());

    let next = request.continue_from("T1".to_string());
    assert_eq!(next.filters, request.filters);
    assert_eq!(next.max_results, Some(10));
    assert_eq!(next.next_token.as_deref(), Some("T1"));
    assert!(!next.is_first_page());
}

// ============================================================================
// ListParams Tests
// ============================================================================

#[test]
fn test_empty_params_build_first_page() {
    let request = ListParams::new().build().unwrap();
    assert_eq!(request, ListRequest::first_page());
    assert_eq!(ListParams::new().mode, IterationMode::Auto);
}

#[test]
fn test_unset_sentinels_are_equivalent() {
    let implicit = ListParams::default().build().unwrap();
    let explicit = ListParams {
        filters: Vec::new(),
        max_results: None,
        starting_token: Some(String::new()),
        mode: IterationMode::Auto,
    }
    .build()
    .unwrap();

    assert_eq!(implicit, explicit);
}

#[test]
fn test_zero_max_results_rejected() {
    let err = ListParams::new().max_results(0).build().unwrap_err();
    assert!(matches!(err, crate::Error::InvalidArgument { .. }));
}

#[test]
fn test_blank_filter_key_rejected() {
    let err = ListParams::new().include("  ", "x").build().unwrap_err();
    assert!(err.to_string().contains("Filter key cannot be empty"));
}

#[test]
fn test_auto_mode_with_starting_token_is_permitted() {
    let request = ListParams::new()
        .starting_token("T7")
        .mode(IterationMode::Auto)
        .build_for(&operation())
        .unwrap();
    assert_eq!(request.next_token.as_deref(), Some("T7"));
}

#[test]
fn test_build_for_accepts_declared_filters() {
    let params = ListParams::new()
        .include("DatasetGroupArn", "arn:dsg")
        .exclude("Status", "DELETE_PENDING")
        .max_results(100);

    let request = params.build_for(&operation()).unwrap();
    assert_eq!(request.filters.len(), 2);
    assert_eq!(params.count(FilterCondition::Include), 1);
    assert_eq!(params.count(FilterCondition::Exclude), 1);
}

#[test]
fn test_build_for_rejects_unknown_filter_key() {
    let err = ListParams::new()
        .include("Color", "blue")
        .build_for(&operation())
        .unwrap_err();
    let message = err.to_string();
    assert!(message.contains("cannot filter on 'Color'"));
    assert!(message.contains("DatasetGroupArn, Status"));
}

#[test]
fn test_build_for_rejects_oversized_page() {
    let err = ListParams::new()
        .max_results(101)
        .build_for(&operation())
        .unwrap_err();
    assert!(err.to_string().contains("exceeds the ListPredictors limit of 100"));
}

#[test]
fn test_build_for_rejects_params_operation_cannot_carry() {
    let op = unpaginated();

    let err = ListParams::new().max_results(5).build_for(&op).unwrap_err();
    assert!(err.to_string().contains("does not accept max_results"));

    let err = ListParams::new().starting_token("T1").build_for(&op).unwrap_err();
    assert!(err.to_string().contains("cannot resume from a token"));

    let err = ListParams::new().include("a", "b").build_for(&op).unwrap_err();
    assert!(err.to_string().contains("does not accept filters"));
}

#[test]
fn test_manual_builder() {
    let params = ListParams::new().manual();
    assert!(params.mode.is_manual());
}
