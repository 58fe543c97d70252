//! Tests for StateManager

use super::*;
use tempfile::tempdir;

#[test]
fn test_state_manager_in_memory() {
    let manager = StateManager::in_memory();
    assert!(manager.is_in_memory());
}

#[tokio::test]
async fn test_in_memory_tokens() {
    let manager = StateManager::in_memory();
    assert!(manager.get_token("forecast", "ListDatasets").await.is_none());

    manager
        .set_token("forecast", "ListDatasets", "T1".to_string())
        .await
        .unwrap();
    assert_eq!(
        manager.get_token("forecast", "ListDatasets").await,
        Some("T1".to_string())
    );

    manager.clear_token("forecast", "ListDatasets").await.unwrap();
    assert!(manager.get_token("forecast", "ListDatasets").await.is_none());
}

#[tokio::test]
async fn test_open_missing_file_starts_empty() {
    let dir = tempdir().unwrap();
    let manager = StateManager::open(dir.path().join("state.json"))
        .await
        .unwrap();

    assert!(!manager.is_in_memory());
    assert!(manager.snapshot().await.tokens.is_empty());
}

#[tokio::test]
async fn test_tokens_persist_across_managers() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");

    let manager = StateManager::open(&path).await.unwrap();
    manager
        .set_token("forecast", "ListForecasts", "abc/123==".to_string())
        .await
        .unwrap();
    assert!(path.exists());
    assert!(!path.with_extension("tmp").exists());

    let reopened = StateManager::open(&path).await.unwrap();
    assert_eq!(
        reopened.get_token("forecast", "ListForecasts").await,
        Some("abc/123==".to_string())
    );
    assert_eq!(reopened.path(), path.as_path());
}

#[tokio::test]
async fn test_clear_token_persists() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");

    let manager = StateManager::open(&path).await.unwrap();
    manager
        .set_token("forecast", "ListMonitors", "T9".to_string())
        .await
        .unwrap();
    manager.clear_token("forecast", "ListMonitors").await.unwrap();

    let reopened = StateManager::open(&path).await.unwrap();
    assert!(reopened.get_token("forecast", "ListMonitors").await.is_none());
}

#[tokio::test]
async fn test_open_corrupt_file_fails() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(&path, "{not json").unwrap();

    let err = StateManager::open(&path).await.unwrap_err();
    assert!(matches!(err, crate::Error::State { .. }), "{err}");
}
