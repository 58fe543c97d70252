//! State manager implementation
//!
//! Provides file-based token persistence with atomic writes.

use super::types::State;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Persists MANUAL-mode continuation tokens between invocations
#[derive(Debug, Clone)]
pub struct StateManager {
    /// Path to the state file (empty = in memory)
    path: PathBuf,
    state: Arc<RwLock<State>>,
}

impl StateManager {
    /// Create an in-memory manager (no file persistence)
    pub fn in_memory() -> Self {
        Self {
            path: PathBuf::new(),
            state: Arc::new(RwLock::new(State::new())),
        }
    }

    /// Open a state file, loading existing tokens if present
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let state = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => serde_json::from_str(&contents).map_err(|e| {
                Error::state(format!(
                    "Failed to parse state file {}: {e}",
                    path.display()
                ))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => State::new(),
            Err(e) => {
                return Err(Error::state(format!(
                    "Failed to read state file {}: {e}",
                    path.display()
                )))
            }
        };

        Ok(Self {
            path,
            state: Arc::new(RwLock::new(state)),
        })
    }

    /// Save current state to file
    ///
    /// Writes a sibling temp file and renames it over the target.
    pub async fn save(&self) -> Result<()> {
        if self.is_in_memory() {
            return Ok(());
        }

        let contents = {
            let state = self.state.read().await;
            serde_json::to_string_pretty(&*state)
                .map_err(|e| Error::state(format!("Failed to serialize state: {e}")))?
        };

        let temp_path = self.path.with_extension("tmp");
        tokio::fs::write(&temp_path, &contents)
            .await
            .map_err(|e| Error::state(format!("Failed to write state file: {e}")))?;
        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| Error::state(format!("Failed to rename state file: {e}")))?;

        debug!("Saved state to {}", self.path.display());
        Ok(())
    }

    /// Get the saved token for a listing
    pub async fn get_token(&self, service: &str, operation: &str) -> Option<String> {
        let state = self.state.read().await;
        state
            .token(service, operation)
            .map(|saved| saved.token.clone())
    }

    /// Save the token a MANUAL listing handed back
    pub async fn set_token(&self, service: &str, operation: &str, token: String) -> Result<()> {
        self.state
            .write()
            .await
            .set_token(service, operation, token);
        self.save().await
    }

    /// Forget a listing's token once it has been drained
    pub async fn clear_token(&self, service: &str, operation: &str) -> Result<()> {
        let removed = self.state.write().await.remove_token(service, operation);
        if removed {
            self.save().await?;
        }
        Ok(())
    }

    /// Snapshot of the current state
    pub async fn snapshot(&self) -> State {
        self.state.read().await.clone()
    }

    /// Get the state file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if using in-memory mode
    pub fn is_in_memory(&self) -> bool {
        self.path.as_os_str().is_empty()
    }
}
