//! Token store types
//!
//! These types are serialized to JSON and persisted between runs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// All saved continuation tokens, keyed by `service/operation`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct State {
    #[serde(default)]
    pub tokens: BTreeMap<String, SavedToken>,
}

impl State {
    /// Create a new empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Key under which a listing's token is stored
    pub fn key(service: &str, operation: &str) -> String {
        format!("{service}/{operation}")
    }

    /// Get the saved token for a listing
    pub fn token(&self, service: &str, operation: &str) -> Option<&SavedToken> {
        self.tokens.get(&Self::key(service, operation))
    }

    /// Save a token, replacing any earlier one
    pub fn set_token(&mut self, service: &str, operation: &str, token: String) {
        self.tokens
            .insert(Self::key(service, operation), SavedToken::new(token));
    }

    /// Forget the token of a listing, returning whether one was stored
    pub fn remove_token(&mut self, service: &str, operation: &str) -> bool {
        self.tokens.remove(&Self::key(service, operation)).is_some()
    }
}

/// A continuation token handed back by a MANUAL listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedToken {
    /// Opaque token, stored verbatim
    pub token: String,
    /// When the token was saved
    pub saved_at: DateTime<Utc>,
}

impl SavedToken {
    /// Wrap a token with the current time
    pub fn new(token: String) -> Self {
        Self {
            token,
            saved_at: Utc::now(),
        }
    }
}
