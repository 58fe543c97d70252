//! State management module
//!
//! Keeps the continuation token a MANUAL listing hands back so a later
//! invocation can resume where it stopped.
//!
//! # Overview
//!
//! The state module provides:
//! - `State` - saved tokens keyed by `service/operation`
//! - `StateManager` - File-based state persistence

mod manager;
mod types;

pub use manager::StateManager;
pub use types::{SavedToken, State};

#[cfg(test)]
mod manager_tests;
